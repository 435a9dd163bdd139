use std::path::PathBuf;

use serde::Deserialize;

use crate::playlist::SortKey;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadence/config.toml` or `~/.config/cadence/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENCE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub fetch: FetchSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Root of the Web API, without a trailing slash.
    pub base_url: String,
    /// OAuth bearer token. Obtaining or refreshing it is left to the user.
    pub token: Option<String>,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
    /// Optional ISO 3166-1 market code passed with every request.
    pub market: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.spotify.com/v1".to_string(),
            token: None,
            timeout_secs: 30,
            market: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Request audio features after every page of tracks (the default), or
    /// once after the last page when `false`.
    pub features_per_page: bool,
    /// Maximum number of ids per audio-features request (1..=100).
    pub feature_batch_size: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            features_per_page: true,
            feature_batch_size: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered in the top border of the header box.
    pub header_text: String,

    /// Which track fields make up a list row, and in what order.
    ///
    /// Example: ["artists", "title"]
    pub track_fields: Vec<TrackDisplayField>,

    /// Separator used to join `track_fields`.
    pub track_separator: String,

    /// Sort order selected at startup.
    pub default_sort: SortKey,

    /// Whether to show the value of the active sort feature next to each row.
    pub show_sort_value: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " cadence ".to_string(),
            track_fields: vec![TrackDisplayField::Artists, TrackDisplayField::Title],
            track_separator: " - ".to_string(),
            default_sort: SortKey::None,
            show_sort_value: true,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    #[serde(alias = "name")]
    Title,
    #[serde(alias = "artist")]
    Artists,
    Album,
    Duration,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/cadence/cadence.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
