use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// A single track of the playlist, keyed by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub explicit: bool,
}

impl Track {
    /// Artist names joined for display, or `None` when there are none.
    pub fn artist_line(&self) -> Option<String> {
        let names: Vec<&str> = self
            .artists
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }
}

/// Numeric audio descriptors for one track.
///
/// Every numeric field of the API record ends up in `values`; string fields
/// (`uri`, `track_href`, ...) are discarded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawAudioFeatures")]
pub struct AudioFeatures {
    pub id: String,
    pub values: BTreeMap<String, f64>,
}

impl AudioFeatures {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

#[derive(Deserialize)]
struct RawAudioFeatures {
    id: String,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl From<RawAudioFeatures> for AudioFeatures {
    fn from(raw: RawAudioFeatures) -> Self {
        let values = raw
            .rest
            .into_iter()
            .filter_map(|(k, v)| v.as_f64().map(|n| (k, n)))
            .collect();
        Self { id: raw.id, values }
    }
}

/// Header metadata shown above the track list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistHeader {
    pub id: String,
    pub name: String,
    pub owner: Option<String>,
    pub image_url: Option<String>,
    pub followers: u64,
    pub total_tracks: u64,
}

/// Continuation token for the next page of playlist items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(pub String);

impl PageCursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of tracks plus the cursor to the next page, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackPage {
    pub tracks: Vec<Track>,
    pub next: Option<PageCursor>,
}

/// A playlist as returned by the first lookup: header plus its first page.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub header: PlaylistHeader,
    pub first_page: TrackPage,
}

/// Audio feature used to order the track list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the playlist's own order.
    #[default]
    #[serde(alias = "off", alias = "original")]
    None,
    Danceability,
    Tempo,
    Energy,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::None,
        SortKey::Danceability,
        SortKey::Tempo,
        SortKey::Energy,
    ];

    /// Name of the feature in an audio-features record.
    pub fn feature_name(self) -> Option<&'static str> {
        match self {
            SortKey::None => None,
            SortKey::Danceability => Some("danceability"),
            SortKey::Tempo => Some("tempo"),
            SortKey::Energy => Some("energy"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::None => "Playlist order",
            SortKey::Danceability => "Danceability",
            SortKey::Tempo => "Tempo",
            SortKey::Energy => "Energy",
        }
    }

    /// Next key in `ALL`, wrapping back to `None`.
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }
}
