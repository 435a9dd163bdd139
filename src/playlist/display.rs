use std::time::Duration;

use crate::config::TrackDisplayField;

use super::model::Track;

/// Format a `Duration` as `M:SS`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Build the row text for a track according to the provided `fields` and separator.
///
/// Empty fields are skipped; falls back to the track name when nothing was produced.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Title => {
                if !track.name.trim().is_empty() {
                    parts.push(track.name.trim().to_string());
                }
            }
            TrackDisplayField::Artists => {
                if let Some(a) = track.artist_line() {
                    parts.push(a);
                }
            }
            TrackDisplayField::Album => {
                if let Some(a) = track
                    .album
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Duration => {
                if let Some(d) = track.duration {
                    parts.push(format_duration(d));
                }
            }
        }
    }

    if parts.is_empty() {
        track.name.clone()
    } else {
        parts.join(sep)
    }
}

/// `"1 follower"`, `"3 followers"`.
pub fn pluralize(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
