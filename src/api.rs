//! Remote API access.
//!
//! [`PlaylistApi`] is the seam between the fetch pipeline and the network;
//! [`SpotifyClient`] is the HTTP implementation used at runtime.

mod client;
mod error;
mod wire;

pub use client::SpotifyClient;
pub use error::ApiError;

use crate::playlist::{AudioFeatures, PageCursor, Playlist, TrackPage};

/// The three lookups the playlist view needs.
pub trait PlaylistApi {
    /// Fetch playlist metadata together with its first page of tracks.
    fn playlist(&self, id: &str) -> Result<Playlist, ApiError>;

    /// Follow a next-page cursor.
    fn page(&self, cursor: &PageCursor) -> Result<TrackPage, ApiError>;

    /// Fetch audio features for the given track ids in a single request.
    fn audio_features(&self, ids: &[String]) -> Result<Vec<AudioFeatures>, ApiError>;
}

/// Extract a playlist id from a bare id, a `spotify:playlist:<id>` URI or an
/// `https://open.spotify.com/playlist/<id>?...` link.
pub fn parse_playlist_id(input: &str) -> Result<String, ApiError> {
    let s = input.trim();

    let id = if let Some(rest) = s.strip_prefix("spotify:playlist:") {
        rest
    } else if let Some(pos) = s.find("/playlist/") {
        let rest = &s[pos + "/playlist/".len()..];
        rest.split(['?', '#', '/']).next().unwrap_or_default()
    } else {
        s
    };

    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(id.to_string())
    } else {
        Err(ApiError::InvalidPlaylistId(input.to_string()))
    }
}
