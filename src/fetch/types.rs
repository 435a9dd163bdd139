//! Commands accepted by the fetch worker and events it reports back.

use crate::playlist::{AudioFeatures, PlaylistHeader, Track};

#[derive(Debug)]
pub enum FetchCmd {
    /// Load the playlist with the given id, following every page.
    Load(String),
    /// Stop the worker thread.
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    /// Header metadata from the initial playlist lookup.
    PlaylistLoaded(PlaylistHeader),
    /// One page worth of tracks, in page order.
    TracksPage(Vec<Track>),
    /// One batch of audio-feature records.
    FeaturesBatch(Vec<AudioFeatures>),
    /// A feature batch failed; pagination carries on.
    FeaturesFailed(String),
    /// The last page (and its features) has been delivered.
    Finished,
    /// The playlist or a page could not be fetched; nothing more will follow.
    Failed(String),
}
