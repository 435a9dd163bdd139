//! Playlist domain: tracks, audio features, and the merge/join/sort pipeline
//! that turns fetched pages into the list the UI renders.

mod display;
mod merge;
mod model;
mod project;

pub use display::{display_from_fields, format_duration, pluralize};
pub use merge::accumulate;
pub use model::*;
pub use project::{Joined, project};
