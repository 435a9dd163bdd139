//! Background fetching of playlist pages and audio features.
//!
//! A single worker thread runs the playlist load for each `FetchCmd::Load`
//! and streams [`FetchEvent`]s back to the UI thread, which owns all state.

mod pipeline;
mod types;
mod worker;

pub use types::{FetchCmd, FetchEvent};
pub use worker::Fetcher;

#[cfg(test)]
mod tests;
