//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the loaded playlist,
//! the active sort and the selection/filter state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
