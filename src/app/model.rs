//! Application model types: `App` and `LoadState`.
//!
//! The `App` struct owns the accumulated playlist state (tracks, audio
//! features, header), the active sort key, and the selection and filter
//! state used by the UI and runtime.

use crate::config::{TrackDisplayField, UiSettings};
use crate::fetch::FetchEvent;
use crate::playlist::{
    self, AudioFeatures, Joined, PlaylistHeader, SortKey, Track, accumulate, project,
};

/// Progress of the current playlist load.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        pages: usize,
    },
    Done {
        pages: usize,
    },
    Failed(String),
}

/// The main application model.
pub struct App {
    pub playlist_id: Option<String>,
    pub header: Option<PlaylistHeader>,
    pub tracks: Vec<Track>,
    pub features: Vec<AudioFeatures>,
    pub sort: SortKey,
    pub load_state: LoadState,
    /// Most recent non-fatal error (a failed feature batch).
    pub last_error: Option<String>,

    pub selected: usize,
    pub filter_mode: bool,
    pub filter_query: String,
    pub details_window: bool,

    track_fields: Vec<TrackDisplayField>,
    track_separator: String,

    /// Projected order; recomputed whenever tracks, features or sort change.
    rows: Vec<Joined>,
    /// Feature record index per track index.
    feature_of: Vec<Option<usize>>,
    /// Rendered row text per track index.
    row_text: Vec<String>,
    lower_text: Vec<String>,
}

impl App {
    /// Create an empty `App` using the display preferences from `ui`.
    pub fn new(ui: &UiSettings) -> Self {
        Self {
            playlist_id: None,
            header: None,
            tracks: Vec::new(),
            features: Vec::new(),
            sort: ui.default_sort,
            load_state: LoadState::Idle,
            last_error: None,

            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            details_window: false,

            track_fields: ui.track_fields.clone(),
            track_separator: ui.track_separator.clone(),

            rows: Vec::new(),
            feature_of: Vec::new(),
            row_text: Vec::new(),
            lower_text: Vec::new(),
        }
    }

    /// Drop everything loaded so far and mark a new load of `id` as started.
    pub fn begin_load(&mut self, id: String) {
        self.playlist_id = Some(id);
        self.header = None;
        self.tracks.clear();
        self.features.clear();
        self.load_state = LoadState::Loading { pages: 0 };
        self.last_error = None;
        self.selected = 0;
        self.refresh_projection();
    }

    /// Fold one event from the fetch worker into the model.
    pub fn apply(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::PlaylistLoaded(header) => {
                self.header = Some(header);
            }
            FetchEvent::TracksPage(page) => {
                self.tracks = accumulate(std::mem::take(&mut self.tracks), page);
                if let LoadState::Loading { pages } = &mut self.load_state {
                    *pages += 1;
                }
                self.refresh_projection();
            }
            FetchEvent::FeaturesBatch(batch) => {
                self.features = accumulate(std::mem::take(&mut self.features), batch);
                self.refresh_projection();
            }
            FetchEvent::FeaturesFailed(msg) => {
                self.last_error = Some(msg);
            }
            FetchEvent::Finished => {
                let pages = match self.load_state {
                    LoadState::Loading { pages } => pages,
                    _ => 0,
                };
                self.load_state = LoadState::Done { pages };
            }
            FetchEvent::Failed(msg) => {
                self.load_state = LoadState::Failed(msg);
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load_state, LoadState::Loading { .. })
    }

    /// Select a sort key and reorder the list.
    pub fn set_sort(&mut self, key: SortKey) {
        if self.sort != key {
            self.sort = key;
            self.refresh_projection();
        }
    }

    /// Advance to the next sort key.
    pub fn cycle_sort(&mut self) {
        self.set_sort(self.sort.next());
    }

    /// Recompute row text and the joined, sorted order from current state.
    fn refresh_projection(&mut self) {
        self.row_text = self
            .tracks
            .iter()
            .map(|t| playlist::display_from_fields(t, &self.track_fields, &self.track_separator))
            .collect();
        self.lower_text = self
            .row_text
            .iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();

        self.rows = project(&self.tracks, &self.features, self.sort);
        self.feature_of = vec![None; self.tracks.len()];
        for row in &self.rows {
            self.feature_of[row.track] = row.features;
        }

        self.ensure_selected_visible();
    }

    /// Rendered text of the track at `track_index`.
    pub fn row_text(&self, track_index: usize) -> &str {
        &self.row_text[track_index]
    }

    /// Audio features attached to the track at `track_index`, if any.
    pub fn features_for(&self, track_index: usize) -> Option<&AudioFeatures> {
        self.feature_of
            .get(track_index)
            .copied()
            .flatten()
            .map(|i| &self.features[i])
    }

    /// Value of the active sort feature for a track, if the track has one.
    pub fn sort_value(&self, track_index: usize) -> Option<f64> {
        let name = self.sort.feature_name()?;
        self.features_for(track_index)?.get(name)
    }

    pub fn selected_track(&self) -> Option<&Track> {
        if self.display_indices().contains(&self.selected) {
            self.tracks.get(self.selected)
        } else {
            None
        }
    }

    /// Return the display order of track indices: the projected order,
    /// narrowed by the active filter.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim();
        if query.is_empty() {
            return self.rows.iter().map(|r| r.track).collect();
        }

        let query_lower = query.to_ascii_lowercase();
        self.rows
            .iter()
            .map(|r| r.track)
            .filter(|&i| {
                Self::fuzzy_match_positions_lower(&self.lower_text[i], &query_lower).is_some()
            })
            .collect()
    }

    /// Fuzzy-match `query_lower` against the row text of a specific track.
    ///
    /// Returns the character positions that match, or `None` when there is no match.
    pub fn fuzzy_match_positions_for_track(
        &self,
        track_index: usize,
        query_lower: &str,
    ) -> Option<Vec<usize>> {
        Self::fuzzy_match_positions_lower(&self.lower_text[track_index], query_lower)
    }

    /// Fuzzy/subsequence match: return the character positions in `title_lower`
    /// that match `query_lower`, or `None` if not matched.
    fn fuzzy_match_positions_lower(title_lower: &str, query_lower: &str) -> Option<Vec<usize>> {
        if query_lower.is_empty() {
            return Some(Vec::new());
        }

        let mut positions: Vec<usize> = Vec::new();
        let mut title_iter = title_lower.chars().enumerate();

        for qc in query_lower.chars() {
            loop {
                match title_iter.next() {
                    Some((ti, tc)) if tc == qc => {
                        positions.push(ti);
                        break;
                    }
                    Some(_) => continue,
                    None => return None,
                }
            }
        }

        Some(positions)
    }

    /// Return the next visible index in the current display order after `current`.
    /// Wraps around to the first element.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index in the current display order before `current`.
    /// Wraps around to the last element.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
            None => Some(display[display.len() - 1]),
        }
    }

    pub fn toggle_details_window(&mut self) {
        self.details_window = !self.details_window;
    }

    /// Enter filter mode.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }
    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }
    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }
    /// Append a character to the filter query and refresh view.
    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }
    /// Remove the last character from the filter query and refresh view.
    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Ensure that `selected` is part of the current view, otherwise move
    /// selection to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    /// Move selection to the top of the view.
    pub fn first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    /// Move selection to the bottom of the view.
    pub fn last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }
}
