use super::*;
use crate::config::{TrackDisplayField, UiSettings};
use crate::fetch::FetchEvent;
use crate::playlist::{AudioFeatures, PlaylistHeader, SortKey, Track};
use std::collections::BTreeMap;

fn t(id: &str, name: &str) -> Track {
    Track {
        id: id.into(),
        name: name.into(),
        artists: Vec::new(),
        album: None,
        duration: None,
        explicit: false,
    }
}

fn tempo(id: &str, v: f64) -> AudioFeatures {
    AudioFeatures {
        id: id.into(),
        values: BTreeMap::from([("tempo".to_string(), v)]),
    }
}

fn ui() -> UiSettings {
    UiSettings {
        track_fields: vec![TrackDisplayField::Title],
        ..UiSettings::default()
    }
}

fn loaded(names: &[(&str, &str)]) -> App {
    let mut app = App::new(&ui());
    app.begin_load("pl".into());
    app.apply(FetchEvent::TracksPage(
        names.iter().map(|(id, name)| t(id, name)).collect(),
    ));
    app
}

fn visible_ids(app: &App) -> Vec<String> {
    app.display_indices()
        .into_iter()
        .map(|i| app.tracks[i].id.clone())
        .collect()
}

#[test]
fn pages_accumulate_without_duplicates() {
    let mut app = loaded(&[("t1", "One"), ("t2", "Two")]);
    app.apply(FetchEvent::TracksPage(vec![t("t2", "Two v2"), t("t3", "Three")]));

    assert_eq!(visible_ids(&app), vec!["t1", "t2", "t3"]);
    assert_eq!(app.tracks[1].name, "Two v2");
    assert_eq!(app.row_text(1), "Two v2");
    assert_eq!(app.load_state, LoadState::Loading { pages: 2 });
}

#[test]
fn features_join_and_sort_updates_order() {
    let mut app = loaded(&[("t1", "One"), ("t2", "Two"), ("t3", "Three")]);
    app.apply(FetchEvent::FeaturesBatch(vec![tempo("t2", 90.0), tempo("t3", 150.0)]));

    // No sort selected yet: playlist order.
    assert_eq!(visible_ids(&app), vec!["t1", "t2", "t3"]);

    app.set_sort(SortKey::Tempo);
    assert_eq!(visible_ids(&app), vec!["t3", "t2", "t1"]);
    assert_eq!(app.sort_value(2), Some(150.0));
    assert_eq!(app.sort_value(0), None);
    assert!(app.features_for(0).is_none());

    app.set_sort(SortKey::None);
    assert_eq!(visible_ids(&app), vec!["t1", "t2", "t3"]);
}

#[test]
fn default_sort_comes_from_settings() {
    let settings = UiSettings {
        default_sort: SortKey::Tempo,
        ..ui()
    };
    let mut app = App::new(&settings);
    app.begin_load("pl".into());
    app.apply(FetchEvent::TracksPage(vec![t("a", "A"), t("b", "B")]));
    app.apply(FetchEvent::FeaturesBatch(vec![tempo("b", 1.0)]));

    assert_eq!(visible_ids(&app), vec!["b", "a"]);
}

#[test]
fn cycle_sort_walks_the_fixed_key_set() {
    let mut app = loaded(&[("a", "A")]);
    assert_eq!(app.sort, SortKey::None);
    app.cycle_sort();
    assert_eq!(app.sort, SortKey::Danceability);
    app.cycle_sort();
    app.cycle_sort();
    assert_eq!(app.sort, SortKey::Energy);
    app.cycle_sort();
    assert_eq!(app.sort, SortKey::None);
}

#[test]
fn selection_follows_the_track_across_resorts() {
    let mut app = loaded(&[("t1", "One"), ("t2", "Two")]);
    app.apply(FetchEvent::FeaturesBatch(vec![tempo("t1", 10.0), tempo("t2", 20.0)]));
    app.next();
    assert_eq!(app.selected, 1);

    app.set_sort(SortKey::Tempo);
    assert_eq!(app.selected, 1);
    assert_eq!(app.selected_track().map(|t| t.id.as_str()), Some("t2"));
}

#[test]
fn load_state_transitions() {
    let mut app = App::new(&ui());
    assert_eq!(app.load_state, LoadState::Idle);

    app.begin_load("pl".into());
    assert!(app.is_loading());

    app.apply(FetchEvent::PlaylistLoaded(PlaylistHeader {
        name: "Mix".into(),
        ..PlaylistHeader::default()
    }));
    app.apply(FetchEvent::TracksPage(vec![t("a", "A")]));
    app.apply(FetchEvent::FeaturesFailed("timeout".into()));
    assert!(app.is_loading());
    assert_eq!(app.last_error.as_deref(), Some("timeout"));

    app.apply(FetchEvent::Finished);
    assert_eq!(app.load_state, LoadState::Done { pages: 1 });
    assert_eq!(app.header.as_ref().map(|h| h.name.as_str()), Some("Mix"));
}

#[test]
fn failed_load_keeps_what_was_loaded() {
    let mut app = loaded(&[("a", "A")]);
    app.apply(FetchEvent::Failed("network error".into()));

    assert_eq!(app.load_state, LoadState::Failed("network error".into()));
    assert_eq!(app.tracks.len(), 1);
}

#[test]
fn begin_load_resets_state() {
    let mut app = loaded(&[("a", "A"), ("b", "B")]);
    app.apply(FetchEvent::FeaturesBatch(vec![tempo("a", 1.0)]));
    app.last();

    app.begin_load("other".into());
    assert!(app.tracks.is_empty());
    assert!(app.features.is_empty());
    assert!(app.header.is_none());
    assert_eq!(app.selected, 0);
    assert_eq!(app.playlist_id.as_deref(), Some("other"));
    assert!(app.display_indices().is_empty());
}

#[test]
fn filter_narrows_projected_view() {
    let mut app = loaded(&[
        ("m", "Metallica - Blackened"),
        ("b", "Black Sabbath - Paranoid"),
        ("d", "Daft Punk - Around"),
    ]);

    app.enter_filter_mode();
    for c in "mtbk".chars() {
        app.push_filter_char(c);
    }
    assert_eq!(visible_ids(&app), vec!["m"]);

    app.pop_filter_char();
    app.pop_filter_char();
    app.pop_filter_char();
    app.pop_filter_char();
    app.push_filter_char('a');
    assert_eq!(visible_ids(&app), vec!["m", "b", "d"]);

    app.clear_filter();
    assert!(!app.filter_mode);
    assert_eq!(visible_ids(&app).len(), 3);
}

#[test]
fn filter_moves_selection_into_view() {
    let mut app = loaded(&[("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")]);
    assert_eq!(app.selected, 0);

    app.push_filter_char('e');
    app.push_filter_char('t');
    assert_eq!(app.selected, 1);

    assert_eq!(app.next_in_view_from(0), Some(1));
    assert_eq!(app.prev_in_view_from(1), Some(1));
}

#[test]
fn filter_match_positions_are_reported_per_track() {
    let app = loaded(&[("a", "Hello World")]);
    assert_eq!(
        app.fuzzy_match_positions_for_track(0, "hw"),
        Some(vec![0, 6])
    );
    assert_eq!(app.fuzzy_match_positions_for_track(0, "xyz"), None);
}

#[test]
fn navigation_wraps_and_jumps() {
    let mut app = loaded(&[("a", "A"), ("b", "B"), ("c", "C")]);

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.last();
    assert_eq!(app.selected, 2);
    app.first();
    assert_eq!(app.selected, 0);
}

#[test]
fn navigation_on_empty_view_is_a_no_op() {
    let mut app = App::new(&ui());
    app.next();
    app.prev();
    app.first();
    app.last();
    assert_eq!(app.selected, 0);
    assert!(app.selected_track().is_none());
}
