use super::pipeline::load_playlist;
use super::*;
use crate::api::{ApiError, PlaylistApi};
use crate::config::FetchSettings;
use crate::playlist::{AudioFeatures, PageCursor, Playlist, PlaylistHeader, Track, TrackPage};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn t(id: &str) -> Track {
    Track {
        id: id.into(),
        name: id.to_uppercase(),
        artists: vec!["Artist".into()],
        album: None,
        duration: None,
        explicit: false,
    }
}

fn page(ids: &[&str], next: Option<&str>) -> TrackPage {
    TrackPage {
        tracks: ids.iter().map(|id| t(id)).collect(),
        next: next.map(|n| PageCursor(n.to_string())),
    }
}

#[derive(Default)]
struct FakeApi {
    first_page: TrackPage,
    pages: HashMap<String, TrackPage>,
    tempos: HashMap<String, f64>,
    failing_pages: HashSet<String>,
    failing_feature_ids: HashSet<String>,
    fail_playlist: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PlaylistApi for FakeApi {
    fn playlist(&self, id: &str) -> Result<Playlist, ApiError> {
        self.log(format!("playlist:{id}"));
        if self.fail_playlist {
            return Err(ApiError::Status {
                status: 404,
                body: "not found".into(),
            });
        }
        Ok(Playlist {
            header: PlaylistHeader {
                id: id.into(),
                name: "Mix".into(),
                total_tracks: 5,
                ..PlaylistHeader::default()
            },
            first_page: self.first_page.clone(),
        })
    }

    fn page(&self, cursor: &PageCursor) -> Result<TrackPage, ApiError> {
        self.log(format!("page:{}", cursor.as_str()));
        if self.failing_pages.contains(cursor.as_str()) {
            return Err(ApiError::Network("connection reset".into()));
        }
        self.pages
            .get(cursor.as_str())
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: cursor.as_str().into(),
            })
    }

    fn audio_features(&self, ids: &[String]) -> Result<Vec<AudioFeatures>, ApiError> {
        self.log(format!("features:{}", ids.join(",")));
        if ids.iter().any(|id| self.failing_feature_ids.contains(id)) {
            return Err(ApiError::Network("timeout".into()));
        }
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.tempos.get(id).map(|tempo| AudioFeatures {
                    id: id.clone(),
                    values: BTreeMap::from([("tempo".to_string(), *tempo)]),
                })
            })
            .collect())
    }
}

fn two_page_api() -> FakeApi {
    FakeApi {
        first_page: page(&["t1", "t2"], Some("p2")),
        pages: HashMap::from([("p2".to_string(), page(&["t2", "t3"], None))]),
        tempos: HashMap::from([
            ("t1".to_string(), 100.0),
            ("t2".to_string(), 120.0),
            ("t3".to_string(), 80.0),
        ]),
        ..FakeApi::default()
    }
}

fn collect(api: &FakeApi, settings: &FetchSettings) -> Vec<FetchEvent> {
    let mut events = Vec::new();
    load_playlist(api, "pl", settings, &mut |ev| {
        events.push(ev);
        true
    });
    events
}

fn calls(api: &FakeApi) -> Vec<String> {
    api.calls.lock().unwrap().clone()
}

#[test]
fn loads_every_page_then_finishes() {
    let api = two_page_api();
    let events = collect(&api, &FetchSettings::default());

    assert!(matches!(events[0], FetchEvent::PlaylistLoaded(ref h) if h.name == "Mix"));
    let pages: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            FetchEvent::TracksPage(ts) => Some(ts.len()),
            _ => None,
        })
        .collect();
    assert_eq!(pages, vec![2, 2]);
    assert_eq!(events.last(), Some(&FetchEvent::Finished));
}

#[test]
fn features_are_requested_once_per_page_in_order() {
    let api = two_page_api();
    collect(&api, &FetchSettings::default());

    assert_eq!(
        calls(&api),
        vec![
            "playlist:pl".to_string(),
            "features:t1,t2".to_string(),
            "page:p2".to_string(),
            "features:t2,t3".to_string(),
        ]
    );
}

#[test]
fn deferred_features_are_fetched_once_after_last_page() {
    let api = two_page_api();
    let settings = FetchSettings {
        features_per_page: false,
        feature_batch_size: 2,
    };
    let events = collect(&api, &settings);

    assert_eq!(
        calls(&api),
        vec![
            "playlist:pl".to_string(),
            "page:p2".to_string(),
            "features:t1,t2".to_string(),
            "features:t3".to_string(),
        ]
    );
    let batches = events
        .iter()
        .filter(|e| matches!(e, FetchEvent::FeaturesBatch(_)))
        .count();
    assert_eq!(batches, 2);
    assert_eq!(events.last(), Some(&FetchEvent::Finished));
}

#[test]
fn large_pages_are_split_into_batches() {
    let api = FakeApi {
        first_page: page(&["a", "b", "c", "d", "e"], None),
        ..FakeApi::default()
    };
    let settings = FetchSettings {
        features_per_page: true,
        feature_batch_size: 2,
    };
    collect(&api, &settings);

    assert_eq!(
        calls(&api),
        vec![
            "playlist:pl".to_string(),
            "features:a,b".to_string(),
            "features:c,d".to_string(),
            "features:e".to_string(),
        ]
    );
}

#[test]
fn empty_page_skips_feature_request() {
    let api = FakeApi {
        first_page: page(&[], None),
        ..FakeApi::default()
    };
    let events = collect(&api, &FetchSettings::default());

    assert_eq!(calls(&api), vec!["playlist:pl".to_string()]);
    assert_eq!(events.last(), Some(&FetchEvent::Finished));
}

#[test]
fn failed_playlist_lookup_reports_failure_only() {
    let api = FakeApi {
        fail_playlist: true,
        ..FakeApi::default()
    };
    let events = collect(&api, &FetchSettings::default());

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], FetchEvent::Failed(ref m) if m.contains("404")));
}

#[test]
fn failed_page_stops_pagination() {
    let mut api = two_page_api();
    api.failing_pages.insert("p2".into());
    let events = collect(&api, &FetchSettings::default());

    let pages = events
        .iter()
        .filter(|e| matches!(e, FetchEvent::TracksPage(_)))
        .count();
    assert_eq!(pages, 1);
    assert!(matches!(events.last(), Some(FetchEvent::Failed(_))));
    assert!(!events.contains(&FetchEvent::Finished));
}

#[test]
fn failed_feature_batch_does_not_stop_pagination() {
    let mut api = two_page_api();
    api.failing_feature_ids.insert("t1".into());
    let events = collect(&api, &FetchSettings::default());

    let saw_failure = events
        .iter()
        .any(|e| matches!(e, FetchEvent::FeaturesFailed(_)));
    assert!(saw_failure);
    let pages = events
        .iter()
        .filter(|e| matches!(e, FetchEvent::TracksPage(_)))
        .count();
    assert_eq!(pages, 2);
    assert_eq!(events.last(), Some(&FetchEvent::Finished));
}

#[test]
fn stops_when_listener_goes_away() {
    let api = two_page_api();
    let mut seen = 0;
    load_playlist(&api, "pl", &FetchSettings::default(), &mut |_| {
        seen += 1;
        seen < 2
    });

    assert_eq!(seen, 2);
    assert!(!calls(&api).iter().any(|c| c.starts_with("page:")));
}

#[test]
fn fetcher_streams_events_from_worker_thread() {
    let (tx, rx) = mpsc::channel();
    let fetcher = Fetcher::new(Box::new(two_page_api()), FetchSettings::default(), tx);
    fetcher.send(FetchCmd::Load("pl".into())).unwrap();

    let mut events = Vec::new();
    loop {
        let ev = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker produced no event");
        let done = matches!(ev, FetchEvent::Finished | FetchEvent::Failed(_));
        events.push(ev);
        if done {
            break;
        }
    }
    fetcher.join();

    assert!(matches!(events[0], FetchEvent::PlaylistLoaded(_)));
    assert_eq!(events.last(), Some(&FetchEvent::Finished));
}
