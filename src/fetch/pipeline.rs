use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use crate::api::{ApiError, PlaylistApi};
use crate::config::FetchSettings;

use super::types::FetchEvent;

/// Fetch a playlist, every one of its pages, and the audio features of its
/// tracks, reporting progress through `emit`.
///
/// Pages are requested strictly one after another since each cursor is only
/// known once the previous page has arrived. `emit` returns `false` once
/// nobody is listening anymore, which ends the load early.
pub fn load_playlist<A>(
    api: &A,
    id: &str,
    settings: &FetchSettings,
    emit: &mut dyn FnMut(FetchEvent) -> bool,
) where
    A: PlaylistApi + ?Sized,
{
    if let Err(e) = run(api, id, settings, emit) {
        error!(playlist = %id, error = %e, "playlist load failed");
        emit(FetchEvent::Failed(e.to_string()));
    }
}

fn run<A>(
    api: &A,
    id: &str,
    settings: &FetchSettings,
    emit: &mut dyn FnMut(FetchEvent) -> bool,
) -> Result<(), ApiError>
where
    A: PlaylistApi + ?Sized,
{
    info!(playlist = %id, "loading playlist");
    let playlist = api.playlist(id)?;
    info!(
        id = %playlist.header.id,
        name = %playlist.header.name,
        total = playlist.header.total_tracks,
        "playlist header loaded"
    );
    if !emit(FetchEvent::PlaylistLoaded(playlist.header)) {
        return Ok(());
    }

    let mut page = playlist.first_page;
    let mut page_no = 0usize;
    let mut deferred_ids: Vec<String> = Vec::new();

    loop {
        page_no += 1;
        let ids: Vec<String> = page.tracks.iter().map(|t| t.id.clone()).collect();
        debug!(page = page_no, tracks = ids.len(), "page received");

        if !emit(FetchEvent::TracksPage(page.tracks)) {
            return Ok(());
        }

        if settings.features_per_page {
            if !fetch_features(api, &ids, settings.feature_batch_size, emit) {
                return Ok(());
            }
        } else {
            deferred_ids.extend(ids);
        }

        match page.next {
            Some(cursor) => page = api.page(&cursor)?,
            None => break,
        }
    }

    if !settings.features_per_page {
        let mut seen = HashSet::new();
        deferred_ids.retain(|id| seen.insert(id.clone()));
        if !fetch_features(api, &deferred_ids, settings.feature_batch_size, emit) {
            return Ok(());
        }
    }

    info!(pages = page_no, "playlist fully loaded");
    emit(FetchEvent::Finished);
    Ok(())
}

/// Request features for `ids` in chunks of at most `batch_size`.
///
/// A failed chunk is reported and skipped. Returns `false` when `emit` did.
fn fetch_features<A>(
    api: &A,
    ids: &[String],
    batch_size: usize,
    emit: &mut dyn FnMut(FetchEvent) -> bool,
) -> bool
where
    A: PlaylistApi + ?Sized,
{
    for chunk in ids.chunks(batch_size.max(1)) {
        let event = match api.audio_features(chunk) {
            Ok(features) => {
                debug!(
                    requested = chunk.len(),
                    received = features.len(),
                    "features received"
                );
                FetchEvent::FeaturesBatch(features)
            }
            Err(e) => {
                warn!(requested = chunk.len(), error = %e, "audio features request failed");
                FetchEvent::FeaturesFailed(e.to_string())
            }
        };
        if !emit(event) {
            return false;
        }
    }
    true
}
