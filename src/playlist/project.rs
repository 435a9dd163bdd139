//! Join of tracks with their audio features, and ordering by a feature.

use std::collections::HashMap;

use super::model::{AudioFeatures, SortKey, Track};

/// A track joined with its audio features, as positions in the source slices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Joined {
    pub track: usize,
    pub features: Option<usize>,
}

impl Joined {
    /// Value of `key` for this row; a missing record or field counts as `0.0`.
    pub fn sort_value(&self, features: &[AudioFeatures], key: SortKey) -> f64 {
        match (self.features, key.feature_name()) {
            (Some(i), Some(name)) => features[i].get(name).unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Join `tracks` with `features` by id and order the result.
///
/// The result always has exactly one entry per track. With `SortKey::None`,
/// or when either input is empty, tracks keep their accumulated order.
/// Otherwise they are ordered by the selected feature, highest first.
pub fn project(tracks: &[Track], features: &[AudioFeatures], key: SortKey) -> Vec<Joined> {
    let by_id: HashMap<&str, usize> = features
        .iter()
        .enumerate()
        .map(|(i, f)| (f.id.as_str(), i))
        .collect();

    let mut joined: Vec<Joined> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| Joined {
            track: i,
            features: by_id.get(t.id.as_str()).copied(),
        })
        .collect();

    if key == SortKey::None || tracks.is_empty() || features.is_empty() {
        return joined;
    }

    joined.sort_by(|a, b| {
        b.sort_value(features, key)
            .total_cmp(&a.sort_value(features, key))
    });
    joined
}
