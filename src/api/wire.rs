//! Response shapes of the Spotify Web API, and their conversion into the
//! playlist domain types.

use std::time::Duration;

use serde::Deserialize;

use crate::playlist::{AudioFeatures, PageCursor, Playlist, PlaylistHeader, Track, TrackPage};

#[derive(Debug, Deserialize)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Option<Vec<ImageObject>>,
    #[serde(default)]
    pub followers: Option<FollowersObject>,
    #[serde(default)]
    pub owner: Option<OwnerObject>,
    pub tracks: PageObject,
}

#[derive(Debug, Deserialize)]
pub struct ImageObject {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct FollowersObject {
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct OwnerObject {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageObject {
    #[serde(default)]
    pub items: Vec<PlaylistItemObject>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemObject {
    #[serde(default)]
    pub track: Option<TrackObject>,
}

#[derive(Debug, Deserialize)]
pub struct TrackObject {
    /// `null` for local files.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<NamedObject>,
    #[serde(default)]
    pub album: Option<NamedObject>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub explicit: bool,
}

#[derive(Debug, Deserialize)]
pub struct NamedObject {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<AudioFeatures>>,
}

impl TrackObject {
    fn into_track(self) -> Option<Track> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(Track {
            id,
            name: self.name,
            artists: self.artists.into_iter().map(|a| a.name).collect(),
            album: self.album.map(|a| a.name).filter(|n| !n.is_empty()),
            duration: self.duration_ms.map(Duration::from_millis),
            explicit: self.explicit,
        })
    }
}

impl From<PageObject> for TrackPage {
    fn from(page: PageObject) -> Self {
        let received = page.items.len();
        let tracks: Vec<Track> = page
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(TrackObject::into_track)
            .collect();

        if tracks.len() < received {
            tracing::debug!(
                received,
                kept = tracks.len(),
                "dropped playlist items without a track id"
            );
        }

        TrackPage {
            tracks,
            next: page.next.filter(|n| !n.is_empty()).map(PageCursor),
        }
    }
}

impl From<PlaylistObject> for Playlist {
    fn from(p: PlaylistObject) -> Self {
        let header = PlaylistHeader {
            id: p.id,
            name: p.name,
            owner: p.owner.and_then(|o| o.display_name),
            image_url: p
                .images
                .unwrap_or_default()
                .into_iter()
                .map(|i| i.url)
                .find(|u| !u.is_empty()),
            followers: p.followers.map(|f| f.total).unwrap_or(0),
            total_tracks: p.tracks.total,
        };

        Playlist {
            header,
            first_page: p.tracks.into(),
        }
    }
}

impl AudioFeaturesResponse {
    /// Records for unknown ids come back as `null`; drop them.
    pub fn into_features(self) -> Vec<AudioFeatures> {
        self.audio_features.into_iter().flatten().collect()
    }
}
