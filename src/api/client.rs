use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::config::ApiSettings;
use crate::playlist::{AudioFeatures, PageCursor, Playlist, TrackPage};

use super::PlaylistApi;
use super::error::ApiError;
use super::wire::{AudioFeaturesResponse, PageObject, PlaylistObject};

const USER_AGENT: &str = concat!("cadence/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the Spotify Web API.
///
/// Runs on the fetch worker thread, so blocking calls never stall the UI.
pub struct SpotifyClient {
    http: Client,
    base_url: String,
    token: String,
    market: Option<String>,
}

impl SpotifyClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let token = settings
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)?
            .to_string();

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token,
            market: settings.market.clone(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "GET");

        let mut request = self.http.get(url).bearer_auth(&self.token);
        if let Some(market) = self.market.as_deref().filter(|_| !url.contains("market=")) {
            request = request.query(&[("market", market)]);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = error_body(response.text(), url);
            tracing::warn!(status = status.as_u16(), url = %url, "request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes()?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn playlist_url(&self, id: &str) -> String {
        format!("{}/playlists/{}", self.base_url, id)
    }

    fn audio_features_url(&self, ids: &[String]) -> String {
        format!("{}/audio-features?ids={}", self.base_url, ids.join(","))
    }
}

/// Body of a failed response, or empty when it could not be read.
fn error_body(body: reqwest::Result<String>, url: &str) -> String {
    body.unwrap_or_else(|e| {
        tracing::debug!(url = %url, error = %e, "could not read error response body");
        String::new()
    })
}

impl PlaylistApi for SpotifyClient {
    fn playlist(&self, id: &str) -> Result<Playlist, ApiError> {
        let raw: PlaylistObject = self.get_json(&self.playlist_url(id))?;
        Ok(raw.into())
    }

    fn page(&self, cursor: &PageCursor) -> Result<TrackPage, ApiError> {
        // The cursor is the absolute URL handed back by the previous page.
        let raw: PageObject = self.get_json(cursor.as_str())?;
        Ok(raw.into())
    }

    fn audio_features(&self, ids: &[String]) -> Result<Vec<AudioFeatures>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: AudioFeaturesResponse = self.get_json(&self.audio_features_url(ids))?;
        Ok(raw.into_features())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(token: Option<&str>) -> ApiSettings {
        ApiSettings {
            base_url: "https://api.example.test/v1/".into(),
            token: token.map(String::from),
            ..ApiSettings::default()
        }
    }

    #[test]
    fn new_requires_a_token() {
        assert!(matches!(
            SpotifyClient::new(&settings(None)),
            Err(ApiError::MissingToken)
        ));
        assert!(matches!(
            SpotifyClient::new(&settings(Some("   "))),
            Err(ApiError::MissingToken)
        ));
    }

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let client = SpotifyClient::new(&settings(Some("tok"))).unwrap();
        assert_eq!(
            client.playlist_url("37i9dQ"),
            "https://api.example.test/v1/playlists/37i9dQ"
        );
        assert_eq!(
            client.audio_features_url(&["a".into(), "b".into(), "c".into()]),
            "https://api.example.test/v1/audio-features?ids=a,b,c"
        );
    }

    #[test]
    fn error_body_falls_back_to_empty_on_read_failure() {
        let read_err = reqwest::blocking::get("not a url").unwrap_err();
        assert_eq!(error_body(Err(read_err), "not a url"), "");
        assert_eq!(error_body(Ok("quota".into()), "u"), "quota");
    }
}
