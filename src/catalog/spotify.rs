//! Spotify Web API client (client-credentials flow).
//!
//! Blocking on purpose: the batch is sequential and each file waits for its
//! own catalog calls anyway.

use super::{feature_map, Artist, Catalog, CatalogError, TrackSummary};
use crate::config::CatalogCredentials;
use crate::types::FeatureMap;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Refresh this long before the token actually expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub struct SpotifyCatalog {
    client: Client,
    credentials: CatalogCredentials,
    token: Mutex<Option<AccessToken>>,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Option<TrackSummary>>,
}

#[derive(Deserialize)]
struct AudioFeaturesResponse {
    #[serde(default)]
    audio_features: Vec<Option<serde_json::Map<String, serde_json::Value>>>,
}

#[derive(Deserialize)]
struct ArtistsResponse {
    #[serde(default)]
    artists: Vec<Option<Artist>>,
}

impl SpotifyCatalog {
    pub fn new(credentials: CatalogCredentials) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Return a valid bearer token, requesting a new one when needed
    fn access_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting catalog access token");
        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Auth(format!(
                "token endpoint returned HTTP {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                endpoint: TOKEN_URL.to_string(),
            });
        }

        let body: TokenResponse = response
            .json()
            .map_err(|e| CatalogError::Decode(format!("token response: {}", e)))?;

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = body.access_token;
        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(value)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let mut url = Url::parse(API_BASE).map_err(|e| CatalogError::Decode(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::Decode(format!("{} is not a base URL", API_BASE)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let token = self.access_token()?;
        let endpoint = url.path().to_string();

        debug!("GET {}", url);
        let response = self.client.get(url).bearer_auth(token).send()?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Auth(format!("{} rejected the access token", endpoint)));
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        response
            .json()
            .map_err(|e| CatalogError::Decode(format!("{}: {}", endpoint, e)))
    }
}

impl Catalog for SpotifyCatalog {
    fn search_tracks(&self, query: &str) -> Result<Vec<TrackSummary>, CatalogError> {
        let mut url = self.endpoint(&["search"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("type", "track");

        let body: SearchResponse = self.get_json(url)?;
        Ok(body
            .tracks
            .map(|page| page.items.into_iter().flatten().collect())
            .unwrap_or_default())
    }

    fn track_by_id(&self, id: &str) -> Result<TrackSummary, CatalogError> {
        // Pushed as a path segment, so titles with '/' or '?' stay inside it
        let url = self.endpoint(&["tracks", id])?;

        match self.get_json(url) {
            Err(CatalogError::Status { status, .. }) if status == 400 || status == 404 => {
                Err(CatalogError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    fn audio_features(&self, ids: &[&str]) -> Result<Vec<Option<FeatureMap>>, CatalogError> {
        let mut url = self.endpoint(&["audio-features"])?;
        url.query_pairs_mut().append_pair("ids", &ids.join(","));

        let body: AudioFeaturesResponse = self.get_json(url)?;
        Ok(body
            .audio_features
            .iter()
            .map(|entry| entry.as_ref().map(feature_map))
            .collect())
    }

    fn artists_by_id(&self, ids: &[&str]) -> Result<Vec<Artist>, CatalogError> {
        let mut url = self.endpoint(&["artists"])?;
        url.query_pairs_mut().append_pair("ids", &ids.join(","));

        let body: ArtistsResponse = self.get_json(url)?;
        Ok(body.artists.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SpotifyCatalog {
        SpotifyCatalog::new(CatalogCredentials::new("id", "secret")).unwrap()
    }

    #[test]
    fn test_track_endpoint_escapes_id() {
        let url = catalog().endpoint(&["tracks", "AC/DC?live"]).unwrap();
        assert_eq!(url.as_str(), "https://api.spotify.com/v1/tracks/AC%2FDC%3Flive");
    }

    #[test]
    fn test_search_response_skips_null_items() {
        let json = r#"{"tracks": {"items": [null, {"id": "a", "name": "Levels"}], "total": 2}}"#;
        let body: SearchResponse = serde_json::from_str(json).unwrap();
        let items: Vec<TrackSummary> = body.tracks.unwrap().items.into_iter().flatten().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Levels");
    }

    #[test]
    fn test_audio_features_response_keeps_positions() {
        let json = r#"{"audio_features": [null, {"key": 5, "mode": 1, "tempo": 120.0}]}"#;
        let body: AudioFeaturesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.audio_features.len(), 2);
        assert!(body.audio_features[0].is_none());
        let features = feature_map(body.audio_features[1].as_ref().unwrap());
        assert_eq!(features.len(), 3);
    }

    #[test]
    fn test_token_response_default_lifetime() {
        let body: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "token_type": "Bearer"}"#).unwrap();
        assert_eq!(body.access_token, "abc");
        assert_eq!(body.expires_in, 3600);
    }
}
