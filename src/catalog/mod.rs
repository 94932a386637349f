//! Remote music catalog capability
//!
//! The pipeline only talks to the [`Catalog`] trait, so the HTTP client can be
//! swapped (or faked in tests) without touching matching logic.

pub mod spotify;

pub use spotify::SpotifyCatalog;

use crate::types::{FeatureMap, FeatureValue};
use serde::Deserialize;
use thiserror::Error;

/// Failure of a single catalog request
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no entry for this identifier
    #[error("Catalog has no entry for '{0}'")]
    NotFound(String),

    /// Credentials were rejected
    #[error("Catalog authentication failed: {0}\n  Tip: Check SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET")]
    Auth(String),

    /// Connection, TLS or timeout failure
    #[error("Catalog request failed: {0}")]
    Transport(String),

    /// Unexpected HTTP status
    #[error("Catalog returned HTTP {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    /// Response body did not have the expected shape
    #[error("Unexpected catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Returns true if repeating the same request might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Transport(_) => true,
            CatalogError::Status { status, .. } => *status == 429 || *status >= 500,
            CatalogError::NotFound(_) | CatalogError::Auth(_) | CatalogError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

/// Track summary as returned by search and direct lookup
#[derive(Debug, Clone, Deserialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub track_number: u32,
}

impl TrackSummary {
    /// Id of the first credited artist, if the catalog knows it
    pub fn first_artist_id(&self) -> Option<&str> {
        self.artists.first().and_then(|a| a.id.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    /// Absent for local (user-uploaded) tracks
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

/// Full artist record with its genres
#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Keep only the numeric fields of an audio-features object
pub fn feature_map(raw: &serde_json::Map<String, serde_json::Value>) -> FeatureMap {
    raw.iter()
        .filter_map(|(name, value)| FeatureValue::from_json(value).map(|v| (name.clone(), v)))
        .collect()
}

/// Catalog operations used by the matcher
pub trait Catalog {
    /// Free-text track search, ranked by relevance
    fn search_tracks(&self, query: &str) -> Result<Vec<TrackSummary>, CatalogError>;

    /// Direct lookup by catalog track id
    fn track_by_id(&self, id: &str) -> Result<TrackSummary, CatalogError>;

    /// Audio features aligned positionally with `ids` (`None` when unknown)
    fn audio_features(&self, ids: &[&str]) -> Result<Vec<Option<FeatureMap>>, CatalogError>;

    /// Artist records for `ids`
    fn artists_by_id(&self, ids: &[&str]) -> Result<Vec<Artist>, CatalogError>;
}
