//! Catalog matching
//!
//! Finds the catalog entry for a local track and enriches it with artist
//! genres, audio features and a Camelot key:
//!
//! 1. Search for `"{title} {artist}"` and take the top-ranked result
//! 2. On an empty search, look the title up once as a catalog track id
//! 3. Fetch genres (first artist) and audio features for the selection
//! 4. Replace the raw pitch class with its Camelot label

use crate::catalog::{Catalog, CatalogError, TrackSummary};
use crate::error::{Result, SpotitagError};
use crate::key::harmonic_key;
use crate::types::{CatalogQuery, CatalogRecord, FeatureValue};
use tracing::{debug, info};

/// Why the id fallback produced nothing
#[derive(Debug)]
pub enum FallbackFailure {
    /// The title is not a known track id
    NotFound,
    /// The lookup failed in a way that might succeed on retry
    TransientFailure(CatalogError),
    /// The lookup failed permanently (bad response, rejected request)
    Failed(CatalogError),
}

impl From<CatalogError> for FallbackFailure {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => FallbackFailure::NotFound,
            e if e.is_transient() => FallbackFailure::TransientFailure(e),
            e => FallbackFailure::Failed(e),
        }
    }
}

/// Result of matching one query against the catalog
#[derive(Debug)]
pub enum MatchOutcome {
    Matched(CatalogRecord),
    /// Search returned nothing and the id fallback failed
    NoMatch(FallbackFailure),
}

/// Matches local tracks against a catalog
pub struct CatalogMatcher<'a> {
    catalog: &'a dyn Catalog,
}

impl<'a> CatalogMatcher<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }

    /// Find and enrich the catalog entry for `query`
    ///
    /// A failed fallback lookup is folded into `NoMatch`; every other catalog
    /// failure is returned as an error for the caller to classify.
    pub fn match_track(&self, query: &CatalogQuery) -> Result<MatchOutcome> {
        let results = self.catalog.search_tracks(&query.search_text())?;
        log_search_results(&results);

        let selection = match results.into_iter().next() {
            Some(first) => {
                info!("Choosing most relevant entry: {}", first.name);
                first
            }
            None => {
                info!(
                    "No search results for \"{}\", trying the title as a track id",
                    query.search_text()
                );
                match self.catalog.track_by_id(&query.title) {
                    Ok(track) => track,
                    Err(e) => {
                        let failure = FallbackFailure::from(e);
                        info!("Track id fallback failed: {:?}", failure);
                        return Ok(MatchOutcome::NoMatch(failure));
                    }
                }
            }
        };

        self.enrich(selection).map(MatchOutcome::Matched)
    }

    /// Merge genres and audio features into a record for the selected track
    fn enrich(&self, selection: TrackSummary) -> Result<CatalogRecord> {
        let genres = match selection.first_artist_id() {
            Some(artist_id) => self
                .catalog
                .artists_by_id(&[artist_id])?
                .into_iter()
                .next()
                .map(|artist| artist.genres)
                .unwrap_or_default(),
            None => {
                debug!("{} lists no artist id, leaving genres empty", selection.id);
                Vec::new()
            }
        };

        let mut audio_features = self
            .catalog
            .audio_features(&[selection.id.as_str()])?
            .into_iter()
            .next()
            .flatten()
            .ok_or_else(|| SpotitagError::MissingAudioFeatures {
                track_id: selection.id.clone(),
            })?;

        // -1 is the catalog's own "unknown" value
        let pitch_class = audio_features
            .remove("key")
            .as_ref()
            .and_then(FeatureValue::as_i64)
            .unwrap_or(-1);
        let mode = audio_features
            .get("mode")
            .and_then(FeatureValue::as_i64)
            .unwrap_or(-1);
        let key = harmonic_key(pitch_class, mode)?;

        debug!(
            "Matched {} ({}): {} genres, key {}",
            selection.name,
            selection.id,
            genres.len(),
            key
        );

        Ok(CatalogRecord {
            track_id: selection.id,
            track_name: selection.name,
            popularity: selection.popularity,
            genres,
            audio_features,
            harmonic_key: key,
        })
    }
}

/// Log the ranked search results the way the catalog returned them
fn log_search_results(results: &[TrackSummary]) {
    for (index, item) in results.iter().enumerate() {
        debug!(
            "{}. Track: {} | Artist: {} | Album: {} | Track number: {}",
            index + 1,
            item.name,
            item.artists.first().map(|a| a.name.as_str()).unwrap_or("?"),
            item.album.as_ref().map(|a| a.name.as_str()).unwrap_or("?"),
            item.track_number
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AlbumRef, Artist, ArtistRef};
    use crate::types::FeatureMap;
    use std::cell::RefCell;

    /// In-memory catalog that records every call
    #[derive(Default)]
    struct FakeCatalog {
        search_results: Vec<TrackSummary>,
        by_id: Option<TrackSummary>,
        lookup_error: Option<fn() -> CatalogError>,
        features: Option<FeatureMap>,
        genres: Vec<String>,
        calls: RefCell<Vec<String>>,
    }

    impl Catalog for FakeCatalog {
        fn search_tracks(&self, query: &str) -> std::result::Result<Vec<TrackSummary>, CatalogError> {
            self.calls.borrow_mut().push(format!("search:{}", query));
            Ok(self.search_results.clone())
        }

        fn track_by_id(&self, id: &str) -> std::result::Result<TrackSummary, CatalogError> {
            self.calls.borrow_mut().push(format!("track:{}", id));
            if let Some(make_error) = self.lookup_error {
                return Err(make_error());
            }
            self.by_id
                .clone()
                .filter(|t| t.id == id)
                .ok_or_else(|| CatalogError::NotFound(id.to_string()))
        }

        fn audio_features(
            &self,
            ids: &[&str],
        ) -> std::result::Result<Vec<Option<FeatureMap>>, CatalogError> {
            self.calls.borrow_mut().push(format!("features:{}", ids.join(",")));
            Ok(vec![self.features.clone()])
        }

        fn artists_by_id(&self, ids: &[&str]) -> std::result::Result<Vec<Artist>, CatalogError> {
            self.calls.borrow_mut().push(format!("artists:{}", ids.join(",")));
            Ok(vec![Artist {
                id: ids[0].to_string(),
                name: "Avicii".to_string(),
                genres: self.genres.clone(),
            }])
        }
    }

    fn track(id: &str, name: &str) -> TrackSummary {
        TrackSummary {
            id: id.to_string(),
            name: name.to_string(),
            popularity: 70,
            artists: vec![ArtistRef {
                id: Some("artist-1".to_string()),
                name: "Avicii".to_string(),
            }],
            album: Some(AlbumRef {
                name: "Levels".to_string(),
            }),
            track_number: 1,
        }
    }

    fn features(key: i64, mode: i64) -> FeatureMap {
        let mut map = FeatureMap::new();
        map.insert("key".to_string(), FeatureValue::Int(key));
        map.insert("mode".to_string(), FeatureValue::Int(mode));
        map.insert("tempo".to_string(), FeatureValue::Float(126.0));
        map
    }

    fn query() -> CatalogQuery {
        CatalogQuery {
            title: "Levels".to_string(),
            artist: "Avicii".to_string(),
        }
    }

    #[test]
    fn test_first_search_result_is_selected() {
        let catalog = FakeCatalog {
            search_results: vec![track("first", "Levels"), track("second", "Levels (Remix)")],
            features: Some(features(1, 0)),
            genres: vec!["edm".to_string()],
            ..Default::default()
        };

        let outcome = CatalogMatcher::new(&catalog).match_track(&query()).unwrap();
        let record = match outcome {
            MatchOutcome::Matched(record) => record,
            other => panic!("expected match, got {:?}", other),
        };

        assert_eq!(record.track_id, "first");
        assert_eq!(record.genres, vec!["edm".to_string()]);
        assert_eq!(record.harmonic_key.as_str(), "12A");
        assert!(!record.audio_features.contains_key("key"));
        assert_eq!(record.audio_features["mode"], FeatureValue::Int(0));
        assert_eq!(
            *catalog.calls.borrow(),
            vec!["search:Levels Avicii", "artists:artist-1", "features:first"]
        );
    }

    #[test]
    fn test_empty_search_falls_back_to_title_as_id() {
        let catalog = FakeCatalog {
            by_id: Some(track("Levels", "Levels")),
            features: Some(features(9, 1)),
            ..Default::default()
        };

        let outcome = CatalogMatcher::new(&catalog).match_track(&query()).unwrap();
        assert!(matches!(outcome, MatchOutcome::Matched(ref r) if r.harmonic_key.as_str() == "11B"));

        let calls = catalog.calls.borrow();
        assert_eq!(calls[1], "track:Levels");
    }

    #[test]
    fn test_failed_fallback_is_no_match_after_single_lookup() {
        let catalog = FakeCatalog::default();

        let outcome = CatalogMatcher::new(&catalog).match_track(&query()).unwrap();
        assert!(matches!(outcome, MatchOutcome::NoMatch(FallbackFailure::NotFound)));

        let calls = catalog.calls.borrow();
        assert_eq!(*calls, vec!["search:Levels Avicii", "track:Levels"]);
    }

    #[test]
    fn test_fallback_transport_error_is_swallowed() {
        let catalog = FakeCatalog {
            lookup_error: Some(|| CatalogError::Transport("connection reset".to_string())),
            ..Default::default()
        };

        let outcome = CatalogMatcher::new(&catalog).match_track(&query()).unwrap();
        assert!(matches!(
            outcome,
            MatchOutcome::NoMatch(FallbackFailure::TransientFailure(_))
        ));
    }

    #[test]
    fn test_missing_features_is_an_error() {
        let catalog = FakeCatalog {
            search_results: vec![track("first", "Levels")],
            ..Default::default()
        };

        let err = CatalogMatcher::new(&catalog).match_track(&query()).unwrap_err();
        assert!(matches!(err, SpotitagError::MissingAudioFeatures { .. }));
    }

    #[test]
    fn test_unknown_key_is_invalid_key_data() {
        let catalog = FakeCatalog {
            search_results: vec![track("first", "Levels")],
            features: Some(features(-1, 1)),
            ..Default::default()
        };

        let err = CatalogMatcher::new(&catalog).match_track(&query()).unwrap_err();
        assert!(matches!(
            err,
            SpotitagError::InvalidKeyData { pitch_class: -1, mode: 1 }
        ));
    }

    #[test]
    fn test_track_without_artist_id_skips_artist_lookup() {
        let mut selection = track("first", "Levels");
        selection.artists[0].id = None;
        let catalog = FakeCatalog {
            search_results: vec![selection],
            features: Some(features(0, 1)),
            ..Default::default()
        };

        let outcome = CatalogMatcher::new(&catalog).match_track(&query()).unwrap();
        assert!(matches!(outcome, MatchOutcome::Matched(ref r) if r.genres.is_empty()));
        assert!(!catalog.calls.borrow().iter().any(|c| c.starts_with("artists:")));
    }
}
