//! Local track metadata from embedded tags

use super::TagContainer;
use crate::error::{Result, SpotitagError};
use crate::types::{CatalogQuery, LocalTrack};
use tracing::debug;

/// Snapshot the title and artist already embedded in a container
pub fn read_local_track(container: &dyn TagContainer) -> LocalTrack {
    let track = LocalTrack {
        path: container.path().to_path_buf(),
        format: container.format(),
        title: container.title(),
        artist: container.artist(),
    };

    debug!(
        "Local tags for {}: title={:?} artist={:?}",
        track.path.display(),
        track.title,
        track.artist
    );

    track
}

/// Build the catalog query for a track, naming the first missing field
pub fn require_query(track: &LocalTrack) -> Result<CatalogQuery> {
    track.query().ok_or_else(|| SpotitagError::LocalTagMissing {
        path: track.path.clone(),
        field: if is_blank(track.title.as_deref()) {
            "title"
        } else {
            "artist"
        },
    })
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
