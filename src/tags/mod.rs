//! Tag containers
//!
//! One [`TagContainer`] implementation per on-disk tag format. Both expose the
//! same merge semantics: title and genre are overwritten, the serialized
//! catalog block is appended to whatever comment text is already there.
//!
//! Uses lofty for reading and writing. Tags are read with cover art so
//! pictures survive the rewrite.

pub mod id3;
pub mod metadata;
pub mod vorbis;

pub use id3::Id3Container;
pub use metadata::{read_local_track, require_query};
pub use vorbis::VorbisContainer;

use crate::error::{Result, SpotitagError};
use crate::types::{AudioFormat, TagPayload};
use lofty::config::{ParseOptions, ParsingMode};
use lofty::file::TaggedFile;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};
use std::path::Path;

/// Uniform read/merge/write surface over a file's tags
pub trait TagContainer {
    /// File the tags belong to
    fn path(&self) -> &Path;

    fn format(&self) -> AudioFormat;

    fn title(&self) -> Option<String>;

    fn artist(&self) -> Option<String>;

    /// Existing comment text the next block will be appended to
    fn comment_text(&self) -> String;

    /// Overwrite the title
    fn set_title(&mut self, title: &str);

    /// Overwrite the genre
    fn set_genre(&mut self, genre: &str);

    /// Concatenate `block` onto the existing comment text
    fn append_comment(&mut self, block: &str);

    /// Write the tags back to the file
    fn save(&self) -> Result<()>;
}

/// Open the tag container matching the file's extension
pub fn open_container(path: &Path) -> Result<Box<dyn TagContainer>> {
    match AudioFormat::from_path(path) {
        Some(AudioFormat::Mp3) => Ok(Box::new(Id3Container::open(path)?)),
        Some(AudioFormat::Flac) => Ok(Box::new(VorbisContainer::open(path)?)),
        None => Err(SpotitagError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        }),
    }
}

/// Merge a payload into a container (does not save)
pub fn merge_payload(container: &mut dyn TagContainer, payload: &TagPayload) {
    container.set_title(&payload.title);
    container.set_genre(&payload.genre);
    container.append_comment(&payload.comment_block);
}

// ---------------------------------------------------------------------------
// Helpers shared by the container implementations
// ---------------------------------------------------------------------------

/// Build `ParseOptions` that keep pictures and tolerate minor tag damage
fn parse_options() -> ParseOptions {
    ParseOptions::new()
        .read_cover_art(true)
        .parsing_mode(ParsingMode::BestAttempt)
}

/// Probe and read every tag in a file
fn read_tagged_file(path: &Path) -> Result<TaggedFile> {
    Probe::open(path)
        .map_err(|e| SpotitagError::tag_error(path, format!("Failed to open: {}", e)))?
        .options(parse_options())
        .read()
        .map_err(|e| SpotitagError::tag_error(path, format!("Failed to read: {}", e)))
}

/// All comment values of a tag, in order
fn comment_values(tag: &Tag) -> Vec<String> {
    tag.items()
        .filter(|item| matches!(item.key(), ItemKey::Comment))
        .filter_map(|item| item.value().text())
        .map(String::from)
        .collect()
}

/// Replace every comment item of a tag with `values`
fn replace_comments(tag: &mut Tag, values: Vec<String>) {
    tag.retain(|item| !matches!(item.key(), ItemKey::Comment));
    for value in values {
        tag.push(TagItem::new(ItemKey::Comment, ItemValue::Text(value)));
    }
}
