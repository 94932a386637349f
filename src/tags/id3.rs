//! ID3v2 container for MP3 files

use super::{comment_values, read_tagged_file, replace_comments, TagContainer};
use crate::error::{Result, SpotitagError};
use crate::types::AudioFormat;
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::prelude::{Accessor, TagExt};
use lofty::tag::{Tag, TagType};
use std::path::{Path, PathBuf};
use tracing::info;

/// ID3v2 tag of an MP3 file
///
/// Files without an ID3v2 header get a fresh tag instead of an error, seeded
/// with the title and artist of an ID3v1 tag when the file has one.
/// All existing comment frames are read as one text and collapsed into a
/// single frame when a block is appended.
pub struct Id3Container {
    path: PathBuf,
    tag: Tag,
}

impl Id3Container {
    pub fn open(path: &Path) -> Result<Self> {
        let tagged_file = read_tagged_file(path)?;
        let tag = match tagged_file.tag(TagType::Id3v2) {
            Some(tag) => tag.clone(),
            None => {
                info!("Adding ID3 header to {}", path.display());
                seed_from_id3v1(tagged_file.tag(TagType::Id3v1))
            }
        };
        Ok(Self::from_tag(path.to_path_buf(), tag))
    }

    pub(crate) fn from_tag(path: PathBuf, tag: Tag) -> Self {
        Self { path, tag }
    }

    pub fn genre(&self) -> Option<String> {
        self.tag.genre().map(|g| g.into_owned())
    }
}

/// Fresh ID3v2 tag carrying over the title and artist of a legacy v1 tag
fn seed_from_id3v1(v1: Option<&Tag>) -> Tag {
    let mut tag = Tag::new(TagType::Id3v2);
    if let Some(v1) = v1 {
        if let Some(title) = v1.title() {
            tag.set_title(title.into_owned());
        }
        if let Some(artist) = v1.artist() {
            tag.set_artist(artist.into_owned());
        }
    }
    tag
}

impl TagContainer for Id3Container {
    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Mp3
    }

    fn title(&self) -> Option<String> {
        self.tag.title().map(|t| t.into_owned())
    }

    fn artist(&self) -> Option<String> {
        self.tag.artist().map(|a| a.into_owned())
    }

    fn comment_text(&self) -> String {
        comment_values(&self.tag).concat()
    }

    fn set_title(&mut self, title: &str) {
        self.tag.set_title(title.to_string());
    }

    fn set_genre(&mut self, genre: &str) {
        self.tag.set_genre(genre.to_string());
    }

    fn append_comment(&mut self, block: &str) {
        let merged = self.comment_text() + block;
        replace_comments(&mut self.tag, vec![merged]);
    }

    fn save(&self) -> Result<()> {
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| SpotitagError::tag_error(&self.path, format!("Failed to write ID3v2 tag: {}", e)))
    }
}
