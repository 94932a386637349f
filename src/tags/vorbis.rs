//! Vorbis comment container for FLAC files

use super::{comment_values, read_tagged_file, replace_comments, TagContainer};
use crate::error::{Result, SpotitagError};
use crate::types::AudioFormat;
use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::prelude::{Accessor, TagExt};
use lofty::tag::{Tag, TagType};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Vorbis comments of a FLAC file
///
/// Blocks are appended to the first `COMMENT` field; any further `COMMENT`
/// fields are kept as they are.
pub struct VorbisContainer {
    path: PathBuf,
    tag: Tag,
}

impl VorbisContainer {
    pub fn open(path: &Path) -> Result<Self> {
        let tagged_file = read_tagged_file(path)?;
        let tag = match tagged_file.tag(TagType::VorbisComments).cloned() {
            Some(tag) => tag,
            None => {
                debug!("No Vorbis comments in {}, starting empty", path.display());
                Tag::new(TagType::VorbisComments)
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

impl TagContainer for VorbisContainer {
    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> AudioFormat {
        AudioFormat::Flac
    }

    fn title(&self) -> Option<String> {
        self.tag.title().map(|t| t.into_owned())
    }

    fn artist(&self) -> Option<String> {
        self.tag.artist().map(|a| a.into_owned())
    }

    fn comment_text(&self) -> String {
        comment_values(&self.tag).into_iter().next().unwrap_or_default()
    }

    fn set_title(&mut self, title: &str) {
        self.tag.set_title(title.to_string());
    }

    fn set_genre(&mut self, genre: &str) {
        self.tag.set_genre(genre.to_string());
    }

    fn append_comment(&mut self, block: &str) {
        let mut comments = comment_values(&self.tag);
        match comments.first_mut() {
            Some(first) => first.push_str(block),
            None => comments.push(block.to_string()),
        }
        replace_comments(&mut self.tag, comments);
    }

    fn save(&self) -> Result<()> {
        self.tag
            .save_to_path(&self.path, WriteOptions::default())
            .map_err(|e| SpotitagError::tag_error(&self.path, format!("Failed to write Vorbis comments: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofty::tag::{ItemKey, ItemValue, TagItem};

    fn container_with_comments(comments: &[&str]) -> VorbisContainer {
        let mut tag = Tag::new(TagType::VorbisComments);
        for comment in comments {
            tag.push(TagItem::new(
                ItemKey::Comment,
                ItemValue::Text(comment.to_string()),
            ));
        }
        VorbisContainer::from_tag(PathBuf::from("/music/track.flac"), tag)
    }

    #[test]
    fn test_block_appends_to_first_comment_only() {
        let mut container = container_with_comments(&["ripped from CD", "second note"]);
        assert_eq!(container.comment_text(), "ripped from CD");

        container.append_comment("\n key5A");

        assert_eq!(
            comment_values(&container.tag),
            vec!["ripped from CD\n key5A".to_string(), "second note".to_string()]
        );
    }

    #[test]
    fn test_missing_comment_starts_from_empty() {
        let mut container = container_with_comments(&[]);
        assert_eq!(container.comment_text(), "");

        container.append_comment("\n key5A");
        container.append_comment("\n key5A");

        assert_eq!(container.comment_text(), "\n key5A\n key5A");
    }

    #[test]
    fn test_title_and_genre_are_overwritten() {
        let mut container = container_with_comments(&[]);
        container.set_title("Old");
        container.set_title("New");
        container.set_genre("edm; house");

        assert_eq!(container.title().as_deref(), Some("New"));
        assert_eq!(container.genre().as_deref(), Some("edm; house"));
    }
}
