//! Input and output records of the pairing engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pairing::path::{PathSegments, strip_extension};

/// One dropped file, already classified as video or subtitle.
///
/// Fields the pairing does not understand (detected language, movie hash, ...)
/// are kept in `metadata` and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// File name including extension.
    pub name: String,
    /// Slash-separated path from the virtual root, ending with `name`.
    pub full_path: String,
    /// File size in bytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub is_subtitle: bool,
    /// Exclude this file from pairing entirely.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub should_remove: bool,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// How the pairing engine treats a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Video,
    Subtitle,
    Other,
}

/// Zero or one video together with its subtitles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieGroup {
    /// Unique key: `{directory}/{baseName}` or `{directory}/_orphan_{baseName}`.
    pub key: String,
    pub video: Option<FileDescriptor>,
    /// Subtitles in the order they were matched.
    pub subtitles: Vec<FileDescriptor>,
    pub directory: String,
    pub base_name: String,
    pub is_orphan: bool,
}

/// Full result of one pairing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pairing {
    /// Video groups and orphan groups in first-seen order.
    pub groups: Vec<MovieGroup>,
    /// Videos that were dropped because an earlier video had the same group key.
    pub duplicate_videos: Vec<FileDescriptor>,
    /// Earlier copies of subtitles that were replaced by a later descriptor with the same path.
    pub duplicate_subtitles: Vec<FileDescriptor>,
}

impl FileDescriptor {
    /// Create an unclassified descriptor for the given path.
    /// The name is taken from the last path segment.
    #[must_use]
    pub fn new(full_path: impl Into<String>, size: u64) -> Self {
        let full_path = full_path.into();
        let name = PathSegments::from_full_path(&full_path)
            .file_name()
            .unwrap_or_default()
            .to_string();

        Self {
            name,
            full_path,
            size,
            is_video: false,
            is_subtitle: false,
            should_remove: false,
            metadata: BTreeMap::new(),
        }
    }

    /// Create a video descriptor for the given path.
    #[must_use]
    pub fn video(full_path: impl Into<String>) -> Self {
        Self {
            is_video: true,
            ..Self::new(full_path, 0)
        }
    }

    /// Create a subtitle descriptor for the given path.
    #[must_use]
    pub fn subtitle(full_path: impl Into<String>) -> Self {
        Self {
            is_subtitle: true,
            ..Self::new(full_path, 0)
        }
    }

    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub const fn removed(mut self) -> Self {
        self.should_remove = true;
        self
    }

    /// Attach a passthrough metadata value.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Classification used for pairing.
    /// A descriptor flagged as both video and subtitle counts as a video.
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        if self.is_video {
            FileKind::Video
        } else if self.is_subtitle {
            FileKind::Subtitle
        } else {
            FileKind::Other
        }
    }

    /// File name without the trailing extension.
    #[must_use]
    pub fn base_name(&self) -> &str {
        strip_extension(&self.name)
    }

    /// Split path segments of `full_path`.
    #[must_use]
    pub fn segments(&self) -> PathSegments {
        PathSegments::from_full_path(&self.full_path)
    }

    /// Normalized parent directory.
    #[must_use]
    pub fn directory(&self) -> String {
        self.segments().directory()
    }
}

impl MovieGroup {
    /// Key for a group anchored to a video.
    #[must_use]
    pub fn video_key(directory: &str, base_name: &str) -> String {
        format!("{directory}/{base_name}")
    }

    /// Key for a group of subtitles without a video.
    #[must_use]
    pub fn orphan_key(directory: &str, base_name: &str) -> String {
        format!("{directory}/_orphan_{base_name}")
    }

    pub(crate) fn for_video(video: FileDescriptor, directory: String, base_name: String) -> Self {
        Self {
            key: Self::video_key(&directory, &base_name),
            video: Some(video),
            subtitles: Vec::new(),
            directory,
            base_name,
            is_orphan: false,
        }
    }

    pub(crate) fn orphan(directory: String, base_name: String) -> Self {
        Self {
            key: Self::orphan_key(&directory, &base_name),
            video: None,
            subtitles: Vec::new(),
            directory,
            base_name,
            is_orphan: true,
        }
    }

    /// Append a subtitle, or replace the one with the same path in place.
    /// Returns the replaced descriptor.
    pub(crate) fn add_subtitle(&mut self, subtitle: FileDescriptor) -> Option<FileDescriptor> {
        match self
            .subtitles
            .iter_mut()
            .find(|existing| existing.full_path == subtitle.full_path)
        {
            Some(existing) => Some(std::mem::replace(existing, subtitle)),
            None => {
                self.subtitles.push(subtitle);
                None
            }
        }
    }

    /// Subtitle file names in group order.
    #[must_use]
    pub fn subtitle_names(&self) -> Vec<&str> {
        self.subtitles.iter().map(|subtitle| subtitle.name.as_str()).collect()
    }
}

impl Pairing {
    #[must_use]
    pub fn video_group_count(&self) -> usize {
        self.groups.iter().filter(|group| !group.is_orphan).count()
    }

    #[must_use]
    pub fn orphan_group_count(&self) -> usize {
        self.groups.iter().filter(|group| group.is_orphan).count()
    }

    #[must_use]
    pub fn subtitle_count(&self) -> usize {
        self.groups.iter().map(|group| group.subtitles.len()).sum()
    }

    /// Find a group by key.
    #[must_use]
    pub fn group(&self, key: &str) -> Option<&MovieGroup> {
        self.groups.iter().find(|group| group.key == key)
    }
}

impl fmt::Display for MovieGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.video {
            Some(video) => write!(f, "{} ({} subtitles)", video.full_path, self.subtitles.len()),
            None => write!(f, "{} [orphan] ({} subtitles)", self.key, self.subtitles.len()),
        }
    }
}

#[cfg(test)]
mod descriptor_tests {
    use super::*;

    #[test]
    fn new_takes_name_from_last_segment() {
        let file = FileDescriptor::new("Movies/Alien (1979)/Alien.mkv", 42);
        assert_eq!(file.name, "Alien.mkv");
        assert_eq!(file.size, 42);
        assert_eq!(file.kind(), FileKind::Other);
        assert_eq!(file.directory(), "Movies/Alien (1979)");
        assert_eq!(file.base_name(), "Alien");
    }

    #[test]
    fn both_flags_is_treated_as_video() {
        let mut file = FileDescriptor::subtitle("Movie.srt");
        file.is_video = true;
        assert_eq!(file.kind(), FileKind::Video);
    }

    #[test]
    fn serde_uses_camel_case_and_keeps_metadata() {
        let json = r#"{
            "name": "Movie.en.srt",
            "fullPath": "Dir/Movie.en.srt",
            "size": 1234,
            "isVideo": false,
            "isSubtitle": true,
            "detectedLanguage": "en",
            "movieHash": {"hash": "8e245d9679d31e12"}
        }"#;
        let file: FileDescriptor = serde_json::from_str(json).expect("should parse descriptor");
        assert_eq!(file.full_path, "Dir/Movie.en.srt");
        assert!(file.is_subtitle);
        assert!(!file.should_remove);
        assert_eq!(file.metadata.get("detectedLanguage"), Some(&serde_json::json!("en")));
        assert_eq!(
            file.metadata.get("movieHash"),
            Some(&serde_json::json!({"hash": "8e245d9679d31e12"}))
        );

        let value = serde_json::to_value(&file).expect("should serialize descriptor");
        assert_eq!(value["fullPath"], "Dir/Movie.en.srt");
        assert_eq!(value["detectedLanguage"], "en");
        assert!(value.get("shouldRemove").is_none());
    }

    #[test]
    fn add_subtitle_replaces_same_path() {
        let mut group = MovieGroup::for_video(FileDescriptor::video("Movie.mp4"), "Root".into(), "Movie".into());
        assert!(group.add_subtitle(FileDescriptor::subtitle("Movie.en.srt")).is_none());
        assert!(group.add_subtitle(FileDescriptor::subtitle("Movie.fr.srt")).is_none());

        let replaced = group
            .add_subtitle(FileDescriptor::subtitle("Movie.en.srt").with_metadata("detectedLanguage", "en"))
            .expect("should replace the earlier copy");
        assert!(replaced.metadata.is_empty());
        assert_eq!(group.subtitle_names(), vec!["Movie.en.srt", "Movie.fr.srt"]);
        assert_eq!(group.subtitles[0].metadata["detectedLanguage"], "en");
    }

    #[test]
    fn group_keys() {
        assert_eq!(MovieGroup::video_key("Dir", "Movie"), "Dir/Movie");
        assert_eq!(MovieGroup::orphan_key("Dir", "Movie"), "Dir/_orphan_Movie");

        let orphan = MovieGroup::orphan("Root".into(), "English".into());
        assert_eq!(orphan.key, "Root/_orphan_English");
        assert!(orphan.is_orphan);
        assert!(orphan.video.is_none());
    }
}
