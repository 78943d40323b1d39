//! Group video files with their subtitle files.

use std::collections::{HashMap, HashSet};

use crate::pairing::descriptor::{FileDescriptor, FileKind, MovieGroup, Pairing};
use crate::pairing::names::NameNormalizer;
use crate::pairing::path::PathSegments;

/// Pairs subtitles to videos by directory and base name.
///
/// Every call is a pure function of its input, so the pairing can be rerun
/// whenever the file list or its metadata changes.
#[derive(Debug, Clone, Default)]
pub struct PairingEngine {
    normalizer: NameNormalizer,
}

impl PairingEngine {
    /// Create an engine that uses the given normalizer for subtitle container directories.
    #[must_use]
    pub const fn new(normalizer: NameNormalizer) -> Self {
        Self { normalizer }
    }

    /// Group files into video groups followed by orphan subtitle groups.
    ///
    /// Files marked for removal are skipped, as are files that are neither video nor subtitle.
    /// Video groups keep the input order of their videos,
    /// orphan groups the input order of their first subtitle.
    #[must_use]
    pub fn pair(&self, files: &[FileDescriptor]) -> Pairing {
        let active_files = || files.iter().filter(|file| !file.should_remove);

        let mut groups: Vec<MovieGroup> = Vec::new();
        let mut duplicate_videos = Vec::new();
        let mut duplicate_subtitles = Vec::new();
        let mut video_index: HashMap<String, usize> = HashMap::new();

        for video in active_files().filter(|file| file.kind() == FileKind::Video) {
            let directory = video.directory();
            let base_name = video.base_name().to_string();
            let key = MovieGroup::video_key(&directory, &base_name);
            if video_index.contains_key(&key) {
                duplicate_videos.push(video.clone());
                continue;
            }
            video_index.insert(key, groups.len());
            groups.push(MovieGroup::for_video(video.clone(), directory, base_name));
        }

        let video_group_count = groups.len();
        let mut orphan_index: HashMap<String, usize> = HashMap::new();
        let mut taken_keys: HashSet<String> = video_index.into_keys().collect();

        for subtitle in active_files().filter(|file| file.kind() == FileKind::Subtitle) {
            let segments = subtitle.segments();
            let directory = segments.directory();
            let base_name = subtitle.base_name();

            let index = match self.find_video_group(&groups[..video_group_count], &segments, &directory, base_name) {
                Some(index) => index,
                None => {
                    let key = MovieGroup::orphan_key(&directory, base_name);
                    if let Some(&index) = orphan_index.get(&key) {
                        index
                    } else {
                        let mut group = MovieGroup::orphan(directory, base_name.to_string());
                        group.key = unique_key(&key, &taken_keys);
                        taken_keys.insert(group.key.clone());
                        orphan_index.insert(key, groups.len());
                        groups.push(group);
                        groups.len() - 1
                    }
                }
            };
            if let Some(replaced) = groups[index].add_subtitle(subtitle.clone()) {
                duplicate_subtitles.push(replaced);
            }
        }

        Pairing {
            groups,
            duplicate_videos,
            duplicate_subtitles,
        }
    }

    /// Find the video group a subtitle belongs to.
    ///
    /// A subtitle inside a subtitle container directory like `Subs/`
    /// is also matched against the videos one directory up.
    fn find_video_group(
        &self,
        video_groups: &[MovieGroup],
        segments: &PathSegments,
        directory: &str,
        base_name: &str,
    ) -> Option<usize> {
        if let Some(index) = Self::longest_base_name_match(video_groups, directory, base_name) {
            return Some(index);
        }

        let parent = segments.ancestor(0)?;
        if !self.normalizer.is_container_directory(parent) {
            return None;
        }

        let video_directory = segments.grandparent_directory()?;
        Self::longest_base_name_match(video_groups, &video_directory, base_name)
            .or_else(|| Self::single_group_in_directory(video_groups, &video_directory))
    }

    /// Index of the group in the same directory whose base name equals the subtitle base name
    /// or is a dot-separated prefix of it. The longest base name wins,
    /// so an exact match always beats a prefix match.
    fn longest_base_name_match(video_groups: &[MovieGroup], directory: &str, base_name: &str) -> Option<usize> {
        video_groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.directory == directory && is_base_name_match(&group.base_name, base_name))
            .max_by_key(|(_, group)| group.base_name.len())
            .map(|(index, _)| index)
    }

    /// Index of the only video group in the directory, if there is exactly one.
    fn single_group_in_directory(video_groups: &[MovieGroup], directory: &str) -> Option<usize> {
        let mut in_directory = video_groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.directory == directory);

        match (in_directory.next(), in_directory.next()) {
            (Some((index, _)), None) => Some(index),
            _ => None,
        }
    }
}

/// Group files using the built-in name tables.
///
/// ```rust
/// use subpair::pairing::{FileDescriptor, pair_files};
///
/// let groups = pair_files(&[
///     FileDescriptor::video("Movie.mp4"),
///     FileDescriptor::subtitle("Movie.en.srt"),
///     FileDescriptor::subtitle("Other.srt"),
/// ]);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].subtitle_names(), vec!["Movie.en.srt"]);
/// assert!(groups[1].is_orphan);
/// ```
#[must_use]
pub fn pair_files(files: &[FileDescriptor]) -> Vec<MovieGroup> {
    PairingEngine::default().pair(files).groups
}

/// The key itself, or the key with the first free `_2`, `_3`... suffix
/// when another group already uses it.
fn unique_key(key: &str, taken_keys: &HashSet<String>) -> String {
    if !taken_keys.contains(key) {
        return key.to_string();
    }
    (2..)
        .map(|number| format!("{key}_{number}"))
        .find(|candidate| !taken_keys.contains(candidate))
        .unwrap_or_else(|| key.to_string())
}

/// Check if the subtitle base name is the video base name,
/// optionally followed by dot-separated tags like `.en.forced`.
fn is_base_name_match(video_base_name: &str, subtitle_base_name: &str) -> bool {
    subtitle_base_name
        .strip_prefix(video_base_name)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}
