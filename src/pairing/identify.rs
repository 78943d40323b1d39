//! Connect movie groups to movie identification and subtitle uploads.
//!
//! Identification itself happens elsewhere. This module picks the file used to search
//! for a group's movie and spreads the resolved identity to every file in the group.
//! All subtitles of an orphan group are assumed to be the same movie in different
//! languages, which is a simplification: a directory of unrelated subtitles that
//! happen to share a base name would get one identity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::pairing::descriptor::{FileDescriptor, MovieGroup};
use crate::pairing::names::{NameNormalizer, SubtitleTags, subtitle_tags};

/// Movie resolved for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieIdentity {
    pub imdb_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

/// File and search string used to identify the movie of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSeed<'a> {
    pub group_key: &'a str,
    pub file: &'a FileDescriptor,
    /// Best detection name of `file`.
    pub query: String,
}

/// One subtitle ready to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadItem<'a> {
    pub group_key: &'a str,
    pub subtitle: &'a FileDescriptor,
    pub video: Option<&'a FileDescriptor>,
    /// `None` until the group has been identified.
    pub imdb_id: Option<&'a str>,
    pub tags: SubtitleTags,
}

impl MovieIdentity {
    #[must_use]
    pub fn new(imdb_id: impl Into<String>) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            title: None,
            year: None,
        }
    }
}

/// The file that represents the group: the video, or the first subtitle of an orphan group.
#[must_use]
pub fn representative(group: &MovieGroup) -> Option<&FileDescriptor> {
    group.video.as_ref().or_else(|| group.subtitles.first())
}

/// Search seed for identifying the group's movie.
///
/// Returns `None` for a group without any files.
#[must_use]
pub fn search_seed<'a>(group: &'a MovieGroup, normalizer: &NameNormalizer) -> Option<SearchSeed<'a>> {
    let file = representative(group)?;
    Some(SearchSeed {
        group_key: &group.key,
        file,
        query: normalizer.detection_name(&file.name, &file.full_path),
    })
}

/// Identity for every file in the group, keyed by full path.
#[must_use]
pub fn assign_identity(group: &MovieGroup, identity: &MovieIdentity) -> Vec<(String, MovieIdentity)> {
    group
        .video
        .iter()
        .chain(&group.subtitles)
        .map(|file| (file.full_path.clone(), identity.clone()))
        .collect()
}

/// One upload item per subtitle in group order.
///
/// `identities` maps group keys to resolved movies.
#[must_use]
pub fn plan_uploads<'a>(
    groups: &'a [MovieGroup],
    identities: &'a HashMap<String, MovieIdentity>,
) -> Vec<UploadItem<'a>> {
    groups
        .iter()
        .flat_map(|group| {
            let imdb_id = identities.get(&group.key).map(|identity| identity.imdb_id.as_str());
            group.subtitles.iter().map(move |subtitle| UploadItem {
                group_key: &group.key,
                subtitle,
                video: group.video.as_ref(),
                imdb_id,
                tags: subtitle_tags(subtitle.base_name()),
            })
        })
        .collect()
}
