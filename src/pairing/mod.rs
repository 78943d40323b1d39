//! Pair dropped video files with their subtitle files.
//!
//! The pairing is a pure function of the file list: [`pair_files`] can be called again
//! whenever files are added, removed, or get new metadata, and always returns the same
//! groups in the same order for the same input.

mod descriptor;
mod engine;
mod identify;
mod names;
mod path;

pub use descriptor::{FileDescriptor, FileKind, MovieGroup, Pairing};
pub use engine::{PairingEngine, pair_files};
pub use identify::{
    MovieIdentity, SearchSeed, UploadItem, assign_identity, plan_uploads, representative, search_seed,
};
pub use names::{
    GenericReason, MIN_IDENTITY_LENGTH, NameClass, NameNormalizer, SubtitleTags, best_detection_name, classify_name,
    is_container_directory, is_generic_name, subtitle_tags,
};
pub use path::{PathSegments, ROOT_DIRECTORY, directory_of, strip_extension};
