//! Directory and base name helpers shared by the name normalizer and the pairing engine.

/// Directory used for files whose path has no directory part.
pub const ROOT_DIRECTORY: &str = "Root";

/// A slash-separated virtual path split into its segments.
///
/// Backslashes are treated as separators and empty segments are dropped,
/// so `"A//B\\file.srt"` and `"/A/B/file.srt"` produce the same segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegments {
    segments: Vec<String>,
}

impl PathSegments {
    /// Split a full path where the last segment is the file name.
    #[must_use]
    pub fn from_full_path(full_path: &str) -> Self {
        let segments = full_path
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .map(ToString::to_string)
            .collect();

        Self { segments }
    }

    /// The last segment, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Directory segments from shallowest to deepest, excluding the file name.
    #[must_use]
    pub fn directories(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, directories)) => directories,
            None => &[],
        }
    }

    /// Number of directory segments above the file.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.directories().len()
    }

    /// Directory segment at the given distance above the file.
    ///
    /// Level 0 is the immediate parent directory.
    #[must_use]
    pub fn ancestor(&self, level: usize) -> Option<&str> {
        let directories = self.directories();
        directories
            .len()
            .checked_sub(level + 1)
            .map(|index| directories[index].as_str())
    }

    /// Directory segments from deepest (closest to the file) to shallowest.
    pub fn walk_up(&self) -> impl Iterator<Item = &str> {
        (0..self.depth()).filter_map(|level| self.ancestor(level))
    }

    /// Normalized parent directory, or [`ROOT_DIRECTORY`] when there is none.
    #[must_use]
    pub fn directory(&self) -> String {
        join_or_root(self.directories())
    }

    /// Normalized directory one level above the parent.
    ///
    /// Returns `None` when the file has no parent directory,
    /// and [`ROOT_DIRECTORY`] when the parent directory is at the top level.
    #[must_use]
    pub fn grandparent_directory(&self) -> Option<String> {
        self.directories()
            .split_last()
            .map(|(_, above)| join_or_root(above))
    }
}

/// Remove the trailing extension from a file name.
///
/// Only the last dot-separated part is removed, and a leading dot does not count
/// as an extension separator.
///
/// ```rust
/// use subpair::pairing::strip_extension;
///
/// assert_eq!(strip_extension("Movie.en.forced.srt"), "Movie.en.forced");
/// assert_eq!(strip_extension("README"), "README");
/// assert_eq!(strip_extension(".hidden"), ".hidden");
/// ```
#[must_use]
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) if index > 0 => &name[..index],
        _ => name,
    }
}

/// Normalized parent directory of a full path.
#[must_use]
pub fn directory_of(full_path: &str) -> String {
    PathSegments::from_full_path(full_path).directory()
}

fn join_or_root(segments: &[String]) -> String {
    if segments.is_empty() {
        ROOT_DIRECTORY.to_string()
    } else {
        segments.join("/")
    }
}

#[cfg(test)]
mod path_tests {
    use super::*;

    #[test]
    fn strip_extension_removes_only_last_part() {
        assert_eq!(strip_extension("Movie.mp4"), "Movie");
        assert_eq!(strip_extension("Movie.en.srt"), "Movie.en");
        assert_eq!(strip_extension("The Matrix (1999).mkv"), "The Matrix (1999)");
    }

    #[test]
    fn strip_extension_without_extension() {
        assert_eq!(strip_extension("Movie"), "Movie");
        assert_eq!(strip_extension(""), "");
        assert_eq!(strip_extension(".srt"), ".srt");
    }

    #[test]
    fn directory_of_nested_path() {
        assert_eq!(directory_of("Movies/Alien (1979)/Alien.mkv"), "Movies/Alien (1979)");
    }

    #[test]
    fn directory_of_file_without_directory_is_root() {
        assert_eq!(directory_of("Movie.mkv"), ROOT_DIRECTORY);
        assert_eq!(directory_of("/Movie.mkv"), ROOT_DIRECTORY);
        assert_eq!(directory_of(""), ROOT_DIRECTORY);
    }

    #[test]
    fn directory_of_normalizes_separators() {
        assert_eq!(directory_of("A\\B\\file.srt"), "A/B");
        assert_eq!(directory_of("/A//B/file.srt"), "A/B");
    }

    #[test]
    fn ancestor_levels() {
        let segments = PathSegments::from_full_path("Show/Season 1/Subs/English.srt");
        assert_eq!(segments.file_name(), Some("English.srt"));
        assert_eq!(segments.depth(), 3);
        assert_eq!(segments.ancestor(0), Some("Subs"));
        assert_eq!(segments.ancestor(1), Some("Season 1"));
        assert_eq!(segments.ancestor(2), Some("Show"));
        assert_eq!(segments.ancestor(3), None);
    }

    #[test]
    fn walk_up_goes_from_deepest_to_shallowest() {
        let segments = PathSegments::from_full_path("A/B/C/file.srt");
        let walked: Vec<&str> = segments.walk_up().collect();
        assert_eq!(walked, vec!["C", "B", "A"]);
    }

    #[test]
    fn walk_up_without_directories_is_empty() {
        let segments = PathSegments::from_full_path("file.srt");
        assert_eq!(segments.walk_up().count(), 0);
    }

    #[test]
    fn grandparent_directory() {
        let nested = PathSegments::from_full_path("Movie/Subs/English.srt");
        assert_eq!(nested.grandparent_directory().as_deref(), Some("Movie"));

        let top_level = PathSegments::from_full_path("Subs/English.srt");
        assert_eq!(top_level.grandparent_directory().as_deref(), Some(ROOT_DIRECTORY));

        let no_parent = PathSegments::from_full_path("English.srt");
        assert_eq!(no_parent.grandparent_directory(), None);
    }
}
