use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use walkdir::WalkDir;

use subpair::pairing::{FileDescriptor, FileKind};
use subpair::{is_hidden, path_to_file_extension_string, print_warning, virtual_path};

use crate::config::Config;
use crate::hash::movie_hash;

const VIDEO_EXTENSIONS: [&str; 24] = [
    "3g2", "3gp", "3gp2", "asf", "avi", "divx", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpe", "mpeg", "mpg", "ogm",
    "ogv", "qt", "rm", "rmvb", "ts", "vob", "webm", "wmv",
];

const SUBTITLE_EXTENSIONS: [&str; 8] = ["ass", "idx", "smi", "srt", "ssa", "sub", "txt", "vtt"];

/// Bytes read from the start of a `.txt` file to check for subtitle content.
const TEXT_SNIFF_SIZE: u64 = 8 * 1024;

/// SRT style timestamp line or `MicroDVD` frame line.
static RE_SUBTITLE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\d{1,2}:\d{2}:\d{2}[,.]\d{2,3}\s*-->|^\{\d+\}\{\d*\}")
        .expect("Failed to compile subtitle text regex")
});

/// Collects video and subtitle files from a directory tree.
#[derive(Debug)]
pub struct FileScanner<'a> {
    config: &'a Config,
}

impl<'a> FileScanner<'a> {
    pub const fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Classify a file by its lowercase extension.
    pub fn classify(&self, extension: &str) -> FileKind {
        let is_extension = |known: &[&str], extra: &[String]| {
            known.contains(&extension) || extra.iter().any(|value| value == extension)
        };

        if is_extension(&VIDEO_EXTENSIONS, &self.config.video_extensions) {
            FileKind::Video
        } else if is_extension(&SUBTITLE_EXTENSIONS, &self.config.subtitle_extensions) {
            FileKind::Subtitle
        } else {
            FileKind::Other
        }
    }

    /// Walk the root directory and create a descriptor for each video and subtitle file.
    ///
    /// Paths are relative to root, so files directly in root have no directory.
    /// Entries are visited in file name order to keep the output stable between runs.
    pub fn scan(&self, root: &Path) -> Vec<FileDescriptor> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    print_warning!("Skipping unreadable entry: {error}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let extension = path_to_file_extension_string(path);
            let kind = self.classify(&extension);
            if kind == FileKind::Other {
                continue;
            }

            let Some(full_path) = virtual_path(path, root) else {
                continue;
            };
            if !self.is_included(&full_path) {
                if self.config.verbose {
                    println!("Skipping filtered file: {full_path}");
                }
                continue;
            }

            let size = entry.metadata().map(|metadata| metadata.len()).unwrap_or_default();
            let mut file = FileDescriptor::new(full_path, size);
            match kind {
                FileKind::Video => {
                    file.is_video = true;
                    if self.config.hash {
                        match movie_hash(path) {
                            Ok(hash) => file = file.with_metadata("movieHash", hash),
                            Err(error) => print_warning!("{error}"),
                        }
                    }
                }
                FileKind::Subtitle => {
                    file.is_subtitle = true;
                    file.should_remove = size == 0 || (extension == "txt" && !Self::is_subtitle_text(path));
                }
                FileKind::Other => {}
            }
            files.push(file);
        }

        files
    }

    /// Check if a plain text file looks like a subtitle.
    /// Unreadable files are kept so they are not silently dropped.
    fn is_subtitle_text(path: &Path) -> bool {
        match read_text_start(path) {
            Ok(text) => RE_SUBTITLE_TEXT.is_match(&text),
            Err(error) => {
                print_warning!("{error}");
                true
            }
        }
    }

    /// Check include and exclude patterns against the lowercase path.
    fn is_included(&self, full_path: &str) -> bool {
        let lower = full_path.to_lowercase();
        let matches = |pattern: &String| lower.contains(&pattern.to_lowercase());

        (self.config.include.is_empty() || self.config.include.iter().any(matches))
            && !self.config.exclude.iter().any(matches)
    }
}

/// Read the start of a file as lossy UTF-8.
fn read_text_start(path: &Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut bytes = Vec::new();
    file.take(TEXT_SNIFF_SIZE)
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod scan_tests {
    use super::*;

    use std::fs;

    use tempfile::tempdir;

    fn make_config() -> Config {
        Config {
            container_dirs: Vec::new(),
            debug: false,
            exclude: Vec::new(),
            hash: false,
            include: Vec::new(),
            input: None,
            json: false,
            root: None,
            subtitle_extensions: Vec::new(),
            verbose: false,
            video_extensions: Vec::new(),
        }
    }

    fn write_file(root: &Path, relative: &str, content: &[u8]) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("should create directories");
        }
        fs::write(path, content).expect("should write file");
    }

    #[test]
    fn classify_known_extensions() {
        let config = make_config();
        let scanner = FileScanner::new(&config);
        assert_eq!(scanner.classify("mkv"), FileKind::Video);
        assert_eq!(scanner.classify("srt"), FileKind::Subtitle);
        assert_eq!(scanner.classify("nfo"), FileKind::Other);
        assert_eq!(scanner.classify("mxf"), FileKind::Other);
    }

    #[test]
    fn classify_extra_extensions() {
        let config = Config {
            video_extensions: vec!["mxf".to_string()],
            subtitle_extensions: vec!["sup".to_string()],
            ..make_config()
        };
        let scanner = FileScanner::new(&config);
        assert_eq!(scanner.classify("mxf"), FileKind::Video);
        assert_eq!(scanner.classify("sup"), FileKind::Subtitle);
    }

    #[test]
    fn scan_builds_relative_descriptors() {
        let dir = tempdir().expect("should create temp dir");
        write_file(dir.path(), "Heat (1995)/Heat.mkv", b"video");
        write_file(dir.path(), "Heat (1995)/Subs/English.srt", b"1\n00:00:01,000 --> 00:00:02,000\nHi\n");
        write_file(dir.path(), "Heat (1995)/Heat.nfo", b"info");
        write_file(dir.path(), "Alien.srt", b"subtitle");
        write_file(dir.path(), ".hidden/Movie.mkv", b"video");

        let config = make_config();
        let files = FileScanner::new(&config).scan(dir.path());
        let paths: Vec<&str> = files.iter().map(|file| file.full_path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["Alien.srt", "Heat (1995)/Heat.mkv", "Heat (1995)/Subs/English.srt"]
        );

        assert!(files[0].is_subtitle);
        assert_eq!(files[0].name, "Alien.srt");
        assert_eq!(files[0].size, 8);
        assert!(files[1].is_video);
        assert!(!files[1].metadata.contains_key("movieHash"));
    }

    #[test]
    fn scan_marks_empty_subtitles_for_removal() {
        let dir = tempdir().expect("should create temp dir");
        write_file(dir.path(), "Movie.srt", b"");
        write_file(dir.path(), "Movie.en.srt", b"text");

        let config = make_config();
        let files = FileScanner::new(&config).scan(dir.path());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "Movie.en.srt");
        assert!(!files[0].should_remove);
        assert_eq!(files[1].name, "Movie.srt");
        assert!(files[1].should_remove);
    }

    #[test]
    fn scan_marks_prose_text_files_for_removal() {
        let dir = tempdir().expect("should create temp dir");
        write_file(dir.path(), "Movie/readme.txt", b"Release notes\nEncoded by someone.\n");
        write_file(
            dir.path(),
            "Movie/Movie.en.txt",
            b"1\r\n00:00:01,000 --> 00:00:02,500\r\nHello\r\n",
        );
        write_file(dir.path(), "Movie/Movie.fr.txt", b"{10}{50}Bonjour|tout le monde\n");

        let config = make_config();
        let files = FileScanner::new(&config).scan(dir.path());
        let removed: Vec<(&str, bool)> = files
            .iter()
            .map(|file| (file.name.as_str(), file.should_remove))
            .collect();
        assert_eq!(
            removed,
            vec![("Movie.en.txt", false), ("Movie.fr.txt", false), ("readme.txt", true)]
        );
    }

    #[test]
    fn subtitle_text_patterns() {
        assert!(RE_SUBTITLE_TEXT.is_match("1\n00:01:02,345 --> 00:01:04,000\nHi"));
        assert!(RE_SUBTITLE_TEXT.is_match("WEBVTT\n\n00:01:02.345 --> 00:01:04.000\nHi"));
        assert!(RE_SUBTITLE_TEXT.is_match("{0}{25}Line one\n{26}{50}Line two"));
        assert!(!RE_SUBTITLE_TEXT.is_match("Movie info\nRuntime: 01:45:00\n"));
    }

    #[test]
    fn scan_applies_include_and_exclude() {
        let dir = tempdir().expect("should create temp dir");
        write_file(dir.path(), "Movie/Movie.mkv", b"video");
        write_file(dir.path(), "Movie/Sample/Movie.sample.mkv", b"video");
        write_file(dir.path(), "Other/Other.mkv", b"video");

        let config = Config {
            include: vec!["movie".to_string()],
            exclude: vec!["SAMPLE".to_string()],
            ..make_config()
        };
        let files = FileScanner::new(&config).scan(dir.path());
        let paths: Vec<&str> = files.iter().map(|file| file.full_path.as_str()).collect();
        assert_eq!(paths, vec!["Movie/Movie.mkv"]);
    }

    #[test]
    fn scan_with_hash_adds_movie_hash() {
        let dir = tempdir().expect("should create temp dir");
        write_file(dir.path(), "Movie.mkv", &vec![0_u8; 128 * 1024]);
        write_file(dir.path(), "Short.mkv", b"too short");

        let config = Config {
            hash: true,
            ..make_config()
        };
        let files = FileScanner::new(&config).scan(dir.path());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].metadata["movieHash"], "0000000000020000");
        assert!(!files[1].metadata.contains_key("movieHash"));
    }
}
