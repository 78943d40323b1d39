use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use subpair::pairing::{FileDescriptor, NameNormalizer, PairingEngine};

use crate::Args;
use crate::config::Config;
use crate::report;
use crate::scan::FileScanner;

#[derive(Debug)]
pub struct Pairer {
    config: Config,
    normalizer: NameNormalizer,
}

impl Pairer {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::from_args(args)?;
        if config.debug {
            eprintln!("Config: {config:#?}");
        }
        let normalizer = NameNormalizer::with_container_dirs(&config.container_dirs);
        Ok(Self { config, normalizer })
    }

    pub fn run(&self) -> Result<()> {
        let files = self.collect_files()?;
        if files.is_empty() {
            if self.config.verbose {
                println!("No video or subtitle files found.");
            }
            return Ok(());
        }
        if self.config.debug {
            eprintln!("Collected {} file(s)", files.len());
        }

        let pairing = PairingEngine::new(self.normalizer.clone()).pair(&files);

        if self.config.json {
            report::print_json(&pairing)
        } else {
            report::print_report(&pairing, &self.normalizer, self.config.verbose);
            Ok(())
        }
    }

    fn collect_files(&self) -> Result<Vec<FileDescriptor>> {
        match (&self.config.input, &self.config.root) {
            (Some(input), _) => read_descriptors(input),
            (None, Some(root)) => Ok(FileScanner::new(&self.config).scan(root)),
            (None, None) => anyhow::bail!("No input directory or file given"),
        }
    }
}

/// Read a JSON array of file descriptors.
fn read_descriptors(path: &Path) -> Result<Vec<FileDescriptor>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse file descriptors: {}", path.display()))
}

#[cfg(test)]
mod pairer_tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn read_descriptors_from_json() {
        let dir = tempdir().expect("should create temp dir");
        let path = dir.path().join("files.json");
        fs::write(
            &path,
            r#"[
                {"name": "Movie.mp4", "fullPath": "Movie.mp4", "size": 100, "isVideo": true},
                {"name": "Movie.en.srt", "fullPath": "Movie.en.srt", "isSubtitle": true, "detectedLanguage": "en"},
                {"name": "Movie.txt", "fullPath": "Movie.txt", "isSubtitle": true, "shouldRemove": true}
            ]"#,
        )
        .expect("should write input file");

        let files = read_descriptors(&path).expect("should read descriptors");
        assert_eq!(files.len(), 3);
        assert!(files[0].is_video);
        assert_eq!(files[1].metadata["detectedLanguage"], "en");
        assert!(files[2].should_remove);

        let pairing = PairingEngine::default().pair(&files);
        assert_eq!(pairing.groups.len(), 1);
        assert_eq!(pairing.groups[0].subtitle_names(), vec!["Movie.en.srt"]);
    }

    #[test]
    fn read_descriptors_invalid_json_is_error() {
        let dir = tempdir().expect("should create temp dir");
        let path = dir.path().join("files.json");
        fs::write(&path, "{not json").expect("should write input file");

        assert!(read_descriptors(&path).is_err());
    }
}
