//! Configuration for the subpair binary.
//!
//! Combines CLI arguments with the user config file (`~/.config/subpair.toml`).
//! Boolean options are enabled if set in either place,
//! list options are merged.
//!
//! # Example config file section
//!
//! ```toml
//! [subpair]
//! container_dirs = ["tekstit"]
//! exclude = ["sample"]
//! hash = true
//! subtitle_extensions = ["sup"]
//! video_extensions = ["mxf"]
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Deserialize;

use subpair::print_error;

use crate::Args;

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) container_dirs: Vec<String>,
    pub(crate) debug: bool,
    pub(crate) exclude: Vec<String>,
    pub(crate) hash: bool,
    pub(crate) include: Vec<String>,
    pub(crate) input: Option<PathBuf>,
    pub(crate) json: bool,
    /// Directory to scan when not reading descriptors from `input`.
    pub(crate) root: Option<PathBuf>,
    pub(crate) subtitle_extensions: Vec<String>,
    pub(crate) verbose: bool,
    pub(crate) video_extensions: Vec<String>,
}

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
struct SubpairConfig {
    #[serde(default)]
    container_dirs: Vec<String>,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    hash: bool,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    json: bool,
    #[serde(default)]
    subtitle_extensions: Vec<String>,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    video_extensions: Vec<String>,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    subpair: SubpairConfig,
}

impl SubpairConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    fn get_user_config() -> Self {
        subpair::config::CONFIG_PATH
            .as_deref()
            .filter(|path| path.exists())
            .and_then(|path| {
                fs::read_to_string(path)
                    .map_err(|e| {
                        print_error!("Error reading config file {}: {e}", path.display());
                    })
                    .ok()
            })
            .and_then(|config_string| {
                Self::from_toml_str(&config_string)
                    .map_err(|e| print_error!("{e}"))
                    .ok()
            })
            .unwrap_or_default()
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.subpair)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    pub fn from_args(args: Args) -> Result<Self> {
        Self::from_parts(args, SubpairConfig::get_user_config())
    }

    fn from_parts(args: Args, user_config: SubpairConfig) -> Result<Self> {
        let root = if args.input.is_some() {
            None
        } else {
            let root = subpair::resolve_input_path(args.path.as_deref())?;
            if !root.is_dir() {
                anyhow::bail!("Input path is not a directory: '{}'", root.display());
            }
            Some(root)
        };

        let input = args
            .input
            .map(|path| dunce::canonicalize(&path).with_context(|| format!("Input file not found: '{}'", path.display())))
            .transpose()?;

        Ok(Self {
            container_dirs: merge(user_config.container_dirs, args.container_dirs),
            debug: args.debug || user_config.debug,
            exclude: merge(user_config.exclude, args.exclude),
            hash: args.hash || user_config.hash,
            include: merge(user_config.include, args.include),
            input,
            json: args.json || user_config.json,
            root,
            subtitle_extensions: normalize_extensions(merge(user_config.subtitle_extensions, args.subtitle_extensions)),
            verbose: args.verbose || user_config.verbose,
            video_extensions: normalize_extensions(merge(user_config.video_extensions, args.video_extensions)),
        })
    }
}

/// Combine config file and CLI values, dropping duplicates.
fn merge(config_values: Vec<String>, arg_values: Vec<String>) -> Vec<String> {
    config_values
        .into_iter()
        .chain(arg_values)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unique()
        .collect()
}

/// Lowercase extensions without the leading dot.
fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
    extensions
        .into_iter()
        .map(|extension| extension.trim().trim_start_matches('.').to_lowercase())
        .filter(|extension| !extension.is_empty())
        .unique()
        .collect()
}
