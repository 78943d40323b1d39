pub mod config;
pub mod pairing;

use std::env;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use colored::Colorize;
use unicode_normalization::UnicodeNormalization;

/// Check if a directory entry is hidden, meaning its name starts with a dot.
#[must_use]
pub fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}

/// Resolve the directory or file given on the command line to an absolute path.
///
/// An empty or missing path means the current working directory.
/// ```rust
/// use std::path::Path;
/// use subpair::resolve_input_path;
///
/// let path = resolve_input_path(Some(Path::new("src"))).expect("src should exist");
/// assert!(path.is_absolute());
/// ```
pub fn resolve_input_path(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path.filter(|path| !path.as_os_str().is_empty()) {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().context("Failed to get current working directory")?,
    };
    if !path.exists() {
        anyhow::bail!("Input path does not exist or is not accessible: '{}'", path.display());
    }
    dunce::canonicalize(&path).with_context(|| format!("Failed to resolve input path: {}", path.display()))
}

/// Slash-separated path of `full_path` relative to `root`,
/// with special characters composed instead of decomposed.
///
/// Returns `None` if the path is not inside root or is the root itself.
///
/// ```rust
/// use std::path::Path;
/// use subpair::virtual_path;
///
/// let root = Path::new("/media/drop");
/// let path = root.join("Heat (1995)").join("Subs").join("English.srt");
/// assert_eq!(virtual_path(&path, root).as_deref(), Some("Heat (1995)/Subs/English.srt"));
/// assert_eq!(virtual_path(root, root), None);
/// ```
#[must_use]
pub fn virtual_path(full_path: &Path, root: &Path) -> Option<String> {
    let relative = full_path.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(os_str_to_string(name)),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        return None;
    }

    // File names from macOS can be in decomposed form, "å" as "a\u{30a}"
    Some(segments.join("/").nfc().collect::<String>())
}

/// Convert `OsStr` to String, dropping invalid Unicode.
pub fn os_str_to_string(name: &OsStr) -> String {
    name.to_str()
        .map_or_else(|| name.to_string_lossy().replace('\u{FFFD}', ""), ToString::to_string)
}

/// Lowercase file extension, or an empty string if there is none.
#[must_use]
pub fn path_to_file_extension_string(path: &Path) -> String {
    path.extension().map(os_str_to_string).unwrap_or_default().to_lowercase()
}

#[inline]
pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

#[macro_export]
macro_rules! print_error {
    ($($arg:tt)*) => {
        $crate::print_error(&format!($($arg)*))
    };
}

#[inline]
pub fn print_warning(message: &str) {
    eprintln!("{}", message.yellow());
}

#[macro_export]
macro_rules! print_warning {
    ($($arg:tt)*) => {
        $crate::print_warning(&format!($($arg)*))
    };
}

#[inline]
pub fn print_bold(message: &str) {
    println!("{}", message.bold());
}

#[macro_export]
macro_rules! print_bold {
    ($($arg:tt)*) => {
        $crate::print_bold(&format!($($arg)*))
    };
}

/// Human-readable file size using binary units.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

/// Print a shell completion script, or write it to the user completion directory when `install` is set.
pub fn generate_shell_completion(shell: Shell, mut command: Command, install: bool) -> Result<()> {
    let name = command.get_name().to_string();
    if install {
        let out_dir = shell_completion_dir(shell)?;
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create completion directory: {}", out_dir.display()))?;
        let path = clap_complete::generate_to(shell, &mut command, &name, &out_dir)?;
        println!("Completion file generated to: {}", path.display());
    } else {
        clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    }
    Ok(())
}

/// User-specific completion directory for the shell.
fn shell_completion_dir(shell: Shell) -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    let dir = match shell {
        Shell::Bash => home.join(".bash_completion.d"),
        Shell::Elvish => home.join(".elvish"),
        Shell::Fish => home.join(".config").join("fish").join("completions"),
        Shell::PowerShell if cfg!(windows) => home.join("Documents").join("PowerShell").join("completions"),
        Shell::PowerShell => home.join(".config").join("powershell").join("completions"),
        Shell::Zsh => home.join(".zsh").join("completions"),
        _ => anyhow::bail!("Unsupported shell: {shell}"),
    };
    Ok(dir)
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    use std::fs::File;

    use tempfile::tempdir;
    use walkdir::WalkDir;

    fn find_entry(root: &Path, name: &str) -> walkdir::DirEntry {
        WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .find(|entry| entry.file_name() == name)
            .expect("entry should exist")
    }

    #[test]
    fn hidden_entries() {
        let dir = tempdir().expect("should create temp dir");
        File::create(dir.path().join(".DS_Store")).expect("should create file");
        File::create(dir.path().join("Movie.srt")).expect("should create file");

        assert!(is_hidden(&find_entry(dir.path(), ".DS_Store")));
        assert!(!is_hidden(&find_entry(dir.path(), "Movie.srt")));
    }

    #[test]
    fn resolve_existing_directory() {
        let dir = tempdir().expect("should create temp dir");
        let resolved = resolve_input_path(Some(dir.path())).expect("should resolve temp dir");
        assert!(resolved.is_absolute());
        assert!(resolved.is_dir());
    }

    #[test]
    fn resolve_missing_path_is_error() {
        assert!(resolve_input_path(Some(Path::new("does-not-exist"))).is_err());
    }

    #[test]
    fn resolve_defaults_to_current_directory() {
        let current = dunce::canonicalize(env::current_dir().expect("should have current dir"))
            .expect("should canonicalize current dir");
        assert_eq!(resolve_input_path(None).expect("should resolve"), current);
        assert_eq!(resolve_input_path(Some(Path::new(""))).expect("should resolve"), current);
    }

    #[test]
    fn virtual_path_outside_root() {
        assert_eq!(virtual_path(Path::new("/other/file.srt"), Path::new("/media")), None);
    }

    #[test]
    fn virtual_path_composes_characters() {
        let root = Path::new("/media");
        let decomposed = root.join("Ma\u{301}laga").join("a\u{30a}.srt");
        assert_eq!(virtual_path(&decomposed, root).as_deref(), Some("M\u{e1}laga/\u{e5}.srt"));
    }

    #[test]
    fn file_extension_is_lowercase() {
        assert_eq!(path_to_file_extension_string(Path::new("Movie.MKV")), "mkv");
        assert_eq!(path_to_file_extension_string(Path::new("Heat.1995.en.Srt")), "srt");
        assert_eq!(path_to_file_extension_string(Path::new("README")), "");
    }

    #[test]
    fn size_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024 * 3), "3.00 MB");
        assert_eq!(format_size(1024 * 1024 * 1024 * 2), "2.00 GB");
    }
}
