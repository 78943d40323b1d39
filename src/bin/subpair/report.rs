use anyhow::{Context, Result};
use colored::Colorize;

use subpair::pairing::{FileDescriptor, MovieGroup, NameNormalizer, Pairing, SubtitleTags, search_seed, subtitle_tags};
use subpair::{format_size, print_bold, print_warning};

/// Print the groups as pretty JSON to stdout.
/// Duplicate warnings go to stderr so the output stays valid JSON.
pub fn print_json(pairing: &Pairing) -> Result<()> {
    let json = serde_json::to_string_pretty(&pairing.groups).context("Failed to serialize groups")?;
    println!("{json}");
    print_duplicates(pairing);
    Ok(())
}

/// Print a coloured listing of all groups followed by a summary.
pub fn print_report(pairing: &Pairing, normalizer: &NameNormalizer, verbose: bool) {
    for group in &pairing.groups {
        print_group(group, normalizer, verbose);
    }

    print_duplicates(pairing);

    print_bold!(
        "{} video group(s), {} orphan group(s), {} subtitle(s)",
        pairing.video_group_count(),
        pairing.orphan_group_count(),
        pairing.subtitle_count()
    );
}

fn print_duplicates(pairing: &Pairing) {
    for warning in duplicate_warnings(pairing) {
        print_warning!("{warning}");
    }
}

/// Warnings for videos that were dropped and subtitles that were replaced by a later copy.
fn duplicate_warnings(pairing: &Pairing) -> Vec<String> {
    let videos = pairing
        .duplicate_videos
        .iter()
        .map(|video| format!("Duplicate video ignored: {}", video.full_path));
    let subtitles = pairing
        .duplicate_subtitles
        .iter()
        .map(|subtitle| format!("Duplicate subtitle replaced: {}", subtitle.full_path));
    videos.chain(subtitles).collect()
}

fn print_group(group: &MovieGroup, normalizer: &NameNormalizer, verbose: bool) {
    match &group.video {
        Some(video) => {
            println!("{} {}", group.key.cyan().bold(), format!("({})", format_size(video.size)).dimmed());
        }
        None => {
            println!("{} {}", group.key.yellow().bold(), "[orphan]".yellow());
        }
    }

    if group.is_orphan || verbose {
        if let Some(seed) = search_seed(group, normalizer) {
            println!("  search: {}", seed.query.green());
        }
    }

    if group.subtitles.is_empty() {
        println!("  {}", "no subtitles".dimmed());
    }
    for subtitle in &group.subtitles {
        print_subtitle(subtitle, verbose);
    }
    println!();
}

fn print_subtitle(subtitle: &FileDescriptor, verbose: bool) {
    let tags = format_tags(subtitle_tags(subtitle.base_name()));
    if tags.is_empty() {
        println!("  {} {}", "→".green(), subtitle.name);
    } else {
        println!("  {} {} {}", "→".green(), subtitle.name, tags.magenta());
    }
    if verbose {
        for (key, value) in &subtitle.metadata {
            println!("      {key}: {value}");
        }
    }
}

fn format_tags(tags: SubtitleTags) -> String {
    let mut parts = Vec::new();
    if let Some(language) = tags.language {
        parts.push(language);
    }
    if tags.forced {
        parts.push("forced");
    }
    if tags.hearing_impaired {
        parts.push("sdh");
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("[{}]", parts.join(", "))
    }
}
