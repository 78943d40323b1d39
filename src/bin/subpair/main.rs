mod config;
mod hash;
mod pairer;
mod report;
mod scan;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use crate::pairer::Pairer;

#[derive(Parser)]
#[command(author, version, name = env!("CARGO_BIN_NAME"), about = "Pair video files with their subtitle files")]
pub struct Args {
    /// Optional input directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    path: Option<PathBuf>,

    /// Read file descriptors from a JSON file instead of scanning a directory
    #[arg(short, long, value_hint = clap::ValueHint::FilePath, conflicts_with = "path")]
    input: Option<PathBuf>,

    /// Extra directory name that only contains subtitles
    #[arg(short = 'c', long = "container", num_args = 1, action = clap::ArgAction::Append, name = "CONTAINER")]
    container_dirs: Vec<String>,

    /// Print debug information
    #[arg(short = 'D', long)]
    debug: bool,

    /// Exclude files that match the given pattern
    #[arg(short = 'e', long, num_args = 1, action = clap::ArgAction::Append, name = "EXCLUDE")]
    exclude: Vec<String>,

    /// Compute the movie hash for video files
    #[arg(short = 'H', long)]
    hash: bool,

    /// Include files that match the given pattern
    #[arg(short = 'n', long, num_args = 1, action = clap::ArgAction::Append, name = "INCLUDE")]
    include: Vec<String>,

    /// Print groups as JSON
    #[arg(short, long)]
    json: bool,

    /// Extra subtitle file extension
    #[arg(short = 's', long = "subtitle-ext", num_args = 1, action = clap::ArgAction::Append, name = "SUBTITLE_EXT")]
    subtitle_extensions: Vec<String>,

    /// Extra video file extension
    #[arg(short = 'x', long = "video-ext", num_args = 1, action = clap::ArgAction::Append, name = "VIDEO_EXT")]
    video_extensions: Vec<String>,

    /// Generate shell completion
    #[arg(short = 'l', long, name = "SHELL")]
    completion: Option<Shell>,

    /// Write the shell completion to the user completion directory instead of stdout
    #[arg(short = 'I', long, requires = "SHELL")]
    install: bool,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        subpair::generate_shell_completion(*shell, Args::command(), args.install)
    } else {
        Pairer::new(args)?.run()
    }
}
