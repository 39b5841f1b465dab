// videocrop-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use videocrop_core::FrameFailurePolicy;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    name = "videocropanalyzer",
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Detects letterbox and pillarbox borders in a video",
    long_about = "Samples frames from the middle of a video with ffmpeg, measures their dark \
                  borders and prints the agreed crop as JSON."
)]
pub struct Cli {
    /// Video file to analyze
    #[arg(value_name = "VIDEO_FILE")]
    pub video_path: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Number of frames to sample
    #[arg(long, value_name = "COUNT", value_parser = clap::value_parser!(u64).range(1..))]
    pub samples: Option<u64>,

    /// Highest channel value (0-255) a pixel may have and still count as dark
    #[arg(long, value_name = "LEVEL")]
    pub threshold: Option<u8>,

    /// Maximum number of frames decoded at the same time
    #[arg(long, value_name = "JOBS", value_parser = clap::value_parser!(u64).range(1..))]
    pub jobs: Option<u64>,

    /// What to do when a frame cannot be extracted or decoded
    #[arg(long, value_enum, value_name = "POLICY", default_value_t = FrameErrorArg::Abort)]
    pub on_frame_error: FrameErrorArg,
}

/// Command-line spelling of [`FrameFailurePolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrameErrorArg {
    /// Stop the analysis at the first failed frame
    Abort,
    /// Leave failed frames out of the vote
    Skip,
    /// Retry a failed frame once, then leave it out
    Retry,
}

impl From<FrameErrorArg> for FrameFailurePolicy {
    fn from(arg: FrameErrorArg) -> Self {
        match arg {
            FrameErrorArg::Abort => FrameFailurePolicy::Abort,
            FrameErrorArg::Skip => FrameFailurePolicy::Skip,
            FrameErrorArg::Retry => FrameFailurePolicy::RetryThenSkip,
        }
    }
}
