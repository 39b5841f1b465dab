//! Core library for detecting letterbox and pillarbox borders in videos.
//!
//! A run samples frames from the middle third of a video, measures the
//! uniformly dark rows and columns at each frame's edges, and votes the
//! per-frame measurements down to one crop per axis.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use videocrop_core::{AnalysisConfig, CancellationToken, FfmpegFrameProvider, analyze_video};
//! use std::path::Path;
//!
//! let provider = FfmpegFrameProvider::new();
//! let config = AnalysisConfig::default();
//!
//! let analysis = analyze_video(
//!     &provider,
//!     Path::new("/path/to/movie.mkv"),
//!     &config,
//!     &CancellationToken::new(),
//! ).unwrap();
//!
//! println!("{}", analysis.crop.to_json().unwrap());
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod processing;
pub mod utils;

// Re-exports for public API
pub use config::{AnalysisConfig, AnalysisConfigBuilder, FrameFailurePolicy};
pub use error::{CoreError, CoreResult};
pub use external::{FfmpegFrameProvider, FrameProvider, check_media_tools};
pub use processing::{
    CancellationToken, CropAnalysis, CropValues, FrameSample, HorizontalCrop, VerticalCrop,
    VoteThresholds, aggregate, analyze_video, normalize_raster, scan_borders, select_frames,
};
pub use utils::format_duration;
