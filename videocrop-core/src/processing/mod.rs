//! Crop analysis logic and orchestration.
//!
//! This module organizes the three stages of an analysis run (choosing sample
//! positions, scanning frames, voting) and the orchestration that ties them
//! to a frame provider.

/// Crop measurement and result types
pub mod crop_types;

/// Sample position selection
pub mod frame_selection;

/// Per-frame dark border scanning
pub mod border_scan;

/// Majority voting over per-frame measurements
pub mod aggregation;

/// Whole-video crop detection
pub mod crop_detection;

pub use aggregation::{VoteThresholds, aggregate};
pub use border_scan::{normalize_raster, scan_borders};
pub use crop_detection::{CancellationToken, CropAnalysis, FrameSample, analyze_video};
pub use crop_types::{CropPair, CropValues, HorizontalCrop, VerticalCrop};
pub use frame_selection::select_frames;
