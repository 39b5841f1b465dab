//! Command implementations for the CLI.

/// Crop analysis of a single video file.
pub mod analyze;
