//! Configuration structures and constants for the videocrop-core library.
//!
//! This module provides the knobs of a crop analysis run: how many positions
//! to sample, how dark a border pixel must be, how votes are counted, how
//! frame failures are handled and how many frames are fetched at once.

mod builder;

use crate::error::{CoreError, CoreResult};
use crate::processing::aggregation::{
    DEFAULT_STRONG_THRESHOLD, DEFAULT_WEAK_THRESHOLD, VoteThresholds,
};
use crate::processing::border_scan::DEFAULT_DARKNESS_THRESHOLD;
use std::fmt;

pub use builder::AnalysisConfigBuilder;

// Default constants

/// Default number of timeline positions sampled per video.
pub const DEFAULT_SAMPLE_COUNT: u64 = 15;

/// Default failure handling for frames that cannot be extracted or decoded.
pub const DEFAULT_FAILURE_POLICY: FrameFailurePolicy = FrameFailurePolicy::Abort;

/// What to do when a single sampled frame cannot be fetched or decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameFailurePolicy {
    /// Stop the whole run on the first failed frame.
    #[default]
    Abort,
    /// Drop the failed frame and decide on the remaining samples.
    Skip,
    /// Try a failed frame once more, then drop it.
    RetryThenSkip,
}

impl fmt::Display for FrameFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameFailurePolicy::Abort => "abort",
            FrameFailurePolicy::Skip => "skip",
            FrameFailurePolicy::RetryThenSkip => "retry",
        };
        f.write_str(name)
    }
}

/// Main configuration structure for a crop analysis run.
///
/// All fields have defaults reproducing the classic analyzer behaviour:
/// 15 samples, darkness threshold 10, strong/weak vote thresholds 5/3 and
/// abort on the first failed frame.
///
/// # Examples
///
/// ```rust
/// use videocrop_core::config::{AnalysisConfigBuilder, FrameFailurePolicy};
///
/// let config = AnalysisConfigBuilder::new()
///     .sample_count(21)
///     .failure_policy(FrameFailurePolicy::Skip)
///     .max_parallel_jobs(4)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Number of timeline positions to sample
    pub sample_count: u64,

    /// Per-channel brightness ceiling for a border pixel (0-255)
    pub darkness_threshold: u8,

    /// Vote counts used when aggregating the samples
    pub thresholds: VoteThresholds,

    /// Handling of frames that fail to extract or decode
    pub failure_policy: FrameFailurePolicy,

    /// Upper bound on concurrently fetched frames (defaults to logical cores)
    pub max_parallel_jobs: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            darkness_threshold: DEFAULT_DARKNESS_THRESHOLD,
            thresholds: VoteThresholds {
                strong: DEFAULT_STRONG_THRESHOLD,
                weak: DEFAULT_WEAK_THRESHOLD,
            },
            failure_policy: DEFAULT_FAILURE_POLICY,
            max_parallel_jobs: None,
        }
    }
}

impl AnalysisConfig {
    /// Checks that the configuration can drive an analysis run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.sample_count == 0 {
            return Err(CoreError::Config(
                "sample count must be at least 1".to_string(),
            ));
        }
        if self.thresholds.weak == 0 {
            return Err(CoreError::Config(
                "weak vote threshold must be at least 1".to_string(),
            ));
        }
        if self.thresholds.strong < self.thresholds.weak {
            return Err(CoreError::Config(format!(
                "strong vote threshold ({}) must not be below the weak threshold ({})",
                self.thresholds.strong, self.thresholds.weak
            )));
        }
        if self.max_parallel_jobs == Some(0) {
            return Err(CoreError::Config(
                "parallel jobs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
