// ============================================================================
// videocrop-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for AnalysisConfig
//
// This module implements a fluent builder for AnalysisConfig, starting from
// the library defaults and overriding only what the caller sets.

use super::{AnalysisConfig, FrameFailurePolicy};

/// Builder for creating AnalysisConfig instances.
///
/// # Examples
///
/// ```rust
/// use videocrop_core::config::AnalysisConfigBuilder;
///
/// let config = AnalysisConfigBuilder::new()
///     .sample_count(15)
///     .darkness_threshold(16)
///     .vote_thresholds(5, 3)
///     .build();
/// assert_eq!(config.darkness_threshold, 16);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Creates a new builder holding the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of timeline positions to sample.
    pub fn sample_count(mut self, count: u64) -> Self {
        self.config.sample_count = count;
        self
    }

    /// Sets the per-channel darkness threshold.
    pub fn darkness_threshold(mut self, threshold: u8) -> Self {
        self.config.darkness_threshold = threshold;
        self
    }

    /// Sets the strong (adopt outright) and weak (fallback) vote thresholds.
    pub fn vote_thresholds(mut self, strong: usize, weak: usize) -> Self {
        self.config.thresholds.strong = strong;
        self.config.thresholds.weak = weak;
        self
    }

    /// Sets how failed frames are handled.
    pub fn failure_policy(mut self, policy: FrameFailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Caps the number of frames fetched concurrently.
    pub fn max_parallel_jobs(mut self, jobs: usize) -> Self {
        self.config.max_parallel_jobs = Some(jobs);
        self
    }

    /// Builds the configuration. Call `validate()` on the result before use.
    pub fn build(self) -> AnalysisConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::aggregation::VoteThresholds;

    #[test]
    fn test_builder_overrides_only_set_fields() {
        let config = AnalysisConfigBuilder::new()
            .sample_count(9)
            .failure_policy(FrameFailurePolicy::RetryThenSkip)
            .build();
        assert_eq!(config.sample_count, 9);
        assert_eq!(config.failure_policy, FrameFailurePolicy::RetryThenSkip);
        assert_eq!(config.darkness_threshold, 10);
        assert_eq!(config.thresholds, VoteThresholds::default());
    }

    #[test]
    fn test_builder_sets_vote_thresholds_and_jobs() {
        let config = AnalysisConfigBuilder::new()
            .vote_thresholds(7, 2)
            .max_parallel_jobs(3)
            .build();
        assert_eq!(config.thresholds, VoteThresholds { strong: 7, weak: 2 });
        assert_eq!(config.max_parallel_jobs, Some(3));
    }
}
