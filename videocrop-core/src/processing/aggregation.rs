//! Majority voting over per-frame crop measurements.
//!
//! A clear supermajority of identical measurements is trusted outright. When
//! there is none, every measurement that was seen at least a few times
//! contributes, and each side takes the largest value among them. Dark scenes
//! can mimic borders in a few frames, which is why single sightings never
//! count.

use crate::error::{CoreError, CoreResult};
use crate::processing::crop_types::CropPair;
use std::collections::HashMap;

/// Default count a pair must strictly exceed to be adopted outright.
pub const DEFAULT_STRONG_THRESHOLD: usize = 5;

/// Default count a pair must reach to contribute to the fallback maxima.
pub const DEFAULT_WEAK_THRESHOLD: usize = 3;

/// Rescaled thresholds never accept fewer sightings than this.
const MIN_REPEATED_SIGHTINGS: usize = 2;

/// Vote counts used by [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteThresholds {
    /// A pair seen more than this many times wins immediately.
    pub strong: usize,
    /// A pair seen at least this many times joins the fallback.
    pub weak: usize,
}

impl Default for VoteThresholds {
    fn default() -> Self {
        Self {
            strong: DEFAULT_STRONG_THRESHOLD,
            weak: DEFAULT_WEAK_THRESHOLD,
        }
    }
}

impl VoteThresholds {
    /// Rescales the thresholds for a run that ended with `actual` samples
    /// instead of the `expected` ones they were tuned for.
    ///
    /// A measurement still has to repeat to count: the weak threshold does
    /// not drop below two sightings (or the configured weak value, if that is
    /// lower), and the strong threshold never drops below the weak one.
    #[must_use]
    pub fn scaled_for(&self, expected: usize, actual: usize) -> Self {
        if expected == 0 || actual >= expected {
            return *self;
        }
        let weak_floor = self.weak.min(MIN_REPEATED_SIGHTINGS);
        let weak = (self.weak * actual / expected).max(weak_floor);
        Self {
            strong: (self.strong * actual / expected).max(weak),
            weak,
        }
    }
}

/// Reduces a sample set to one crop decision for its axis.
///
/// Returns `Ok(None)` when no measurement repeated often enough to be
/// trusted. When several pairs clear the strong threshold, the one seen most
/// often wins, and among equally frequent ones the smallest pair.
pub fn aggregate<T: CropPair>(samples: &[T], thresholds: VoteThresholds) -> CoreResult<Option<T>> {
    if samples.is_empty() {
        return Err(CoreError::NoSamples);
    }

    let counts = count_occurrences(samples);

    let strong_winner = counts
        .iter()
        .filter(|&(_, &count)| count > thresholds.strong)
        .min_by(|(a_pair, a_count), (b_pair, b_count)| {
            b_count.cmp(a_count).then_with(|| a_pair.cmp(b_pair))
        })
        .map(|(&pair, &count)| (pair, count));

    if let Some((pair, count)) = strong_winner {
        log::debug!("Strong majority for {:?} ({} of {} samples)", pair, count, samples.len());
        return Ok(Some(pair));
    }

    let fallback = counts
        .iter()
        .filter(|&(_, &count)| count >= thresholds.weak)
        .map(|(pair, _)| pair.components())
        .reduce(|(lead, trail), (l, t)| (lead.max(l), trail.max(t)))
        .map(|(leading, trailing)| T::from_components(leading, trailing));

    match fallback {
        Some(pair) => log::debug!(
            "No strong majority among {} samples, using per-side maxima {:?}",
            samples.len(),
            pair
        ),
        None => log::debug!(
            "No measurement repeated {} times among {} samples, crop undetermined",
            thresholds.weak,
            samples.len()
        ),
    }

    Ok(fallback)
}

fn count_occurrences<T: CropPair>(samples: &[T]) -> HashMap<T, usize> {
    let mut counts = HashMap::new();
    for sample in samples {
        *counts.entry(*sample).or_insert(0) += 1;
    }
    counts
}
