//! Black bar detection for a whole video.
//!
//! Probes the video length, samples frames from the middle third in parallel,
//! measures each frame's dark borders and votes the measurements down to one
//! crop per axis. Every sample is collected before voting starts.

use crate::config::{AnalysisConfig, FrameFailurePolicy};
use crate::error::{CoreError, CoreResult};
use crate::external::FrameProvider;
use crate::processing::aggregation::aggregate;
use crate::processing::border_scan::scan_borders;
use crate::processing::crop_types::{CropValues, HorizontalCrop, VerticalCrop};
use crate::processing::frame_selection::select_frames;
use crate::utils::format_duration;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag used to stop an analysis run.
///
/// Workers check it before every frame fetch, so a cancelled run stops
/// issuing new ffmpeg invocations; fetches already in progress finish first.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the run stop as soon as possible.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> CoreResult<()> {
        if self.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Border measurements taken from one sampled frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSample {
    /// Timeline position (seconds) the frame was taken from
    pub position: u64,
    pub horizontal: HorizontalCrop,
    pub vertical: VerticalCrop,
}

/// Outcome of a crop analysis run.
#[derive(Debug, Clone)]
pub struct CropAnalysis {
    /// The published crop, `-1` on an undetermined axis
    pub crop: CropValues,
    /// Letterbox decision, `None` when undetermined
    pub horizontal: Option<HorizontalCrop>,
    /// Pillarbox decision, `None` when undetermined
    pub vertical: Option<VerticalCrop>,
    /// Samples that contributed to the vote, in timeline order
    pub samples: Vec<FrameSample>,
    /// Number of positions that were selected for sampling
    pub requested_samples: usize,
    /// Probed duration of the video in seconds
    pub duration_secs: f64,
}

/// Analyzes `input_file` and returns the crop decision.
///
/// The video duration, truncated to whole seconds, is the timeline the sample
/// positions are chosen from. Frame failures are handled according to
/// `config.failure_policy`.
pub fn analyze_video<P: FrameProvider + ?Sized>(
    provider: &P,
    input_file: &Path,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> CoreResult<CropAnalysis> {
    config.validate()?;
    cancel.check()?;

    let duration_secs = provider.probe_duration(input_file)?;
    let total_positions = duration_secs as u64;
    log::debug!(
        "{}: duration {} ({} timeline positions)",
        input_file.display(),
        format_duration(duration_secs),
        total_positions
    );

    let positions = select_frames(total_positions, config.sample_count)?;
    log::debug!("Sampling crop at positions {:?}", positions);

    let samples = collect_samples(provider, input_file, &positions, config, cancel)?;
    let (horizontal, vertical) = decide(&samples, config, positions.len())?;
    let crop = CropValues::from_axes(horizontal, vertical);

    log::info!("Detected crop for {}: {}", input_file.display(), crop);
    if !crop.is_fully_determined() {
        log::warn!(
            "Borders of {} disagree across samples; undetermined sides are reported as -1",
            input_file.display()
        );
    }

    Ok(CropAnalysis {
        crop,
        horizontal,
        vertical,
        samples,
        requested_samples: positions.len(),
        duration_secs,
    })
}

/// Fetches and scans every position on a bounded worker pool.
fn collect_samples<P: FrameProvider + ?Sized>(
    provider: &P,
    input_file: &Path,
    positions: &[u64],
    config: &AnalysisConfig,
    cancel: &CancellationToken,
) -> CoreResult<Vec<FrameSample>> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = config.max_parallel_jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder
        .build()
        .map_err(|e| CoreError::OperationFailed(format!("Failed to build worker pool: {e}")))?;

    // Tripped by the first fatal sample so the remaining workers stop early.
    let abort = CancellationToken::new();

    let outcomes: Vec<CoreResult<Option<FrameSample>>> = pool.install(|| {
        positions
            .par_iter()
            .map(|&position| sample_position(provider, input_file, position, config, cancel, &abort))
            .collect()
    });

    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    let mut samples = Vec::with_capacity(outcomes.len());
    let mut first_error: Option<CoreError> = None;
    for outcome in outcomes {
        match outcome {
            Ok(Some(sample)) => samples.push(sample),
            Ok(None) => {}
            // Workers that stopped because of another failure report Cancelled.
            Err(CoreError::Cancelled) => {}
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None if abort.is_cancelled() => Err(CoreError::Cancelled),
        None => Ok(samples),
    }
}

/// Fetches and scans one position, applying the failure policy.
///
/// `Ok(None)` means the frame failed and was skipped.
fn sample_position<P: FrameProvider + ?Sized>(
    provider: &P,
    input_file: &Path,
    position: u64,
    config: &AnalysisConfig,
    cancel: &CancellationToken,
    abort: &CancellationToken,
) -> CoreResult<Option<FrameSample>> {
    cancel.check()?;
    abort.check()?;

    let policy = config.failure_policy;
    let mut result = fetch_and_scan(provider, input_file, position, config);

    if policy == FrameFailurePolicy::RetryThenSkip {
        if let Err(e) = &result {
            if e.is_frame_error() {
                log::warn!("Retrying sample at {}s after failure: {}", position, e);
                cancel.check()?;
                abort.check()?;
                result = fetch_and_scan(provider, input_file, position, config);
            }
        }
    }

    match result {
        Ok(sample) => Ok(Some(sample)),
        Err(e) if e.is_frame_error() && policy != FrameFailurePolicy::Abort => {
            log::warn!("Skipping sample at {}s: {}", position, e);
            Ok(None)
        }
        Err(e) => {
            abort.cancel();
            Err(e)
        }
    }
}

fn fetch_and_scan<P: FrameProvider + ?Sized>(
    provider: &P,
    input_file: &Path,
    position: u64,
    config: &AnalysisConfig,
) -> CoreResult<FrameSample> {
    let frame = provider.extract_frame(input_file, position as f64)?;
    let (horizontal, vertical) = scan_borders(&frame, config.darkness_threshold);
    log::trace!(
        "Sample at {}s: {:?} {:?}",
        position,
        horizontal,
        vertical
    );
    Ok(FrameSample {
        position,
        horizontal,
        vertical,
    })
}

/// Votes each axis independently, rescaling the thresholds if samples were lost.
fn decide(
    samples: &[FrameSample],
    config: &AnalysisConfig,
    requested: usize,
) -> CoreResult<(Option<HorizontalCrop>, Option<VerticalCrop>)> {
    if samples.is_empty() {
        return Err(CoreError::NoSamples);
    }

    let thresholds = config.thresholds.scaled_for(requested, samples.len());
    if samples.len() < requested {
        log::warn!(
            "Only {} of {} samples available; vote thresholds rescaled to strong={} weak={}",
            samples.len(),
            requested,
            thresholds.strong,
            thresholds.weak
        );
    }

    let horizontal: Vec<HorizontalCrop> = samples.iter().map(|s| s.horizontal).collect();
    let vertical: Vec<VerticalCrop> = samples.iter().map(|s| s.vertical).collect();

    Ok((
        aggregate(&horizontal, thresholds)?,
        aggregate(&vertical, thresholds)?,
    ))
}
