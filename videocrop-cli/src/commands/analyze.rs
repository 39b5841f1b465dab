//! Implementation of the crop analysis command.
//!
//! Validates the input path, checks that ffmpeg and ffprobe are installed,
//! turns the command-line overrides into an `AnalysisConfig` and hands the
//! file to videocrop-core.

use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};

use videocrop_core::{
    AnalysisConfig, AnalysisConfigBuilder, CancellationToken, CoreError, CropValues,
    FfmpegFrameProvider, FrameProvider, analyze_video, check_media_tools, format_duration,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log::{debug, info};

/// Resolves the input path and makes sure it names a regular file.
pub fn resolve_input(video_path: &Path) -> CliResult<PathBuf> {
    let input_path = video_path.canonicalize().map_err(|e| {
        CoreError::PathError(format!(
            "Invalid input path '{}': {}",
            video_path.display(),
            e
        ))
    })?;

    let metadata = fs::metadata(&input_path)
        .cli_with_context(|| format!("Failed to access input path '{}'", input_path.display()))?;

    if !metadata.is_file() {
        return Err(CoreError::PathError(format!(
            "Input path '{}' is not a file",
            input_path.display()
        )));
    }

    Ok(input_path)
}

/// Builds the analysis configuration from the command-line overrides.
pub fn build_config(args: &Cli) -> CliResult<AnalysisConfig> {
    let mut builder = AnalysisConfigBuilder::new().failure_policy(args.on_frame_error.into());
    if let Some(samples) = args.samples {
        builder = builder.sample_count(samples);
    }
    if let Some(threshold) = args.threshold {
        builder = builder.darkness_threshold(threshold);
    }
    if let Some(jobs) = args.jobs {
        let jobs = usize::try_from(jobs)
            .map_err(|_| CoreError::Config(format!("--jobs value {jobs} is too large")))?;
        builder = builder.max_parallel_jobs(jobs);
    }

    let config = builder.build();
    config.validate()?;
    Ok(config)
}

/// Analyzes `video_path` with ffmpeg and returns the detected crop.
pub fn run_analyze(video_path: &Path, args: &Cli) -> CliResult<CropValues> {
    let input_path = resolve_input(video_path)?;
    check_media_tools()?;
    let config = build_config(args)?;

    run_with_provider(&FfmpegFrameProvider::new(), &input_path, &config)
}

/// Runs the analysis against any frame provider.
pub fn run_with_provider<P: FrameProvider + ?Sized>(
    provider: &P,
    input_path: &Path,
    config: &AnalysisConfig,
) -> CliResult<CropValues> {
    debug!(
        "Analyzing {} with {} samples ({} on frame errors)",
        input_path.display(),
        config.sample_count,
        config.failure_policy
    );

    let start = Instant::now();
    let analysis = analyze_video(provider, input_path, config, &CancellationToken::new())?;

    info!(
        "Analyzed {} ({}) from {} of {} samples in {:.2}s",
        input_path.display(),
        format_duration(analysis.duration_secs),
        analysis.samples.len(),
        analysis.requested_samples,
        start.elapsed().as_secs_f64()
    );

    Ok(analysis.crop)
}
