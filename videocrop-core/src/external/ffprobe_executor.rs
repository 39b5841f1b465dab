//! FFprobe integration for reading the duration of a video.
//!
//! The duration in seconds is the timeline length the frame selector works
//! on: one timeline position per second of video.
use crate::error::{CoreError, CoreResult, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Gets the container duration of a video file in seconds.
pub fn probe_duration(input_path: &Path) -> CoreResult<f64> {
    log::debug!(
        "Running ffprobe (via crate) for duration on: {}",
        input_path.display()
    );
    match ffprobe(input_path) {
        Ok(metadata) => {
            let raw = metadata.format.duration.as_deref().ok_or_else(|| {
                CoreError::DurationParse(format!(
                    "ffprobe reported no duration for {}",
                    input_path.display()
                ))
            })?;
            parse_duration(raw)
        }
        Err(err) => {
            log::error!("ffprobe failed for duration on {}: {:?}", input_path.display(), err);
            Err(map_ffprobe_error(err, input_path))
        }
    }
}

/// Parses ffprobe's textual duration (e.g. `"5400.042000"`).
pub fn parse_duration(raw: &str) -> CoreResult<f64> {
    let duration = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| CoreError::DurationParse(format!("'{raw}': {e}")))?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(CoreError::DurationParse(format!(
            "'{raw}' is not a valid duration"
        )));
    }
    Ok(duration)
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            CoreError::Probe(format!(
                "{} ({}): {}",
                input_path.display(),
                output.status,
                stderr.trim()
            ))
        }
        FfProbeError::Deserialize(err) => CoreError::Probe(format!(
            "{}: unreadable ffprobe output: {err}",
            input_path.display()
        )),
        _ => CoreError::Probe(format!(
            "{}: unknown ffprobe error: {err:?}",
            input_path.display()
        )),
    }
}
