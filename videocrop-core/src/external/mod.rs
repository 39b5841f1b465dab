// ============================================================================
// videocrop-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates the media toolkit the analysis engine depends on:
// reading a video's duration and decoding single frames. The engine only sees
// the FrameProvider trait, so tests can feed it synthetic frames.
//
// KEY COMPONENTS:
// - FrameProvider: Trait for probing duration and extracting frames
// - FfmpegFrameProvider: Implementation backed by ffprobe and ffmpeg-sidecar
// - Dependency checking functions

use crate::error::{CoreError, CoreResult};

use image::RgbImage;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Contains the ffprobe duration query
pub mod ffprobe_executor;

#[cfg(test)]
pub(crate) mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner, extract_frame};
pub use ffprobe_executor::probe_duration;

// ============================================================================
// FRAME PROVIDER
// ============================================================================

/// Source of video durations and decoded frames.
///
/// Implementations must be shareable across the worker threads that fetch
/// frames concurrently.
pub trait FrameProvider: Sync {
    /// Returns the total duration of the video in seconds.
    fn probe_duration(&self, path: &Path) -> CoreResult<f64>;

    /// Decodes the frame shown at `timestamp_secs` as an 8-bit RGB raster,
    /// keeping the most-significant 8 bits of deeper channels.
    fn extract_frame(&self, path: &Path, timestamp_secs: f64) -> CoreResult<RgbImage>;
}

/// Frame provider that shells out to ffprobe and ffmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfmpegFrameProvider<S = SidecarSpawner> {
    spawner: S,
}

impl FfmpegFrameProvider<SidecarSpawner> {
    /// Creates a provider that runs the ffmpeg binary found on `PATH`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: FfmpegSpawner> FfmpegFrameProvider<S> {
    /// Creates a provider that spawns ffmpeg through `spawner`.
    pub fn with_spawner(spawner: S) -> Self {
        Self { spawner }
    }
}

impl<S: FfmpegSpawner + Sync> FrameProvider for FfmpegFrameProvider<S> {
    fn probe_duration(&self, path: &Path) -> CoreResult<f64> {
        ffprobe_executor::probe_duration(path)
    }

    fn extract_frame(&self, path: &Path, timestamp_secs: f64) -> CoreResult<RgbImage> {
        ffmpeg_executor::extract_frame(&self.spawner, path, timestamp_secs)
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs the command with `-version` and discards its output; only a missing
/// binary or a failure to start it is an error.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

/// Checks that both ffprobe and ffmpeg are available.
pub fn check_media_tools() -> CoreResult<()> {
    check_dependency("ffprobe")?;
    check_dependency("ffmpeg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_is_reported() {
        let result = check_dependency("videocrop-definitely-not-a-real-binary");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(name)) if name.starts_with("videocrop-")));
    }

    #[cfg(unix)]
    #[test]
    fn test_ffmpeg_provider_uses_spawner() {
        use crate::external::mocks::MockFfmpegSpawner;
        use ffmpeg_sidecar::event::{FfmpegEvent, OutputVideoFrame};
        use std::path::PathBuf;

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation(
            "-ss",
            vec![FfmpegEvent::OutputFrame(OutputVideoFrame {
                width: 2,
                height: 2,
                pix_fmt: "rgb48le".to_string(),
                output_index: 0,
                data: vec![0; 24],
                frame_num: 0,
                timestamp: 0.0,
            })],
        );
        let provider = FfmpegFrameProvider::with_spawner(spawner.clone());

        let frame = provider.extract_frame(&PathBuf::from("clip.mkv"), 42.0).unwrap();
        assert_eq!(frame.dimensions(), (2, 2));
        let calls = spawner.get_received_calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].iter().any(|arg| arg == "42.00"));
    }
}
