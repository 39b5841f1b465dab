// ============================================================================
// videocrop-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types and Utilities
//
// This module defines the error type shared by every stage of a crop
// analysis run: probing, frame selection, frame extraction, aggregation and
// result serialization.
//
// KEY COMPONENTS:
// - CoreError: Enum of every failure a run can produce
// - CoreResult: Type alias for Result<T, CoreError>
// - Helper functions for external command failures

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the crop analysis engine and its external collaborators.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid sample parameters: {sample_count} samples requested from {total_frames} timeline positions")]
    InvalidSampleParameters { total_frames: u64, sample_count: u64 },

    #[error("Failed to probe video: {0}")]
    Probe(String),

    #[error("Failed to parse duration: {0}")]
    DurationParse(String),

    #[error("Failed to extract frame at {timestamp}s: {message}")]
    FrameExtraction { timestamp: f64, message: String },

    #[error("Failed to decode frame at {timestamp}s: {message}")]
    FrameDecode { timestamp: f64, message: String },

    #[error("No frame samples available for aggregation")]
    NoSamples,

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Required external command '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Command '{command}' failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Error marshalling result to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for videocrop-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

/// Builds a `CommandFailed` error from an exit status and captured stderr.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Builds a `CommandWait` error for a command whose exit could not be collected.
pub fn command_wait_error(command: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), err)
}

impl CoreError {
    /// True for failures tied to a single sampled frame, which the
    /// orchestrator may retry or skip depending on the failure policy.
    #[must_use]
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            CoreError::FrameExtraction { .. } | CoreError::FrameDecode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_errors_are_classified() {
        let extraction = CoreError::FrameExtraction {
            timestamp: 12.0,
            message: "ffmpeg exited early".to_string(),
        };
        let decode = CoreError::FrameDecode {
            timestamp: 12.0,
            message: "short buffer".to_string(),
        };
        assert!(extraction.is_frame_error());
        assert!(decode.is_frame_error());
        assert!(!CoreError::NoSamples.is_frame_error());
        assert!(!CoreError::Probe("bad file".to_string()).is_frame_error());
    }

    #[test]
    fn test_invalid_parameters_message() {
        let err = CoreError::InvalidSampleParameters {
            total_frames: 4,
            sample_count: 15,
        };
        assert_eq!(
            err.to_string(),
            "Invalid sample parameters: 15 samples requested from 4 timeline positions"
        );
    }
}
