// videocrop-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

#![cfg(unix)]

use super::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner};
use crate::error::CoreResult;
use crate::error::CoreError;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::os::unix::process::ExitStatusExt; // For ExitStatus::from_raw
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};

/// Mock implementation of FfmpegProcess.
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events_to_emit.drain(..) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawn consumes the first expectation whose pattern appears in one of
/// the command arguments.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Arc<Mutex<Vec<MockFfmpegExpectation>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_expectation(&self, arg_pattern: &str, result: CoreResult<MockFfmpegProcess>) {
        self.expectations.lock().unwrap().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
        });
    }

    pub fn add_success_expectation(&self, arg_pattern: &str, events: Vec<FfmpegEvent>) {
        let process = MockFfmpegProcess {
            events_to_emit: events,
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process));
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error));
    }

    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        raw_status: i32,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: events,
            exit_status: ExitStatus::from_raw(raw_status),
        };
        self.add_expectation(arg_pattern, Ok(process));
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.lock().unwrap().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .as_inner()
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.lock().unwrap().push(args.clone());

        let mut expectations = self.expectations.lock().unwrap();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        match found_index {
            Some(index) => {
                let expectation = expectations.remove(index);
                log::info!(
                    "MockFfmpegSpawner: Matched expectation with pattern '{}'",
                    expectation.arg_pattern
                );
                expectation.result
            }
            None => {
                log::error!("MockFfmpegSpawner: No expectation matched args: {:?}", args);
                Err(CoreError::OperationFailed(format!(
                    "MockFfmpegSpawner: unexpected ffmpeg call: {}",
                    args.join(" ")
                )))
            }
        }
    }
}
