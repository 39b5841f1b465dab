// ============================================================================
// videocrop-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Single Frame Extraction
//
// This module spawns ffmpeg to decode exactly one frame at a timestamp and
// hands it back as an RGB raster. Process spawning goes through traits so the
// extraction logic can be exercised without an ffmpeg binary.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - extract_frame: Seek, decode one frame as rgb48le, reduce it to an RgbImage

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, OutputVideoFrame};
use crate::processing::border_scan::normalize_raster;
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use std::path::Path;
use std::process::ExitStatus;

/// Pixel format requested from ffmpeg for extracted frames.
///
/// 16 bits per channel, so deep sources reach `normalize_raster` with their
/// full precision; 8-bit sources are widened losslessly.
pub const FRAME_PIX_FMT: &str = "rgb48le";

const BYTES_PER_PIXEL: usize = 6;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error(
                "ffmpeg (sidecar - get iter)",
                ExitStatus::default(),
                e.to_string(),
            )
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

// --- Frame Extraction ---

/// Builds the ffmpeg command that decodes one frame at `timestamp_secs` to
/// raw rgb48le on stdout.
pub fn build_extract_command(input_path: &Path, timestamp_secs: f64) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();

    // Input-side seek: fast, lands on the frame at or after the timestamp
    cmd.args(["-ss", &format!("{timestamp_secs:.2}")]);
    cmd.input(input_path.to_string_lossy().into_owned());
    cmd.args([
        "-an", "-sn",
        "-frames:v", "1",
        "-f", "rawvideo",
        "-pix_fmt", FRAME_PIX_FMT,
    ]);
    cmd.output("-");
    cmd
}

/// Extracts the frame at `timestamp_secs` as an 8-bit RGB raster.
pub fn extract_frame<S: FfmpegSpawner>(
    spawner: &S,
    input_path: &Path,
    timestamp_secs: f64,
) -> CoreResult<RgbImage> {
    log::trace!(
        "Extracting frame at {:.2}s from {}",
        timestamp_secs,
        input_path.display()
    );

    let extraction_error = |message: String| CoreError::FrameExtraction {
        timestamp: timestamp_secs,
        message,
    };

    let cmd = build_extract_command(input_path, timestamp_secs);
    let mut process = spawner
        .spawn(cmd)
        .map_err(|e| extraction_error(e.to_string()))?;

    let mut frame: Option<OutputVideoFrame> = None;
    let mut errors: Vec<String> = Vec::new();

    process
        .handle_events(|event| {
            match event {
                FfmpegEvent::OutputFrame(output) if frame.is_none() => frame = Some(output),
                FfmpegEvent::Error(message)
                | FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message) => {
                    log::debug!("ffmpeg: {}", message);
                    errors.push(message);
                }
                _ => {}
            }
            Ok(())
        })
        .map_err(|e| extraction_error(e.to_string()))?;

    let status = process.wait().map_err(|e| extraction_error(e.to_string()))?;
    if !status.success() {
        return Err(extraction_error(format!(
            "ffmpeg exited with {}: {}",
            status,
            errors.join("; ")
        )));
    }

    let frame = frame.ok_or_else(|| {
        let detail = if errors.is_empty() {
            "no frame decoded (timestamp past end of stream?)".to_string()
        } else {
            errors.join("; ")
        };
        extraction_error(detail)
    })?;

    frame_to_raster(frame, timestamp_secs)
}

/// Converts an ffmpeg raw rgb48le output frame into an 8-bit `RgbImage`.
fn frame_to_raster(frame: OutputVideoFrame, timestamp_secs: f64) -> CoreResult<RgbImage> {
    let decode_error = |message: String| CoreError::FrameDecode {
        timestamp: timestamp_secs,
        message,
    };

    if frame.pix_fmt != FRAME_PIX_FMT {
        return Err(decode_error(format!(
            "unexpected pixel format '{}', expected '{}'",
            frame.pix_fmt, FRAME_PIX_FMT
        )));
    }

    let (width, height) = (frame.width, frame.height);
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if frame.data.len() != expected {
        return Err(decode_error(format!(
            "{} bytes do not form a {width}x{height} {FRAME_PIX_FMT} frame",
            frame.data.len()
        )));
    }

    let samples: Vec<u16> = frame
        .data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let wide = ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(width, height, samples)
        .ok_or_else(|| decode_error(format!("cannot build a {width}x{height} raster")))?;

    Ok(normalize_raster(&DynamicImage::ImageRgb16(wide)))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::external::mocks::MockFfmpegSpawner;
    use std::path::PathBuf;

    fn output_frame(width: u32, height: u32, pix_fmt: &str, data: Vec<u8>) -> FfmpegEvent {
        FfmpegEvent::OutputFrame(OutputVideoFrame {
            width,
            height,
            pix_fmt: pix_fmt.to_string(),
            output_index: 0,
            data,
            frame_num: 0,
            timestamp: 0.0,
        })
    }

    #[test]
    fn test_extract_command_args() {
        let mut cmd = build_extract_command(&PathBuf::from("/videos/movie.mkv"), 1234.5);
        let args: Vec<String> = cmd
            .as_inner()
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        let joined = args.join(" ");
        assert!(joined.contains("-ss 1234.50 -i /videos/movie.mkv"), "{joined}");
        assert!(joined.contains("-frames:v 1"), "{joined}");
        assert!(joined.contains("-pix_fmt rgb48le"), "{joined}");
        assert_eq!(args.last().map(String::as_str), Some("-"));
    }

    /// Encodes 16-bit RGB pixels as an rgb48le byte stream.
    fn rgb48le(pixels: &[[u16; 3]]) -> Vec<u8> {
        pixels
            .iter()
            .flat_map(|px| px.iter().flat_map(|c| c.to_le_bytes()))
            .collect()
    }

    #[test]
    fn test_extract_frame_builds_raster() {
        let spawner = MockFfmpegSpawner::new();
        let mut pixels = vec![[0u16; 3]; 4 * 2];
        // An 8-bit source widened by ffmpeg repeats the byte.
        pixels[5] = [200 * 257, 100 * 257, 50 * 257];
        spawner.add_success_expectation(
            "rawvideo",
            vec![output_frame(4, 2, FRAME_PIX_FMT, rgb48le(&pixels))],
        );

        let image = extract_frame(&spawner, &PathBuf::from("in.mkv"), 10.0).unwrap();
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.get_pixel(1, 1).0, [200, 100, 50]);
        assert_eq!(spawner.get_received_calls().len(), 1);
    }

    #[test]
    fn test_deep_frame_keeps_most_significant_bits() {
        let spawner = MockFfmpegSpawner::new();
        // 0x0AFF would round to 11 but truncates to 10, which is still dark.
        let pixels = [[0x0AFF, 0x0AFF, 0x0AFF], [0x0B00, 0x0000, 0x0000]];
        spawner.add_success_expectation(
            "rawvideo",
            vec![output_frame(2, 1, FRAME_PIX_FMT, rgb48le(&pixels))],
        );

        let image = extract_frame(&spawner, &PathBuf::from("in.mkv"), 4.0).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0x0A, 0x0A, 0x0A]);
        assert_eq!(image.get_pixel(1, 0).0, [0x0B, 0x00, 0x00]);
    }

    #[test]
    fn test_short_buffer_is_decode_error() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation(
            "rawvideo",
            vec![output_frame(4, 2, FRAME_PIX_FMT, vec![0; 4 * 2 * 3])],
        );

        let result = extract_frame(&spawner, &PathBuf::from("in.mkv"), 3.0);
        assert!(matches!(result, Err(CoreError::FrameDecode { .. })));
    }

    #[test]
    fn test_wrong_pixel_format_is_decode_error() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("rawvideo", vec![output_frame(2, 2, "rgb24", vec![0; 12])]);

        let result = extract_frame(&spawner, &PathBuf::from("in.mkv"), 3.0);
        assert!(matches!(result, Err(CoreError::FrameDecode { .. })));
    }

    #[test]
    fn test_missing_frame_is_extraction_error() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation(
            "rawvideo",
            vec![FfmpegEvent::Log(LogLevel::Error, "Invalid data found".to_string())],
        );

        match extract_frame(&spawner, &PathBuf::from("in.mkv"), 7.0) {
            Err(CoreError::FrameExtraction { timestamp, message }) => {
                assert_eq!(timestamp, 7.0);
                assert!(message.contains("Invalid data found"));
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn test_nonzero_exit_is_extraction_error() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_exit_error_expectation("rawvideo", Vec::new(), 1 << 8);

        let result = extract_frame(&spawner, &PathBuf::from("in.mkv"), 1.0);
        assert!(matches!(result, Err(CoreError::FrameExtraction { .. })));
    }

    #[test]
    fn test_spawn_failure_is_extraction_error() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_spawn_error_expectation(
            "rawvideo",
            CoreError::DependencyNotFound("ffmpeg".to_string()),
        );

        let result = extract_frame(&spawner, &PathBuf::from("in.mkv"), 1.0);
        assert!(matches!(result, Err(CoreError::FrameExtraction { .. })));
    }
}
