//! Selection of the timeline positions to sample.
//!
//! Samples are restricted to the middle third of the timeline so that opening
//! and closing credits, intro logos and fades to black do not distort the
//! border statistics.

use crate::error::{CoreError, CoreResult};

/// Returns `sample_count` positions spread across the middle third of a
/// timeline of `total_frames` positions.
///
/// The first position is the start of the middle third and the last is its
/// end; the ones in between are evenly spaced from the start. When only one
/// sample is requested it lands on the end of the middle third.
pub fn select_frames(total_frames: u64, sample_count: u64) -> CoreResult<Vec<u64>> {
    if total_frames == 0 || sample_count == 0 || sample_count > total_frames {
        return Err(CoreError::InvalidSampleParameters {
            total_frames,
            sample_count,
        });
    }

    let part_size = total_frames / 3;
    let gap_size = part_size / sample_count;
    let last = (sample_count - 1) as usize;

    let mut frames: Vec<u64> = (0..sample_count)
        .map(|i| part_size + i * gap_size)
        .collect();
    frames[last] = part_size * 2;

    log::trace!(
        "Selected {} sample positions from {} (part size {}, gap {})",
        frames.len(),
        total_frames,
        part_size,
        gap_size
    );

    Ok(frames)
}
