//! Dark border measurement for a single decoded frame.
//!
//! A row (or column) counts as border when every pixel in it is dark, meaning
//! all three colour channels are at or below the darkness threshold. Rows are
//! scanned top to bottom and columns left to right, each axis independently.
//!
//! Two behaviours are load-bearing for the aggregation thresholds and are kept
//! as-is:
//! - a dark run that is closed by content reports its length minus one (the
//!   row touching the content is treated as a transition row), while a run
//!   that reaches the far edge reports its full length;
//! - every closed run overwrites the leading value, so the last dark run
//!   before content wins over the first.

use crate::processing::crop_types::{HorizontalCrop, VerticalCrop};
use image::{DynamicImage, Rgb, RgbImage};

/// Default per-channel brightness ceiling for a pixel to count as dark.
pub const DEFAULT_DARKNESS_THRESHOLD: u8 = 10;

/// Measures the dark borders of one frame.
///
/// Returns the letterbox measurement (top/bottom rows) and the pillarbox
/// measurement (left/right columns).
#[must_use]
pub fn scan_borders(image: &RgbImage, threshold: u8) -> (HorizontalCrop, VerticalCrop) {
    let (width, height) = image.dimensions();

    let (top, bottom) = scan_axis(height, |y| {
        (0..width).all(|x| is_dark(image.get_pixel(x, y), threshold))
    });
    let (left, right) = scan_axis(width, |x| {
        (0..height).all(|y| is_dark(image.get_pixel(x, y), threshold))
    });

    log::trace!(
        "Scanned {}x{} frame: top={} bottom={} left={} right={}",
        width,
        height,
        top,
        bottom,
        left,
        right
    );

    (HorizontalCrop { top, bottom }, VerticalCrop { left, right })
}

/// Converts any decoded image into an 8-bit RGB raster.
///
/// Deeper channels keep their most-significant 8 bits, so a 16-bit value of
/// `0x0AFF` becomes `0x0A` rather than being rounded. Float channels are
/// first quantized to 16 bits and then truncated the same way.
#[must_use]
pub fn normalize_raster(image: &DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgba8(_) => {
            image.to_rgb8()
        }
        deep => {
            let wide = deep.to_rgb16();
            RgbImage::from_fn(wide.width(), wide.height(), |x, y| {
                let [r, g, b] = wide.get_pixel(x, y).0;
                Rgb([(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8])
            })
        }
    }
}

fn is_dark(pixel: &Rgb<u8>, threshold: u8) -> bool {
    pixel.0.iter().all(|&channel| channel <= threshold)
}

/// Walks `len` lines in order and returns the (leading, trailing) border
/// widths for the lines that `line_is_dark` reports as fully dark.
fn scan_axis(len: u32, mut line_is_dark: impl FnMut(u32) -> bool) -> (u32, u32) {
    let mut leading = 0;
    let mut run = 0;

    for index in 0..len {
        if line_is_dark(index) {
            run += 1;
        } else {
            if run > 0 {
                leading = run - 1;
            }
            run = 0;
        }
    }

    // A run still open after the last line touches the far edge.
    (leading, run)
}
