//! Type definitions for crop measurements and the published crop result.

use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// Wire value for an axis whose crop could not be determined.
pub const UNDETERMINED: i64 = -1;

/// Rows to remove from the top and bottom of a frame (letterbox).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HorizontalCrop {
    pub top: u32,
    pub bottom: u32,
}

/// Columns to remove from the left and right of a frame (pillarbox).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerticalCrop {
    pub left: u32,
    pub right: u32,
}

/// A two-sided crop measurement along one axis.
///
/// Both crop shapes are aggregated by the same voting algorithm, which only
/// needs to count whole pairs and take per-component maxima. The `Ord` bound
/// provides the deterministic tie-break between equally strong pairs.
pub trait CropPair: Copy + Eq + Hash + Ord + fmt::Debug {
    /// Returns the (leading, trailing) edge values.
    fn components(&self) -> (u32, u32);

    /// Builds a pair from (leading, trailing) edge values.
    fn from_components(leading: u32, trailing: u32) -> Self;
}

impl CropPair for HorizontalCrop {
    fn components(&self) -> (u32, u32) {
        (self.top, self.bottom)
    }

    fn from_components(leading: u32, trailing: u32) -> Self {
        Self {
            top: leading,
            bottom: trailing,
        }
    }
}

impl CropPair for VerticalCrop {
    fn components(&self) -> (u32, u32) {
        (self.left, self.right)
    }

    fn from_components(leading: u32, trailing: u32) -> Self {
        Self {
            left: leading,
            right: trailing,
        }
    }
}

/// The published crop result.
///
/// Serializes to `{"top":T,"bottom":B,"left":L,"right":R}`. An axis that the
/// aggregator left undetermined carries `-1` on both of its sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropValues {
    pub top: i64,
    pub bottom: i64,
    pub left: i64,
    pub right: i64,
}

impl CropValues {
    /// Combines the per-axis aggregation results into the wire representation.
    #[must_use]
    pub fn from_axes(horizontal: Option<HorizontalCrop>, vertical: Option<VerticalCrop>) -> Self {
        let (top, bottom) = horizontal
            .map(|h| (i64::from(h.top), i64::from(h.bottom)))
            .unwrap_or((UNDETERMINED, UNDETERMINED));
        let (left, right) = vertical
            .map(|v| (i64::from(v.left), i64::from(v.right)))
            .unwrap_or((UNDETERMINED, UNDETERMINED));
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// True when both axes carry a measured crop.
    #[must_use]
    pub fn is_fully_determined(&self) -> bool {
        self.top != UNDETERMINED && self.left != UNDETERMINED
    }

    /// Serializes the result as the single-line JSON object printed by the CLI.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for CropValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "top={} bottom={} left={} right={}",
            self.top, self.bottom, self.left, self.right
        )
    }
}
