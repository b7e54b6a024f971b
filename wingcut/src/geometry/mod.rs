//! Pure geometric and raster analysis routines the carving engine is built on.

mod contour;
mod interpolate;
mod labeling;
mod symmetry;

pub use contour::{fill_connected_region, fill_contour, trace_outer_contour, FilledRegion};
pub use interpolate::interpolate_track;
pub use labeling::{
    centroid_distance_tiebreak, nth_largest_component, ComponentMetric, ComponentStats,
    Connectivity, LabelMap,
};
pub use symmetry::{find_symmetry_line, mirror_distance, refine_symmetry_line};

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Vertical bilateral symmetry axis `(x, y0)-(x, y1)`.
///
/// Serialized as `[[x, y0], [x, y1]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[[i32; 2]; 2]", into = "[[i32; 2]; 2]")]
pub struct MirrorLine {
    pub x: i32,
    pub y0: i32,
    pub y1: i32,
}

impl MirrorLine {
    pub fn vertical(x: i32, height: usize) -> Self {
        Self {
            x,
            y0: 0,
            y1: height as i32,
        }
    }

    /// Moves the line by `step` columns, keeping it inside `[0, width)`.
    pub fn shifted(&self, step: i32, width: usize) -> Self {
        let max_x = (width as i32 - 1).max(0);
        Self {
            x: (self.x + step).clamp(0, max_x),
            ..*self
        }
    }

    /// Column of the left body boundary for a half body width of `shift`.
    ///
    /// Saturates instead of wrapping, so an oversized shift always lands
    /// outside any canvas.
    pub fn left_boundary(&self, shift: u32) -> i32 {
        self.x.saturating_sub(i32::try_from(shift).unwrap_or(i32::MAX))
    }

    /// Column of the right body boundary for a half body width of `shift`.
    pub fn right_boundary(&self, shift: u32) -> i32 {
        self.x.saturating_add(i32::try_from(shift).unwrap_or(i32::MAX))
    }

    /// Reflects `point` across the line.
    pub fn reflect(&self, point: IVec2) -> IVec2 {
        IVec2::new(2 * self.x - point.x, point.y)
    }
}

impl From<[[i32; 2]; 2]> for MirrorLine {
    fn from([[x, y0], [_, y1]]: [[i32; 2]; 2]) -> Self {
        Self { x, y0, y1 }
    }
}

impl From<MirrorLine> for [[i32; 2]; 2] {
    fn from(line: MirrorLine) -> Self {
        [[line.x, line.y0], [line.x, line.y1]]
    }
}
