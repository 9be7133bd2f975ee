use serde::{Deserialize, Serialize};
use tiltcast_common::{Angle, CELL_SIZE, atan2, cos};

use crate::raycast::RayResult;

/// `(screen_height << PROJECTION_SHIFT) / corrected_distance` is the wall
/// column height. Folds wall height, cell size, zoom and the trig ratio of the
/// corrected distance into one shift.
pub const PROJECTION_SHIFT: u32 = 21;

/// Horizontal half-spread of the view plane, in sub-units at `VIEW_DEPTH`.
const VIEW_HALF_SPAN: i32 = CELL_SIZE / 2;
/// Distance from the eye to the view plane used for column angles.
const VIEW_DEPTH: i32 = CELL_SIZE;

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::PEBBLE
    }
}

impl Viewport {
    /// 144×168, the reference display.
    pub const PEBBLE: Self = Self {
        width: 144,
        height: 168,
    };

    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Row where both half-columns start.
    pub const fn midline(&self) -> usize {
        self.height / 2
    }

    /// Tallest half-column that still fits on screen.
    pub const fn max_column_height(&self) -> usize {
        self.height / 2
    }

    /// Angle between the view centre and screen column `x`.
    pub fn column_angle(&self, x: usize) -> Angle {
        let along = (VIEW_DEPTH as usize * x / self.width.max(1)) as i32 - VIEW_HALF_SPAN;
        atan2(along, VIEW_DEPTH)
    }
}

/// On-screen extent of one wall column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSpan {
    /// Rows drawn on each side of the midline.
    pub height: usize,
    /// Perpendicular distance, `distance · cos(offset)` (still scaled by the trig ratio).
    pub corrected: i64,
}

impl ColumnSpan {
    pub const EMPTY: Self = Self {
        height: 0,
        corrected: 0,
    };
}

/// Turn a ray into a column span.
///
/// The ray's radial distance is multiplied by the cosine of its angle from the
/// view centre, giving the perpendicular distance that keeps straight walls
/// straight. Misses, and rays at or behind the view plane, draw nothing.
pub fn project(ray: RayResult, offset: Angle, viewport: Viewport) -> ColumnSpan {
    let RayResult::Hit { distance, .. } = ray else {
        return ColumnSpan::EMPTY;
    };
    let corrected = i64::from(distance) * i64::from(cos(offset));
    if corrected <= 0 {
        return ColumnSpan::EMPTY;
    }
    let height = ((viewport.height as i64) << PROJECTION_SHIFT) / corrected;
    ColumnSpan {
        height: (height as usize).min(viewport.max_column_height()),
        corrected,
    }
}
