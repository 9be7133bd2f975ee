use tiltcast_common::{Angle, CELL_MASK, CELL_SHIFT, CELL_SIZE, Position, TRIG_MAX_RATIO, cos, sin};
use tiltcast_kernel::{Cell, GridMap};

/// Outcome of one ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayResult {
    /// The ray crossed into a solid cell.
    Hit {
        /// Length travelled, in sub-units.
        distance: u32,
        /// Position along the struck wall face, `0..CELL_SIZE`.
        offset: u8,
    },
    /// The ray left the map and is heading further out; it can never hit.
    Miss,
}

impl RayResult {
    pub fn distance(self) -> Option<u32> {
        match self {
            Self::Hit { distance, .. } => Some(distance),
            Self::Miss => None,
        }
    }

    pub fn is_hit(self) -> bool {
        matches!(self, Self::Hit { .. })
    }
}

/// Cast a ray from `origin` along `angle` and report the first wall it enters.
///
/// The ray jumps from grid line to grid line rather than stepping cell by cell.
/// Each iteration finds the distance to the next vertical and the next
/// horizontal grid line in the direction of travel, compares `|dx·sin|` with
/// `|dy·cos|` to see which comes first, and moves exactly onto it. Moving in
/// the negative direction lands on the last sub-unit of the previous cell, so
/// the landing point always lies inside the cell being entered.
///
/// Out-of-range cells are not solid here either; instead the ray is abandoned
/// once it is outside the map on some side and still moving away from it.
pub fn cast_ray(map: &GridMap, origin: Position, angle: Angle) -> RayResult {
    let (sin, cos) = (i64::from(sin(angle)), i64::from(cos(angle)));
    let (start_x, start_y) = (i64::from(origin.x), i64::from(origin.y));
    let extent = i64::from(map.extent());
    let (cell, mask, ratio) = (
        i64::from(CELL_SIZE),
        i64::from(CELL_MASK),
        i64::from(TRIG_MAX_RATIO),
    );

    // Grid line ahead within the current cell, per axis.
    let ny = if sin > 0 { cell } else { -1 };
    let nx = if cos > 0 { cell } else { -1 };

    let (mut rx, mut ry) = (start_x, start_y);
    loop {
        let dy = ny - (ry & mask);
        let dx = nx - (rx & mask);

        // dx and dy are never zero. If cos == 0 the comparison is
        // `|dx·sin| < 0`, which fails, so only the sin divisor is used; if
        // sin == 0 it is `0 < |dy·cos|`, which holds, so only cos is used.
        let (distance, offset) = if (dx * sin).abs() < (dy * cos).abs() {
            rx += dx;
            ry += dx * sin / cos;
            let offset = if cos > 0 { mask - (ry & mask) } else { ry & mask };
            ((rx - start_x) * ratio / cos, offset)
        } else {
            rx += dy * cos / sin;
            ry += dy;
            let offset = if sin > 0 { rx & mask } else { mask - (rx & mask) };
            ((ry - start_y) * ratio / sin, offset)
        };

        if rx >= 0 && ry >= 0 && rx < extent && ry < extent {
            let hit = map
                .cell((rx >> CELL_SHIFT) as i32, (ry >> CELL_SHIFT) as i32)
                .is_some_and(Cell::is_solid);
            if hit {
                return RayResult::Hit {
                    distance: distance.clamp(0, i64::from(u32::MAX)) as u32,
                    offset: offset as u8,
                };
            }
        } else if (sin <= 0 && ry < 0)
            || (sin >= 0 && ry >= extent)
            || (cos <= 0 && rx < 0)
            || (cos >= 0 && rx >= extent)
        {
            return RayResult::Miss;
        }
    }
}
