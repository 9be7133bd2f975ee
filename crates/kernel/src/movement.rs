use serde::{Deserialize, Serialize};
use tiltcast_common::{Angle, Position, TRIG_MAX_RATIO, cos, sin};
use tiltcast_input::TiltSample;

use crate::map::{Cell, GridMap};

/// Player pose: sub-unit position and facing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub facing: Angle,
}

impl Player {
    pub const fn new(position: Position, facing: Angle) -> Self {
        Self { position, facing }
    }

    /// Two cells outside the map's top edge, horizontally centred, looking
    /// along +y into the map.
    pub fn at_entrance(map_size: usize) -> Self {
        Self {
            position: Position::new(32 * map_size as i32, -128),
            facing: Angle::QUARTER_TURN,
        }
    }
}

/// Tilt-to-motion scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Forward tilt is shifted right by this before becoming a step length.
    pub walk_shift: u32,
    /// Turn tilt is shifted left by this before being added to the facing.
    pub turn_shift: u32,
    /// Walk through walls.
    pub noclip: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_shift: 5,
            turn_shift: 3,
            noclip: false,
        }
    }
}

/// Axis of a movement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// What one movement tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Displacement attempted along each axis.
    pub dx: i32,
    pub dy: i32,
    pub moved_x: bool,
    pub moved_y: bool,
}

impl MoveOutcome {
    /// Axes where a non-zero step was rejected by a solid cell.
    pub fn blocked(&self) -> impl Iterator<Item = (Axis, i32)> + '_ {
        [
            (Axis::X, self.dx, self.moved_x),
            (Axis::Y, self.dy, self.moved_y),
        ]
        .into_iter()
        .filter(|&(_, d, moved)| d != 0 && !moved)
        .map(|(axis, d, _)| (axis, d))
    }
}

/// Apply one tilt sample to the player.
///
/// The forward component becomes a step along the current facing. Each axis is
/// committed on its own if its destination is not solid, so the player slides
/// along walls; the y test sees the already-updated x. Turning is applied after
/// the step.
pub fn integrate(
    player: &mut Player,
    map: &GridMap,
    tilt: TiltSample,
    config: &MovementConfig,
) -> MoveOutcome {
    let walk = i32::from(tilt.forward) >> config.walk_shift.min(15);
    let dx = cos(player.facing) * walk / TRIG_MAX_RATIO;
    let dy = sin(player.facing) * walk / TRIG_MAX_RATIO;

    let pos = &mut player.position;
    let moved_x = config.noclip || map.classify(pos.x + dx, pos.y) == Cell::Empty;
    if moved_x {
        pos.x += dx;
    }
    let moved_y = config.noclip || map.classify(pos.x, pos.y + dy) == Cell::Empty;
    if moved_y {
        pos.y += dy;
    }

    player.facing = player
        .facing
        .turned_by(i32::from(tilt.turn) << config.turn_shift.min(15));

    MoveOutcome {
        dx,
        dy,
        moved_x,
        moved_y,
    }
}
