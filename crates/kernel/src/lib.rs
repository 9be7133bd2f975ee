//! World Kernel: grid map, player pose, tilt-driven movement, deterministic replay.
//!
//! # Invariants
//! - The map does not change once a `World` is built.
//! - Player pose changes only through `World::step`.
//! - A tick is pure with respect to (map, pose, config, tilt).

pub mod map;
pub mod movement;
pub mod world;

pub use map::{Cell, DEFAULT_MAP_SIZE, GridMap, MapConfig, MapError};
pub use movement::{Axis, MoveOutcome, MovementConfig, Player, integrate};
pub use world::{World, WorldEvent};

pub fn crate_info() -> &'static str {
    "tiltcast-kernel v0.1.0"
}
