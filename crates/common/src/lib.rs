//! Shared fixed-point types: 16-bit circular angles, sub-unit positions, lookup-table trig.
//!
//! # Invariants
//! - One full turn is 65536 angle units; angles wrap, never saturate.
//! - Trig outputs are scaled by `TRIG_MAX_RATIO` (fixed-point 1.0).
//! - A grid cell is `CELL_SIZE` sub-units on a side.

pub mod trig;
pub mod types;

pub use trig::{atan2, cos, sin};
pub use types::{Angle, CELL_MASK, CELL_SHIFT, CELL_SIZE, Position, TRIG_MAX_ANGLE, TRIG_MAX_RATIO};

pub fn crate_info() -> &'static str {
    "tiltcast-common v0.1.0"
}
