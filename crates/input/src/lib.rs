//! Tilt input: the 2D tilt sample consumed by the movement tick, and the
//! sources that produce it.
//!
//! # Invariants
//! - The simulation only ever sees `TiltSample`, never a raw sensor reading.
//! - A source is sampled exactly once per movement tick.

pub mod script;
pub mod tilt;

pub use script::{ScriptParseError, parse_script};
pub use tilt::{ConstantTilt, ScriptedTilt, TiltSample, TiltSource};

pub fn crate_info() -> &'static str {
    "tiltcast-input v0.1.0"
}
