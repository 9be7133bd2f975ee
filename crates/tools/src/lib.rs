//! Developer Tooling: world inspector and frame budget timing.
//!
//! # Invariants
//! - Tools only read the world.

mod inspector;
mod timing;

pub use inspector::{Inspector, WorldSummary};
pub use timing::FrameTimer;

pub fn crate_info() -> &'static str {
    "tiltcast-tools v0.1.0"
}
