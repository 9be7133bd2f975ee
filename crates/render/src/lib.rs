//! Rendering: fixed-point grid raycasting into a pixel sink.
//!
//! # Invariants
//! - Renderer cannot mutate world truth; it borrows `World` immutably.
//! - Ray and projection math are integer-only and layout-agnostic; only the
//!   `PixelSink` knows the framebuffer encoding.
//! - A ray that can never hit is `RayResult::Miss` and draws nothing.

mod preview;
pub mod projection;
pub mod raycast;
pub mod renderer;
pub mod sink;
pub mod texture;

pub use projection::{ColumnSpan, PROJECTION_SHIFT, Viewport, project};
pub use raycast::{RayResult, cast_ray};
pub use renderer::{FrameRenderer, FrameStats};
pub use sink::{
    Framebuffer, IndexedSink, PackedMonoSink, Palette, PixelFormat, PixelSink, SinkError,
    packed_stride,
};
pub use texture::{Half, TEXTURE_SIZE, Texture, TextureError, vertical_texel};

pub fn crate_info() -> &'static str {
    "tiltcast-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
