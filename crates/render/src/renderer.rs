use tiltcast_kernel::World;

use crate::projection::project;
use crate::raycast::{RayResult, cast_ray};
use crate::sink::PixelSink;
use crate::texture::{Half, Texture, vertical_texel};

/// Per-frame totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub columns_hit: usize,
    pub columns_missed: usize,
    /// Wall pixels handed to the sink, both halves.
    pub wall_pixels: usize,
    /// Shortest hit distance this frame.
    pub nearest: Option<u32>,
}

/// Column-by-column raycasting renderer.
///
/// Reads the world, never mutates it. One ray per screen column; each hit
/// becomes a textured vertical strip drawn outward from the midline.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    texture: Texture,
}

impl FrameRenderer {
    pub fn new(texture: Texture) -> Self {
        Self { texture }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    /// Render one frame of `world` into `sink`.
    pub fn render<S: PixelSink + ?Sized>(&self, world: &World, sink: &mut S) -> FrameStats {
        let _span = tracing::debug_span!("render_frame", tick = world.tick()).entered();
        let viewport = sink.viewport();
        let player = world.player();
        let mid = viewport.midline();
        let mut stats = FrameStats::default();

        sink.fill_background();

        for x in 0..viewport.width {
            let offset = viewport.column_angle(x);
            let ray = cast_ray(world.map(), player.position, player.facing + offset);
            let RayResult::Hit {
                distance,
                offset: wall_offset,
            } = ray
            else {
                stats.columns_missed += 1;
                continue;
            };
            stats.columns_hit += 1;
            stats.nearest = Some(stats.nearest.map_or(distance, |n| n.min(distance)));

            let span = project(ray, offset, viewport);
            for y in 0..span.height {
                let t = vertical_texel(y, span.corrected, viewport);
                sink.put(x, mid - y, self.texture.sample(wall_offset, Half::Top, t));
                sink.put(x, mid + y, self.texture.sample(wall_offset, Half::Bottom, t));
            }
            stats.wall_pixels += 2 * span.height;
        }

        tracing::trace!(
            hit = stats.columns_hit,
            missed = stats.columns_missed,
            pixels = stats.wall_pixels,
            "frame rendered"
        );
        stats
    }
}
