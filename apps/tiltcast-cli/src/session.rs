use std::time::{Duration, Instant};

use tiltcast_input::TiltSource;
use tiltcast_kernel::{GridMap, Player, World};
use tiltcast_render::{FrameRenderer, FrameStats, Framebuffer};
use tiltcast_tools::FrameTimer;

use crate::config::EngineConfig;

/// Result of one controller turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnReport {
    pub stats: FrameStats,
    pub elapsed: Duration,
}

/// Top-level controller: owns the world, samples tilt, steps, then renders.
pub struct Session<T> {
    world: World,
    start: Player,
    tilt: T,
    renderer: FrameRenderer,
    framebuffer: Framebuffer,
    timer: FrameTimer,
}

impl<T: TiltSource> Session<T> {
    pub fn new(config: &EngineConfig, map: GridMap, tilt: T) -> Self {
        let start = Player::at_entrance(map.size());
        Self {
            world: World::new(map, start, config.movement),
            start,
            tilt,
            renderer: FrameRenderer::default(),
            framebuffer: Framebuffer::new(config.pixel_format, config.viewport, config.palette),
            timer: FrameTimer::new(64, Duration::from_millis(config.tick_ms)),
        }
    }

    /// One tick: sample, step, render.
    pub fn turn(&mut self) -> TurnReport {
        let began = Instant::now();
        let sample = self.tilt.sample();
        self.world.step(sample);
        let stats = self.renderer.render(&self.world, &mut self.framebuffer);
        let elapsed = began.elapsed();
        self.timer.record(elapsed);
        TurnReport { stats, elapsed }
    }

    /// Run `ticks` turns, sleeping out the rest of each period when `pace` is set.
    pub fn run(&mut self, ticks: u64, pace: bool) -> Option<TurnReport> {
        let period = self.timer.budget();
        let mut last = None;
        for _ in 0..ticks {
            let report = self.turn();
            if pace {
                if let Some(rest) = period.checked_sub(report.elapsed) {
                    std::thread::sleep(rest);
                }
            }
            last = Some(report);
        }
        last
    }

    /// Re-run the recorded ticks from the starting pose and compare hashes.
    pub fn verify_replay(&self) -> bool {
        let replayed = World::replay(
            self.world.map().clone(),
            self.start,
            *self.world.movement(),
            self.world.events(),
        );
        let ok = replayed.state_hash() == self.world.state_hash();
        if !ok {
            tracing::warn!(tick = self.world.tick(), "replay diverged");
        }
        ok
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }
}
