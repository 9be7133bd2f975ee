use serde::{Deserialize, Serialize};
use tiltcast_input::TiltSample;

use crate::map::GridMap;
use crate::movement::{Axis, MoveOutcome, MovementConfig, Player, integrate};

/// An event record produced by every tick.
///
/// Ticks are pure in (map, player, config, tilt), so the `Stepped` records
/// alone are enough to replay a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Simulation advanced one tick under the given tilt.
    Stepped { tick: u64, tilt: TiltSample },
    /// A non-zero step along `axis` was rejected by a solid cell.
    Blocked { tick: u64, axis: Axis, attempted: i32 },
}

/// The authoritative simulation state.
///
/// Owns the map and the player. The map is fixed once the world is built; the
/// player is only ever changed by [`World::step`]. Renderers borrow the world
/// immutably between ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    map: GridMap,
    player: Player,
    movement: MovementConfig,
    tick: u64,
    /// Append-only event log.
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

impl World {
    pub fn new(map: GridMap, player: Player, movement: MovementConfig) -> Self {
        Self {
            map,
            player,
            movement,
            tick: 0,
            event_log: Vec::new(),
        }
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn movement(&self) -> &MovementConfig {
        &self.movement
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Advance one movement tick under `tilt`.
    pub fn step(&mut self, tilt: TiltSample) -> MoveOutcome {
        self.tick += 1;
        let outcome = integrate(&mut self.player, &self.map, tilt, &self.movement);

        self.event_log.push(WorldEvent::Stepped {
            tick: self.tick,
            tilt,
        });
        for (axis, attempted) in outcome.blocked() {
            tracing::trace!(tick = self.tick, ?axis, attempted, "movement blocked");
            self.event_log.push(WorldEvent::Blocked {
                tick: self.tick,
                axis,
                attempted,
            });
        }
        outcome
    }

    /// Rebuild a world by re-running the recorded ticks from a starting pose.
    pub fn replay(
        map: GridMap,
        player: Player,
        movement: MovementConfig,
        events: &[WorldEvent],
    ) -> Self {
        let mut world = Self::new(map, player, movement);
        for event in events {
            if let WorldEvent::Stepped { tilt, .. } = event {
                world.step(*tilt);
            }
        }
        world
    }

    /// Deterministic FNV-1a hash of tick, pose and map.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.player.position.x.to_le_bytes());
        mix(&mut h, &self.player.position.y.to_le_bytes());
        mix(&mut h, &self.player.facing.raw().to_le_bytes());
        mix(&mut h, &(self.map.size() as u64).to_le_bytes());
        for cell in self.map.cells() {
            mix(&mut h, &[cell.is_solid() as u8]);
        }
        h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiltcast_common::{Angle, Position};

    fn world() -> World {
        World::new(
            GridMap::bordered(10),
            Player::new(Position::cell_center(5, 5), Angle::ZERO),
            MovementConfig::default(),
        )
    }

    #[test]
    fn world_starts_at_tick_zero() {
        let w = world();
        assert_eq!(w.tick(), 0);
        assert!(w.events().is_empty());
    }

    #[test]
    fn step_increments_tick_and_logs() {
        let mut w = world();
        w.step(TiltSample::new(640, 0));
        w.step(TiltSample::LEVEL);
        assert_eq!(w.tick(), 2);
        assert_eq!(w.events().len(), 2);
        assert_eq!(w.player().position, Position::new(372, 352));
    }

    #[test]
    fn blocked_steps_are_logged() {
        let mut w = world();
        // Walk east until the border stops us.
        for _ in 0..20 {
            w.step(TiltSample::new(640, 0));
        }
        assert!(w.player().position.x < 576);
        let blocked = w
            .events()
            .iter()
            .filter(|e| matches!(e, WorldEvent::Blocked { axis: Axis::X, .. }))
            .count();
        assert!(blocked > 0);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = world();
        w.step(TiltSample::LEVEL);
        let events = w.drain_events();
        assert_eq!(events.len(), 1);
        assert!(w.events().is_empty());
    }

    #[test]
    fn replay_equivalence() {
        let mut w = World::new(
            GridMap::random(32, 9, 4),
            Player::new(Position::cell_center(16, 16), Angle(100)),
            MovementConfig::default(),
        );
        let start_map = w.map().clone();
        let start_player = *w.player();
        for i in 0..200i16 {
            w.step(TiltSample::new(300 + i, (i % 7) - 3));
        }

        let replayed = World::replay(start_map, start_player, *w.movement(), w.events());
        assert_eq!(replayed.tick(), w.tick());
        assert_eq!(replayed.player(), w.player());
        assert_eq!(replayed.state_hash(), w.state_hash());
    }

    #[test]
    fn state_hash_tracks_pose() {
        let mut a = world();
        let mut b = world();
        assert_eq!(a.state_hash(), b.state_hash());
        a.step(TiltSample::new(640, 0));
        b.step(TiltSample::new(0, 10));
        assert_ne!(a.state_hash(), b.state_hash());
    }
}
