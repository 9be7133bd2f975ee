use serde::Serialize;
use tiltcast_kernel::{Cell, World, WorldEvent};

/// Read-only queries against the world for debugging and CLI output.
pub struct Inspector;

impl Inspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let player = world.player();
        let (cx, cy) = player.position.cell();
        let map = world.map();
        WorldSummary {
            tick: world.tick(),
            x: player.position.x,
            y: player.position.y,
            cell: (cx, cy),
            inside_map: map.cell(cx, cy).is_some(),
            standing_in_wall: map.cell(cx, cy) == Some(Cell::Solid),
            facing: player.facing.raw(),
            facing_degrees: player.facing.degrees(),
            map_size: map.size(),
            solid_cells: map.solid_count(),
            pending_events: world.events().len(),
            blocked_moves: world
                .events()
                .iter()
                .filter(|e| matches!(e, WorldEvent::Blocked { .. }))
                .count(),
            state_hash: world.state_hash(),
        }
    }
}

/// Summary of world state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSummary {
    pub tick: u64,
    pub x: i32,
    pub y: i32,
    pub cell: (i32, i32),
    pub inside_map: bool,
    pub standing_in_wall: bool,
    pub facing: i16,
    pub facing_degrees: f64,
    pub map_size: usize,
    pub solid_cells: usize,
    pub pending_events: usize,
    pub blocked_moves: usize,
    pub state_hash: u64,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tick={} pos=({}, {}) cell=({}, {}){} facing={} ({:.1}°) map={}x{} solid={} events={} blocked={} hash={:#018x}",
            self.tick,
            self.x,
            self.y,
            self.cell.0,
            self.cell.1,
            if self.inside_map { "" } else { " outside" },
            self.facing,
            self.facing_degrees,
            self.map_size,
            self.map_size,
            self.solid_cells,
            self.pending_events,
            self.blocked_moves,
            self.state_hash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiltcast_input::TiltSample;
    use tiltcast_kernel::{GridMap, MovementConfig, Player};

    #[test]
    fn summary_reflects_world() {
        let mut world = World::new(
            GridMap::bordered(10),
            Player::at_entrance(10),
            MovementConfig::default(),
        );
        world.step(TiltSample::LEVEL);
        let s = Inspector::summary(&world);
        assert_eq!(s.tick, 1);
        assert_eq!((s.x, s.y), (320, -128));
        assert_eq!(s.cell, (5, -2));
        assert!(!s.inside_map);
        assert!(!s.standing_in_wall);
        assert_eq!(s.facing_degrees, 90.0);
        assert_eq!(s.solid_cells, 36);
        assert_eq!(s.pending_events, 1);
    }

    #[test]
    fn summary_display_is_one_line() {
        let world = World::new(
            GridMap::bordered(4),
            Player::at_entrance(4),
            MovementConfig::default(),
        );
        let text = Inspector::summary(&world).to_string();
        assert!(text.contains("tick=0"));
        assert!(text.contains("outside"));
        assert!(!text.contains('\n'));
    }
}
