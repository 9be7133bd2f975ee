use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tiltcast_common::{CELL_SHIFT, CELL_SIZE};

/// Side length used when no size is configured.
pub const DEFAULT_MAP_SIZE: usize = 100;

/// State of one grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Solid,
}

impl Cell {
    pub fn is_solid(self) -> bool {
        self == Self::Solid
    }
}

/// Errors from building a map.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected} for a square map")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown map glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("expected {expected} cells for a {size}x{size} map, got {found}")]
    CellCount {
        size: usize,
        expected: usize,
        found: usize,
    },
}

/// Square grid of cells, `size` cells on a side, row-major (`y * size + x`).
///
/// Two lookups with deliberately different out-of-range policies:
/// [`GridMap::classify`] reports `Empty` outside the grid so movement and rays
/// can pass through open space beyond it, while [`GridMap::cell`] returns
/// `None` there so the ray caster can run its own extent check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMap {
    size: usize,
    cells: Vec<Cell>,
}

impl GridMap {
    /// A map with every cell empty.
    pub fn empty(size: usize) -> Self {
        assert!(size > 0, "map size must be positive");
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Empty interior enclosed by a one-cell solid border.
    pub fn bordered(size: usize) -> Self {
        let mut map = Self::empty(size);
        let last = size - 1;
        for i in 0..size {
            map.set(i, 0, Cell::Solid);
            map.set(i, last, Cell::Solid);
            map.set(0, i, Cell::Solid);
            map.set(last, i, Cell::Solid);
        }
        map
    }

    /// Randomly dotted map: each cell is solid with probability `1 / wall_one_in`.
    /// `wall_one_in == 0` produces no walls. The same seed always yields the same map.
    pub fn random(size: usize, seed: u64, wall_one_in: u32) -> Self {
        let mut map = Self::empty(size);
        if wall_one_in == 0 {
            return map;
        }
        let mut state = seed;
        for cell in &mut map.cells {
            state = splitmix64(state);
            if state % u64::from(wall_one_in) == 0 {
                *cell = Cell::Solid;
            }
        }
        tracing::debug!(size, seed, solid = map.solid_count(), "generated random map");
        map
    }

    /// Build from a row-major cell list.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, MapError> {
        if size == 0 {
            return Err(MapError::Empty);
        }
        if cells.len() != size * size {
            return Err(MapError::CellCount {
                size,
                expected: size * size,
                found: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Cells on a side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length in sub-units.
    pub fn extent(&self) -> i32 {
        self.size as i32 * CELL_SIZE
    }

    pub fn set(&mut self, cx: usize, cy: usize, cell: Cell) {
        assert!(cx < self.size && cy < self.size, "cell out of range");
        self.cells[cy * self.size + cx] = cell;
    }

    /// Cell at grid index `(cx, cy)`, or `None` outside the grid.
    pub fn cell(&self, cx: i32, cy: i32) -> Option<Cell> {
        let n = self.size as i32;
        if cx < 0 || cy < 0 || cx >= n || cy >= n {
            return None;
        }
        Some(self.cells[cy as usize * self.size + cx as usize])
    }

    /// Classify a sub-unit world coordinate. Anything outside the grid is `Empty`.
    pub fn classify(&self, x: i32, y: i32) -> Cell {
        self.cell(x >> CELL_SHIFT, y >> CELL_SHIFT)
            .unwrap_or(Cell::Empty)
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_solid()).count()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// `#` is solid; `.` or space is empty. Rows must form a square.
impl FromStr for GridMap {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        let size = rows.len();
        if size == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != size {
                return Err(MapError::NotSquare {
                    row,
                    expected: size,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                cells.push(match glyph {
                    '#' => Cell::Solid,
                    '.' | ' ' => Cell::Empty,
                    _ => return Err(MapError::UnknownGlyph { glyph, row, col }),
                });
            }
        }
        Self::from_cells(size, cells)
    }
}

impl fmt::Display for GridMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for cell in row {
                f.write_str(if cell.is_solid() { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Map generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub size: usize,
    /// One cell in this many is solid. 0 disables walls.
    pub wall_one_in: u32,
    pub seed: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_MAP_SIZE,
            wall_one_in: 3,
            seed: 0,
        }
    }
}

impl MapConfig {
    pub fn generate(&self) -> GridMap {
        GridMap::random(self.size, self.seed, self.wall_one_in)
    }
}

/// Splitmix64 step, used as a portable deterministic generator.
pub(crate) fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_divides_by_cell_size() {
        let mut map = GridMap::empty(4);
        map.set(1, 2, Cell::Solid);
        assert_eq!(map.classify(64, 128), Cell::Solid);
        assert_eq!(map.classify(127, 191), Cell::Solid);
        assert_eq!(map.classify(63, 128), Cell::Empty);
        assert_eq!(map.classify(128, 128), Cell::Empty);
    }

    #[test]
    fn out_of_range_is_empty_for_classify_but_none_for_cell() {
        let map = GridMap::bordered(4);
        assert_eq!(map.classify(-1, 10), Cell::Empty);
        assert_eq!(map.classify(10, map.extent()), Cell::Empty);
        assert_eq!(map.cell(-1, 0), None);
        assert_eq!(map.cell(0, 4), None);
        assert_eq!(map.cell(0, 0), Some(Cell::Solid));
    }

    #[test]
    fn bordered_has_solid_ring_and_empty_interior() {
        let map = GridMap::bordered(10);
        assert_eq!(map.solid_count(), 36);
        assert_eq!(map.cell(5, 5), Some(Cell::Empty));
        assert_eq!(map.cell(9, 5), Some(Cell::Solid));
        assert_eq!(map.extent(), 640);
    }

    #[test]
    fn random_is_seeded_and_roughly_one_in_three() {
        let a = GridMap::random(100, 42, 3);
        let b = GridMap::random(100, 42, 3);
        let c = GridMap::random(100, 43, 3);
        assert_eq!(a, b);
        assert_ne!(a, c);
        let solid = a.solid_count();
        assert!((2_800..3_900).contains(&solid), "solid={solid}");
    }

    #[test]
    fn random_with_zero_density_is_empty() {
        assert_eq!(GridMap::random(8, 1, 0).solid_count(), 0);
        assert_eq!(GridMap::random(8, 1, 1).solid_count(), 64);
    }

    #[test]
    fn parse_round_trips_display() {
        let text = "###\n#.#\n###\n";
        let map: GridMap = text.parse().unwrap();
        assert_eq!(map.size(), 3);
        assert_eq!(map.solid_count(), 8);
        assert_eq!(map.to_string(), text);
    }

    #[test]
    fn parse_rejects_bad_shapes_and_glyphs() {
        assert_eq!("".parse::<GridMap>().unwrap_err(), MapError::Empty);
        assert_eq!(
            "##\n#\n".parse::<GridMap>().unwrap_err(),
            MapError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            "#x\n##\n".parse::<GridMap>().unwrap_err(),
            MapError::UnknownGlyph {
                glyph: 'x',
                row: 0,
                col: 1
            }
        );
    }

    #[test]
    fn from_cells_checks_count() {
        let err = GridMap::from_cells(2, vec![Cell::Empty; 3]).unwrap_err();
        assert!(matches!(err, MapError::CellCount { expected: 4, .. }));
    }
}
