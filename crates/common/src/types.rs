use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg, Sub};

/// Sub-units per grid cell side.
pub const CELL_SIZE: i32 = 64;
/// `log2(CELL_SIZE)`: shift a sub-unit coordinate right by this to get its cell index.
pub const CELL_SHIFT: u32 = 6;
/// Mask selecting the sub-cell part of a coordinate.
pub const CELL_MASK: i32 = CELL_SIZE - 1;
/// Fixed-point 1.0 for trig outputs.
pub const TRIG_MAX_RATIO: i32 = 0x10000;
/// Angle units in one full turn.
pub const TRIG_MAX_ANGLE: i32 = 0x10000;

/// An angle on the 16-bit circular scale: `i16::MIN..=i16::MAX` covers one turn.
///
/// Arithmetic wraps around the circle.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Angle(pub i16);

impl Angle {
    pub const ZERO: Self = Self(0);
    /// +x axis rotated a quarter turn: facing +y.
    pub const QUARTER_TURN: Self = Self(0x4000);
    pub const HALF_TURN: Self = Self(i16::MIN);
    pub const THREE_QUARTER_TURN: Self = Self(-0x4000);

    /// Build from any integer angle, wrapping modulo one turn.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw as i16)
    }

    pub const fn raw(self) -> i16 {
        self.0
    }

    /// Unsigned table index in `0..TRIG_MAX_ANGLE`.
    pub const fn index(self) -> u16 {
        self.0 as u16
    }

    /// Rotate by a signed number of angle units, wrapping.
    pub const fn turned_by(self, delta: i32) -> Self {
        Self::from_raw(self.0 as i32 + delta)
    }

    /// Approximate value in degrees, `[0, 360)`. Display only.
    pub fn degrees(self) -> f64 {
        f64::from(self.index()) * 360.0 / f64::from(TRIG_MAX_ANGLE)
    }
}

impl Add for Angle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

/// World position in sub-units (`CELL_SIZE` per cell).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Centre of cell `(cx, cy)`.
    pub const fn cell_center(cx: i32, cy: i32) -> Self {
        Self {
            x: cx * CELL_SIZE + CELL_SIZE / 2,
            y: cy * CELL_SIZE + CELL_SIZE / 2,
        }
    }

    /// Cell index containing this position. Floors, so negative coordinates
    /// map to negative cells.
    pub const fn cell(self) -> (i32, i32) {
        (self.x >> CELL_SHIFT, self.y >> CELL_SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_wraps_on_turn() {
        let a = Angle(i16::MAX);
        assert_eq!(a.turned_by(1), Angle(i16::MIN));
        assert_eq!(Angle::from_raw(TRIG_MAX_ANGLE), Angle::ZERO);
        assert_eq!(Angle::from_raw(TRIG_MAX_ANGLE + 5), Angle(5));
        assert_eq!(Angle::QUARTER_TURN + Angle::THREE_QUARTER_TURN, Angle::ZERO);
    }

    #[test]
    fn angle_index_is_unsigned() {
        assert_eq!(Angle(-1).index(), 0xFFFF);
        assert_eq!(Angle::HALF_TURN.index(), 0x8000);
        assert_eq!(Angle::QUARTER_TURN.degrees(), 90.0);
    }

    #[test]
    fn position_cell_floors_negative() {
        assert_eq!(Position::new(0, 63).cell(), (0, 0));
        assert_eq!(Position::new(64, -1).cell(), (1, -1));
        assert_eq!(Position::new(-128, -129).cell(), (-2, -3));
    }

    #[test]
    fn cell_center_is_mid_cell() {
        let p = Position::cell_center(2, 5);
        assert_eq!(p, Position::new(160, 352));
        assert_eq!(p.cell(), (2, 5));
    }
}
