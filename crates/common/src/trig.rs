//! Lookup-table trigonometry on the 16-bit circular angle scale.
//!
//! Values are `round(sin(θ) · TRIG_MAX_RATIO)` taken from a quarter-wave table
//! with one entry per angle unit, so every function here is exact integer math
//! once the table exists.

use std::sync::LazyLock;

use crate::types::{Angle, TRIG_MAX_ANGLE, TRIG_MAX_RATIO};

const QUARTER: usize = (TRIG_MAX_ANGLE / 4) as usize;
const HALF_TURN: i32 = TRIG_MAX_ANGLE / 2;

/// `sin` for angles `0..=QUARTER`, inclusive of the peak.
static QUARTER_SINE: LazyLock<Box<[i32]>> = LazyLock::new(|| {
    (0..=QUARTER)
        .map(|i| {
            let theta = i as f64 * std::f64::consts::TAU / f64::from(TRIG_MAX_ANGLE);
            (theta.sin() * f64::from(TRIG_MAX_RATIO)).round() as i32
        })
        .collect()
});

/// Sine scaled by `TRIG_MAX_RATIO`, in `[-TRIG_MAX_RATIO, TRIG_MAX_RATIO]`.
pub fn sin(angle: Angle) -> i32 {
    let a = angle.index() as usize;
    let i = a & (QUARTER - 1);
    let table = &*QUARTER_SINE;
    match a / QUARTER {
        0 => table[i],
        1 => table[QUARTER - i],
        2 => -table[i],
        _ => -table[QUARTER - i],
    }
}

/// Cosine scaled by `TRIG_MAX_RATIO`.
pub fn cos(angle: Angle) -> i32 {
    sin(angle + Angle::QUARTER_TURN)
}

/// Angle of the vector `(x, y)` measured from +x toward +y.
///
/// Searches the quarter table for the largest first-quadrant angle whose
/// tangent does not exceed `|y| / |x|`, then reflects into the right quadrant.
/// `atan2(0, 0)` is zero.
pub fn atan2(y: i32, x: i32) -> Angle {
    if x == 0 && y == 0 {
        return Angle::ZERO;
    }
    let (ay, ax) = (i64::from(y).abs(), i64::from(x).abs());
    let table = &*QUARTER_SINE;

    // sin(i)·|x| <= cos(i)·|y| is monotone in i; i = 0 always satisfies it.
    let (mut lo, mut hi) = (0usize, QUARTER);
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        if i64::from(table[mid]) * ax <= i64::from(table[QUARTER - mid]) * ay {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let q = lo as i32;
    let raw = match (x >= 0, y >= 0) {
        (true, true) => q,
        (false, true) => HALF_TURN - q,
        (false, false) => HALF_TURN + q,
        (true, false) => TRIG_MAX_ANGLE - q,
    };
    Angle::from_raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_values_are_exact() {
        assert_eq!(sin(Angle::ZERO), 0);
        assert_eq!(cos(Angle::ZERO), TRIG_MAX_RATIO);
        assert_eq!(sin(Angle::QUARTER_TURN), TRIG_MAX_RATIO);
        assert_eq!(cos(Angle::QUARTER_TURN), 0);
        assert_eq!(sin(Angle::HALF_TURN), 0);
        assert_eq!(cos(Angle::HALF_TURN), -TRIG_MAX_RATIO);
        assert_eq!(sin(Angle::THREE_QUARTER_TURN), -TRIG_MAX_RATIO);
        assert_eq!(cos(Angle::THREE_QUARTER_TURN), 0);
    }

    #[test]
    fn eighth_turn_is_root_half() {
        // 65536 / sqrt(2) = 46340.95
        assert_eq!(sin(Angle(0x2000)), 46341);
        assert_eq!(cos(Angle(0x2000)), 46341);
        assert_eq!(sin(Angle(-0x2000)), -46341);
    }

    #[test]
    fn sine_is_odd_and_bounded_over_full_circle() {
        for raw in i16::MIN..=i16::MAX {
            let a = Angle(raw);
            let s = sin(a);
            assert!(s.abs() <= TRIG_MAX_RATIO);
            if raw != i16::MIN {
                assert_eq!(sin(-a), -s, "angle {raw}");
            }
        }
    }

    #[test]
    fn pythagorean_identity_holds_within_rounding() {
        for raw in (i16::MIN..=i16::MAX).step_by(97) {
            let a = Angle(raw);
            let (s, c) = (i64::from(sin(a)), i64::from(cos(a)));
            let one = i64::from(TRIG_MAX_RATIO) * i64::from(TRIG_MAX_RATIO);
            assert!((s * s + c * c - one).abs() < 2 * i64::from(TRIG_MAX_RATIO));
        }
    }

    #[test]
    fn atan2_axes() {
        assert_eq!(atan2(0, 64), Angle::ZERO);
        assert_eq!(atan2(64, 0), Angle::QUARTER_TURN);
        assert_eq!(atan2(0, -64), Angle::HALF_TURN);
        assert_eq!(atan2(-64, 0), Angle::THREE_QUARTER_TURN);
        assert_eq!(atan2(0, 0), Angle::ZERO);
    }

    #[test]
    fn atan2_diagonals() {
        assert_eq!(atan2(64, 64), Angle(0x2000));
        assert_eq!(atan2(64, -64), Angle(0x6000));
        assert_eq!(atan2(-64, -64), Angle::from_raw(0xA000));
        assert_eq!(atan2(-64, 64), Angle(-0x2000));
    }

    #[test]
    fn atan2_inverts_tangent_of_view_columns() {
        // Column offsets used by the renderer: y in -32..32 over x = 64.
        for y in -32..32 {
            let a = atan2(y, 64);
            let (s, c) = (i64::from(sin(a)), i64::from(cos(a)));
            // tan(a) ~= y / 64 -> s * 64 ~= c * y
            let err = (s * 64 - c * i64::from(y)).abs();
            assert!(err <= 64 * 12, "y={y} a={a:?} err={err}");
        }
    }

    #[test]
    fn atan2_of_negative_offset_is_negative_angle() {
        let a = atan2(-32, 64);
        assert!(a.raw() < 0);
        assert_eq!(atan2(32, 64), -a);
    }
}
