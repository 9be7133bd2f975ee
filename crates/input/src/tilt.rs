use serde::{Deserialize, Serialize};

/// One tilt reading, already sampled by the host.
///
/// Components are raw accelerometer-style values (milli-g on the reference
/// device). `forward` walks along the facing direction, `turn` rotates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TiltSample {
    /// Forward/back tilt. Positive walks forward.
    pub forward: i16,
    /// Left/right tilt. Positive turns toward increasing angle.
    pub turn: i16,
}

impl TiltSample {
    pub const LEVEL: Self = Self {
        forward: 0,
        turn: 0,
    };

    pub const fn new(forward: i16, turn: i16) -> Self {
        Self { forward, turn }
    }
}

/// Anything that can be asked for the current tilt at tick time.
///
/// Physical sensors, simulators and replay files all sit behind this seam.
pub trait TiltSource {
    fn sample(&mut self) -> TiltSample;
}

/// Always reports the same tilt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantTilt(pub TiltSample);

impl TiltSource for ConstantTilt {
    fn sample(&mut self) -> TiltSample {
        self.0
    }
}

/// Plays back a recorded sequence, then keeps reporting the final sample.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTilt {
    samples: Vec<TiltSample>,
    cursor: usize,
}

impl ScriptedTilt {
    pub fn new(samples: Vec<TiltSample>) -> Self {
        Self { samples, cursor: 0 }
    }

    /// Samples not yet played.
    pub fn remaining(&self) -> usize {
        self.samples.len().saturating_sub(self.cursor)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    pub fn samples(&self) -> &[TiltSample] {
        &self.samples
    }
}

impl TiltSource for ScriptedTilt {
    fn sample(&mut self) -> TiltSample {
        match self.samples.get(self.cursor) {
            Some(&s) => {
                self.cursor += 1;
                s
            }
            None => {
                tracing::trace!("tilt script exhausted, holding last sample");
                self.samples.last().copied().unwrap_or(TiltSample::LEVEL)
            }
        }
    }
}

impl<T: TiltSource + ?Sized> TiltSource for &mut T {
    fn sample(&mut self) -> TiltSample {
        (**self).sample()
    }
}
