use super::timer::Millis;
use rand::Rng;

/// Randomized interval between two proposals of the same effect family.
///
/// `frequency` is the user knob in [0, 1] where 1 is most frequent, so it maps
/// inversely onto the [min, max] window before the symmetric jitter is added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    pub min: Millis,
    pub max: Millis,
    pub jitter: Millis,
}

impl Cadence {
    pub const fn new(min: Millis, max: Millis, jitter: Millis) -> Self {
        Self { min, max, jitter }
    }

    /// Interval before jitter: `min + (1 - frequency) * (max - min)`.
    pub fn base(&self, frequency: f32) -> f64 {
        let f = if frequency.is_nan() {
            0.0
        } else {
            frequency.clamp(0.0, 1.0) as f64
        };
        self.min as f64 + (1.0 - f) * (self.max - self.min) as f64
    }

    /// Jittered interval in whole milliseconds. At least 1 ms so a tick never
    /// reschedules onto its own deadline.
    pub fn sample<R: Rng + ?Sized>(&self, frequency: f32, rng: &mut R) -> Millis {
        let j = self.jitter as f64;
        let offset = if self.jitter == 0 {
            0.0
        } else {
            rng.gen_range(-j..=j)
        };
        (self.base(frequency) + offset).max(1.0).round() as Millis
    }

    /// Bounds every sampled interval falls within.
    pub fn bounds(&self) -> (Millis, Millis) {
        (self.min.saturating_sub(self.jitter).max(1), self.max + self.jitter)
    }
}

/// Uniform draw from a `(lo, hi)` millisecond range.
pub fn uniform<R: Rng + ?Sized>(range: (Millis, Millis), rng: &mut R) -> Millis {
    let (lo, hi) = range;
    if hi <= lo {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}
