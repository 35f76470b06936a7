use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform draws in `[0, 1)`. Everything random in the effect goes through this.
pub trait RandomSource {
    fn unit(&mut self) -> f64;

    /// Uniform in `[lo, hi)`.
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        let value = lo + self.unit() * (hi - lo);
        // Rounding can land exactly on `hi` for draws a hair below 1.
        if value < hi {
            value
        } else {
            lo.max(hi - f64::EPSILON * hi.abs().max(1.0))
        }
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() on empty range");
        ((self.unit() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

pub struct RngSource {
    rng: StdRng,
}

impl RngSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for RngSource {
    fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[cfg(test)]
pub struct Scripted {
    values: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl Scripted {
    pub fn new(values: &[f64]) -> Self {
        assert!(!values.is_empty());
        Self {
            values: values.to_vec(),
            cursor: 0,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(&[value])
    }
}

#[cfg(test)]
impl RandomSource for Scripted {
    fn unit(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
