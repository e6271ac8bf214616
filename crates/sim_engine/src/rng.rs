//! Injected random source.
//!
//! The engine draws nothing at random itself; actors and scenarios borrow the
//! scheduler's [SimRng] so that a fixed seed reproduces a run exactly.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::time::SimDuration;

#[derive(Debug, Clone)]
pub struct SimRng {
    inner: StdRng,
}

impl SimRng {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[min, max]`. Bounds may be given in either order.
    pub fn uniform_int(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform duration in `[min, max]`, at tick resolution.
    pub fn uniform_duration(&mut self, min: SimDuration, max: SimDuration) -> SimDuration {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        SimDuration::from_ticks(self.inner.gen_range(lo.as_ticks()..=hi.as_ticks()))
    }

    /// Bernoulli trial with probability `p`, clamped to `[0, 1]`. NaN never succeeds.
    pub fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.inner.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
