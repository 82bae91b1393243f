use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random draws for the simulation.
///
/// Everything probabilistic (AI skill checks, reaction jitter, particle
/// scatter) draws through this trait so a seeded or scripted source makes a
/// match fully reproducible.
pub trait RandomSource: Send {
    /// Uniform sample in `[0, 1)`.
    fn next_f32(&mut self) -> f32;
}

/// Seeded `StdRng`-backed source.
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Non-reproducible source seeded from the OS.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
