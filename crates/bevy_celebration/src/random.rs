use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random numbers.
///
/// Effects sample launch positions through this trait so tests can replace
/// the generator with a fixed sequence.
pub trait RandomSource: Send + Sync + 'static {
    /// Returns a uniform sample in `[0.0, 1.0)`.
    fn next_unit(&mut self) -> f32;

    /// Returns a uniform sample in `[min, max)`.
    fn in_range(&mut self, min: f32, max: f32) -> f32 {
        self.next_unit() * (max - min) + min
    }
}

/// [`RandomSource`] backed by [`StdRng`].
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Seeds the generator from the operating system.
    pub fn from_os() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Creates a deterministic generator.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f32 {
        self.0.random::<f32>()
    }
}

/// The random source used by the celebration scheduler.
#[derive(Resource)]
pub struct CelebrationRng(Box<dyn RandomSource>);

impl CelebrationRng {
    /// Wraps any random source.
    pub fn new(source: impl RandomSource) -> Self {
        Self(Box::new(source))
    }

    /// A deterministic generator, handy for replays and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRandom::seeded(seed))
    }

    /// Mutable access to the underlying source.
    pub fn source(&mut self) -> &mut dyn RandomSource {
        self.0.as_mut()
    }
}

impl Default for CelebrationRng {
    fn default() -> Self {
        Self::new(StdRandom::from_os())
    }
}
