//! Jitter sources for the estimator.
//!
//! The estimate gets a small bounded perturbation so repeated readings look like
//! field data. The source is injected so tests (and `--no-jitter`) can pin it.

use rand::prelude::*;
use rand::rngs::StdRng;

/// Half-width of the jitter band (MPa).
pub const JITTER_BAND: f64 = 0.2;

/// A source of additive noise in `[-JITTER_BAND, JITTER_BAND]`.
pub trait JitterSource {
    fn next(&mut self) -> f64;
}

/// Uniform jitter drawn from a `StdRng`.
#[derive(Debug, Clone)]
pub struct UniformJitter {
    rng: StdRng,
}

impl UniformJitter {
    /// Reproducible jitter sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Jitter seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// `Some(seed)` gives a reproducible sequence, `None` an entropy-seeded one.
    pub fn from_seed_opt(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl JitterSource for UniformJitter {
    fn next(&mut self) -> f64 {
        self.rng.gen_range(-JITTER_BAND..=JITTER_BAND)
    }
}

/// Always zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn next(&mut self) -> f64 {
        0.0
    }
}

/// A constant offset, clamped to the jitter band.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn next(&mut self) -> f64 {
        self.0.clamp(-JITTER_BAND, JITTER_BAND)
    }
}

/// Jitter selected at runtime from CLI flags.
#[derive(Debug, Clone)]
pub enum Jitter {
    Uniform(UniformJitter),
    Off(NoJitter),
}

impl Jitter {
    pub fn from_flags(seed: Option<u64>, no_jitter: bool) -> Self {
        if no_jitter {
            Jitter::Off(NoJitter)
        } else {
            Jitter::Uniform(UniformJitter::from_seed_opt(seed))
        }
    }
}

impl JitterSource for Jitter {
    fn next(&mut self) -> f64 {
        match self {
            Jitter::Uniform(j) => j.next(),
            Jitter::Off(j) => j.next(),
        }
    }
}
