//! Randomness used by the visit engine.
//!
//! Every random branch (baseline rolls, the injury roll, the improve coin, the
//! trained-stat pick, narration) goes through [`Dice`] so tests can script the
//! exact sequence of outcomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait Dice {
    /// Uniform integer in `lo..=hi`.
    fn roll(&mut self, lo: u8, hi: u8) -> u8;

    /// True with probability `num / den`.
    fn chance(&mut self, num: u32, den: u32) -> bool;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// [`Dice`] backed by a `StdRng`, optionally seeded for reproducible runs.
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
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

    /// Seeded when a seed is configured, otherwise from OS entropy.
    pub fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }
}

impl Dice for RandomDice {
    fn roll(&mut self, lo: u8, hi: u8) -> u8 {
        self.rng.gen_range(lo..=hi)
    }

    fn chance(&mut self, num: u32, den: u32) -> bool {
        self.rng.gen_ratio(num, den)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}
