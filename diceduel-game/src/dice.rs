use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Faces of the die. Guesses and outcomes must fall in this range.
pub const FACES: RangeInclusive<i64> = 1..=6;

/// Source of round outcomes. Only the host player carries one.
pub trait Dice: Send {
    fn roll(&mut self) -> i64;
}

pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn new() -> Self {
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

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice for RandomDice {
    fn roll(&mut self) -> i64 {
        self.rng.gen_range(FACES)
    }
}
