//! Seeded randomness for the unstuck fallback.
//!
//! Arbitration itself is deterministic; only the final escalation rung draws
//! from this, so identical seeds replay identically.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct PilotRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Only the seed is serialized; the stream restarts on deserialize.
impl Serialize for PilotRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PilotRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(PilotRng::new(u64::deserialize(deserializer)?))
    }
}

impl PilotRng {
    pub fn new(seed: u64) -> Self {
        PilotRng {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform pick in `0..n`, 0 when `n` is 0.
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Pick one element of a slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let idx = self.below(items.len() as u32) as usize;
            Some(&items[idx])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = PilotRng::new(7);
        let mut b = PilotRng::new(7);
        for _ in 0..16 {
            assert_eq!(a.below(100), b.below(100));
        }
    }

    #[test]
    fn below_zero_is_zero() {
        assert_eq!(PilotRng::new(1).below(0), 0);
    }
}
