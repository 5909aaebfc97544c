//! Randomness source for message selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Picks an index into a non-empty pool.
pub trait Entropy: Send + Sync {
    /// Index in `0..len`. Returns 0 when `len` is 0.
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadEntropy;

impl Entropy for ThreadEntropy {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::rng().random_range(0..len)
    }
}

/// Reproducible sequence from a seed.
#[derive(Debug)]
pub struct SeededEntropy {
    rng: Mutex<StdRng>,
}

impl SeededEntropy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Entropy for SeededEntropy {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.random_range(0..len)
    }
}

/// Always the same index (modulo the pool size).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedEntropy(pub usize);

impl Entropy for FixedEntropy {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0 % len
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_pick_in_range(len in 1usize..64, seed in any::<u64>(), fixed in any::<usize>()) {
            prop_assert!(ThreadEntropy.pick(len) < len);
            prop_assert!(SeededEntropy::new(seed).pick(len) < len);
            prop_assert!(FixedEntropy(fixed).pick(len) < len);
        }
    }
}
