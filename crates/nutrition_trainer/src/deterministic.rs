//! Deterministic utilities for reproducible training
//!
//! Provides an LCG-based RNG, seed mixing, and the seeded train/test split
//! and bootstrap sampling built on top of it.

use std::num::Wrapping;

use crate::errors::TrainerError;

/// Linear Congruential Generator for deterministic pseudo-randomness
/// Uses constants from Numerical Recipes (glibc)
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<u64>,
}

impl LcgRng {
    const MULTIPLIER: u64 = 1103515245;
    const INCREMENT: u64 = 12345;
    const MODULUS: u64 = 1 << 31;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Wrapping(seed % Self::MODULUS),
        }
    }

    /// Generate next value in range [0, 2^31)
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        self.state.0 & (Self::MODULUS - 1)
    }

    /// Generate value in range [0, max)
    pub fn next_index(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as usize
    }

    /// Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Mix a base seed with a stream index (xxhash64-style avalanche)
pub fn derive_seed(seed: u64, stream: u64) -> u64 {
    const PRIME1: u64 = 0x9E3779B185EBCA87;
    const PRIME2: u64 = 0xC2B2AE3D27D4EB4F;
    const PRIME5: u64 = 0x85EBCA77C2B2AE63;

    let mut h = seed.wrapping_add(PRIME5);
    h = h.wrapping_add(stream.wrapping_mul(PRIME1));
    h = h.rotate_left(17).wrapping_mul(PRIME2);

    h ^= h >> 33;
    h = h.wrapping_mul(PRIME1);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME2);
    h ^= h >> 32;

    h
}

/// Record indices partitioned into training and held-out subsets
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Split {
    /// Gather `values` at `indices`
    pub fn take<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
        indices.iter().map(|&i| values[i].clone()).collect()
    }
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * test_size)` indices.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<Split, TrainerError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TrainerError::DataQuality(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (n as f64 * test_size).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(TrainerError::DataQuality(format!(
            "{} samples cannot be split into non-empty train and test sets",
            n
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    LcgRng::new(seed).shuffle(&mut indices);

    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();

    Ok(Split { train, test })
}

/// Draw `n` indices from `0..n` with replacement
pub fn bootstrap_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = LcgRng::new(seed);
    (0..n).map(|_| rng.next_index(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_lcg_determinism() {
        let mut rng1 = LcgRng::new(42);
        let mut rng2 = LcgRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_lcg_range() {
        let mut rng = LcgRng::new(42);
        for _ in 0..100 {
            assert!(rng.next_index(10) < 10);
        }
    }

    #[test]
    fn test_derive_seed_streams_differ() {
        assert_eq!(derive_seed(42, 3), derive_seed(42, 3));
        assert_ne!(derive_seed(42, 3), derive_seed(42, 4));
        assert_ne!(derive_seed(42, 3), derive_seed(43, 3));
    }

    #[test]
    fn test_split_sizes_and_disjointness() {
        let split = train_test_split(10, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let all: BTreeSet<usize> = split.train.iter().chain(&split.test).copied().collect();
        assert_eq!(all, (0..10).collect());
    }

    #[test]
    fn test_split_rounds_test_size_up() {
        let split = train_test_split(11, 0.2, 42).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
    }

    #[test]
    fn test_split_reproducible() {
        assert_eq!(
            train_test_split(50, 0.2, 42).unwrap(),
            train_test_split(50, 0.2, 42).unwrap()
        );
        assert_ne!(
            train_test_split(50, 0.2, 42).unwrap(),
            train_test_split(50, 0.2, 7).unwrap()
        );
    }

    #[test]
    fn test_split_too_small() {
        assert!(matches!(
            train_test_split(1, 0.2, 42),
            Err(TrainerError::DataQuality(_))
        ));
        assert!(matches!(
            train_test_split(0, 0.2, 42),
            Err(TrainerError::DataQuality(_))
        ));
    }

    #[test]
    fn test_bootstrap_in_range() {
        let sample = bootstrap_indices(20, 9);
        assert_eq!(sample.len(), 20);
        assert!(sample.iter().all(|&i| i < 20));
        assert_eq!(sample, bootstrap_indices(20, 9));
    }
}
