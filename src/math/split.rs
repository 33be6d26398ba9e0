//! Seeded train/test partition of row positions.
//!
//! The held-out size is `ceil(test_fraction × n)`; the rest is used for training.
//! Rows are assigned from a single shuffled permutation of `0..n`, so identical
//! inputs and seed always produce the identical partition.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::Split;

/// Number of held-out rows for `n` rows at `test_fraction`.
pub fn test_size(n: usize, test_fraction: f64) -> usize {
    let k = (test_fraction * n as f64).ceil();
    if k.is_finite() && k > 0.0 {
        (k as usize).min(n)
    } else {
        0
    }
}

/// Partition positions `0..n` into train and test sets.
///
/// Both sets keep the shuffled order (the first `test_size` permuted positions
/// are held out).
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Split {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(&mut rng);

    let n_test = test_size(n, test_fraction);
    let train = perm.split_off(n_test);
    Split { train, test: perm }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_rounds_up() {
        assert_eq!(test_size(5, 0.2), 1);
        assert_eq!(test_size(11, 0.2), 3);
        assert_eq!(test_size(34, 0.2), 7);
        assert_eq!(test_size(0, 0.2), 0);
    }

    #[test]
    fn split_is_a_partition() {
        let split = train_test_split(34, 0.2, 42);
        assert_eq!(split.test.len(), 7);
        assert_eq!(split.train.len(), 27);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..34).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        assert_eq!(train_test_split(20, 0.2, 42), train_test_split(20, 0.2, 42));
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = train_test_split(50, 0.2, 1);
        let b = train_test_split(50, 0.2, 2);
        assert_ne!(a, b);
    }
}
