//! Seeded permutations over `[0, n)` for reordering one batch of records.
//!
//! A [`ShuffleContext`] is built once per batch from a batch size and a seed,
//! and answers `shuffle_index(i)` for every `i < batch_size`. The mapping is a
//! bijection: every index in the batch appears exactly once in the output.
//!
//! The generator is HC-128 seeded from a single `u64`. The seed is expected to
//! come from a wall-clock reading, which is low-entropy and observable, so the
//! resulting order must not be relied on for anything security-sensitive.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_hc::Hc128Rng;

/// A uniformly random permutation of `[0, batch_size)`.
///
/// The permutation table is allocated once during construction; lookups do
/// not allocate.
#[derive(Debug, Clone)]
pub struct ShuffleContext {
    /// Seed the permutation was generated from.
    seed: u64,
    /// `perm[i]` is the source index emitted at position `i`.
    perm: Vec<usize>,
}

impl ShuffleContext {
    /// Build the permutation for a batch of `batch_size` items.
    ///
    /// Runs a Fisher-Yates shuffle over the identity permutation, so every
    /// ordering of the batch is equally likely for a given generator stream.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the permutation table cannot be
    /// reserved.
    pub fn new(batch_size: usize, seed: u64) -> Result<Self, TryReserveError> {
        let mut perm = Vec::new();
        perm.try_reserve_exact(batch_size)?;
        perm.extend(0..batch_size);

        let mut rng = Hc128Rng::seed_from_u64(seed);
        perm.shuffle(&mut rng);

        Ok(Self { seed, perm })
    }

    /// Number of items the permutation covers.
    pub fn batch_size(&self) -> usize {
        self.perm.len()
    }

    /// The seed this permutation was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Source index to emit at output position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= batch_size()`.
    pub fn shuffle_index(&self, i: usize) -> usize {
        assert!(
            i < self.perm.len(),
            "shuffle_index {} out of range for batch of {}",
            i,
            self.perm.len()
        );
        self.perm[i]
    }

    /// Reorder `items` so that output position `i` holds
    /// `items[shuffle_index(i)]`.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the output cannot be reserved.
    ///
    /// # Panics
    ///
    /// Panics if `items.len() != batch_size()`.
    pub fn permute<T: Copy>(&self, items: &[T]) -> Result<Vec<T>, TryReserveError> {
        assert_eq!(
            items.len(),
            self.perm.len(),
            "permute called with {} items for a batch of {}",
            items.len(),
            self.perm.len()
        );

        let mut out = Vec::new();
        out.try_reserve_exact(items.len())?;
        out.extend(self.perm.iter().map(|&src| items[src]));
        Ok(out)
    }

    /// Iterate over `shuffle_index(0), shuffle_index(1), ...`.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.perm.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_bijection(ctx: &ShuffleContext) -> bool {
        let mut seen = vec![false; ctx.batch_size()];
        for j in ctx.iter() {
            if j >= seen.len() || seen[j] {
                return false;
            }
            seen[j] = true;
        }
        seen.iter().all(|&s| s)
    }

    #[test]
    fn test_empty_batch() {
        let ctx = ShuffleContext::new(0, 1).unwrap();
        assert_eq!(ctx.batch_size(), 0);
        assert_eq!(ctx.iter().len(), 0);
    }

    #[test]
    fn test_single_item() {
        let ctx = ShuffleContext::new(1, 12345).unwrap();
        assert_eq!(ctx.shuffle_index(0), 0);
    }

    #[test]
    fn test_bijection_for_many_sizes_and_seeds() {
        for size in [2, 3, 5, 17, 64, 1000] {
            for seed in [0, 1, 999_999, u64::MAX] {
                let ctx = ShuffleContext::new(size, seed).unwrap();
                assert_eq!(ctx.batch_size(), size);
                assert!(is_bijection(&ctx), "size {} seed {}", size, seed);
            }
        }
    }

    #[test]
    fn test_same_seed_same_permutation() {
        let a = ShuffleContext::new(50, 777).unwrap();
        let b = ShuffleContext::new(50, 777).unwrap();
        assert!(a.iter().eq(b.iter()));
        assert_eq!(a.seed(), 777);
    }

    #[test]
    fn test_different_seeds_differ() {
        // 50! orderings; two seeds colliding here would mean a broken generator
        let a = ShuffleContext::new(50, 1).unwrap();
        let b = ShuffleContext::new(50, 2).unwrap();
        assert!(!a.iter().eq(b.iter()));
    }

    #[test]
    fn test_identity_is_rare() {
        let identity_count = (0..200u64)
            .filter(|&seed| {
                let ctx = ShuffleContext::new(6, seed).unwrap();
                ctx.iter().enumerate().all(|(i, j)| i == j)
            })
            .count();
        // Expected about 200 / 720
        assert!(identity_count <= 5, "identity came up {} times", identity_count);
    }

    #[test]
    fn test_every_position_reached() {
        // For a 4-item batch, each source index should land in position 0 for
        // some seed.
        let mut hit = [false; 4];
        for seed in 0..200 {
            let ctx = ShuffleContext::new(4, seed).unwrap();
            hit[ctx.shuffle_index(0)] = true;
        }
        assert_eq!(hit, [true; 4]);
    }

    #[test]
    fn test_permute() {
        let ctx = ShuffleContext::new(5, 31337).unwrap();
        let items = [10u32, 20, 30, 40, 50];
        let out = ctx.permute(&items).unwrap();

        for (i, &v) in out.iter().enumerate() {
            assert_eq!(v, items[ctx.shuffle_index(i)]);
        }
        let mut sorted = out.clone();
        sorted.sort();
        assert_eq!(sorted, items);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_shuffle_index_out_of_range_panics() {
        let ctx = ShuffleContext::new(3, 0).unwrap();
        ctx.shuffle_index(3);
    }

    #[test]
    #[should_panic(expected = "permute called with")]
    fn test_permute_wrong_length_panics() {
        let ctx = ShuffleContext::new(3, 0).unwrap();
        let _ = ctx.permute(&[1, 2]);
    }
}
