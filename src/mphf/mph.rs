//! The frozen minimal perfect hash evaluator.
//!
//! An [`Mphf`] is an immutable snapshot of the cascade: per-level bitset
//! sizes, the concatenated bitset with its block ranks, an optional
//! absent-key filter, and the fallback map for keys no level could
//! place. Queries never mutate it, so a frozen value can be shared
//! across threads freely.

use std::collections::HashMap;

use crate::error::{PslError, Result};
use crate::mphf::bitset::RankBitset;
use crate::mphf::hasher::{MultiHasher, SeededHash64};

/// Sentinel rank for keys outside the set.
pub const NOT_FOUND: u64 = u64::MAX;

/// Location of the collision filter inside the backing words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterLayout {
    /// First filter word, right after the cascade words.
    pub offset_words: usize,
    /// Filter size in bits, a power of two.
    pub bits: u64,
}

/// A frozen minimal perfect hash over byte-string keys.
#[derive(Debug, Clone)]
pub struct Mphf<H> {
    hasher: MultiHasher<H>,
    levels: Box<[u64]>,
    bitset: RankBitset,
    filter: Option<FilterLayout>,
    fallback: HashMap<Vec<u8>, u64>,
    cascade_ones: u64,
    max_rank: u64,
}

impl<H: SeededHash64> Mphf<H> {
    /// Assemble an evaluator from recorded parts, validating the level
    /// geometry. This is the reconstruction entry used by emitted
    /// tables as well as by the builder.
    pub fn from_parts(
        hasher: MultiHasher<H>,
        levels: Vec<u64>,
        words: Vec<u64>,
        filter: Option<FilterLayout>,
        fallback: Vec<(Vec<u8>, u64)>,
    ) -> Result<Self> {
        if hasher.count() != levels.len() {
            return Err(PslError::SeedCountMismatch {
                seeds: hasher.count(),
                levels: levels.len(),
            });
        }
        for &size in &levels {
            if size != 0 && (!size.is_power_of_two() || size < 64) {
                return Err(PslError::InvalidLevelSize(size));
            }
        }

        let cascade_bits: u64 = levels.iter().sum();
        let cascade_words = (cascade_bits / 64) as usize;
        if cascade_words > words.len() {
            return Err(PslError::InvalidLevelSize(cascade_bits));
        }
        if let Some(f) = filter {
            let end_bits = f.offset_words as u64 * 64 + f.bits;
            if !f.bits.is_power_of_two()
                || f.offset_words != cascade_words
                || end_bits > words.len() as u64 * 64
            {
                return Err(PslError::InvalidLevelSize(f.bits));
            }
        }

        let bitset = RankBitset::new(words);
        let cascade_ones = bitset.count_ones_in_words(cascade_words);

        let mut max_rank = cascade_ones;
        let mut map = HashMap::with_capacity(fallback.len());
        for (key, rank) in fallback {
            max_rank = max_rank.max(rank + 1);
            map.insert(key, rank);
        }

        Ok(Self {
            hasher,
            levels: levels.into_boxed_slice(),
            bitset,
            filter,
            fallback: map,
            cascade_ones,
            max_rank,
        })
    }

    /// Rank of `key`, or [`NOT_FOUND`].
    ///
    /// Walks the cascade until the key's bit is set at some level. The
    /// filter short-circuits absent keys after levels 0 and 1: a key
    /// that really cascaded past those levels left a filter mark during
    /// construction, so a clear filter bit proves absence.
    pub fn rank(&self, key: &[u8]) -> u64 {
        let mut base = 0u64;
        for (level, &size) in self.levels.iter().enumerate() {
            if size == 0 {
                continue;
            }

            let hash = self.hasher.hash(key, level);
            let bit = base + (hash & (size - 1));
            if self.bitset.get(bit) {
                return self.bitset.rank(bit);
            }

            if level < 2 {
                if let Some(f) = self.filter {
                    let fbit = f.offset_words as u64 * 64 + (hash & (f.bits - 1));
                    if !self.bitset.get(fbit) {
                        return NOT_FOUND;
                    }
                }
            }

            base += size;
        }

        if !self.fallback.is_empty() {
            if let Some(&rank) = self.fallback.get(key) {
                return rank;
            }
        }

        NOT_FOUND
    }

    /// Option-flavored [`rank`](Self::rank).
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        match self.rank(key) {
            NOT_FOUND => None,
            rank => Some(rank),
        }
    }

    /// Number of keys the function covers; ranks are dense in
    /// `[0, size())`.
    pub fn size(&self) -> u64 {
        self.max_rank
    }

    pub fn is_empty(&self) -> bool {
        self.max_rank == 0
    }

    /// Keys placed by the cascade (the rest live in the fallback map).
    pub fn cascade_len(&self) -> u64 {
        self.cascade_ones
    }

    pub fn fallback_len(&self) -> usize {
        self.fallback.len()
    }

    pub fn seeds(&self) -> &[u64] {
        self.hasher.seeds()
    }

    pub fn levels(&self) -> &[u64] {
        &self.levels
    }

    pub fn words(&self) -> &[u64] {
        self.bitset.words()
    }

    pub fn filter(&self) -> Option<FilterLayout> {
        self.filter
    }

    /// Fallback entries ordered by rank, for emission.
    pub fn fallback_pairs(&self) -> Vec<(&[u8], u64)> {
        let mut pairs: Vec<(&[u8], u64)> = self
            .fallback
            .iter()
            .map(|(key, &rank)| (key.as_slice(), rank))
            .collect();
        pairs.sort_by_key(|&(_, rank)| rank);
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mphf::hasher::Wy64;

    #[test]
    fn test_from_parts_rejects_bad_level_size() {
        let cases = [vec![63, 0], vec![65, 0], vec![64, 96]];
        for levels in cases {
            let hasher = MultiHasher::new(Wy64::new(), levels.len(), 1);
            let words = vec![0u64; 4];
            let err = Mphf::from_parts(hasher, levels.clone(), words, None, Vec::new());
            assert!(
                matches!(err, Err(PslError::InvalidLevelSize(_))),
                "levels {levels:?} must be rejected"
            );
        }
    }

    #[test]
    fn test_from_parts_rejects_seed_mismatch() {
        let hasher = MultiHasher::new(Wy64::new(), 4, 1);
        let err = Mphf::from_parts(hasher, vec![64, 0], vec![0u64], None, Vec::new());
        assert!(matches!(err, Err(PslError::SeedCountMismatch { .. })));
    }

    #[test]
    fn test_empty_function() {
        let hasher = MultiHasher::new(Wy64::new(), 2, 1);
        let mph = Mphf::from_parts(hasher, vec![0, 0], Vec::new(), None, Vec::new()).unwrap();
        assert_eq!(mph.size(), 0);
        assert!(mph.is_empty());
        assert_eq!(mph.rank(b"anything"), NOT_FOUND);
        assert_eq!(mph.get(b"anything"), None);
    }

    #[test]
    fn test_fallback_only_function() {
        let hasher = MultiHasher::new(Wy64::new(), 2, 1);
        let fallback = vec![(b"a".to_vec(), 0), (b"b".to_vec(), 1)];
        let mph = Mphf::from_parts(hasher, vec![0, 0], Vec::new(), None, fallback).unwrap();
        assert_eq!(mph.size(), 2);
        assert_eq!(mph.rank(b"a"), 0);
        assert_eq!(mph.rank(b"b"), 1);
        assert_eq!(mph.rank(b"c"), NOT_FOUND);
        assert_eq!(mph.fallback_len(), 2);
    }
}
