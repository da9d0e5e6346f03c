//! Cascade construction for the minimal perfect hash.
//!
//! Each level hashes every still-unplaced key into a fresh power-of-two
//! bitset. Keys that land alone own their bit and are placed; keys that
//! collide cascade to the next level with an independent hash. The
//! handful of keys no level can place fall into an auxiliary map.

use std::collections::HashSet;

use log::{debug, warn};

use crate::error::{PslError, Result};
use crate::mphf::hasher::{MultiHasher, SeededHash64, MAX_LEVELS, MIN_LEVELS};
use crate::mphf::mph::{FilterLayout, Mphf};

/// Cascade depth used when the caller does not pick one.
pub const DEFAULT_LEVELS: usize = 16;

/// Builder for [`Mphf`].
///
/// ```
/// use psl_engine::mphf::{MphfBuilder, Wy64};
///
/// let mut builder = MphfBuilder::new(Wy64::new(), 2.0, 1);
/// for key in ["a", "b", "c"] {
///     builder.insert(key);
/// }
/// let mph = builder.build().unwrap();
/// assert_eq!(mph.size(), 3);
/// ```
pub struct MphfBuilder<H> {
    base: H,
    gamma: f64,
    seed: u64,
    nlevels: usize,
    use_filter: bool,
    fallback_limit: Option<f64>,
    keys: HashSet<Vec<u8>>,
}

impl<H: SeededHash64> MphfBuilder<H> {
    /// `gamma` is the bits-per-key loading factor of each level;
    /// 2.0 to 4.0 is the practical range. `seed` pins the hash seeds, so
    /// equal `(seed, keys)` always reproduce the same tables.
    pub fn new(base: H, gamma: f64, seed: u64) -> Self {
        Self {
            base,
            gamma,
            seed,
            nlevels: DEFAULT_LEVELS,
            use_filter: true,
            fallback_limit: None,
            keys: HashSet::new(),
        }
    }

    /// Number of cascade levels, clamped to `[2, 256]`.
    pub fn levels(mut self, count: usize) -> Self {
        self.nlevels = count.clamp(MIN_LEVELS, MAX_LEVELS);
        self
    }

    /// Toggle the absent-key collision filter appended after the
    /// cascade. On by default.
    pub fn filter(mut self, enable: bool) -> Self {
        self.use_filter = enable;
        self
    }

    /// Fail the build when more than `fraction` of the keys end up in
    /// the fallback map.
    pub fn fallback_limit(mut self, fraction: f64) -> Self {
        self.fallback_limit = Some(fraction);
        self
    }

    /// Inserting the same key twice is idempotent.
    pub fn insert(&mut self, key: impl AsRef<[u8]>) {
        self.keys.insert(key.as_ref().to_vec());
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Freeze the key set into an evaluator.
    pub fn build(self) -> Result<Mphf<H>> {
        let total_keys = self.keys.len();
        let hasher = MultiHasher::new(self.base, self.nlevels, self.seed);
        let count = hasher.count();

        let filter_bits = if self.use_filter && total_keys > 0 {
            (total_keys * 2).max(64).next_power_of_two() as u64
        } else {
            0
        };
        let mut filter_words = vec![0u64; (filter_bits / 64) as usize];

        let mut remaining: Vec<Vec<u8>> = self.keys.into_iter().collect();
        let mut levels = vec![0u64; count];
        let mut level_words: Vec<Vec<u64>> = Vec::new();

        for level in 0..count {
            if remaining.is_empty() {
                break;
            }

            let size = ((remaining.len() as f64 * self.gamma) as usize)
                .max(64)
                .next_power_of_two() as u64;

            // First pass: each index ends up empty, owned by exactly one
            // key, or collided.
            let mut placed = vec![0u64; (size / 64) as usize];
            let mut collided = vec![0u64; (size / 64) as usize];
            for key in &remaining {
                let index = hasher.hash(key, level) & (size - 1);
                if get_bit(&collided, index) {
                    continue;
                }
                if !get_bit(&placed, index) {
                    set_bit(&mut placed, index);
                } else {
                    clear_bit(&mut placed, index);
                    set_bit(&mut collided, index);
                }
            }

            // Second pass: extract the owners; everyone else cascades.
            // Keys failing the first two levels leave a mark in the
            // filter so absent-key queries can stop early.
            let before = remaining.len();
            remaining.retain(|key| {
                let hash = hasher.hash(key, level);
                if get_bit(&placed, hash & (size - 1)) {
                    return false;
                }
                if level < 2 && filter_bits != 0 {
                    set_bit(&mut filter_words, hash & (filter_bits - 1));
                }
                true
            });

            debug!(
                "level {}: placed {} of {} keys in {} bits",
                level,
                before - remaining.len(),
                before,
                size
            );

            levels[level] = size;
            level_words.push(placed);
        }

        let used_levels = level_words.len();
        let mut words: Vec<u64> = level_words.into_iter().flatten().collect();
        let cascade_words = words.len();

        let filter = if self.use_filter && used_levels > 1 {
            words.extend_from_slice(&filter_words);
            Some(FilterLayout {
                offset_words: cascade_words,
                bits: filter_bits,
            })
        } else {
            None
        };

        if !remaining.is_empty() {
            warn!(
                "fallback map holds {} of {} keys (gamma {})",
                remaining.len(),
                total_keys,
                self.gamma
            );
            if let Some(limit) = self.fallback_limit {
                if remaining.len() as f64 > total_keys as f64 * limit {
                    return Err(PslError::FallbackOverLimit {
                        count: remaining.len(),
                        total: total_keys,
                    });
                }
            }
        }

        // Fallback ranks continue after the cascade ranks; sorting the
        // leftovers keeps the assignment reproducible.
        remaining.sort_unstable();
        let cascade_ones: u64 = words[..cascade_words]
            .iter()
            .map(|w| u64::from(w.count_ones()))
            .sum();
        let fallback = remaining
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key, cascade_ones + i as u64))
            .collect();

        Mphf::from_parts(hasher, levels, words, filter, fallback)
    }
}

fn get_bit(words: &[u64], bit: u64) -> bool {
    (words[(bit / 64) as usize] >> (bit % 64)) & 1 == 1
}

fn set_bit(words: &mut [u64], bit: u64) {
    words[(bit / 64) as usize] |= 1u64 << (bit % 64);
}

fn clear_bit(words: &mut [u64], bit: u64) {
    words[(bit / 64) as usize] &= !(1u64 << (bit % 64));
}
