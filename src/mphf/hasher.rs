//! Hash functors and the per-level multi-hasher.
//!
//! The cascade needs N independent 64-bit hash values per key. A hasher
//! that accepts a seed gets one seed per level; an unseeded hasher is
//! adapted through [`Multiplied`], which folds the seed in by
//! multiplication. The multiplicative adaptation is weaker: low bits of
//! `h(key) * seed` stay correlated across levels, so callers wanting real
//! independence should supply a seedable hash.

use crate::mphf::rng::Xoroshiro128;

/// Fewest cascade levels a hasher will carry seeds for.
pub const MIN_LEVELS: usize = 2;
/// Most cascade levels a hasher will carry seeds for.
pub const MAX_LEVELS: usize = 256;

/// An unseeded 64-bit hash over a byte string.
pub trait Hash64 {
    fn hash(&self, key: &[u8]) -> u64;
}

/// A seeded 64-bit hash family over byte strings.
///
/// Contract: the result is pure and stable for the same `(key, seed)`.
pub trait SeededHash64 {
    fn hash_with_seed(&self, key: &[u8], seed: u64) -> u64;
}

/// wyhash with an explicit seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wy64;

impl Wy64 {
    pub const NAME: &'static str = "Wy64";

    pub const fn new() -> Self {
        Self
    }
}

impl SeededHash64 for Wy64 {
    #[inline]
    fn hash_with_seed(&self, key: &[u8], seed: u64) -> u64 {
        wyhash::wyhash(key, seed)
    }
}

/// XXH3 with an explicit seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xx64;

impl Xx64 {
    pub const NAME: &'static str = "Xx64";

    pub const fn new() -> Self {
        Self
    }
}

impl SeededHash64 for Xx64 {
    #[inline]
    fn hash_with_seed(&self, key: &[u8], seed: u64) -> u64 {
        xxhash_rust::xxh3::xxh3_64_with_seed(key, seed)
    }
}

/// FNV-1a. The seeded form uses the seed as the initial basis, the
/// unseeded form starts from the standard offset basis.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv64;

impl Fnv64 {
    pub const NAME: &'static str = "Fnv64";

    const INIT: u64 = 0xCBF2_9CE4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub const fn new() -> Self {
        Self
    }
}

impl SeededHash64 for Fnv64 {
    #[inline]
    fn hash_with_seed(&self, key: &[u8], seed: u64) -> u64 {
        let mut hval = seed;
        for &b in key {
            hval ^= b as u64;
            hval = hval.wrapping_mul(Self::PRIME);
        }
        hval
    }
}

impl Hash64 for Fnv64 {
    #[inline]
    fn hash(&self, key: &[u8]) -> u64 {
        self.hash_with_seed(key, Self::INIT)
    }
}

/// Adapts an unseeded hash into a seeded family by multiplying the hash
/// by the seed. Documented weakness: the per-level values share their
/// low-bit structure, so collisions repeat across levels more often than
/// with a genuinely seedable hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiplied<H>(pub H);

impl<H: Hash64> SeededHash64 for Multiplied<H> {
    #[inline]
    fn hash_with_seed(&self, key: &[u8], seed: u64) -> u64 {
        self.0.hash(key).wrapping_mul(seed)
    }
}

/// Presents `count` hash values per key by pairing a base hasher with a
/// fixed seed array.
#[derive(Debug, Clone)]
pub struct MultiHasher<H> {
    base: H,
    seeds: Box<[u64]>,
}

impl<H> MultiHasher<H> {
    /// Draw `count` seeds (clamped to `[MIN_LEVELS, MAX_LEVELS]`) from
    /// the xoroshiro stream for `seed`.
    pub fn new(base: H, count: usize, seed: u64) -> Self {
        let count = count.clamp(MIN_LEVELS, MAX_LEVELS);
        let mut rng = Xoroshiro128::new(seed);
        let seeds = (0..count).map(|_| rng.next()).collect();
        Self { base, seeds }
    }

    /// Rebuild from a recorded seed array, e.g. out of emitted tables.
    pub fn with_seeds(base: H, seeds: Vec<u64>) -> Self {
        Self {
            base,
            seeds: seeds.into_boxed_slice(),
        }
    }

    pub fn count(&self) -> usize {
        self.seeds.len()
    }

    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }
}

impl<H: SeededHash64> MultiHasher<H> {
    #[inline]
    pub fn hash(&self, key: &[u8], level: usize) -> u64 {
        self.base.hash_with_seed(key, self.seeds[level])
    }
}

/// Remembers the current key and computes each level's hash at most
/// once. Holds mutable scratch, so this is a per-thread convenience;
/// the shared query path uses [`MultiHasher`] directly.
#[derive(Debug, Clone)]
pub struct CachingMultiHasher<H> {
    inner: MultiHasher<H>,
    key: Vec<u8>,
    computed: Box<[bool]>,
    values: Box<[u64]>,
}

impl<H: SeededHash64> CachingMultiHasher<H> {
    pub fn new(inner: MultiHasher<H>) -> Self {
        let count = inner.count();
        Self {
            inner,
            key: Vec::new(),
            computed: vec![false; count].into_boxed_slice(),
            values: vec![0; count].into_boxed_slice(),
        }
    }

    /// Switch to a new key, invalidating the cached values.
    pub fn set_key(&mut self, key: &[u8]) {
        if self.key != key {
            self.key.clear();
            self.key.extend_from_slice(key);
            self.computed.fill(false);
        }
    }

    pub fn hash(&mut self, level: usize) -> u64 {
        if !self.computed[level] {
            self.values[level] = self.inner.hash(&self.key, level);
            self.computed[level] = true;
        }
        self.values[level]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv_known_value() {
        // FNV-1a of "a" from the reference test suite.
        assert_eq!(Fnv64::new().hash(b"a"), 0xAF63_DC4C_8601_EC8C);
    }

    #[test]
    fn test_seeded_hashers_differ_by_seed() {
        let key = b"example";
        assert_ne!(
            Wy64::new().hash_with_seed(key, 1),
            Wy64::new().hash_with_seed(key, 2)
        );
        assert_ne!(
            Xx64::new().hash_with_seed(key, 1),
            Xx64::new().hash_with_seed(key, 2)
        );
        assert_ne!(
            Fnv64::new().hash_with_seed(key, 1),
            Fnv64::new().hash_with_seed(key, 2)
        );
    }

    #[test]
    fn test_multiplied_adapter() {
        let h = Multiplied(Fnv64::new());
        let plain = Fnv64::new().hash(b"key");
        assert_eq!(h.hash_with_seed(b"key", 3), plain.wrapping_mul(3));
    }

    #[test]
    fn test_multi_hasher_level_independence() {
        let hasher = MultiHasher::new(Wy64::new(), 8, 42);
        assert_eq!(hasher.count(), 8);

        let values: Vec<u64> = (0..8).map(|l| hasher.hash(b"key", l)).collect();
        let distinct: std::collections::HashSet<_> = values.iter().collect();
        assert!(distinct.len() > 1, "levels must not all collide");
    }

    #[test]
    fn test_multi_hasher_count_clamped() {
        assert_eq!(MultiHasher::new(Wy64::new(), 0, 1).count(), MIN_LEVELS);
        assert_eq!(MultiHasher::new(Wy64::new(), 1000, 1).count(), MAX_LEVELS);
    }

    #[test]
    fn test_multi_hasher_deterministic_seeds() {
        let a = MultiHasher::new(Wy64::new(), 16, 7);
        let b = MultiHasher::new(Wy64::new(), 16, 7);
        assert_eq!(a.seeds(), b.seeds());

        let c = MultiHasher::new(Wy64::new(), 16, 8);
        assert_ne!(a.seeds(), c.seeds());
    }

    #[test]
    fn test_with_seeds_round_trip() {
        let a = MultiHasher::new(Xx64::new(), 4, 99);
        let b = MultiHasher::with_seeds(Xx64::new(), a.seeds().to_vec());
        for level in 0..4 {
            assert_eq!(a.hash(b"round", level), b.hash(b"round", level));
        }
    }

    #[test]
    fn test_caching_hasher_agrees() {
        let inner = MultiHasher::new(Wy64::new(), 8, 5);
        let mut caching = CachingMultiHasher::new(inner.clone());

        caching.set_key(b"first");
        for level in 0..8 {
            assert_eq!(caching.hash(level), inner.hash(b"first", level));
        }
        // Repeat reads hit the cache and must not drift.
        for level in 0..8 {
            assert_eq!(caching.hash(level), inner.hash(b"first", level));
        }

        caching.set_key(b"second");
        for level in 0..8 {
            assert_eq!(caching.hash(level), inner.hash(b"second", level));
        }
    }
}
