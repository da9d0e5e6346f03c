//! Minimal perfect hashing over byte-string keys.
//!
//! A cascading-bitset construction: each level hashes the still-unplaced
//! keys into a fresh power-of-two bitset, keys that land alone are
//! placed, the rest cascade down with an independent hash. Ranks come
//! from popcount prefixes over the concatenated bitsets, so a frozen
//! [`Mphf`] answers `rank(key)` in constant expected time without
//! allocating.

pub mod bitset;
pub mod builder;
pub mod hasher;
pub mod mph;
pub mod rng;

pub use bitset::RankBitset;
pub use builder::{MphfBuilder, DEFAULT_LEVELS};
pub use hasher::{
    CachingMultiHasher, Fnv64, Hash64, Multiplied, MultiHasher, SeededHash64, Wy64, Xx64,
    MAX_LEVELS, MIN_LEVELS,
};
pub use mph::{FilterLayout, Mphf, NOT_FOUND};
pub use rng::{device_seed, SplitMix64, Xoroshiro128};
