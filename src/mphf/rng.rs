//! Deterministic seed streams for the hash cascade.
//!
//! [`SplitMix64`] expands a single 64-bit seed into a stream;
//! [`Xoroshiro128`] is seeded from it and produces the per-level hash
//! seeds. [`device_seed`] supplies a fresh nondeterministic seed when the
//! caller does not pin one. The determinism contract of the whole engine
//! rests here: identical seeds yield identical seed arrays and therefore
//! identical emitted tables.

use rand::rngs::OsRng;
use rand::RngCore;

/// splitmix64: 64 bits of state, one output per step.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

/// xoroshiro128+: 128 bits of state, seeded through [`SplitMix64`].
#[derive(Debug, Clone)]
pub struct Xoroshiro128 {
    s: [u64; 2],
}

impl Xoroshiro128 {
    pub fn new(seed: u64) -> Self {
        let mut seeder = SplitMix64::new(seed);
        let s0 = seeder.next();
        let s1 = seeder.next();
        Self { s: [s0, s1] }
    }

    pub fn from_state(s0: u64, s1: u64) -> Self {
        Self { s: [s0, s1] }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u64 {
        let s0 = self.s[0];
        let mut s1 = self.s[1];
        let value = s0.wrapping_add(s1);

        s1 ^= s0;
        self.s[0] = s0.rotate_left(55) ^ s1 ^ (s1 << 14);
        self.s[1] = s1.rotate_left(36);

        value
    }

    /// Advance the stream by 2^64 steps. Distinct jumps yield
    /// non-overlapping subsequences, usable as independent seed streams.
    pub fn jump(&mut self) {
        const JUMP: [u64; 2] = [0xBEAC_0467_EBA5_FACB, 0xD86B_048B_86AA_9922];

        let mut s0 = 0u64;
        let mut s1 = 0u64;
        for j in JUMP {
            for b in 0..64 {
                if j & (1u64 << b) != 0 {
                    s0 ^= self.s[0];
                    s1 ^= self.s[1];
                }
                self.next();
            }
        }

        self.s = [s0, s1];
    }
}

/// A fresh 64-bit seed from the operating system entropy source.
pub fn device_seed() -> u64 {
    OsRng.next_u64()
}
