//! Packed bit array with constant-time rank.
//!
//! Bits live in 64-bit words. An implicit partition into 256-bit blocks
//! (4 words) carries a precomputed cumulative popcount, so ranking a bit
//! costs one table read plus at most three word popcounts and one masked
//! popcount.

/// Bits per rank block.
pub const BLOCK_BITS: u64 = 256;
/// 64-bit words per rank block.
pub const BLOCK_WORDS: usize = 4;

/// Packed bits plus the per-block cumulative popcount.
#[derive(Debug, Clone)]
pub struct RankBitset {
    words: Box<[u64]>,
    block_ranks: Box<[u64]>,
}

impl RankBitset {
    /// Wrap packed words and precompute the block ranks.
    pub fn new(words: Vec<u64>) -> Self {
        let nblocks = words.len().div_ceil(BLOCK_WORDS);
        let mut block_ranks = Vec::with_capacity(nblocks);
        let mut total = 0u64;
        for block in 0..nblocks {
            block_ranks.push(total);
            let start = block * BLOCK_WORDS;
            let end = (start + BLOCK_WORDS).min(words.len());
            for word in &words[start..end] {
                total += u64::from(word.count_ones());
            }
        }

        Self {
            words: words.into_boxed_slice(),
            block_ranks: block_ranks.into_boxed_slice(),
        }
    }

    pub fn len_bits(&self) -> u64 {
        self.words.len() as u64 * 64
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Total set bits in the first `nwords` words.
    pub fn count_ones_in_words(&self, nwords: usize) -> u64 {
        self.words[..nwords]
            .iter()
            .map(|w| u64::from(w.count_ones()))
            .sum()
    }

    /// Whether the bit at absolute index `bit` is set. Out-of-range
    /// indices read as unset.
    #[inline]
    pub fn get(&self, bit: u64) -> bool {
        let word = (bit / 64) as usize;
        if word >= self.words.len() {
            return false;
        }
        (self.words[word] >> (bit % 64)) & 1 == 1
    }

    /// Number of set bits at positions strictly below `bit`, which must
    /// be in range.
    #[inline]
    pub fn rank(&self, bit: u64) -> u64 {
        let word = (bit / 64) as usize;
        let shift = bit % 64;
        let block = (bit / BLOCK_BITS) as usize;

        let mut rank = self.block_ranks[block];
        for w in &self.words[block * BLOCK_WORDS..word] {
            rank += u64::from(w.count_ones());
        }
        let mask = (1u64 << shift) - 1;
        rank + u64::from((self.words[word] & mask).count_ones())
    }
}
