use thiserror::Error;

/// PSL engine error types
#[derive(Error, Debug)]
pub enum PslError {
    #[error("Parse error at line {line}: {message}")]
    ParseErrorAtLine { line: usize, message: String },

    #[error("Duplicate name with conflicting rule: {0}")]
    DuplicateName(String),

    #[error("Domain name too long: {0} bytes")]
    NameTooLong(usize),

    #[error("Invalid level size {0}: must be zero or a power of two no smaller than 64")]
    InvalidLevelSize(u64),

    #[error("Seed count {seeds} does not match level count {levels}")]
    SeedCountMismatch { seeds: usize, levels: usize },

    #[error("Minimal perfect hash misindexed rank {rank} for a table of {size} entries")]
    RankOutOfRange { rank: u64, size: usize },

    #[error("Fallback map holds {count} of {total} keys, over the configured limit")]
    FallbackOverLimit { count: usize, total: usize },

    #[error("Invalid character {0:#04x} in trie key")]
    InvalidTrieChar(u8),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PslError>;
