//! Public Suffix List machinery: rule loading, the suffix tree, and the
//! frozen matcher that applies the rule algebra to domain names.

pub mod matcher;
pub mod parser;
pub mod tree;

pub use matcher::{lookup_in, MatchNode, SuffixMatcher, SuffixNode, MAX_NAME_LEN};
pub use parser::{add_rules, add_rules_file, load_rules, load_rules_file};
pub use tree::{Suffix, SuffixRoot};

/// PSL rule kind, wire-visible in emitted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Interior node with no rule of its own.
    Default,
    /// Literal list entry.
    Regular,
    /// Leading `!` entry; shortens the public suffix by one label.
    Exception,
}
