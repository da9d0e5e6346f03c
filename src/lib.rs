//! PSL Engine - A compile-time static lookup generator for Rust
//!
//! This library ingests a set of textual keys (concretely, the Public
//! Suffix List of DNS labels) and produces:
//! - A minimal perfect hash function over the key set, built as a
//!   cascading bitset with constant-time rank queries
//! - A suffix-tree matcher applying the PSL rule algebra (regular,
//!   exception, wildcard) to arbitrary domain names
//! - Self-contained Rust source tables an ahead-of-time-compiled
//!   consumer can query without allocating
//!
//! # Example
//!
//! ```rust
//! use psl_engine::mphf::Wy64;
//! use psl_engine::psl::{load_rules, SuffixMatcher};
//!
//! let rules = "
//! // A miniature suffix list.
//! com
//! uk
//! co.uk
//! *.ck
//! !www.ck
//! ";
//!
//! let root = load_rules(rules).unwrap();
//! let matcher = SuffixMatcher::build(&root, Wy64::new(), 3.0, 42).unwrap();
//!
//! assert_eq!(matcher.lookup("example.com").unwrap(), "com");
//! assert_eq!(matcher.lookup("foo.bar.co.uk").unwrap(), "co.uk");
//! assert_eq!(matcher.lookup("example.ck").unwrap(), "example.ck");
//! assert_eq!(matcher.lookup("www.ck").unwrap(), "ck");
//! ```
//!
//! # Rule Syntax
//!
//! One rule per line, in the Public Suffix List format:
//!
//! | Form | Example | Meaning |
//! |------|---------|---------|
//! | Name | `co.uk` | The name is a public suffix |
//! | Wildcard | `*.ck` | Any label in that position is a public suffix |
//! | Exception | `!www.ck` | Shortens the matched suffix by one label |
//!
//! Lines starting with `/` are comments; everything after the first
//! white space on a line is ignored. International names must already
//! be in their ASCII (punycode) form.
//!
//! The minimal perfect hash is usable on its own through
//! [`mphf::MphfBuilder`], with any hasher implementing
//! [`mphf::SeededHash64`].

pub mod emit;
pub mod error;
pub mod mphf;
pub mod psl;

// Re-export commonly used items
pub use error::{PslError, Result};
pub use mphf::{Mphf, MphfBuilder, MultiHasher, NOT_FOUND};
pub use psl::{load_rules, load_rules_file, Rule, SuffixMatcher};
