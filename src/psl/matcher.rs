//! Frozen matcher applying the public-suffix rule algebra.
//!
//! A domain name is walked label by label from the right. The last two
//! labels index the minimal perfect hash; deeper labels descend the
//! node tree. `verified` tracks the dot position bounding the longest
//! suffix ratified so far, and an active wildcard from the level above
//! extends it by one label. Exception rules pull it back instead.

use std::collections::HashSet;

use crate::error::{PslError, Result};
use crate::mphf::{Mphf, MphfBuilder, SeededHash64, NOT_FOUND};
use crate::psl::tree::{Suffix, SuffixRoot};
use crate::psl::Rule;

/// Longest accepted domain name, in bytes.
pub const MAX_NAME_LEN: usize = u16::MAX as usize;

/// Node access used by the rule walk, implemented by the owned matcher
/// nodes and by generated `'static` tables alike.
pub trait SuffixNode: Sized {
    fn label(&self) -> &str;
    fn rule(&self) -> Rule;
    fn wildcard(&self) -> bool;
    fn children(&self) -> &[Self];
}

/// Owned node used by the in-memory matcher.
#[derive(Debug, Clone)]
pub struct MatchNode {
    pub label: String,
    pub rule: Rule,
    pub wildcard: bool,
    pub children: Vec<MatchNode>,
}

impl SuffixNode for MatchNode {
    fn label(&self) -> &str {
        &self.label
    }

    fn rule(&self) -> Rule {
        self.rule
    }

    fn wildcard(&self) -> bool {
        self.wildcard
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

impl From<&Suffix> for MatchNode {
    fn from(suffix: &Suffix) -> Self {
        Self {
            label: suffix.label().to_string(),
            rule: suffix.rule(),
            wildcard: suffix.wildcard(),
            children: suffix.children().iter().map(MatchNode::from).collect(),
        }
    }
}

/// Frozen query structure: the minimal perfect hash over the two-label
/// roots, the rank-indexed node table, and the single-label wildcard
/// set.
pub struct SuffixMatcher<H> {
    index: Mphf<H>,
    nodes: Vec<MatchNode>,
    single_wildcards: HashSet<String>,
}

impl<H: SeededHash64> SuffixMatcher<H> {
    /// Freeze a parsed rule set into a matcher.
    pub fn build(root: &SuffixRoot, base: H, gamma: f64, seed: u64) -> Result<Self> {
        let mut builder = MphfBuilder::new(base, gamma, seed);
        for label in root.second_level().keys() {
            builder.insert(label.as_bytes());
        }
        let index = builder.build()?;

        let size = root.second_level().len();
        let mut slots: Vec<Option<MatchNode>> = Vec::new();
        slots.resize_with(size, || None);
        for (label, suffix) in root.second_level() {
            let rank = index.rank(label.as_bytes());
            if rank as usize >= size {
                return Err(PslError::RankOutOfRange { rank, size });
            }
            slots[rank as usize] = Some(MatchNode::from(suffix));
        }

        let mut nodes = Vec::with_capacity(size);
        for (rank, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(node) => nodes.push(node),
                None => {
                    return Err(PslError::RankOutOfRange {
                        rank: rank as u64,
                        size,
                    })
                }
            }
        }

        Ok(Self {
            index,
            nodes,
            single_wildcards: root.first_level().iter().cloned().collect(),
        })
    }

    /// Deduce the public suffix of `name`.
    ///
    /// An unknown top-level label is itself the suffix, so the result
    /// is always a non-empty tail of the input for non-empty input.
    pub fn lookup<'a>(&self, name: &'a str) -> Result<&'a str> {
        lookup_in(
            &self.index,
            &self.nodes,
            |label| self.single_wildcards.contains(label),
            name,
        )
    }

    pub fn index(&self) -> &Mphf<H> {
        &self.index
    }

    pub fn nodes(&self) -> &[MatchNode] {
        &self.nodes
    }

    /// Single-label wildcard entries in a reproducible order.
    pub fn single_wildcards_sorted(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.single_wildcards.iter().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

fn lookup_root<'t, N, H>(index: &Mphf<H>, roots: &'t [N], label: &str) -> Option<&'t N>
where
    N: SuffixNode,
    H: SeededHash64,
{
    let rank = index.rank(label.as_bytes());
    if rank == NOT_FOUND {
        return None;
    }
    let node = roots.get(rank as usize)?;
    // The hash answers for any input; the label seals the match.
    if node.label() != label {
        return None;
    }
    Some(node)
}

fn lookup_child<'t, N: SuffixNode>(node: &'t N, label: &str) -> Option<&'t N> {
    node.children().iter().find(|c| c.label() == label)
}

/// The rule walk over any table representation.
///
/// `single_wildcard` answers whether a lone top-level label is
/// wildcarded (the `*.ck` side table).
pub fn lookup_in<'a, N, H, F>(
    index: &Mphf<H>,
    roots: &[N],
    single_wildcard: F,
    name: &'a str,
) -> Result<&'a str>
where
    N: SuffixNode,
    H: SeededHash64,
    F: Fn(&str) -> bool,
{
    if name.len() > MAX_NAME_LEN {
        return Err(PslError::NameTooLong(name.len()));
    }

    // Count the dots and remember the rightmost four; dots[0] is the
    // last dot of the name.
    let bytes = name.as_bytes();
    let mut num_dots = 0usize;
    let mut dots = [0usize; 4];
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'.' {
            dots.rotate_right(1);
            dots[0] = i;
            num_dots += 1;
        }
    }

    if num_dots == 0 {
        return Ok(name);
    }

    // Exactly one dot: the whole name is a candidate two-label entry.
    if num_dots == 1 {
        if let Some(node) = lookup_root(index, roots, name) {
            match node.rule() {
                Rule::Exception => return Ok(&name[dots[0] + 1..]),
                Rule::Regular => return Ok(name),
                Rule::Default => {}
            }
        }
        let label_1 = &name[dots[0] + 1..];
        return Ok(if single_wildcard(label_1) { name } else { label_1 });
    }

    // Straight-line path for up to four labels.
    if num_dots <= 3 {
        let label_2 = &name[dots[1] + 1..];
        if let Some(level_2) = lookup_root(index, roots, label_2) {
            let start_3 = if num_dots == 2 { 0 } else { dots[2] + 1 };
            let label_3 = &name[start_3..dots[1]];
            if let Some(level_3) = lookup_child(level_2, label_3) {
                if num_dots == 3 {
                    let label_4 = &name[..dots[2]];
                    if let Some(level_4) = lookup_child(level_3, label_4) {
                        match level_4.rule() {
                            Rule::Exception => return Ok(&name[start_3..]),
                            Rule::Regular => return Ok(name),
                            Rule::Default => {}
                        }
                    }
                    if level_3.wildcard() {
                        return Ok(name);
                    }
                }
                match level_3.rule() {
                    Rule::Exception => return Ok(label_2),
                    Rule::Regular => return Ok(&name[start_3..]),
                    Rule::Default => {}
                }
            }
            if level_2.wildcard() {
                return Ok(&name[start_3..]);
            }
            match level_2.rule() {
                Rule::Exception => return Ok(&name[dots[0] + 1..]),
                Rule::Regular => return Ok(label_2),
                Rule::Default => {}
            }
        }
        let label_1 = &name[dots[0] + 1..];
        return Ok(if single_wildcard(label_1) { label_2 } else { label_1 });
    }

    // Generic walk for names with more labels.
    let mut last_dot = dots[0];
    let mut next_dot = dots[1];
    // The domain suffix verified so far.
    let mut verified = last_dot;
    let mut wildcard = single_wildcard(&name[verified + 1..]);
    let mut label = &name[next_dot + 1..];
    let mut current = lookup_root(index, roots, label);

    while let Some(node) = current {
        match node.rule() {
            Rule::Exception => verified = last_dot,
            Rule::Regular => verified = next_dot,
            Rule::Default => {
                if wildcard {
                    verified = next_dot;
                }
            }
        }
        wildcard = node.wildcard();
        last_dot = next_dot;

        match name[..last_dot].rfind('.') {
            None => {
                // The leftmost label is reached; settle the walk.
                label = &name[..last_dot];
                let next = lookup_child(node, label);
                if let Some(next) = next {
                    if next.rule() == Rule::Exception {
                        return Ok(&name[last_dot + 1..]);
                    }
                }
                let ends_default = next.map_or(true, |n| n.rule() == Rule::Default);
                if !wildcard && ends_default {
                    return Ok(&name[verified + 1..]);
                }
                return Ok(name);
            }
            Some(dot) => {
                next_dot = dot;
                label = &name[next_dot + 1..last_dot];
                current = lookup_child(node, label);
            }
        }
    }

    if wildcard {
        verified = next_dot;
    }
    Ok(&name[verified + 1..])
}
