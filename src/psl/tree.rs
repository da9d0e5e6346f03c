//! Suffix tree assembled from parsed rules.
//!
//! The root splits entries by their last two labels: that pair is the
//! key the minimal perfect hash indexes, and anything further to the
//! left hangs off the matching node as a child chain. Single-label
//! wildcard entries are kept apart in a flat list.

use std::collections::HashMap;

use crate::error::{PslError, Result};
use crate::psl::Rule;

/// One node of the suffix tree: a label plus the rule ratified for the
/// name ending at this node.
#[derive(Debug, Clone)]
pub struct Suffix {
    label: String,
    rule: Rule,
    wildcard: bool,
    children: Vec<Suffix>,
}

impl Suffix {
    fn new(wildcard: bool, rule: Rule, label: &str) -> Self {
        debug_assert!(!wildcard || rule == Rule::Default);
        Self {
            label: label.to_string(),
            rule,
            wildcard,
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn children(&self) -> &[Suffix] {
        &self.children
    }

    fn child_mut(&mut self, label: &str) -> Option<&mut Suffix> {
        self.children.iter_mut().find(|s| s.label == label)
    }

    /// Fold a new entry into an existing node. Identical duplicates
    /// merge, a conflicting non-default rule is fatal.
    fn merge(&mut self, wildcard: bool, rule: Rule, full: &str) -> Result<()> {
        if wildcard {
            self.wildcard = true;
        }
        if rule != Rule::Default {
            if self.rule != Rule::Default && self.rule != rule {
                return Err(PslError::DuplicateName(full.to_string()));
            }
            self.rule = rule;
        }
        Ok(())
    }

    /// Attach the labels of `next` (right to left) below this node;
    /// the leaf receives the rule. `full` is the complete name, kept
    /// for error reporting.
    fn add_suffix(&mut self, wildcard: bool, rule: Rule, next: &str, full: &str) -> Result<()> {
        match next.rfind('.') {
            None => match self.child_mut(next) {
                Some(node) => node.merge(wildcard, rule, full),
                None => {
                    self.children.push(Suffix::new(wildcard, rule, next));
                    Ok(())
                }
            },
            Some(delim) => {
                let last = &next[delim + 1..];
                let more = &next[..delim];
                match self.child_mut(last) {
                    Some(node) => node.add_suffix(wildcard, rule, more, full),
                    None => {
                        let mut node = Suffix::new(false, Rule::Default, last);
                        node.add_suffix(wildcard, rule, more, full)?;
                        self.children.push(node);
                        Ok(())
                    }
                }
            }
        }
    }
}

/// Root of the parsed rule set.
#[derive(Debug, Clone, Default)]
pub struct SuffixRoot {
    /// Main suffix table: all entries with at least two labels, keyed
    /// by the last two ("co.uk", "example.org", ...).
    second_level: HashMap<String, Suffix>,
    /// Single-label wildcard entries such as "*.ck".
    first_level: Vec<String>,
}

impl SuffixRoot {
    /// Remember a single-label wildcard entry.
    pub fn add_single(&mut self, label: &str) {
        if !self.first_level.iter().any(|l| l == label) {
            self.first_level.push(label.to_string());
        }
    }

    /// Add an entry whose name is exactly two labels.
    pub fn add_double(&mut self, wildcard: bool, rule: Rule, name: &str) -> Result<()> {
        match self.second_level.get_mut(name) {
            Some(node) => node.merge(wildcard, rule, name),
            None => {
                self.second_level
                    .insert(name.to_string(), Suffix::new(wildcard, rule, name));
                Ok(())
            }
        }
    }

    /// Add an entry with more than two labels: `first` is the two-label
    /// tail, `rest` everything to its left.
    pub fn add_multiple(&mut self, wildcard: bool, rule: Rule, rest: &str, first: &str) -> Result<()> {
        let full = format!("{rest}.{first}");
        let node = self
            .second_level
            .entry(first.to_string())
            .or_insert_with(|| Suffix::new(false, Rule::Default, first));
        node.add_suffix(wildcard, rule, rest, &full)
    }

    pub fn second_level(&self) -> &HashMap<String, Suffix> {
        &self.second_level
    }

    pub fn first_level(&self) -> &[String] {
        &self.first_level
    }

    pub fn is_empty(&self) -> bool {
        self.second_level.is_empty() && self.first_level.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_single_dedupes() {
        let mut root = SuffixRoot::default();
        root.add_single("ck");
        root.add_single("ck");
        assert_eq!(root.first_level(), ["ck"]);
    }

    #[test]
    fn test_identical_duplicate_merges() {
        let mut root = SuffixRoot::default();
        root.add_double(false, Rule::Regular, "co.uk").unwrap();
        root.add_double(false, Rule::Regular, "co.uk").unwrap();
        assert_eq!(root.second_level().len(), 1);
        assert_eq!(root.second_level()["co.uk"].rule(), Rule::Regular);
    }

    #[test]
    fn test_default_yields_to_rule() {
        let mut root = SuffixRoot::default();
        // The interior node exists first as a Default placeholder.
        root.add_multiple(false, Rule::Regular, "foo", "co.uk").unwrap();
        root.add_double(false, Rule::Regular, "co.uk").unwrap();
        assert_eq!(root.second_level()["co.uk"].rule(), Rule::Regular);
        // And the child added earlier is still there.
        assert_eq!(root.second_level()["co.uk"].children().len(), 1);
    }

    #[test]
    fn test_conflicting_rules_rejected() {
        let mut root = SuffixRoot::default();
        root.add_double(false, Rule::Regular, "www.ck").unwrap();
        let err = root.add_double(false, Rule::Exception, "www.ck");
        assert!(matches!(err, Err(PslError::DuplicateName(name)) if name == "www.ck"));
    }

    #[test]
    fn test_conflict_deep_in_tree_names_full_entry() {
        let mut root = SuffixRoot::default();
        root.add_multiple(false, Rule::Regular, "a.b", "c.d").unwrap();
        let err = root.add_multiple(false, Rule::Exception, "a.b", "c.d");
        assert!(matches!(err, Err(PslError::DuplicateName(name)) if name == "a.b.c.d"));
    }

    #[test]
    fn test_wildcard_flag_survives_merge() {
        let mut root = SuffixRoot::default();
        root.add_double(false, Rule::Regular, "co.jp").unwrap();
        root.add_double(true, Rule::Default, "co.jp").unwrap();
        let node = &root.second_level()["co.jp"];
        assert!(node.wildcard());
        assert_eq!(node.rule(), Rule::Regular);
    }

    #[test]
    fn test_shared_prefix_chains() {
        let mut root = SuffixRoot::default();
        root.add_multiple(false, Rule::Regular, "a", "x.y").unwrap();
        root.add_multiple(false, Rule::Regular, "b", "x.y").unwrap();
        root.add_multiple(false, Rule::Regular, "c.a", "x.y").unwrap();

        let node = &root.second_level()["x.y"];
        assert_eq!(node.children().len(), 2);
        let a = node.children().iter().find(|s| s.label() == "a").unwrap();
        assert_eq!(a.rule(), Rule::Regular);
        assert_eq!(a.children().len(), 1);
        assert_eq!(a.children()[0].label(), "c");
    }
}
