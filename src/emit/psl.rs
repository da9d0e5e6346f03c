//! Emission of the complete generated suffix tables.
//!
//! The generated file contains the `Node` struct, one child array per
//! inner node, the rank-indexed top array, the minimal perfect hash
//! module bound to a named hasher, the single-label wildcard
//! recognizer, and a `public_suffix` entry point that reuses the
//! crate's rule walk.

use std::io::{self, Write};

use crate::emit::mphf::emit_mphf;
use crate::emit::trie::AsciiTrie;
use crate::emit::{str_literal, CodeWriter};
use crate::error::Result;
use crate::mphf::SeededHash64;
use crate::psl::matcher::{MatchNode, SuffixMatcher};
use crate::psl::Rule;

fn rule_token(rule: Rule) -> &'static str {
    match rule {
        Rule::Default => "Rule::Default",
        Rule::Regular => "Rule::Regular",
        Rule::Exception => "Rule::Exception",
    }
}

fn node_literal(node: &MatchNode, children_id: Option<usize>) -> String {
    let children = match children_id {
        Some(id) => format!("&NODE_{id}"),
        None => "&[]".to_string(),
    };
    format!(
        "Node {{ label: {}, rule: {}, wildcard: {}, children: {} }},",
        str_literal(&node.label),
        rule_token(node.rule),
        node.wildcard,
        children
    )
}

/// Emit the child arrays below `node`, children before parents, and
/// return the id of the array holding `node`'s own children.
fn emit_node_arrays<W: Write>(
    w: &mut CodeWriter<W>,
    node: &MatchNode,
    counter: &mut usize,
) -> io::Result<Option<usize>> {
    if node.children.is_empty() {
        return Ok(None);
    }

    let mut child_ids = Vec::with_capacity(node.children.len());
    for child in &node.children {
        child_ids.push(emit_node_arrays(w, child, counter)?);
    }

    let id = *counter;
    *counter += 1;
    w.line(
        0,
        &format!("static NODE_{id}: [Node; {}] = [", node.children.len()),
    )?;
    for (child, child_id) in node.children.iter().zip(child_ids) {
        w.line(1, &node_literal(child, child_id))?;
    }
    w.line(0, "];")?;
    w.blank()?;

    Ok(Some(id))
}

/// Write the whole generated file for a frozen matcher.
pub fn emit_tables<W: Write, H: SeededHash64>(
    out: W,
    matcher: &SuffixMatcher<H>,
    module: &str,
    hasher_ty: &str,
    hasher_expr: &str,
) -> Result<()> {
    let mut w = CodeWriter::new(out);

    w.line(0, "// Generated by psl-build. Do not edit.")?;
    w.blank()?;
    w.line(0, "use psl_engine::mphf::*;")?;
    w.line(0, "use psl_engine::psl::{Rule, SuffixNode};")?;
    w.blank()?;

    w.line(0, "/// One suffix-tree node.")?;
    w.line(0, "pub struct Node {")?;
    w.line(1, "pub label: &'static str,")?;
    w.line(1, "pub rule: Rule,")?;
    w.line(1, "pub wildcard: bool,")?;
    w.line(1, "pub children: &'static [Node],")?;
    w.line(0, "}")?;
    w.blank()?;

    w.line(0, "impl SuffixNode for Node {")?;
    w.line(1, "fn label(&self) -> &str {")?;
    w.line(2, "self.label")?;
    w.line(1, "}")?;
    w.blank()?;
    w.line(1, "fn rule(&self) -> Rule {")?;
    w.line(2, "self.rule")?;
    w.line(1, "}")?;
    w.blank()?;
    w.line(1, "fn wildcard(&self) -> bool {")?;
    w.line(2, "self.wildcard")?;
    w.line(1, "}")?;
    w.blank()?;
    w.line(1, "fn children(&self) -> &[Self] {")?;
    w.line(2, "self.children")?;
    w.line(1, "}")?;
    w.line(0, "}")?;
    w.blank()?;

    let mut counter = 0usize;
    let mut root_ids = Vec::with_capacity(matcher.nodes().len());
    for node in matcher.nodes() {
        root_ids.push(emit_node_arrays(&mut w, node, &mut counter)?);
    }

    w.line(0, "/// Second-level entries indexed by minimal-perfect-hash rank.")?;
    w.line(
        0,
        &format!("pub static NODES: [Node; {}] = [", matcher.nodes().len()),
    )?;
    for (node, children_id) in matcher.nodes().iter().zip(root_ids) {
        w.line(1, &node_literal(node, children_id))?;
    }
    w.line(0, "];")?;
    w.blank()?;

    emit_mphf(&mut w, module, hasher_ty, hasher_expr, matcher.index())?;
    w.blank()?;

    let mut trie = AsciiTrie::new();
    for label in matcher.single_wildcards_sorted() {
        trie.insert(label, "true")?;
    }
    w.line(0, "/// Single-label wildcard entries.")?;
    w.line(0, "pub fn lookup_first(s: &[u8]) -> bool {")?;
    trie.emit(&mut w, "false")?;
    w.line(0, "}")?;
    w.blank()?;

    w.line(
        0,
        &format!(
            "pub fn public_suffix<'a>(index: &Mphf<{hasher_ty}>, name: &'a str) -> psl_engine::Result<&'a str> {{"
        ),
    )?;
    w.line(
        1,
        "psl_engine::psl::lookup_in(index, &NODES, |label| lookup_first(label.as_bytes()), name)",
    )?;
    w.line(0, "}")?;

    Ok(())
}
