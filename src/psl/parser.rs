//! Loader for Public Suffix List rule files.
//!
//! A rule line is a dot-separated name, optionally prefixed by `!`
//! (exception) or a `*.` chain (wildcard). Everything after the first
//! white space is commentary, lines starting with `/` are comments.
//! International names are expected in their ASCII (punycode) form; the
//! IDNA conversion belongs to the caller.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PslError, Result};
use crate::psl::tree::SuffixRoot;
use crate::psl::Rule;

/// Characters permitted in a rule name once the prefixes are stripped.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9.\-]+$").expect("NAME_PATTERN: hardcoded regex is invalid")
});

/// Parse a rule list into a fresh root.
pub fn load_rules(text: &str) -> Result<SuffixRoot> {
    let mut root = SuffixRoot::default();
    add_rules(&mut root, text)?;
    Ok(root)
}

/// Parse rules into an existing root, so several list files can merge.
pub fn add_rules(root: &mut SuffixRoot, text: &str) -> Result<()> {
    for (line_no, line) in text.lines().enumerate() {
        parse_line(root, line, line_no + 1)?;
    }
    Ok(())
}

/// Load a rule file into a fresh root.
pub fn load_rules_file(path: impl AsRef<Path>) -> Result<SuffixRoot> {
    let mut root = SuffixRoot::default();
    add_rules_file(&mut root, path)?;
    Ok(root)
}

/// Load a rule file into an existing root.
pub fn add_rules_file(root: &mut SuffixRoot, path: impl AsRef<Path>) -> Result<()> {
    let text = fs::read_to_string(path)?;
    add_rules(root, &text)
}

fn malformed(line_no: usize, line: &str) -> PslError {
    PslError::ParseErrorAtLine {
        line: line_no,
        message: format!("Invalid line: {line}"),
    }
}

fn parse_line(root: &mut SuffixRoot, line: &str, line_no: usize) -> Result<()> {
    // Trim everything after the first white space; skip empty lines and
    // comments.
    let data = line
        .split([' ', '\t', '\r'])
        .next()
        .unwrap_or_default();
    if data.is_empty() || data.starts_with('/') {
        return Ok(());
    }

    let mut data = data.to_ascii_lowercase();

    // Strip one trailing dot. A solitary dot or two consecutive dots
    // are not allowed.
    if data.ends_with('.') {
        data.pop();
        if data.is_empty() || data.ends_with('.') {
            return Err(malformed(line_no, line));
        }
    }

    // Presume a regular host name, then check the special prefixes.
    let mut rule = Rule::Regular;
    let mut wildcard = false;
    let mut skip = 0usize;

    let bytes = data.as_bytes();
    if bytes[0] == b'!' {
        rule = Rule::Exception;
        skip = 1;
    } else if bytes[0] == b'*' {
        // A chain of wildcard labels collapses into a single wildcard
        // on the name that follows it.
        rule = Rule::Default;
        wildcard = true;
        skip = 1;
        while skip < bytes.len() {
            if bytes[skip] != b'.' {
                return Err(malformed(line_no, line));
            }
            if bytes.get(skip + 1) != Some(&b'*') {
                break;
            }
            skip += 2;
        }
    }

    // Skip a leading dot if any.
    if skip < bytes.len() && bytes[skip] == b'.' {
        skip += 1;
    }
    if skip >= bytes.len() {
        return Err(malformed(line_no, line));
    }

    let name = &data[skip..];
    if !NAME_PATTERN.is_match(name) || name.split('.').any(|label| label.is_empty()) {
        return Err(malformed(line_no, line));
    }

    match name.rfind('.') {
        None => {
            // A trivial TLD entry carries no information; remember it
            // only when it is wildcarded, e.g. "*.ck".
            if wildcard {
                root.add_single(name);
            }
        }
        Some(delim) => match name[..delim].rfind('.') {
            None => root.add_double(wildcard, rule, name)?,
            Some(inner) => {
                root.add_multiple(wildcard, rule, &name[..inner], &name[inner + 1..])?
            }
        },
    }

    Ok(())
}
