//! Emission of the minimal perfect hash tables as Rust source.
//!
//! The fragment is a module holding the seed array, the level-size
//! array, the bitset words, the optional filter descriptor, and the
//! fallback pairs, plus a constructor returning an [`Mphf`] the
//! consumer owns and a free `rank` entry point taking it by shared
//! reference.

use std::io::{self, Write};

use crate::emit::{byte_string, CodeWriter};
use crate::mphf::{Mphf, SeededHash64, MIN_LEVELS};

/// Write the table module for `mph`. `hasher_ty` and `hasher_expr` are
/// spliced verbatim, so they must name one of the recognized hashers
/// (`Wy64::new()`, `Xx64::new()`, `Multiplied(Fnv64::new())`, ...).
pub fn emit_mphf<W: Write, H: SeededHash64>(
    w: &mut CodeWriter<W>,
    name: &str,
    hasher_ty: &str,
    hasher_expr: &str,
    mph: &Mphf<H>,
) -> io::Result<()> {
    // Trailing empty levels carry no information.
    let levels = mph.levels();
    let mut count = levels.len();
    while count > MIN_LEVELS && levels[count - 1] == 0 {
        count -= 1;
    }

    w.line(0, &format!("pub mod {name} {{"))?;
    w.line(1, "use psl_engine::mphf::*;")?;
    w.blank()?;

    w.line(1, &format!("pub const SEEDS: [u64; {count}] = ["))?;
    for seed in &mph.seeds()[..count] {
        w.line(2, &format!("{seed:#018x},"))?;
    }
    w.line(1, "];")?;
    w.blank()?;

    let level_list = levels[..count]
        .iter()
        .map(|size| size.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    w.line(1, &format!("pub const LEVELS: [u64; {count}] = [{level_list}];"))?;
    w.blank()?;

    let words = mph.words();
    w.line(1, &format!("pub const WORDS: [u64; {}] = [", words.len()))?;
    for word in words {
        w.line(2, &format!("{word:#018x},"))?;
    }
    w.line(1, "];")?;
    w.blank()?;

    match mph.filter() {
        Some(f) => {
            w.line(
                1,
                &format!(
                    "pub const FILTER: Option<FilterLayout> = Some(FilterLayout {{ offset_words: {}, bits: {} }});",
                    f.offset_words, f.bits
                ),
            )?;
        }
        None => {
            w.line(1, "pub const FILTER: Option<FilterLayout> = None;")?;
        }
    }
    w.blank()?;

    let fallback = mph.fallback_pairs();
    if fallback.is_empty() {
        w.line(1, "pub const FALLBACK: &[(&[u8], u64)] = &[];")?;
    } else {
        w.line(1, "pub const FALLBACK: &[(&[u8], u64)] = &[")?;
        for (key, rank) in &fallback {
            w.line(2, &format!("({}, {rank}),", byte_string(key)))?;
        }
        w.line(1, "];")?;
    }
    w.blank()?;

    w.line(1, &format!("pub fn build_index() -> Mphf<{hasher_ty}> {{"))?;
    w.line(2, "Mphf::from_parts(")?;
    w.line(
        3,
        &format!("MultiHasher::with_seeds({hasher_expr}, SEEDS.to_vec()),"),
    )?;
    w.line(3, "LEVELS.to_vec(),")?;
    w.line(3, "WORDS.to_vec(),")?;
    w.line(3, "FILTER,")?;
    w.line(
        3,
        "FALLBACK.iter().map(|&(key, rank)| (key.to_vec(), rank)).collect(),",
    )?;
    w.line(2, ")")?;
    w.line(2, ".expect(\"generated tables are valid\")")?;
    w.line(1, "}")?;
    w.blank()?;

    w.line(
        1,
        &format!("pub fn rank(index: &Mphf<{hasher_ty}>, key: &[u8]) -> u64 {{"),
    )?;
    w.line(2, "index.rank(key)")?;
    w.line(1, "}")?;
    w.line(0, "}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mphf::{MphfBuilder, Wy64};

    fn emit_to_string(mph: &Mphf<Wy64>) -> String {
        let mut w = CodeWriter::new(Vec::new());
        emit_mphf(&mut w, "test_index", "Wy64", "Wy64::new()", mph).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    fn sample(seed: u64) -> Mphf<Wy64> {
        let mut builder = MphfBuilder::new(Wy64::new(), 2.0, seed);
        for key in ["a", "b", "c", "d", "e", "f"] {
            builder.insert(key);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_emitted_shape() {
        let text = emit_to_string(&sample(1));
        assert!(text.starts_with("pub mod test_index {"));
        assert!(text.contains("pub const SEEDS:"));
        assert!(text.contains("pub const LEVELS:"));
        assert!(text.contains("pub const WORDS:"));
        assert!(text.contains("pub const FILTER:"));
        assert!(text.contains("pub fn build_index() -> Mphf<Wy64>"));
        assert!(text.contains("pub fn rank(index: &Mphf<Wy64>, key: &[u8]) -> u64"));
    }

    #[test]
    fn test_emission_deterministic() {
        assert_eq!(emit_to_string(&sample(7)), emit_to_string(&sample(7)));
        assert_ne!(emit_to_string(&sample(7)), emit_to_string(&sample(8)));
    }

    #[test]
    fn test_trailing_levels_trimmed() {
        let mph = sample(1);
        let text = emit_to_string(&mph);
        // Six tiny keys resolve in the first couple of levels; far
        // fewer than the default sixteen should survive trimming.
        let count = mph
            .levels()
            .iter()
            .rposition(|&size| size != 0)
            .map(|last| (last + 1).max(MIN_LEVELS))
            .unwrap_or(MIN_LEVELS);
        assert!(text.contains(&format!("pub const LEVELS: [u64; {count}]")));
        assert!(count < mph.levels().len());
    }

    #[test]
    fn test_empty_fallback_statically_disabled() {
        let text = emit_to_string(&sample(1));
        assert!(text.contains("pub const FALLBACK: &[(&[u8], u64)] = &[];"));
    }
}
