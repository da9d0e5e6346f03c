//! Compile Public Suffix List rule files into Rust lookup tables.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::{Arg, Command};

use psl_engine::emit::emit_tables;
use psl_engine::mphf::{device_seed, Fnv64, Wy64, Xx64, SeededHash64};
use psl_engine::psl::{add_rules_file, SuffixMatcher, SuffixRoot};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = Command::new("psl-build")
        .about("Compile Public Suffix List rules into Rust lookup tables")
        .after_help(
            "Examples:\n\
             \n\
             psl-build public_suffix_list.dat > suffix_tables.rs\n\
             psl-build --seed 1 --hasher xx64 -o suffix_tables.rs rules.dat\n",
        )
        .arg(
            Arg::new("input")
                .value_name("rules-file")
                .num_args(1..)
                .required(true)
                .help("Input rule files, loaded in order"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .help("Write the generated source to <file> instead of stdout"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("u64")
                .help("Pin the hash seed for reproducible tables (default: fresh entropy)"),
        )
        .arg(
            Arg::new("gamma")
                .long("gamma")
                .value_name("float")
                .default_value("3.0")
                .help("Bits per key at each cascade level"),
        )
        .arg(
            Arg::new("hasher")
                .long("hasher")
                .value_parser(["wy64", "xx64", "fnv64"])
                .default_value("wy64")
                .help("Hash functor bound into the generated tables"),
        )
        .arg(
            Arg::new("module")
                .long("module")
                .value_name("name")
                .default_value("suffix_index")
                .help("Name of the generated index module"),
        )
        .get_matches();

    let seed = match matches.get_one::<String>("seed") {
        Some(text) => text.parse::<u64>()?,
        None => device_seed(),
    };
    let gamma: f64 = matches
        .get_one::<String>("gamma")
        .expect("gamma has a default")
        .parse()?;
    let module = matches
        .get_one::<String>("module")
        .expect("module has a default");

    let mut root = SuffixRoot::default();
    for path in matches.get_many::<String>("input").expect("input is required") {
        add_rules_file(&mut root, path)?;
    }

    let out: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    match matches
        .get_one::<String>("hasher")
        .expect("hasher has a default")
        .as_str()
    {
        "xx64" => generate(out, &root, Xx64::new(), Xx64::NAME, "Xx64::new()", gamma, seed, module),
        "fnv64" => generate(out, &root, Fnv64::new(), Fnv64::NAME, "Fnv64::new()", gamma, seed, module),
        _ => generate(out, &root, Wy64::new(), Wy64::NAME, "Wy64::new()", gamma, seed, module),
    }
}

#[allow(clippy::too_many_arguments)]
fn generate<H: SeededHash64>(
    mut out: Box<dyn Write>,
    root: &SuffixRoot,
    base: H,
    hasher_ty: &str,
    hasher_expr: &str,
    gamma: f64,
    seed: u64,
    module: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let matcher = SuffixMatcher::build(root, base, gamma, seed)?;
    emit_tables(&mut out, &matcher, module, hasher_ty, hasher_expr)?;
    out.flush()?;
    Ok(())
}
