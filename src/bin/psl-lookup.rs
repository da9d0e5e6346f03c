//! Resolve public suffixes for domain names against a rule set.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use clap::{Arg, Command};

use psl_engine::mphf::{device_seed, Wy64};
use psl_engine::psl::{add_rules_file, SuffixMatcher, SuffixRoot};
use psl_engine::PslError;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = Command::new("psl-lookup")
        .about("Deduce the public suffix of domain names")
        .arg(
            Arg::new("rules")
                .short('r')
                .long("rules")
                .value_name("rules-file")
                .num_args(1..)
                .required(true)
                .help("Suffix rule files the matcher is built from"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("file")
                .help("Read domain names from <file>, one per line"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .help("Write results to <file> instead of stdout"),
        )
        .arg(
            Arg::new("names")
                .value_name("domain-name")
                .num_args(0..)
                .help("Domain names to resolve"),
        )
        .get_matches();

    let mut root = SuffixRoot::default();
    for path in matches.get_many::<String>("rules").expect("rules is required") {
        add_rules_file(&mut root, path)?;
    }
    let matcher = SuffixMatcher::build(&root, Wy64::new(), 3.0, device_seed())?;

    let mut out: Box<dyn Write> = match matches.get_one::<String>("output") {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    if let Some(path) = matches.get_one::<String>("input") {
        let reader = BufReader::new(File::open(path)?);
        for line in reader.lines() {
            resolve(&matcher, line?.trim_end(), &mut out)?;
        }
    }

    if let Some(names) = matches.get_many::<String>("names") {
        for name in names {
            resolve(&matcher, name, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

/// A name over the length bound is reported and skipped; the process
/// keeps going.
fn resolve(
    matcher: &SuffixMatcher<Wy64>,
    name: &str,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match matcher.lookup(name) {
        Ok(suffix) => writeln!(out, "{suffix}")?,
        Err(PslError::NameTooLong(len)) => {
            eprintln!("psl-lookup: skipping name of {len} bytes");
        }
        Err(other) => return Err(other.into()),
    }
    Ok(())
}
