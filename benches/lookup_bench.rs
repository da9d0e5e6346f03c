use criterion::{black_box, criterion_group, criterion_main, Criterion};

use psl_engine::mphf::{MphfBuilder, SplitMix64, Wy64};
use psl_engine::psl::{load_rules, SuffixMatcher};

const RULES: &str = "\
com
net
org
co.uk
org.uk
ac.uk
co.jp
*.kawasaki.jp
!city.kawasaki.jp
*.ck
!www.ck
com.au
edu.au
act.edu.au
";

fn bench_mphf(c: &mut Criterion) {
    let mut rng = SplitMix64::new(1);
    let keys: Vec<String> = (0..10_000).map(|_| format!("key-{:016x}", rng.next())).collect();

    c.bench_function("mphf_build_10k", |b| {
        b.iter(|| {
            let mut builder = MphfBuilder::new(Wy64::new(), 3.0, 1);
            for key in &keys {
                builder.insert(key);
            }
            black_box(builder.build().unwrap())
        })
    });

    let mut builder = MphfBuilder::new(Wy64::new(), 3.0, 1);
    for key in &keys {
        builder.insert(key);
    }
    let mph = builder.build().unwrap();

    c.bench_function("mphf_rank_hit", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % keys.len();
            black_box(mph.rank(keys[i].as_bytes()))
        })
    });

    c.bench_function("mphf_rank_miss", |b| {
        b.iter(|| black_box(mph.rank(b"no-such-key-anywhere")))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let root = load_rules(RULES).unwrap();
    let matcher = SuffixMatcher::build(&root, Wy64::new(), 3.0, 1).unwrap();

    let inputs = [
        "example.com",
        "foo.bar.co.uk",
        "www.city.kawasaki.jp",
        "a.b.c.d.e.example.ck",
        "example.unknown",
    ];

    c.bench_function("suffix_lookup", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % inputs.len();
            black_box(matcher.lookup(inputs[i]).unwrap())
        })
    });
}

criterion_group!(benches, bench_mphf, bench_lookup);
criterion_main!(benches);
