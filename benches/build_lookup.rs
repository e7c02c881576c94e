use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

use dawg_automata::{Builder, Fsa, Word};

fn sorted_keys(count: usize) -> Vec<Word> {
    let mut rng = StdRng::seed_from_u64(99);
    let mut keys = BTreeSet::new();
    while keys.len() < count {
        let len = rng.gen_range(4..=12);
        let word: String = (0..len)
            .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
            .collect();
        keys.insert(Word::from(word));
    }
    keys.into_iter().collect()
}

fn build(keys: &[Word]) -> Fsa {
    let mut builder = Builder::new();
    for key in keys {
        builder.insert_sorted(key).unwrap();
    }
    builder.build_fsa()
}

fn bench_build(c: &mut Criterion) {
    let keys = sorted_keys(10_000);
    c.bench_function("build_10k_keys", |b| b.iter(|| build(&keys)));
}

fn bench_lookup(c: &mut Criterion) {
    let keys = sorted_keys(10_000);
    let fsa = build(&keys);
    c.bench_function("lookup_hit", |b| {
        let mut pos = 0;
        b.iter(|| {
            pos = (pos + 1) % keys.len();
            black_box(fsa.lookup(&keys[pos]).unwrap())
        })
    });
    c.bench_function("lookup_miss", |b| {
        b.iter(|| black_box(fsa.lookup("zyxwvutsrqpo").unwrap()))
    });
}

criterion_group!(benches, bench_build, bench_lookup);
criterion_main!(benches);
