use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Record {
    id: i64,
    name: String,
    tags: Vec<String>,
    scores: Vec<f64>,
    active: bool,
}

fn sample_record(rng: &mut impl Rng) -> Record {
    Record {
        id: rng.gen(),
        name: (0..12).map(|_| rng.sample(rand::distributions::Alphanumeric) as char).collect(),
        tags: (0..rng.gen_range(0..8))
            .map(|_| (0..6).map(|_| rng.sample(rand::distributions::Alphanumeric) as char).collect())
            .collect(),
        scores: (0..rng.gen_range(0..8)).map(|_| rng.gen()).collect(),
        active: rng.gen(),
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let records: Vec<Record> = (0..256).map(|_| sample_record(&mut rng)).collect();

    c.bench_function("encode record list", |b| {
        b.iter(|| black_box(crous::encode(black_box(&records)).unwrap()))
    });
}

fn bench_decode(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let records: Vec<Record> = (0..256).map(|_| sample_record(&mut rng)).collect();
    let bytes = crous::encode(&records).unwrap();

    c.bench_function("decode record list", |b| {
        b.iter(|| black_box(crous::decode::<Vec<Record>>(black_box(&bytes)).unwrap()))
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
