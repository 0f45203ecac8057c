//! Criterion benchmark untuk Codec
//!
//! Run dengan: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ecword::{Codec, Word};

/// Gold: [Xe] 4f14 5d10 6s1, layout order
const GOLD: [u32; 19] = [0, 0, 0, 0, 1, 0, 10, 6, 2, 14, 10, 6, 2, 10, 6, 2, 6, 2, 2];

fn bench_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));
    let codec = Codec::canonical();

    group.bench_function("encode", |b| {
        b.iter(|| codec.encode(black_box(0), black_box(&GOLD)));
    });

    let word = codec.encode(0, &GOLD).unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| codec.decode(black_box(word)));
    });

    let bits = word.to_bits();
    group.bench_function("decode_bits", |b| {
        b.iter(|| codec.decode_bits(black_box(&bits)));
    });

    group.finish();
}

fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream");
    let codec = Codec::canonical();

    for count in [100usize, 1000, 10000].iter() {
        let buffer: Vec<u8> = (0..*count)
            .flat_map(|i| Word::new(0, (i as u64 % 118) + 1).to_be_bytes())
            .collect();

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_function(format!("decode_{}", count), |b| {
            b.iter(|| {
                for report in codec.decoder(black_box(&buffer)) {
                    black_box(report.ok());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode_decode, bench_stream);
criterion_main!(benches);
