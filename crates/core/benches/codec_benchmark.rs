//! Benchmarks d'encodage et de décodage

use arcadn_core::{CodecParams, Decoder, Encoder};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 256) as u8).collect()
}

fn bench_encode(c: &mut Criterion) {
    let data = payload(10 * 1024);
    c.bench_function("encode_10k", |b| {
        b.iter(|| {
            let mut encoder = Encoder::new(CodecParams::default()).unwrap();
            black_box(encoder.encode(black_box(&data)).unwrap())
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let data = payload(10 * 1024);
    let mut encoder = Encoder::new(CodecParams::default()).unwrap();
    let text = encoder.encode_to_text(&data).unwrap();
    c.bench_function("decode_10k", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(CodecParams::default()).unwrap();
            black_box(decoder.decode(black_box(&text)).unwrap())
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
