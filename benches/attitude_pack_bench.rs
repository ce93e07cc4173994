use criterion::{black_box, criterion_group, criterion_main, Criterion};

use xpilot_core::pdu::attitude::{decode_pitch_bank_heading, encode_pitch_bank_heading};

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode_pitch_bank_heading", |b| {
        b.iter(|| {
            let packed = encode_pitch_bank_heading(black_box(-4.25), black_box(12.5), black_box(271.0), black_box(false));
            black_box(packed)
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let packed = encode_pitch_bank_heading(-4.25, 12.5, 271.0, false);
    c.bench_function("decode_pitch_bank_heading", |b| {
        b.iter(|| {
            let unpacked = decode_pitch_bank_heading(black_box(packed));
            black_box(unpacked)
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
