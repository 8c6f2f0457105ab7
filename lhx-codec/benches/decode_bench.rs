//! Decode throughput benchmarks for lhx-codec.
//!
//! Streams are built with the core bit writer so the benches do not depend
//! on an encoder: one stream of pure literals, one dominated by long
//! back-references.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use lhx_codec::{DecoderConfig, decode_to_vec};
use lhx_core::BitWriter;
use std::hint::black_box;

/// Block with single-code trees: every command is the same literal.
fn write_literal_block(w: &mut BitWriter<&mut Vec<u8>>, commands: u32, literal: u16) {
    w.write_bits(commands, 16).unwrap();
    w.write_bits(0, 5).unwrap();
    w.write_bits(0, 5).unwrap();
    w.write_bits(0, 9).unwrap();
    w.write_bits(literal as u32, 9).unwrap();
    w.write_bits(0, 4).unwrap();
    w.write_bits(0, 4).unwrap();
}

/// Stream of `size` identical literal bytes across as many blocks as needed.
fn literal_stream(size: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut w = BitWriter::new(&mut bytes);
    let mut remaining = size;
    while remaining > 0 {
        let commands = remaining.min(60_000) as u32;
        write_literal_block(&mut w, commands, b'a' as u16);
        remaining -= u64::from(commands);
    }
    w.flush().unwrap();
    drop(w);
    bytes
}

/// Stream where one literal block seeds the window and a second block of
/// maximum-length matches at offset 0 produces the rest.
fn match_stream(size: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut w = BitWriter::new(&mut bytes);
    write_literal_block(&mut w, 1, b'a' as u16);

    // Single-code command tree decoding to symbol 509 (length 256),
    // single-code offset tree at direct offset 0.
    let matches = size.div_ceil(256) as u32;
    w.write_bits(matches, 16).unwrap();
    w.write_bits(0, 5).unwrap();
    w.write_bits(0, 5).unwrap();
    w.write_bits(0, 9).unwrap();
    w.write_bits(509, 9).unwrap();
    w.write_bits(0, 4).unwrap();
    w.write_bits(0, 4).unwrap();

    w.flush().unwrap();
    drop(w);
    bytes
}

fn bench_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_literals");
    for &size in &[16_384u64, 262_144] {
        let stream = literal_stream(size);
        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &stream, |b, stream| {
            b.iter(|| {
                let out = decode_to_vec(black_box(&stream[..]), DecoderConfig::LH5, size)
                    .expect("decode failed");
                black_box(out)
            })
        });
    }
    group.finish();
}

fn bench_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_matches");
    for &size in &[16_384u64, 262_144] {
        let stream = match_stream(size);
        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &stream, |b, stream| {
            b.iter(|| {
                let out = decode_to_vec(black_box(&stream[..]), DecoderConfig::LH5, size)
                    .expect("decode failed");
                black_box(out)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_literals, bench_matches);
criterion_main!(benches);
