//! Criterion benchmarks for the block-level codec (selector + each encoder).
//!
//! Run with:
//!   cargo bench --bench block

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_block_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_encode_decode");

    for &block_size in &[16_384usize, 131_072, 262_144] {
        let data = zxc::lorem::gen_buffer(block_size, 1);

        group.throughput(Throughput::Bytes(block_size as u64));
        group.bench_with_input(
            BenchmarkId::new("encode_block", block_size),
            &data,
            |b, data| {
                b.iter(|| zxc::block::encode_block(data, zxc::config::Level::new(3)));
            },
        );

        let encoded = zxc::block::encode_block(&data, zxc::config::Level::new(3));
        group.bench_with_input(
            BenchmarkId::new("decode_block", block_size),
            &encoded,
            |b, encoded| {
                b.iter(|| {
                    zxc::block::decode_block(
                        encoded.tag,
                        encoded.tag_flags,
                        &encoded.payload,
                        encoded.uncompressed_len,
                    )
                    .unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_block_encode_by_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_encode_by_level");
    let data = zxc::lorem::gen_buffer(262_144, 2);

    for level in 1..=5 {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("level", level), &level, |b, &level| {
            b.iter(|| zxc::block::encode_block(&data, zxc::config::Level::new(level)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_block_encode_decode, bench_block_encode_by_level);
criterion_main!(benches);
