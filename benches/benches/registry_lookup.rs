//! Benchmarks registry construction and lookup (format detection step 1,
//! extension/MIME/magic) against populations of varying size, using
//! synthetic descriptors so no descriptor files need to exist on disk.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sail_benches::synthetic_codec_infos;
use sail_internal::registry::Registry;
use std::hint::black_box;

const POPULATIONS: [usize; 4] = [8, 64, 512, 2048];

fn bench_build(c: &mut Criterion) {
	let mut group = c.benchmark_group("registry_build");

	for count in POPULATIONS {
		let infos = synthetic_codec_infos(count);
		group.throughput(Throughput::Elements(count as u64));
		group.bench_with_input(BenchmarkId::new("from_codec_infos", count), &infos, |b, infos| {
			b.iter(|| black_box(Registry::from_codec_infos(black_box(infos.clone()))));
		});
	}

	group.finish();
}

fn bench_lookup(c: &mut Criterion) {
	let mut group = c.benchmark_group("registry_lookup");

	for count in POPULATIONS {
		let infos = synthetic_codec_infos(count);
		let registry = Registry::from_codec_infos(infos);
		let target_extension = format!("syn{}", count / 2);
		let target_magic = [((count / 2) % 256) as u8, 0xAA, 0xBB, 0xCC];

		group.throughput(Throughput::Elements(1));
		group.bench_with_input(BenchmarkId::new("by_extension", count), &registry, |b, registry| {
			b.iter(|| black_box(registry.by_extension(black_box(&target_extension))));
		});
		group.bench_with_input(BenchmarkId::new("by_magic", count), &registry, |b, registry| {
			b.iter(|| black_box(registry.by_magic(black_box(&target_magic))));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_build, bench_lookup);
criterion_main!(benches);
