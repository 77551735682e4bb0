//! Benchmarks the demo codec's decode/encode path (plugin ABI v6) directly,
//! without going through dynamic loading. This measures the per-frame
//! `read_frame`/`write_frame` cost a real codec would add on top of the
//! session engine's fixed overhead.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sail_benches::{generate_sdem_payload, sizes};
use std::hint::black_box;

fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("sdem_decode");

	for (name, (w, h)) in [("tiny", sizes::TINY), ("small", sizes::SMALL), ("medium", sizes::MEDIUM)] {
		let data = generate_sdem_payload(w, h);
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| black_box(sail_codec_demo::decode(black_box(data)).unwrap()));
		});
	}

	group.finish();
}

fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("sdem_encode");

	for (name, (w, h)) in [("tiny", sizes::TINY), ("small", sizes::SMALL), ("medium", sizes::MEDIUM)] {
		let data = generate_sdem_payload(w, h);
		let image = sail_codec_demo::decode(&data).unwrap();
		group.throughput(Throughput::Bytes(data.len() as u64));
		group.bench_with_input(BenchmarkId::new("encode", name), &image, |b, image| {
			b.iter(|| black_box(sail_codec_demo::encode(black_box(image)).unwrap()));
		});
	}

	group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
	let mut group = c.benchmark_group("sdem_round_trip");

	for (name, (w, h)) in [("tiny", sizes::TINY), ("small", sizes::SMALL), ("medium", sizes::MEDIUM)] {
		let data = generate_sdem_payload(w, h);
		group.throughput(Throughput::Elements((w * h) as u64));
		group.bench_with_input(BenchmarkId::new("decode_then_encode", name), &data, |b, data| {
			b.iter(|| {
				let image = sail_codec_demo::decode(black_box(data)).unwrap();
				black_box(sail_codec_demo::encode(&image).unwrap())
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decode, bench_encode, bench_round_trip);
criterion_main!(benches);
