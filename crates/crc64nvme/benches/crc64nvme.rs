//! CRC-64/NVME benchmarks.
//!
//! Run: `cargo bench -p crc64nvme`
//! Native: `RUSTFLAGS='-C target-cpu=native' cargo bench -p crc64nvme`
//!
//! This benchmarks:
//! - The auto-selected dispatch path (one-shot and 4 KiB streaming)
//! - Every kernel available on this CPU, forced explicitly
//! - `crc64fast-nvme` and `crc-fast` as external baselines

use crc_fast::CrcAlgorithm;
use crc64nvme::{Crc64Nvme, DispatchInfo, Kernel};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Standard benchmark sizes.
const SIZES: [usize; 7] = [64, 256, 1024, 4096, 16384, 65536, 1048576];

/// Streaming write size.
const STREAM_CHUNK: usize = 4096;

/// Benchmark the auto dispatch path.
fn bench_auto(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc64nvme/auto");
  eprintln!("crc64nvme platform: {}", DispatchInfo::current());
  eprintln!("crc64nvme backend: {}", crc64nvme::backend_name());

  for size in SIZES {
    let data = vec![0u8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(crc64nvme::checksum(data)));
    });
  }

  group.finish();
}

/// Benchmark streaming updates in fixed-size writes.
fn bench_streaming(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc64nvme/streaming");

  for size in SIZES {
    let data = vec![0u8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| {
        let mut h = Crc64Nvme::new();
        for chunk in data.chunks(STREAM_CHUNK) {
          h.update(chunk);
        }
        core::hint::black_box(h.finalize())
      });
    });
  }

  group.finish();
}

/// Benchmark every kernel available here, forced.
fn bench_kernels(c: &mut Criterion) {
  for kernel in Kernel::available() {
    let mut group = c.benchmark_group(format!("crc64nvme/kernel/{}", kernel.name()));

    for size in SIZES {
      // The bitwise reference is only a correctness oracle.
      if kernel == Kernel::reference() && size > 4096 {
        continue;
      }
      let data = vec![0u8; size];
      group.throughput(Throughput::Bytes(size as u64));

      group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
        b.iter(|| core::hint::black_box(kernel.checksum(data)));
      });
    }

    group.finish();
  }
}

/// External implementations for comparison.
fn bench_external(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc64nvme/external");

  for size in SIZES {
    let data = vec![0u8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::new("crc64fast-nvme", size), &data, |b, data| {
      b.iter(|| {
        let mut digest = crc64fast_nvme::Digest::new();
        digest.write(data);
        core::hint::black_box(digest.sum64())
      });
    });

    group.bench_with_input(BenchmarkId::new("crc-fast", size), &data, |b, data| {
      b.iter(|| core::hint::black_box(crc_fast::checksum(CrcAlgorithm::Crc64Nvme, data)));
    });
  }

  group.finish();
}

criterion_group!(benches, bench_auto, bench_streaming, bench_kernels, bench_external);
criterion_main!(benches);
