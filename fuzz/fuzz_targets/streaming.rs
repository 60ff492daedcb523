//! Fuzz target for the streaming API.
//!
//! Tests that arbitrary sequences of update calls produce correct results,
//! on the auto kernel and on every forced kernel.

#![no_main]

use arbitrary::Arbitrary;
use crc64nvme::{Crc64Nvme, Kernel};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  /// Chunk sizes for streaming updates
  chunk_sizes: Vec<usize>,
}

fuzz_target!(|input: Input| {
  let expected = crc64nvme::checksum(&input.data);

  stream(Crc64Nvme::new(), &input.data, &input.chunk_sizes, expected);
  for kernel in Kernel::available() {
    stream(Crc64Nvme::with_kernel(kernel), &input.data, &input.chunk_sizes, expected);
  }
});

fn stream(mut hasher: Crc64Nvme, data: &[u8], chunk_sizes: &[usize], expected: u64) {
  let mut rest = data;
  for &size in chunk_sizes {
    if rest.is_empty() {
      break;
    }
    let size = size % (rest.len() + 1);
    let (chunk, tail) = rest.split_at(size);
    hasher.update(chunk);
    rest = tail;
  }
  hasher.update(rest);

  assert_eq!(
    hasher.finalize(),
    expected,
    "{} streaming mismatch, len={}",
    hasher.backend_name(),
    data.len()
  );
}
