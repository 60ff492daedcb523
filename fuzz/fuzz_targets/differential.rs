//! Differential fuzzing against reference implementations.
//!
//! Compares every kernel against `crc64fast-nvme` and the bitwise reference
//! to catch any discrepancies.

#![no_main]

use crc64nvme::Kernel;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let mut digest = crc64fast_nvme::Digest::new();
  digest.write(data);
  let reference = digest.sum64();

  let ours = crc64nvme::checksum(data);
  assert_eq!(
    ours,
    reference,
    "CRC-64/NVME differential mismatch: ours={:#018x}, reference={:#018x}, len={}",
    ours,
    reference,
    data.len()
  );

  for kernel in Kernel::available() {
    assert_eq!(kernel.checksum(data), reference, "{kernel} mismatch, len={}", data.len());
  }
});
