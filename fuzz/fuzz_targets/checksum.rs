//! Fuzz target for the CRC-64/NVME hasher.
//!
//! Tests that:
//! - No panics on arbitrary input
//! - Incremental updates produce same result as one-shot
//! - Resume produces correct results
//! - `io::Write` and `sum` agree with `finalize`

#![no_main]

use std::io::Write;

use arbitrary::Arbitrary;
use crc64nvme::Crc64Nvme;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  split_point: usize,
}

fuzz_target!(|input: Input| {
  let data = &input.data;
  let split = input.split_point % (data.len() + 1);

  let oneshot = crc64nvme::checksum(data);

  let (a, b) = data.split_at(split);
  let mut hasher = Crc64Nvme::new();
  hasher.update(a);
  hasher.update(b);
  assert_eq!(oneshot, hasher.finalize(), "incremental mismatch");

  let mut resumed = Crc64Nvme::resume(crc64nvme::checksum(a));
  resumed.update(b);
  assert_eq!(oneshot, resumed.finalize(), "resume mismatch");

  let mut writer = Crc64Nvme::new();
  assert_eq!(writer.write(a).ok(), Some(a.len()));
  assert_eq!(writer.write(b).ok(), Some(b.len()));
  assert_eq!(writer.sum(Vec::new()), oneshot.to_be_bytes(), "sum mismatch");
});
