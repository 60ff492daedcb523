use std::io::{self, Read};

use crc64nvme::{Checksum, Crc64Force, Crc64Nvme, Kernel, checksum, checksum_with};

const CHECK: u64 = 0xAE8B_1486_0A79_9888;

const LENGTHS: [usize; 18] = [
  0, 1, 3, 7, 8, 9, 15, 17, 127, 128, 129, 255, 256, 257, 1000, 10_000, 100_000, 1_000_000,
];

fn gen_bytes(len: usize, seed: u64) -> Vec<u8> {
  let mut out = vec![0u8; len];
  let mut x = seed | 1;
  for b in &mut out {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *b = (x as u8).wrapping_add((x >> 8) as u8);
  }
  out
}

fn crc_reflected_bitwise_u64(poly_reflected: u64, init: u64, xor_out: u64, data: &[u8]) -> u64 {
  let mut crc = init;
  for &b in data {
    crc ^= u64::from(b);
    for _ in 0..8 {
      let mask = 0u64.wrapping_sub(crc & 1);
      crc = (crc >> 1) ^ (poly_reflected & mask);
    }
  }
  crc ^ xor_out
}

fn nvme_bitwise(data: &[u8]) -> u64 {
  crc_reflected_bitwise_u64(crc64nvme::POLYNOMIAL, !0, !0, data)
}

fn crc64fast_nvme(data: &[u8]) -> u64 {
  let mut digest = crc64fast_nvme::Digest::new();
  digest.write(data);
  digest.sum64()
}

/// Reader that hands out at most `chunk` bytes per call.
struct ChunkedReader<'a> {
  data: &'a [u8],
  chunk: usize,
}

impl Read for ChunkedReader<'_> {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    let n = self.data.len().min(self.chunk).min(buf.len());
    let (head, rest) = self.data.split_at(n);
    buf[..n].copy_from_slice(head);
    self.data = rest;
    Ok(n)
  }
}

#[test]
#[cfg_attr(miri, ignore)]
fn all_kernels_agree_with_references() {
  for &len in &LENGTHS {
    let data = gen_bytes(len, 0x0123_4567_89ab_cdef ^ len as u64);

    let expected = nvme_bitwise(&data);
    assert_eq!(crc64fast_nvme(&data), expected, "crc64fast-nvme mismatch at len={len}");
    assert_eq!(checksum(&data), expected, "auto mismatch at len={len}");

    for kernel in Kernel::available() {
      assert_eq!(checksum_with(kernel, &data), expected, "{kernel} mismatch at len={len}");
    }
  }
}

#[test]
#[cfg_attr(miri, ignore)]
fn streaming_matches_oneshot() {
  for &len in &LENGTHS[..17] {
    let data = gen_bytes(len, 0x5d58_39a7_3d87_1ceb ^ len as u64);
    let oneshot = checksum(&data);

    for chunk in [1usize, 17] {
      let mut h = Crc64Nvme::new();
      for part in data.chunks(chunk) {
        h.update(part);
      }
      assert_eq!(h.finalize(), oneshot, "chunk={chunk} len={len}");
    }

    let splits = [0usize, 1, len / 2, len.saturating_sub(1), len];
    for split in splits.into_iter().filter(|&s| s <= len) {
      let (a, b) = data.split_at(split);

      let mut h = Crc64Nvme::new();
      h.update(a);
      h.update(b);
      assert_eq!(h.finalize(), oneshot, "incremental mismatch at len={len} split={split}");

      let mut r = Crc64Nvme::resume(checksum(a));
      r.update(b);
      assert_eq!(r.finalize(), oneshot, "resume mismatch at len={len} split={split}");
    }
  }
}

#[test]
fn tiny_buffers_split_at_every_offset() {
  for data in [&[][..], &[0x42][..], &[0x42, 0x17][..]] {
    let oneshot = checksum(data);
    for split in 0..=data.len() {
      let (a, b) = data.split_at(split);
      let mut h = Crc64Nvme::new();
      h.update(a);
      h.update(b);
      assert_eq!(h.finalize(), oneshot, "len={} split={split}", data.len());
    }
  }
}

#[test]
#[cfg_attr(miri, ignore)]
fn io_copy_through_small_reads() {
  let data = gen_bytes(100_000, 7);
  let mut reader = ChunkedReader { data: &data, chunk: 17 };
  let mut h = Crc64Nvme::new();

  let copied = io::copy(&mut reader, &mut h).unwrap();
  assert_eq!(copied, data.len() as u64);
  assert_eq!(h.finalize(), checksum(&data));
}

#[test]
fn forced_kernels_stream_correctly() {
  let data = gen_bytes(1000, 11);
  let expected = nvme_bitwise(&data);

  for force in [
    Crc64Force::Auto,
    Crc64Force::Portable,
    Crc64Force::Reference,
    Crc64Force::SoftClmul,
    Crc64Force::Clmul,
  ] {
    let Some(kernel) = Kernel::for_force(force) else {
      assert!(!crc64nvme::has_acceleration());
      continue;
    };
    let mut h = Crc64Nvme::with_kernel(kernel);
    for part in data.chunks(17) {
      h.update(part);
    }
    assert_eq!(h.finalize(), expected, "{force:?}");
    assert_eq!(h.backend_name(), kernel.name());
  }
}

#[test]
fn sum_is_idempotent() {
  let mut h = Crc64Nvme::new();
  h.update(b"123456789");
  let first = h.sum(Vec::new());
  let second = h.sum(Vec::new());
  assert_eq!(first, second);
  assert_eq!(first, CHECK.to_be_bytes());

  // Appending more data after `sum` continues the stream.
  h.update(b"123456789");
  assert_eq!(h.finalize(), checksum(b"123456789123456789"));
}

#[test]
fn reset_matches_fresh_instance() {
  let a = gen_bytes(300, 1);
  let b = gen_bytes(200, 2);

  let mut h = Crc64Nvme::new();
  h.update(&a);
  h.reset();
  h.update(&b);

  let mut fresh = Crc64Nvme::new();
  fresh.update(&b);
  assert_eq!(h.sum(Vec::new()), fresh.sum(Vec::new()));
}

#[test]
fn empty_input() {
  assert_eq!(checksum(&[]), 0);
  assert_eq!(Crc64Nvme::new().sum(Vec::new()), [0u8; 8]);
}

#[test]
fn golden_values() {
  let ramp: Vec<u8> = (0..=255u8).collect();
  let cases: [(&[u8], u64); 6] = [
    (b"123456789", CHECK),
    (b"hello world", 0x8D29_D5C3_F6EA_8EBE),
    (&[0], 0xD5DA_5047_EFEC_8728),
    (b"The quick brown fox jumps over the lazy dog", 0xD76C_5405_4954_C143),
    (&[0u8; 1024], 0x691B_B2B0_9BE5_498A),
    (ramp.as_slice(), 0xFF71_E212_79D9_966E),
  ];

  for (input, expected) in cases {
    assert_eq!(checksum(input), expected, "len={}", input.len());
    assert_eq!(nvme_bitwise(input), expected, "len={}", input.len());
  }
}

#[test]
fn size_and_block_size() {
  let h = Crc64Nvme::new();
  assert_eq!(h.size(), 8);
  assert_eq!(h.block_size(), 1);
  assert_eq!(h.sum(vec![0xAA]).len(), 9);
}

#[test]
fn checksum_trait_is_generic() {
  fn via_trait<C: Checksum>(data: &[u8]) -> C::Output {
    let mut c = C::new();
    c.update(data);
    c.finalize()
  }

  assert_eq!(via_trait::<Crc64Nvme>(b"123456789"), CHECK);
}
