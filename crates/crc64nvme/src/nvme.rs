//! CRC-64/NVME streaming hasher.
//!
//! Parameters:
//! - width: 64
//! - poly: 0xAD93D23594C93659 (reflected: 0x9A6C9329AC4BC9B5)
//! - init: 0xFFFF_FFFF_FFFF_FFFF
//! - refin/refout: true
//! - xorout: 0xFFFF_FFFF_FFFF_FFFF
//! - check: 0xAE8B14860A799888

use traits::Checksum;

use crate::kernels::{self, Kernel};

/// CRC-64/NVME checksum.
///
/// ```
/// use crc64nvme::Crc64Nvme;
///
/// let mut h = Crc64Nvme::new();
/// h.update(b"1234");
/// h.update(b"56789");
/// assert_eq!(h.finalize(), 0xAE8B_1486_0A79_9888);
/// assert_eq!(h.digest(), [0xAE, 0x8B, 0x14, 0x86, 0x0A, 0x79, 0x98, 0x88]);
/// ```
#[derive(Clone, Debug)]
pub struct Crc64Nvme {
  /// Current CRC state (inverted - XOR applied on finalize).
  state: u64,
  /// Initial value for reset.
  initial: u64,
  /// Explicit kernel; `None` uses the cached auto selection.
  kernel: Option<Kernel>,
}

impl Crc64Nvme {
  /// Digest size in bytes.
  pub const SIZE: usize = 8;
  /// Preferred write granularity in bytes; any split is correct.
  pub const BLOCK_SIZE: usize = 1;

  /// Initial register value (all ones).
  const INIT: u64 = 0xFFFF_FFFF_FFFF_FFFF;
  const XOR_OUT: u64 = 0xFFFF_FFFF_FFFF_FFFF;

  /// Create a hasher on the auto-selected kernel.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      state: Self::INIT,
      initial: Self::INIT,
      kernel: None,
    }
  }

  /// Create a new hasher that will resume from a previous CRC.
  #[inline]
  #[must_use]
  pub const fn resume(crc: u64) -> Self {
    Self {
      state: crc ^ Self::XOR_OUT,
      initial: crc ^ Self::XOR_OUT,
      kernel: None,
    }
  }

  /// Create a hasher that always runs `kernel`.
  #[inline]
  #[must_use]
  pub const fn with_kernel(kernel: Kernel) -> Self {
    Self {
      state: Self::INIT,
      initial: Self::INIT,
      kernel: Some(kernel),
    }
  }

  /// Compute CRC-64/NVME of `data` in one shot.
  #[inline]
  #[must_use]
  pub fn checksum(data: &[u8]) -> u64 {
    kernels::update(Self::INIT, data) ^ Self::XOR_OUT
  }

  /// Feed `data`; any split of the input gives the same result.
  #[inline]
  pub fn update(&mut self, data: &[u8]) {
    self.state = match &self.kernel {
      Some(kernel) => kernel.update(self.state, data),
      None => kernels::update(self.state, data),
    };
  }

  /// The checksum of everything written since the last reset.
  ///
  /// Does not consume or modify the hasher; calling it repeatedly returns
  /// the same value.
  #[inline]
  #[must_use]
  pub const fn finalize(&self) -> u64 {
    self.state ^ Self::XOR_OUT
  }

  /// The checksum as 8 big-endian bytes.
  #[inline]
  #[must_use]
  pub const fn digest(&self) -> [u8; 8] {
    self.finalize().to_be_bytes()
  }

  /// Append the big-endian digest to `prefix` and return it.
  #[cfg(feature = "alloc")]
  #[must_use]
  pub fn sum(&self, mut prefix: alloc::vec::Vec<u8>) -> alloc::vec::Vec<u8> {
    prefix.extend_from_slice(&self.digest());
    prefix
  }

  /// Return to the state the hasher was created with.
  #[inline]
  pub fn reset(&mut self) {
    self.state = self.initial;
  }

  /// Digest size in bytes (always 8).
  #[inline]
  #[must_use]
  pub const fn size(&self) -> usize {
    Self::SIZE
  }

  /// Write granularity in bytes (always 1).
  #[inline]
  #[must_use]
  pub const fn block_size(&self) -> usize {
    Self::BLOCK_SIZE
  }

  /// The kernel this hasher runs.
  #[inline]
  #[must_use]
  pub fn kernel(&self) -> Kernel {
    self.kernel.unwrap_or_else(Kernel::auto)
  }

  /// Name of the kernel this hasher runs, e.g. `"x86_64/pclmul"`.
  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    match &self.kernel {
      Some(kernel) => kernel.name(),
      None => kernels::backend_name(),
    }
  }
}

impl Default for Crc64Nvme {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Checksum for Crc64Nvme {
  const OUTPUT_SIZE: usize = 8;
  const BLOCK_SIZE: usize = 1;
  type Output = u64;

  #[inline]
  fn new() -> Self {
    Crc64Nvme::new()
  }

  #[inline]
  fn with_initial(initial: Self::Output) -> Self {
    Crc64Nvme::resume(initial)
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    Crc64Nvme::update(self, data);
  }

  #[inline]
  fn finalize(&self) -> Self::Output {
    Crc64Nvme::finalize(self)
  }

  #[inline]
  fn reset(&mut self) {
    Crc64Nvme::reset(self);
  }

  #[inline]
  fn checksum(data: &[u8]) -> Self::Output {
    Crc64Nvme::checksum(data)
  }
}

impl core::hash::Hasher for Crc64Nvme {
  #[inline]
  fn write(&mut self, bytes: &[u8]) {
    self.update(bytes);
  }

  #[inline]
  fn finish(&self) -> u64 {
    self.finalize()
  }
}

#[cfg(feature = "std")]
impl std::io::Write for Crc64Nvme {
  #[inline]
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.update(buf);
    Ok(buf.len())
  }

  #[inline]
  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use alloc::vec::Vec;

  use super::*;

  const CHECK: u64 = 0xAE8B_1486_0A79_9888;

  #[test]
  fn test_check_value() {
    assert_eq!(Crc64Nvme::checksum(b"123456789"), CHECK);
  }

  #[test]
  fn test_empty_is_zero() {
    assert_eq!(Crc64Nvme::checksum(&[]), 0);
    assert_eq!(Crc64Nvme::new().finalize(), 0);
  }

  #[test]
  fn test_streaming_matches_oneshot() {
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let mut h = Crc64Nvme::new();
    for chunk in data.chunks(17) {
      h.update(chunk);
    }
    assert_eq!(h.finalize(), Crc64Nvme::checksum(&data));
  }

  #[cfg(feature = "alloc")]
  #[test]
  fn test_finalize_is_idempotent() {
    let mut h = Crc64Nvme::new();
    h.update(b"hello world");
    assert_eq!(h.finalize(), 0x8D29_D5C3_F6EA_8EBE);
    assert_eq!(h.finalize(), h.finalize());
    assert_eq!(h.sum(Vec::new()), h.sum(Vec::new()));
  }

  #[cfg(feature = "alloc")]
  #[test]
  fn test_sum_appends_big_endian_digest() {
    let mut h = Crc64Nvme::new();
    h.update(b"123456789");
    let out = h.sum(b"prefix".to_vec());
    assert_eq!(&out[..6], b"prefix");
    assert_eq!(&out[6..], &CHECK.to_be_bytes());
    assert_eq!(h.digest(), CHECK.to_be_bytes());
  }

  #[test]
  fn test_reset_matches_fresh() {
    let mut h = Crc64Nvme::new();
    h.update(b"garbage");
    h.reset();
    h.update(b"123456789");
    assert_eq!(h.finalize(), CHECK);
  }

  #[test]
  fn test_resume_continues() {
    let mut a = Crc64Nvme::new();
    a.update(b"12345");
    let mut b = Crc64Nvme::resume(a.finalize());
    b.update(b"6789");
    assert_eq!(b.finalize(), CHECK);

    // Reset returns to the resume point.
    b.reset();
    b.update(b"6789");
    assert_eq!(b.finalize(), CHECK);
  }

  #[test]
  fn test_size_and_block_size() {
    let h = Crc64Nvme::new();
    assert_eq!(h.size(), 8);
    assert_eq!(h.block_size(), 1);
    assert_eq!(<Crc64Nvme as Checksum>::OUTPUT_SIZE, 8);
    assert_eq!(<Crc64Nvme as Checksum>::BLOCK_SIZE, 1);
  }

  #[test]
  fn test_with_kernel_uses_that_kernel() {
    let mut h = Crc64Nvme::with_kernel(Kernel::reference());
    assert_eq!(h.backend_name(), kernels::REFERENCE);
    assert_eq!(h.kernel(), Kernel::reference());
    h.update(b"123456789");
    assert_eq!(h.finalize(), CHECK);

    h.reset();
    assert_eq!(h.backend_name(), kernels::REFERENCE);
  }

  #[test]
  fn test_default_uses_auto_kernel() {
    let h = Crc64Nvme::default();
    assert_eq!(h.backend_name(), kernels::backend_name());
    assert_eq!(h.kernel(), Kernel::auto());
  }

  #[test]
  fn test_checksum_trait() {
    assert_eq!(<Crc64Nvme as Checksum>::checksum(b"123456789"), CHECK);
    let mut h = <Crc64Nvme as Checksum>::with_initial(Crc64Nvme::checksum(b"1234"));
    Checksum::update(&mut h, b"56789");
    assert_eq!(Checksum::finalize(&h), CHECK);
  }

  #[test]
  fn test_core_hasher() {
    use core::hash::Hasher;

    let mut h = Crc64Nvme::new();
    Hasher::write(&mut h, b"1234");
    Hasher::write(&mut h, b"56789");
    assert_eq!(h.finish(), CHECK);
  }

  #[cfg(feature = "std")]
  #[test]
  fn test_io_write() {
    use std::io::Write;

    let mut h = Crc64Nvme::new();
    assert_eq!(Write::write(&mut h, b"123456789").ok(), Some(9));
    assert!(h.flush().is_ok());
    assert_eq!(h.finalize(), CHECK);
  }

  #[test]
  fn test_hasher_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Crc64Nvme>();
  }
}
