//! Bitwise reference implementation.
//!
//! This is the canonical "source of truth" for CRC-64/NVME. It processes one
//! bit at a time, which makes it:
//!
//! - **Obviously correct**: The loop mirrors the polynomial division directly
//! - **Audit-friendly**: No lookup tables, no folding constants
//! - **Const-evaluable**: Check values can be verified at compile time
//!
//! Every optimized path (slice-by-8, carryless folding) must produce identical
//! results. Throughput is roughly 8 operations per bit, so this is only ever
//! selected when forced.

// Indexing is bounded by the `while i < data.len()` loop condition.
#![allow(clippy::indexing_slicing)]

use crate::constants::nvme::POLYNOMIAL;

/// Bitwise reflected CRC-64 update.
///
/// Returns the raw register (caller applies the final XOR).
#[must_use]
pub const fn crc64_bitwise(poly: u64, init: u64, data: &[u8]) -> u64 {
  let mut crc = init;
  let mut i: usize = 0;
  while i < data.len() {
    crc ^= data[i] as u64;
    let mut bit: u32 = 0;
    while bit < 8 {
      crc = if crc & 1 != 0 { (crc >> 1) ^ poly } else { crc >> 1 };
      bit = bit.strict_add(1);
    }
    i = i.strict_add(1);
  }
  crc
}

/// CRC-64/NVME register update, one bit at a time.
#[inline]
#[must_use]
pub const fn update(state: u64, data: &[u8]) -> u64 {
  crc64_bitwise(POLYNOMIAL, state, data)
}

/// The NVMe check value, verified at compile time.
const _: () = assert!(!update(!0, b"123456789") == 0xAE8B_1486_0A79_9888);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_input_is_identity() {
    assert_eq!(update(0x1234, &[]), 0x1234);
    assert_eq!(!update(!0, &[]), 0);
  }

  #[test]
  fn check_value() {
    assert_eq!(!update(!0, b"123456789"), 0xAE8B_1486_0A79_9888);
  }

  #[test]
  fn single_zero_byte() {
    assert_eq!(!update(!0, &[0]), 0xD5DA_5047_EFEC_8728);
  }

  #[test]
  fn split_updates_compose() {
    let data = b"The quick brown fox jumps over the lazy dog";
    let (a, b) = data.split_at(17);
    assert_eq!(update(update(!0, a), b), update(!0, data));
    assert_eq!(!update(!0, data), 0xD76C_5405_4954_C143);
  }
}
