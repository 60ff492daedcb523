//! Table-driven CRC-64/NVME.
//!
//! [`update_bytewise`] is the classic one-table loop and the ground truth for
//! the fast paths. [`update`] consumes eight bytes per step through the
//! slicing-by-8 tables and is the dependency-free fallback on every target.

// Every table index is masked to 0..=255.
#![allow(clippy::indexing_slicing)]

use crate::constants::nvme::TABLES;

macro_rules! table {
  ($idx:expr) => {
    TABLES.0[$idx]
  };
}

/// Advance the register by one byte.
#[inline(always)]
fn step(state: u64, byte: u8) -> u64 {
  table!(0)[((state ^ u64::from(byte)) & 0xFF) as usize] ^ (state >> 8)
}

/// Byte-at-a-time table update.
#[inline]
#[must_use]
pub fn update_bytewise(state: u64, data: &[u8]) -> u64 {
  data.iter().fold(state, |crc, &b| step(crc, b))
}

/// Slicing-by-8 table update.
#[inline]
#[must_use]
pub fn update(state: u64, data: &[u8]) -> u64 {
  let mut crc = state;
  let (chunks, remainder) = data.as_chunks::<8>();

  for chunk in chunks {
    let x = crc ^ u64::from_le_bytes(*chunk);

    crc = table!(7)[(x & 0xFF) as usize]
      ^ table!(6)[((x >> 8) & 0xFF) as usize]
      ^ table!(5)[((x >> 16) & 0xFF) as usize]
      ^ table!(4)[((x >> 24) & 0xFF) as usize]
      ^ table!(3)[((x >> 32) & 0xFF) as usize]
      ^ table!(2)[((x >> 40) & 0xFF) as usize]
      ^ table!(1)[((x >> 48) & 0xFF) as usize]
      ^ table!(0)[(x >> 56) as usize];
  }

  update_bytewise(crc, remainder)
}
