//! Carryless-multiply folding driver.
//!
//! One algorithm, instantiated per lane type (PCLMULQDQ, PMULL, software):
//!
//! 1. Inputs shorter than [`FOLD_BLOCK_BYTES`] go to the slicing-by-8 tables.
//! 2. Load 8 lanes (128-byte blocks) when the input is at least
//!    [`WIDE_BLOCK_BYTES`], otherwise 4 lanes (64-byte blocks), and XOR the
//!    register into the low half of lane 0.
//! 3. Fold every lane forward by one block per further full block.
//! 4. Collapse the lanes into the last one, then fold leftover 16-byte
//!    vectors one at a time.
//! 5. Reduce 128 → 64 bits (16B→8B fold, then Barrett) and finish the
//!    sub-16-byte tail with the tables.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]
// SAFETY: All indexing is over `[L; N]` with N in {4, 8} and in-bounds indices.
#![allow(clippy::indexing_slicing)]

use core::ops::BitXor;

use crate::{constants::nvme::fold, portable};

/// Smallest input the folding kernels accept; shorter inputs use the tables.
pub const FOLD_BLOCK_BYTES: usize = 64;

/// Inputs of at least this many bytes fold with 8 lanes instead of 4.
pub const WIDE_BLOCK_BYTES: usize = 128;

/// A 128-bit folding register.
///
/// # Safety
///
/// Implementations may require CPU features; callers must only use a lane
/// type inside a function compiled (and dispatched) with those features.
pub(crate) trait FoldLane: Copy + BitXor<Output = Self> {
  /// Load 16 bytes; byte 0 is the least significant bit position.
  unsafe fn load(bytes: &[u8; 16]) -> Self;

  /// XOR `value` into the low 64 bits.
  unsafe fn xor_low(self, value: u64) -> Self;

  /// Advance by a `(high, low)` coefficient pair: `low ⊗ self.low ⊕ high ⊗ self.high`.
  unsafe fn fold_16(self, coeff: (u64, u64)) -> Self;

  /// Reduce to the 64-bit register: fold 16B→8B with `KEY_16`, then Barrett.
  unsafe fn reduce(self) -> u64;
}

/// Fold `data` into the raw register `state`.
#[inline(always)]
pub(crate) unsafe fn update<L: FoldLane>(state: u64, data: &[u8]) -> u64 {
  if data.len() < FOLD_BLOCK_BYTES {
    return portable::update(state, data);
  }

  let (vectors, tail) = data.as_chunks::<16>();
  let reduced = if data.len() >= WIDE_BLOCK_BYTES {
    fold_lanes::<L, 8>(state, vectors, fold::COEFF_128)
  } else {
    fold_lanes::<L, 4>(state, vectors, fold::COEFF_64)
  };

  portable::update(reduced, tail)
}

#[inline(always)]
unsafe fn fold_lanes<L: FoldLane, const N: usize>(state: u64, vectors: &[[u8; 16]], block: (u64, u64)) -> u64 {
  let Some((first, rest)) = vectors.split_first_chunk::<N>() else {
    return portable::update(state, vectors.as_flattened());
  };

  // SAFETY: forwarded from the caller's feature guarantee.
  let mut x: [L; N] = first.map(|v| unsafe { L::load(&v) });
  x[0] = x[0].xor_low(state);

  let (blocks, singles) = rest.as_chunks::<N>();
  for chunk in blocks {
    for (lane, v) in x.iter_mut().zip(chunk) {
      *lane = lane.fold_16(block) ^ L::load(v);
    }
  }

  let mut acc = x[N - 1];
  for (lane, &coeff) in x[..N - 1].iter().zip(&fold::LANE_COLLAPSE[8 - N..]) {
    acc = acc ^ lane.fold_16(coeff);
  }

  for v in singles {
    acc = acc.fold_16(fold::COEFF_16) ^ L::load(v);
  }

  acc.reduce()
}
