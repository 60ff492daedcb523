//! Software carryless multiplication and the portable folding kernel.
//!
//! [`clmul64`] is the software equivalent of PCLMULQDQ/PMULL. [`SoftLane`]
//! runs the hardware folding algorithm on plain integers, which lets the
//! folding maths be exercised on any host. It is slower than the tables and
//! is never auto-selected.

#![allow(unsafe_code)]

use core::ops::BitXor;

use crate::{constants::nvme::fold, fold::FoldLane};

/// Carryless multiplication of two 64-bit values into a 128-bit product.
#[inline]
#[must_use]
pub const fn clmul64(a: u64, b: u64) -> u128 {
  let mut product: u128 = 0;
  let mut i = 0;
  while i < 64 {
    if (a >> i) & 1 != 0 {
      product ^= (b as u128) << i;
    }
    i += 1;
  }
  product
}

/// A 128-bit folding register in a plain integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SoftLane(u128);

impl SoftLane {
  #[inline(always)]
  const fn low(self) -> u64 {
    self.0 as u64
  }

  #[inline(always)]
  const fn high(self) -> u64 {
    (self.0 >> 64) as u64
  }
}

impl BitXor for SoftLane {
  type Output = Self;

  #[inline(always)]
  fn bitxor(self, rhs: Self) -> Self {
    Self(self.0 ^ rhs.0)
  }
}

impl FoldLane for SoftLane {
  #[inline(always)]
  unsafe fn load(bytes: &[u8; 16]) -> Self {
    Self(u128::from_le_bytes(*bytes))
  }

  #[inline(always)]
  unsafe fn xor_low(self, value: u64) -> Self {
    Self(self.0 ^ u128::from(value))
  }

  #[inline(always)]
  unsafe fn fold_16(self, coeff: (u64, u64)) -> Self {
    Self(clmul64(self.low(), coeff.1) ^ clmul64(self.high(), coeff.0))
  }

  #[inline(always)]
  unsafe fn reduce(self) -> u64 {
    let folded = clmul64(self.low(), fold::KEY_16) ^ u128::from(self.high());

    let (poly, mu) = fold::BARRETT;
    let t1 = clmul64(folded as u64, mu);
    let t2 = clmul64(t1 as u64, poly);
    let reduced = t2 ^ (t1 << 64) ^ folded;

    (reduced >> 64) as u64
  }
}

/// Folding update on software carryless multiplication.
#[inline]
#[must_use]
pub fn update_soft(state: u64, data: &[u8]) -> u64 {
  // SAFETY: `SoftLane` is integer arithmetic with no CPU feature requirements.
  unsafe { crate::fold::update::<SoftLane>(state, data) }
}
