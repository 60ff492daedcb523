//! aarch64 PMULL kernel.
//!
//! # Safety
//!
//! Uses `unsafe` for ARM SIMD intrinsics. Callers must ensure PMULL is
//! available before executing the accelerated path (the dispatcher does this).
#![allow(unsafe_code)]
// This module is intrinsics-heavy; keep unsafe blocks readable.
#![allow(unsafe_op_in_unsafe_fn)]

use core::{arch::aarch64::*, ops::BitXor};

use crate::{constants::nvme::fold, fold::FoldLane};

#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
struct Simd(uint8x16_t);

#[allow(non_camel_case_types)]
type poly64_t = u64;

impl Simd {
  #[inline]
  #[target_feature(enable = "neon", enable = "aes")]
  unsafe fn from_mul(a: poly64_t, b: poly64_t) -> Self {
    let mul = vmull_p64(a, b);
    Self(vreinterpretq_u8_p128(mul))
  }

  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn into_poly64s(self) -> [poly64_t; 2] {
    let x = vreinterpretq_p64_u8(self.0);
    [vgetq_lane_p64(x, 0), vgetq_lane_p64(x, 1)]
  }

  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn high_64(self) -> poly64_t {
    let x = vreinterpretq_p64_u8(self.0);
    vgetq_lane_p64(x, 1)
  }

  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn low_64(self) -> poly64_t {
    let x = vreinterpretq_p64_u8(self.0);
    vgetq_lane_p64(x, 0)
  }

  #[inline]
  #[target_feature(enable = "neon")]
  unsafe fn new(high: u64, low: u64) -> Self {
    Self(vcombine_u8(vcreate_u8(low), vcreate_u8(high)))
  }

  /// Fold 8 bytes: `self.high ⊕ (coeff ⊗ self.low)`.
  #[inline]
  #[target_feature(enable = "neon", enable = "aes")]
  unsafe fn fold_8(self, coeff: u64) -> Self {
    let [x0, x1] = self.into_poly64s();
    let h = Self::from_mul(coeff, x0);
    let l = Self::new(0, x1);
    h ^ l
  }

  /// Barrett reduction to finalize the CRC.
  #[inline]
  #[target_feature(enable = "neon", enable = "aes")]
  unsafe fn barrett(self, poly: u64, mu: u64) -> u64 {
    let t1 = Self::from_mul(self.low_64(), mu).low_64();
    let l = Self::from_mul(t1, poly);
    let reduced = (self ^ l).high_64();
    reduced ^ t1
  }
}

impl BitXor for Simd {
  type Output = Self;

  #[inline]
  fn bitxor(self, other: Self) -> Self {
    // SAFETY: `veorq_u8` is available with NEON.
    unsafe { Self(veorq_u8(self.0, other.0)) }
  }
}

impl FoldLane for Simd {
  #[inline]
  #[target_feature(enable = "neon", enable = "aes")]
  unsafe fn load(bytes: &[u8; 16]) -> Self {
    Self(vld1q_u8(bytes.as_ptr()))
  }

  #[inline]
  #[target_feature(enable = "neon", enable = "aes")]
  unsafe fn xor_low(self, value: u64) -> Self {
    self ^ Self::new(0, value)
  }

  /// `(coeff.low ⊗ self.low) ⊕ (coeff.high ⊗ self.high)`.
  #[inline]
  #[target_feature(enable = "neon", enable = "aes")]
  unsafe fn fold_16(self, coeff: (u64, u64)) -> Self {
    let [x0, x1] = self.into_poly64s();
    let h = Self::from_mul(coeff.1, x0);
    let l = Self::from_mul(coeff.0, x1);
    h ^ l
  }

  #[inline]
  #[target_feature(enable = "neon", enable = "aes")]
  unsafe fn reduce(self) -> u64 {
    let (poly, mu) = fold::BARRETT;
    self.fold_8(fold::KEY_16).barrett(poly, mu)
  }
}

/// CRC-64/NVME using PMULL folding.
///
/// # Safety
///
/// Requires PMULL (crypto/aes). Caller must verify via
/// `platform::caps().has(aarch64::PMULL_READY)`.
#[target_feature(enable = "aes", enable = "neon")]
pub unsafe fn update_pmull_unchecked(state: u64, data: &[u8]) -> u64 {
  crate::fold::update::<Simd>(state, data)
}

/// Safe wrapper for the PMULL kernel.
#[inline]
pub(crate) fn update_pmull(state: u64, data: &[u8]) -> u64 {
  // SAFETY: Dispatcher verifies PMULL_READY before selecting this kernel.
  unsafe { update_pmull_unchecked(state, data) }
}
