//! x86_64 PCLMULQDQ kernel.
//!
//! # Safety
//!
//! Uses `unsafe` for x86 SIMD intrinsics. Callers must ensure PCLMULQDQ is
//! available before executing the accelerated path (the dispatcher does this).
#![allow(unsafe_code)]
// This module is intrinsics-heavy; keep unsafe blocks readable.
#![allow(unsafe_op_in_unsafe_fn)]

use core::{arch::x86_64::*, ops::BitXor};

use crate::{constants::nvme::fold, fold::FoldLane};

#[repr(transparent)]
#[derive(Copy, Clone, Debug)]
struct Simd(__m128i);

impl BitXor for Simd {
  type Output = Self;

  #[inline]
  fn bitxor(self, other: Self) -> Self {
    // SAFETY: `_mm_xor_si128` is available on all x86_64 (SSE2 baseline).
    unsafe { Self(_mm_xor_si128(self.0, other.0)) }
  }
}

impl Simd {
  #[inline]
  #[target_feature(enable = "sse2")]
  unsafe fn new(high: u64, low: u64) -> Self {
    Self(_mm_set_epi64x(high as i64, low as i64))
  }

  /// Fold 8 bytes: `self.high ⊕ (coeff ⊗ self.low)`.
  #[inline]
  #[target_feature(enable = "sse2", enable = "pclmulqdq")]
  unsafe fn fold_8(self, coeff: u64) -> Self {
    let coeff = Self::new(0, coeff);
    let h = _mm_clmulepi64_si128::<0x00>(self.0, coeff.0);
    let l = _mm_srli_si128::<8>(self.0);
    Self(_mm_xor_si128(h, l))
  }

  /// Barrett reduction to finalize the CRC.
  #[inline]
  #[target_feature(enable = "sse2", enable = "pclmulqdq")]
  unsafe fn barrett(self, poly: u64, mu: u64) -> u64 {
    let polymu = Self::new(poly, mu);
    let t1 = _mm_clmulepi64_si128::<0x00>(self.0, polymu.0);
    let h = _mm_slli_si128::<8>(t1);
    let l = _mm_clmulepi64_si128::<0x10>(t1, polymu.0);
    let reduced = Self(_mm_xor_si128(_mm_xor_si128(h, l), self.0));

    // Extract high 64 bits without requiring SSE4.1.
    let hi = _mm_srli_si128::<8>(reduced.0);
    _mm_cvtsi128_si64(hi) as u64
  }
}

impl FoldLane for Simd {
  #[inline]
  #[target_feature(enable = "sse2", enable = "pclmulqdq")]
  unsafe fn load(bytes: &[u8; 16]) -> Self {
    Self(_mm_loadu_si128(bytes.as_ptr().cast()))
  }

  #[inline]
  #[target_feature(enable = "sse2", enable = "pclmulqdq")]
  unsafe fn xor_low(self, value: u64) -> Self {
    self ^ Self::new(0, value)
  }

  /// `(coeff.low ⊗ self.low) ⊕ (coeff.high ⊗ self.high)`.
  #[inline]
  #[target_feature(enable = "sse2", enable = "pclmulqdq")]
  unsafe fn fold_16(self, coeff: (u64, u64)) -> Self {
    let coeff = Self::new(coeff.0, coeff.1);
    let h = _mm_clmulepi64_si128::<0x11>(self.0, coeff.0);
    let l = _mm_clmulepi64_si128::<0x00>(self.0, coeff.0);
    Self(_mm_xor_si128(h, l))
  }

  #[inline]
  #[target_feature(enable = "sse2", enable = "pclmulqdq")]
  unsafe fn reduce(self) -> u64 {
    let (poly, mu) = fold::BARRETT;
    self.fold_8(fold::KEY_16).barrett(poly, mu)
  }
}

/// CRC-64/NVME using PCLMULQDQ folding.
///
/// # Safety
///
/// Requires PCLMULQDQ. Caller must verify via `platform::caps().has(x86::PCLMUL_READY)`.
#[target_feature(enable = "sse2", enable = "pclmulqdq")]
pub unsafe fn update_pclmul_unchecked(state: u64, data: &[u8]) -> u64 {
  crate::fold::update::<Simd>(state, data)
}

/// Safe wrapper for the PCLMULQDQ kernel.
#[inline]
pub(crate) fn update_pclmul(state: u64, data: &[u8]) -> u64 {
  // SAFETY: Dispatcher verifies PCLMUL_READY before selecting this kernel.
  unsafe { update_pclmul_unchecked(state, data) }
}
