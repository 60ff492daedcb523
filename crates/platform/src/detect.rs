//! Runtime CPU feature detection.
//!
//! This module handles:
//! - Compile-time feature detection via `cfg!(target_feature = ...)`
//! - Runtime feature detection via `is_*_feature_detected!` (std only)
//! - Caching (via `OnceLock` with `std`, atomics without)
//! - A process-wide override for tests and bare-metal targets

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

use crate::caps::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
static OVERRIDE_BITS: [AtomicU64; 2] = [AtomicU64::new(0), AtomicU64::new(0)];

/// Set or clear the capabilities override.
///
/// When set, [`caps()`] returns the override value instead of detecting.
/// Pass `None` to clear the override and resume detection.
///
/// Kernel selections that were already cached by callers are not revisited.
pub fn set_caps_override(value: Option<Caps>) {
  match value {
    Some(caps) => {
      let ([x86, arm], Caps([lo, hi])) = (&OVERRIDE_BITS, caps);
      x86.store(lo, Ordering::Release);
      arm.store(hi, Ordering::Release);
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => OVERRIDE_SET.store(false, Ordering::Release),
  }
}

/// Check if an override is currently set.
#[inline]
pub fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

fn get_override() -> Option<Caps> {
  if !OVERRIDE_SET.load(Ordering::Acquire) {
    return None;
  }
  let [x86, arm] = &OVERRIDE_BITS;
  Some(Caps([x86.load(Ordering::Acquire), arm.load(Ordering::Acquire)]))
}

// ─────────────────────────────────────────────────────────────────────────────
// no_std cache
// ─────────────────────────────────────────────────────────────────────────────

#[cfg_attr(feature = "std", allow(dead_code))]
mod cache {
  use super::*;

  const UNINIT: u8 = 0;
  const READY: u8 = 2;

  static STATE: AtomicU8 = AtomicU8::new(UNINIT);
  static BITS: [AtomicU64; 2] = [AtomicU64::new(0), AtomicU64::new(0)];

  /// Detection is idempotent, so racing initializers store the same bits.
  pub fn get_or_init(f: fn() -> Caps) -> Caps {
    let [x86, arm] = &BITS;
    if STATE.load(Ordering::Acquire) == READY {
      return Caps([x86.load(Ordering::Relaxed), arm.load(Ordering::Relaxed)]);
    }
    let caps = f();
    let Caps([lo, hi]) = caps;
    x86.store(lo, Ordering::Relaxed);
    arm.store(hi, Ordering::Relaxed);
    STATE.store(READY, Ordering::Release);
    caps
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

/// Get detected CPU capabilities.
///
/// Under Miri, always returns [`Caps::NONE`] to avoid interpreting SIMD
/// intrinsics.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  #[cfg(miri)]
  {
    Caps::NONE
  }

  #[cfg(not(miri))]
  {
    if let Some(result) = get_override() {
      return result;
    }

    #[cfg(feature = "std")]
    {
      use std::sync::OnceLock;
      static CACHED: OnceLock<Caps> = OnceLock::new();
      *CACHED.get_or_init(detect_uncached)
    }

    #[cfg(not(feature = "std"))]
    {
      cache::get_or_init(detect_uncached)
    }
  }
}

/// Detect capabilities without caching or overrides.
#[inline]
#[must_use]
pub fn detect_uncached() -> Caps {
  #[allow(unused_mut)]
  let mut caps = compile_time();

  #[cfg(feature = "std")]
  {
    caps = caps.union(runtime());
  }

  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
const fn compile_time() -> Caps {
  use crate::caps::x86;

  // SSE2 is baseline on x86_64.
  #[allow(unused_mut)]
  let mut caps = x86::SSE2;

  #[cfg(target_feature = "pclmulqdq")]
  {
    caps = caps.union(x86::PCLMULQDQ);
  }

  caps
}

#[cfg(all(feature = "std", target_arch = "x86_64"))]
fn runtime() -> Caps {
  use crate::caps::x86;

  let mut caps = Caps::NONE;
  if std::arch::is_x86_feature_detected!("pclmulqdq") {
    caps |= x86::PCLMULQDQ;
  }
  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "aarch64")]
const fn compile_time() -> Caps {
  use crate::caps::aarch64;

  // NEON is baseline on AArch64.
  #[allow(unused_mut)]
  let mut caps = aarch64::NEON;

  #[cfg(target_feature = "aes")]
  {
    caps = caps.union(aarch64::AES);
  }

  caps
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn runtime() -> Caps {
  use crate::caps::aarch64;

  let mut caps = Caps::NONE;
  if std::arch::is_aarch64_feature_detected!("aes") {
    caps |= aarch64::AES;
  }
  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// Everything else: portable only
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const fn compile_time() -> Caps {
  Caps::NONE
}

#[cfg(all(feature = "std", not(any(target_arch = "x86_64", target_arch = "aarch64"))))]
fn runtime() -> Caps {
  Caps::NONE
}
