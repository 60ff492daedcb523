//! CPU capability detection for the crc64nvme workspace.
//!
//! This crate is the **single source of truth** for CPU feature detection.
//! Kernel selection elsewhere in the workspace asks `platform::caps()` instead
//! of doing ad-hoc detection.
//!
//! # Main Entry Point
//!
//! ```ignore
//! let caps = platform::caps();
//!
//! if caps.has(platform::caps::x86::PCLMUL_READY) {
//!     // PCLMULQDQ folding kernel
//! }
//! ```
//!
//! # Design Philosophy
//!
//! 1. **One API**: Algorithms query `platform::caps()`.
//! 2. **Zero-cost when possible**: Compile-time features are detected via `cfg!`.
//! 3. **Cached otherwise**: Runtime detection is cached in `OnceLock` (std) or atomics (no_std).
//! 4. **Miri-safe**: Under Miri, always returns portable-only caps.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

use core::fmt;

pub use caps::{Arch, Caps};

/// Get the detected CPU capabilities.
///
/// - With `std`: cached in a `OnceLock` after the first call.
/// - Without `std`: cached with atomics; only compile-time features are seen.
/// - Under Miri: always [`Caps::NONE`].
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Detect capabilities without consulting the cache or the override.
#[inline]
#[must_use]
pub fn detect_uncached() -> Caps {
  detect::detect_uncached()
}

/// Set or clear the capabilities override.
///
/// Call this early: consumers that have already cached a kernel selection
/// keep it.
///
/// ```ignore
/// platform::set_caps_override(Some(platform::Caps::NONE));
/// // ... code paths now see a CPU without acceleration ...
/// platform::set_caps_override(None);
/// ```
#[inline]
pub fn set_caps_override(value: Option<Caps>) {
  detect::set_caps_override(value);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}

/// Human-readable description of the current platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Description {
  pub arch: Arch,
  pub caps: Caps,
}

impl fmt::Display for Description {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.arch, caps::FeatureList(self.caps))
  }
}

/// Describe the current platform (architecture plus detected features).
#[inline]
#[must_use]
pub fn describe() -> Description {
  Description {
    arch: Arch::current(),
    caps: caps(),
  }
}
