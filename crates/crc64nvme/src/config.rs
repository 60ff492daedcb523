//! CRC-64/NVME runtime configuration (kernel overrides).
//!
//! This module centralizes the selection knobs so:
//! - Dispatch remains safe (never executes unsupported instructions)
//! - Benchmarks/tests can force specific kernels
//! - Introspection can report the active configuration without allocation

use platform::Caps;

/// Environment variable read (once) to force a kernel.
pub const FORCE_ENV: &str = "CRC64NVME_FORCE";

/// Forced kernel selection.
///
/// This is a *request* that is clamped to the detected CPU capabilities to
/// guarantee safety (e.g., forcing `Clmul` on a CPU without PCLMULQDQ/PMULL
/// falls back to `Auto` selection).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Crc64Force {
  /// Use the default auto selector.
  #[default]
  Auto,
  /// Force the slicing-by-8 table implementation.
  Portable,
  /// Force the bit-at-a-time reference.
  Reference,
  /// Force carryless folding on software multiplication.
  SoftClmul,
  /// Force hardware folding (x86_64 PCLMULQDQ or aarch64 PMULL), if supported.
  Clmul,
}

impl Crc64Force {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::Reference => "reference",
      Self::SoftClmul => "soft-clmul",
      Self::Clmul => "clmul",
    }
  }

  /// Parse a force value, ignoring ASCII case and surrounding whitespace.
  ///
  /// Returns `None` for empty or unknown values.
  #[must_use]
  pub fn parse(value: &str) -> Option<Self> {
    let value = value.trim();
    if value.is_empty() {
      return None;
    }

    if value.eq_ignore_ascii_case("auto") {
      return Some(Self::Auto);
    }
    if value.eq_ignore_ascii_case("portable")
      || value.eq_ignore_ascii_case("scalar")
      || value.eq_ignore_ascii_case("table")
    {
      return Some(Self::Portable);
    }
    if value.eq_ignore_ascii_case("reference") || value.eq_ignore_ascii_case("bitwise") {
      return Some(Self::Reference);
    }
    if value.eq_ignore_ascii_case("clmul") || value.eq_ignore_ascii_case("pclmul") || value.eq_ignore_ascii_case("pmull")
    {
      return Some(Self::Clmul);
    }
    if value.eq_ignore_ascii_case("soft-clmul") || value.eq_ignore_ascii_case("soft") {
      return Some(Self::SoftClmul);
    }

    None
  }
}

/// Full runtime configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc64Config {
  /// Requested force mode (env).
  pub requested_force: Crc64Force,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: Crc64Force,
}

#[cfg(feature = "std")]
fn read_env_force() -> Crc64Force {
  std::env::var(FORCE_ENV)
    .ok()
    .and_then(|value| Crc64Force::parse(&value))
    .unwrap_or(Crc64Force::Auto)
}

#[cfg(feature = "std")]
fn requested_force() -> Crc64Force {
  use std::sync::OnceLock;
  static FORCE: OnceLock<Crc64Force> = OnceLock::new();
  *FORCE.get_or_init(read_env_force)
}

#[cfg(not(feature = "std"))]
fn requested_force() -> Crc64Force {
  Crc64Force::Auto
}

/// Whether `caps` can run the hardware folding kernel on this target.
#[inline]
#[must_use]
pub(crate) fn has_clmul(caps: Caps) -> bool {
  #[cfg(target_arch = "x86_64")]
  {
    caps.has(platform::caps::x86::PCLMUL_READY)
  }

  #[cfg(target_arch = "aarch64")]
  {
    caps.has(platform::caps::aarch64::PMULL_READY)
  }

  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  {
    let _ = caps;
    false
  }
}

#[inline]
#[must_use]
pub(crate) fn clamp_force_to_caps(requested: Crc64Force, caps: Caps) -> Crc64Force {
  match requested {
    Crc64Force::Auto | Crc64Force::Portable | Crc64Force::Reference | Crc64Force::SoftClmul => requested,
    Crc64Force::Clmul if has_clmul(caps) => Crc64Force::Clmul,
    Crc64Force::Clmul => Crc64Force::Auto,
  }
}

/// Compute the effective config for the given capabilities.
///
/// This merges:
/// - env var overrides (`CRC64NVME_FORCE`) when `std` is enabled
/// - and clamps unsafe force requests to available CPU features
#[inline]
#[must_use]
pub fn config(caps: Caps) -> Crc64Config {
  let requested_force = requested_force();
  Crc64Config {
    requested_force,
    effective_force: clamp_force_to_caps(requested_force, caps),
  }
}

/// Cached process-wide configuration.
///
/// The configuration depends on:
/// - detected CPU capabilities (fixed for the lifetime of the process)
/// - env var overrides (expected to be set before process start)
#[inline]
#[must_use]
pub fn get() -> Crc64Config {
  #[cfg(feature = "std")]
  {
    use std::sync::OnceLock;
    static CACHED: OnceLock<Crc64Config> = OnceLock::new();
    *CACHED.get_or_init(|| config(platform::caps()))
  }

  #[cfg(not(feature = "std"))]
  {
    config(platform::caps())
  }
}
