//! Kernel names, candidate lists and the cached process-wide selection.
//!
//! A [`Kernel`] is a name plus a `fn(state, data) -> state` over the raw
//! (pre-inversion) register. Production code goes through the cached auto
//! selection; tests and benchmarks pick kernels explicitly with
//! [`Kernel::for_force`] and never touch global state.

use core::fmt;

use backend::{
  caps::Caps,
  dispatch::{Candidate, Crc64Dispatcher, Crc64Fn, Selected, select},
};

use crate::{
  clmul,
  config::{self, Crc64Force},
  fold::FOLD_BLOCK_BYTES,
  portable, reference,
};

// ─────────────────────────────────────────────────────────────────────────────
// Kernel Names
// ─────────────────────────────────────────────────────────────────────────────

/// Slicing-by-8 tables; the fallback on every target.
pub const PORTABLE: &str = "portable/slice-by-8";
/// Bit-at-a-time reference.
pub const REFERENCE: &str = "reference/bitwise";
/// Carryless folding on software multiplication.
pub const SOFT_CLMUL: &str = "portable/soft-clmul";
/// x86_64 PCLMULQDQ folding.
pub const X86_64_PCLMUL: &str = "x86_64/pclmul";
/// aarch64 PMULL folding.
pub const AARCH64_PMULL: &str = "aarch64/pmull";

// ─────────────────────────────────────────────────────────────────────────────
// Candidate Lists
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
const CANDIDATES: &[Candidate<Crc64Fn>] = backend::candidates![
  X86_64_PCLMUL => backend::caps::x86::PCLMUL_READY => crate::x86_64::update_pclmul,
  PORTABLE      => Caps::NONE                      => portable::update,
];

#[cfg(target_arch = "aarch64")]
const CANDIDATES: &[Candidate<Crc64Fn>] = backend::candidates![
  AARCH64_PMULL => backend::caps::aarch64::PMULL_READY => crate::aarch64::update_pmull,
  PORTABLE      => Caps::NONE                          => portable::update,
];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const CANDIDATES: &[Candidate<Crc64Fn>] = backend::candidates![
  PORTABLE => Caps::NONE => portable::update,
];

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher Selection
// ─────────────────────────────────────────────────────────────────────────────

const FORCED_PORTABLE: &Selected<Crc64Fn> = &Selected::new(PORTABLE, portable::update);
const FORCED_REFERENCE: &Selected<Crc64Fn> = &Selected::new(REFERENCE, reference::update);
const FORCED_SOFT_CLMUL: &Selected<Crc64Fn> = &Selected::new(SOFT_CLMUL, clmul::update_soft);

fn select_auto() -> &'static Selected<Crc64Fn> {
  match config::get().effective_force {
    Crc64Force::Portable => FORCED_PORTABLE,
    Crc64Force::Reference => FORCED_REFERENCE,
    Crc64Force::SoftClmul => FORCED_SOFT_CLMUL,
    // `Clmul` survives clamping only when the caps allow it, so the
    // candidate list picks the hardware kernel.
    Crc64Force::Auto | Crc64Force::Clmul => select(platform::caps(), CANDIDATES),
  }
}

static DISPATCHER: Crc64Dispatcher = Crc64Dispatcher::new(select_auto);

/// Update the raw register with the cached auto-selected kernel.
#[inline]
#[must_use]
pub(crate) fn update(state: u64, data: &[u8]) -> u64 {
  DISPATCHER.call(state, data)
}

/// Name of the cached auto-selected kernel.
#[inline]
#[must_use]
pub(crate) fn backend_name() -> &'static str {
  DISPATCHER.backend_name()
}

/// Whether the hardware folding kernel can run on this CPU.
#[inline]
#[must_use]
pub fn has_acceleration() -> bool {
  config::has_clmul(platform::caps())
}

// ─────────────────────────────────────────────────────────────────────────────
// Kernel
// ─────────────────────────────────────────────────────────────────────────────

/// A named CRC-64/NVME update function over the raw register.
#[derive(Clone, Copy)]
pub struct Kernel {
  selected: Selected<Crc64Fn>,
}

impl Kernel {
  const fn from_parts(name: &'static str, func: Crc64Fn) -> Self {
    Self {
      selected: Selected::new(name, func),
    }
  }

  /// The cached auto-selected kernel.
  #[inline]
  #[must_use]
  pub fn auto() -> Self {
    Self {
      selected: DISPATCHER.get(),
    }
  }

  /// Slicing-by-8 tables.
  #[inline]
  #[must_use]
  pub const fn portable() -> Self {
    Self {
      selected: *FORCED_PORTABLE,
    }
  }

  /// Bit-at-a-time reference.
  #[inline]
  #[must_use]
  pub const fn reference() -> Self {
    Self {
      selected: *FORCED_REFERENCE,
    }
  }

  /// Carryless folding on software multiplication.
  #[inline]
  #[must_use]
  pub const fn soft_clmul() -> Self {
    Self {
      selected: *FORCED_SOFT_CLMUL,
    }
  }

  /// The hardware folding kernel, if the current caps allow it.
  #[must_use]
  pub fn accelerated() -> Option<Self> {
    if !has_acceleration() {
      return None;
    }

    #[cfg(target_arch = "x86_64")]
    {
      Some(Self::from_parts(X86_64_PCLMUL, crate::x86_64::update_pclmul))
    }

    #[cfg(target_arch = "aarch64")]
    {
      Some(Self::from_parts(AARCH64_PMULL, crate::aarch64::update_pmull))
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
      None
    }
  }

  /// The kernel a force mode names, clamped to the current caps.
  ///
  /// Returns `None` only for [`Crc64Force::Clmul`] on a CPU without
  /// PCLMULQDQ/PMULL.
  #[must_use]
  pub fn for_force(force: Crc64Force) -> Option<Self> {
    match force {
      Crc64Force::Auto => Some(Self::auto()),
      Crc64Force::Portable => Some(Self::portable()),
      Crc64Force::Reference => Some(Self::reference()),
      Crc64Force::SoftClmul => Some(Self::soft_clmul()),
      Crc64Force::Clmul => Self::accelerated(),
    }
  }

  /// Every kernel that can run here: the software kernels, then the
  /// hardware one when supported.
  pub fn available() -> impl Iterator<Item = Self> {
    [Self::portable(), Self::reference(), Self::soft_clmul()]
      .into_iter()
      .chain(Self::accelerated())
  }

  /// Diagnostic name, e.g. `"x86_64/pclmul"`.
  #[inline]
  #[must_use]
  pub const fn name(&self) -> &'static str {
    self.selected.name
  }

  /// Whether this kernel folds with carryless multiplication.
  #[inline]
  #[must_use]
  pub fn is_folding(&self) -> bool {
    !matches!(self.name(), PORTABLE | REFERENCE)
  }

  /// Name of the path a buffer of `len` bytes actually takes.
  ///
  /// Folding kernels hand inputs below the fold block to the tables.
  #[inline]
  #[must_use]
  pub fn name_for_len(&self, len: usize) -> &'static str {
    if self.is_folding() && len < FOLD_BLOCK_BYTES {
      PORTABLE
    } else {
      self.name()
    }
  }

  /// Advance the raw register over `data`.
  #[inline]
  #[must_use]
  pub fn update(&self, state: u64, data: &[u8]) -> u64 {
    (self.selected.func)(state, data)
  }

  /// One-shot checksum through this kernel.
  #[inline]
  #[must_use]
  pub fn checksum(&self, data: &[u8]) -> u64 {
    !self.update(!0, data)
  }
}

impl PartialEq for Kernel {
  fn eq(&self, other: &Self) -> bool {
    self.name() == other.name()
  }
}

impl Eq for Kernel {}

impl fmt::Debug for Kernel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Kernel").field(&self.name()).finish()
  }
}

impl fmt::Display for Kernel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
