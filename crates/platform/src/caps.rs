//! CPU capability representation.
//!
//! This module answers the question: "What instructions can I legally run on
//! this machine?"
//!
//! # Design
//!
//! [`Caps`] is a 128-bit bitset of CPU features. Each bit corresponds to a
//! specific ISA extension. The bits are architecture-specific but the API is
//! uniform across all targets.
//!
//! # Bit Layout
//!
//! - Bits 0-63: x86_64 features
//! - Bits 64-127: aarch64 features
//!
//! # Usage
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! if platform::caps().has(x86::PCLMUL_READY) {
//!     // PCLMULQDQ folding path
//! }
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 128-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`. It can be freely shared across threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) [u64; 2]);

impl Caps {
  /// Empty capability set (no features).
  pub const NONE: Self = Self([0; 2]);

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    let Self([x86, arm]) = self;
    let Self([need_x86, need_arm]) = required;
    (x86 & need_x86) == need_x86 && (arm & need_arm) == need_arm
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    let (Self([a0, a1]), Self([b0, b1])) = (self, other);
    Self([a0 | b0, a1 | b1])
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    let (Self([a0, a1]), Self([b0, b1])) = (self, other);
    Self([a0 & b0, a1 & b1])
  }

  /// Check if the capability set is empty.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    matches!(self, Self([0, 0]))
  }

  /// Count the number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    let Self([x86, arm]) = self;
    x86.count_ones() + arm.count_ones()
  }

  /// Create a capability set with a single bit set.
  ///
  /// `bit` must be below 128: bits 0-63 land in the x86_64 word, 64-127 in
  /// the aarch64 word.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    debug_assert!(bit < 128, "capability bit out of range");
    let bit_in_word = bit % 64;
    if bit < 64 {
      Self([1u64 << bit_in_word, 0])
    } else {
      Self([0, 1u64 << bit_in_word])
    }
  }

  /// Check if a specific bit is set.
  #[inline]
  #[must_use]
  pub const fn has_bit(self, bit: u8) -> bool {
    self.has(Self::bit(bit))
  }

  /// Returns an iterator over the names of all set feature bits.
  pub fn feature_names(self) -> impl Iterator<Item = &'static str> {
    X86_FEATURES
      .iter()
      .chain(AARCH64_FEATURES.iter())
      .filter_map(move |(bit, name)| if self.has_bit(*bit) { Some(*name) } else { None })
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self {
    self.union(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self {
    self.intersection(rhs)
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "Caps({}, ", Arch::current())?;
    write_names(f, *self)?;
    f.write_str(")")
  }
}

/// Write `[a, b, c]`, or `none` when the set is empty.
fn write_names(f: &mut core::fmt::Formatter<'_>, caps: Caps) -> core::fmt::Result {
  let mut iter = caps.feature_names().peekable();
  if iter.peek().is_none() {
    return f.write_str("none");
  }
  f.write_str("[")?;
  let mut first = true;
  for name in iter {
    if !first {
      f.write_str(", ")?;
    }
    f.write_str(name)?;
    first = false;
  }
  f.write_str("]")
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture enumeration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  Aarch64,
  #[default]
  Other,
}

impl Arch {
  /// Get the architecture for the current compilation target.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
      Self::Other
    }
  }

  /// Returns the human-readable name for this architecture.
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
      Self::Other => "other",
    }
  }
}

impl core::fmt::Display for Arch {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86_64 CPU features relevant to carryless-multiply folding.
pub mod x86 {
  use super::Caps;

  // ─── SSE Family ───
  pub const SSE2: Caps = Caps::bit(0);

  // ─── Crypto Extensions ───
  pub const PCLMULQDQ: Caps = Caps::bit(11);

  /// PCLMULQDQ-ready: PCLMULQDQ + SSE2 (the folding kernel's full requirement)
  pub const PCLMUL_READY: Caps = PCLMULQDQ.union(SSE2);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 CPU features relevant to carryless-multiply folding.
pub mod aarch64 {
  use super::Caps;

  pub const NEON: Caps = Caps::bit(64); // Baseline on AArch64
  pub const AES: Caps = Caps::bit(65);

  /// PMULL-ready: NEON + AES (`vmull_p64` is gated on the `aes` target feature)
  pub const PMULL_READY: Caps = NEON.union(AES);
}

// ─────────────────────────────────────────────────────────────────────────────
// Feature Name Lookup (for diagnostics)
// ─────────────────────────────────────────────────────────────────────────────

/// Feature name entry: (bit_index, name).
type FeatureEntry = (u8, &'static str);

const X86_FEATURES: &[FeatureEntry] = &[(0, "sse2"), (11, "pclmulqdq")];

const AARCH64_FEATURES: &[FeatureEntry] = &[(64, "neon"), (65, "aes")];

/// Capability set formatted as a feature list (`[sse2, pclmulqdq]`).
#[derive(Clone, Copy)]
pub struct FeatureList(pub Caps);

impl core::fmt::Display for FeatureList {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write_names(f, self.0)
  }
}
