//! Kernel dispatch introspection for verifying optimization.
//!
//! This module provides APIs to inspect which kernel is selected for the
//! current platform, without impacting hot-path performance.
//!
//! # Examples
//!
//! ```
//! use crc64nvme::{DispatchInfo, backend_name, kernel_name_for_len};
//!
//! // Platform-level info
//! let info = DispatchInfo::current();
//! println!("{info}");
//!
//! println!("CRC-64/NVME backend: {}", backend_name());
//! println!("CRC-64/NVME @ 4KB: {}", kernel_name_for_len(4096));
//! ```

use core::fmt;

use crate::{
  config::{self, Crc64Force},
  fold::FOLD_BLOCK_BYTES,
  kernels::{self, Kernel},
};

/// Information about the current dispatch configuration.
///
/// This is a zero-allocation wrapper around the detected architecture and
/// CPU capabilities.
///
/// ```
/// use crc64nvme::DispatchInfo;
///
/// let info = DispatchInfo::current();
/// println!("{info}");
/// // Example output: "x86_64 [sse2, pclmulqdq]"
/// ```
#[derive(Clone, Copy)]
pub struct DispatchInfo {
  platform: platform::Description,
}

impl DispatchInfo {
  /// Returns dispatch info for the current platform.
  #[inline]
  #[must_use]
  pub fn current() -> Self {
    Self {
      platform: platform::describe(),
    }
  }

  /// Returns the platform description (architecture and features).
  #[inline]
  #[must_use]
  pub fn platform(&self) -> platform::Description {
    self.platform
  }
}

impl fmt::Display for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.platform)
  }
}

impl fmt::Debug for DispatchInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DispatchInfo")
      .field("platform", &format_args!("{}", self.platform))
      .finish()
  }
}

/// Returns the currently selected backend name.
#[inline]
#[must_use]
pub fn backend_name() -> &'static str {
  kernels::backend_name()
}

/// Returns the kernel name a buffer of `len` bytes runs through.
///
/// Folding kernels hand buffers below the fold block to the tables; the
/// table and bitwise kernels report their own name at every length.
#[inline]
#[must_use]
pub fn kernel_name_for_len(len: usize) -> &'static str {
  Kernel::auto().name_for_len(len)
}

// ─────────────────────────────────────────────────────────────────────────────
// Diagnostics
// ─────────────────────────────────────────────────────────────────────────────

/// High-level reason for a selection outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionReason {
  /// Below the fold block (always the tables).
  BelowFoldBlock,
  /// A forced mode was active.
  Forced,
  /// No carryless-multiply hardware; tables everywhere.
  NoAcceleration,
  /// Normal auto selection.
  Auto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionDiag {
  pub len: usize,
  pub requested_force: Crc64Force,
  pub effective_force: Crc64Force,
  pub reason: SelectionReason,
  pub selected_kernel: &'static str,
}

/// Diagnose kernel selection for a buffer of `len` bytes.
#[must_use]
pub fn diag(len: usize) -> SelectionDiag {
  let cfg = config::get();
  let kernel = Kernel::auto();

  let reason = if cfg.effective_force != Crc64Force::Auto {
    SelectionReason::Forced
  } else if !kernel.is_folding() {
    SelectionReason::NoAcceleration
  } else if len < FOLD_BLOCK_BYTES {
    SelectionReason::BelowFoldBlock
  } else {
    SelectionReason::Auto
  };

  SelectionDiag {
    len,
    requested_force: cfg.requested_force,
    effective_force: cfg.effective_force,
    reason,
    selected_kernel: kernel.name_for_len(len),
  }
}
