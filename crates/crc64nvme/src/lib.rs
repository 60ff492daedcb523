//! CRC-64/NVME checksums with hardware acceleration.
//!
//! CRC-64/NVME is the 64-bit CRC used by the NVMe storage standard and
//! AWS S3 object integrity checks.
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Polynomial | 0xAD93D23594C93659 (reflected 0x9A6C9329AC4BC9B5) |
//! | Init / XorOut | 0xFFFF_FFFF_FFFF_FFFF |
//! | RefIn / RefOut | true |
//! | Check (`"123456789"`) | 0xAE8B14860A799888 |
//!
//! # Hardware Acceleration
//!
//! | Target | Feature | Kernel |
//! |--------|---------|--------|
//! | x86_64 | PCLMULQDQ | `x86_64/pclmul` |
//! | aarch64 | PMULL (`aes`) | `aarch64/pmull` |
//! | everywhere | - | `portable/slice-by-8` |
//!
//! The kernel is chosen once per process from the detected CPU features.
//! Inputs shorter than one 64-byte fold block always take the table path.
//!
//! # Example
//!
//! ```rust
//! use crc64nvme::{Crc64Nvme, checksum};
//!
//! // One-shot computation
//! let crc = checksum(b"123456789");
//! assert_eq!(crc, 0xAE8B_1486_0A79_9888);
//!
//! // Streaming computation
//! let mut hasher = Crc64Nvme::new();
//! hasher.update(b"1234");
//! hasher.update(b"56789");
//! assert_eq!(hasher.finalize(), crc);
//! ```
//!
//! # Forcing a Kernel
//!
//! Set `CRC64NVME_FORCE` (`auto`, `portable`, `reference`, `soft-clmul`,
//! `clmul`) before the first checksum to override auto selection. Requests
//! the CPU cannot honour fall back to `auto`.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the `std` feature for embedded use:
//!
//! ```toml
//! [dependencies]
//! crc64nvme = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod clmul;
pub mod config;
mod constants;
mod fold;
mod introspect;
mod kernels;
mod nvme;
mod portable;
mod reference;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod x86_64;

#[doc(hidden)]
pub mod __internal {
  pub use crate::{
    clmul::{clmul64, update_soft},
    fold::{FOLD_BLOCK_BYTES, WIDE_BLOCK_BYTES},
    portable::{update as update_slice8, update_bytewise},
    reference::update as update_bitwise,
  };
}

pub use config::{Crc64Config, Crc64Force};
pub use constants::nvme::{POLYNOMIAL, POLYNOMIAL_NORMAL};
pub use introspect::{DispatchInfo, SelectionDiag, SelectionReason, backend_name, diag, kernel_name_for_len};
pub use kernels::{Kernel, has_acceleration};
pub use nvme::Crc64Nvme;
// Re-export traits for convenience
pub use traits::Checksum;

/// Compute the CRC-64/NVME checksum of `data`.
///
/// Equivalent to `Crc64Nvme::checksum(data)`.
#[inline]
#[must_use]
pub fn checksum(data: &[u8]) -> u64 {
  Crc64Nvme::checksum(data)
}

/// Compute the checksum of `data` through an explicit kernel.
#[inline]
#[must_use]
pub fn checksum_with(kernel: Kernel, data: &[u8]) -> u64 {
  kernel.checksum(data)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn golden_values() {
    let ramp: alloc::vec::Vec<u8> = (0..=255u8).collect();
    assert_eq!(checksum(b""), 0);
    assert_eq!(checksum(b"123456789"), 0xAE8B_1486_0A79_9888);
    assert_eq!(checksum(b"hello world"), 0x8D29_D5C3_F6EA_8EBE);
    assert_eq!(checksum(&[0]), 0xD5DA_5047_EFEC_8728);
    assert_eq!(checksum(b"The quick brown fox jumps over the lazy dog"), 0xD76C_5405_4954_C143);
    assert_eq!(checksum(&[0u8; 1024]), 0x691B_B2B0_9BE5_498A);
    assert_eq!(checksum(&ramp), 0xFF71_E212_79D9_966E);
  }

  #[test]
  fn checksum_with_every_kernel() {
    let data: alloc::vec::Vec<u8> = (0..4096u32).map(|i| (i * 7 + 3) as u8).collect();
    let expected = checksum(&data);
    for kernel in Kernel::available() {
      assert_eq!(checksum_with(kernel, &data), expected, "{kernel}");
    }
  }

  #[test]
  fn polynomial_constants() {
    assert_eq!(POLYNOMIAL, 0x9A6C_9329_AC4B_C9B5);
    assert_eq!(POLYNOMIAL_NORMAL, 0xAD93_D235_94C9_3659);
  }
}
