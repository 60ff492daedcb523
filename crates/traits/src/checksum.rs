//! Non-cryptographic checksum traits.
//!
//! - **Performance**: Zero-cost abstractions, inline-friendly
//! - **Streaming**: Incremental updates split at any byte offset

use core::fmt::Debug;

/// Non-cryptographic checksum algorithm.
///
/// Provides the core interface for checksum computation with support for
/// incremental updates and streaming data.
///
/// # Usage
///
/// ```rust,ignore
/// use crc64nvme::{Checksum, Crc64Nvme};
///
/// // One-shot (fastest for data already in memory)
/// let crc = Crc64Nvme::checksum(b"hello world");
///
/// // Streaming (for incremental or large data)
/// let mut hasher = Crc64Nvme::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), crc);
/// ```
///
/// # Implementor Requirements
///
/// - `new()` must return the same state as `Default::default()`
/// - `finalize()` must be idempotent (calling multiple times returns same value)
/// - `reset()` must restore the hasher to the state it was constructed with
/// - splitting input across `update` calls at any offset must not change the result
pub trait Checksum: Clone + Default {
  /// Digest size in bytes (8 for CRC-64).
  const OUTPUT_SIZE: usize;

  /// Preferred write granularity in bytes.
  ///
  /// A value of 1 means writes may be split at any byte offset.
  const BLOCK_SIZE: usize;

  /// The checksum output type.
  type Output: Copy + Eq + Debug + Default;

  /// Create a new hasher with the default initial value.
  #[must_use]
  fn new() -> Self;

  /// Create a hasher that continues from a previously finalized checksum.
  ///
  /// `Self::with_initial(Self::checksum(a))` followed by `update(b)` yields the
  /// checksum of `a || b`.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Update the hasher with additional data.
  fn update(&mut self, data: &[u8]);

  /// Finalize and return the checksum.
  ///
  /// This method does not consume the hasher, allowing further updates.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Reset the hasher to its initial state.
  fn reset(&mut self);

  /// Compute the checksum of data in one shot.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }
}
