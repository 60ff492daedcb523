//! Precomputed constants for CRC-64/NVME.
//!
//! All tables and folding keys are computed at compile time from the
//! polynomial.
//!
//! # Cache Alignment
//!
//! Lookup tables are 64-byte (cache line) aligned using [`Aligned64`] to prevent
//! cache line splits during table lookups.

pub mod gf2;
pub mod nvme;
pub mod tables;

/// Wrapper type to force 64-byte (cache line) alignment.
///
/// The inner type `T` is accessible via `.0`.
#[repr(align(64))]
pub struct Aligned64<T>(pub T);
