//! Backend crate: kernel dispatch primitives for the crc64nvme workspace.
//!
//! - **Dispatch**: ordered candidate lists, first-match selection, cached selection
//! - **Capabilities**: Re-exports from `platform` for capability-based dispatch
//!
//! # Usage
//!
//! Algorithm crates register kernels as an ordered list of `Candidate`s.
//! Use the [`candidates!`] macro for concise syntax:
//!
//! ```ignore
//! use backend::dispatch::{select, Candidate, Selected, Crc64Fn};
//! use backend::caps::{Caps, x86};
//!
//! const CANDIDATES: &[Candidate<Crc64Fn>] = backend::candidates![
//!     "x86_64/pclmul"       => x86::PCLMUL_READY => pclmul_kernel,
//!     "portable/slice-by-8" => Caps::NONE        => portable_kernel,
//! ];
//!
//! fn select_crc64() -> &'static Selected<Crc64Fn> {
//!     select(platform::caps(), CANDIDATES)
//! }
//! ```
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
pub mod dispatch;

pub use dispatch::{Candidate, Crc64Dispatcher, Crc64Fn, Selected, select};
pub use platform;
