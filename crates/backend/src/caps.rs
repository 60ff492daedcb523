//! Re-exported capability constants and masks.
//!
//! Algorithm crates can import everything they need for candidate lists from
//! `backend::caps` instead of reaching into `platform` directly.
//!
//! ```ignore
//! use backend::caps::{Caps, x86, aarch64};
//!
//! fn has_folding(caps: Caps) -> bool {
//!     caps.has(x86::PCLMUL_READY) || caps.has(aarch64::PMULL_READY)
//! }
//! ```

pub use platform::caps::{Arch, Caps};

pub mod x86 {
  pub use platform::caps::x86::*;
}

pub mod aarch64 {
  pub use platform::caps::aarch64::*;
}
