//! Kernel dispatch: selection and caching.
//!
//! - [`Candidate`]: A kernel with capability requirements
//! - [`Selected`]: The result of kernel selection
//! - [`select`]: Choose the best kernel from a candidate list
//! - [`Crc64Dispatcher`]: Caches the selected CRC-64 kernel for the process
//!
//! # Usage
//!
//! Algorithm crates register kernels as an ordered list of `Candidate`s:
//!
//! ```ignore
//! use backend::dispatch::{Candidate, Selected, select};
//! use platform::caps::{Caps, x86};
//!
//! const CANDIDATES: &[Candidate<Crc64Fn>] = &[
//!     Candidate::new("x86_64/pclmul", x86::PCLMUL_READY, pclmul_kernel),
//!     Candidate::new("portable/slice-by-8", Caps::NONE, portable_kernel),
//! ];
//!
//! fn select_crc64() -> &'static Selected<Crc64Fn> {
//!     select(platform::caps(), CANDIDATES)
//! }
//! ```

use platform::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// The result of kernel selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// The selected kernel function.
  pub func: F,
}

impl<F> Selected<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the detected capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  /// Name and function handed out when this candidate wins.
  pub selected: Selected<F>,
}

impl<F> Candidate<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self {
      requires,
      selected: Selected::new(name, func),
    }
  }
}

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`. The
/// result borrows from the list, so a `const` list yields a `&'static`.
///
/// # Panics
///
/// Panics if `candidates` is empty or no candidate matches. Every list must
/// end with a fallback requiring `Caps::NONE`.
#[inline]
#[must_use]
pub fn select<F>(caps: Caps, candidates: &[Candidate<F>]) -> &Selected<F> {
  for candidate in candidates {
    if caps.has(candidate.requires) {
      return &candidate.selected;
    }
  }

  panic!("No matching kernel found! Candidate list must include a portable fallback.");
}

/// Build a candidate slice: `candidates!["name" => REQUIRES => func, ...]`.
#[macro_export]
macro_rules! candidates {
  ($($name:expr => $requires:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $requires, $func)),+]
  };
}

// ─────────────────────────────────────────────────────────────────────────────
// CRC-64 Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Signature for CRC-64 kernels: `fn(state: u64, data: &[u8]) -> u64`.
///
/// `state` is the raw (pre-inversion) register.
pub type Crc64Fn = fn(u64, &[u8]) -> u64;

/// Dispatcher for CRC-64 kernels.
///
/// Caches a reference to the selected kernel on first access. Under `std`
/// the cache is a `OnceLock`; without `std` it is a single `AtomicPtr`.
/// Selectors are pure, so racing initializers store the same pointer.
///
/// ```ignore
/// static DISPATCH: Crc64Dispatcher = Crc64Dispatcher::new(select_crc64);
///
/// fn update(state: u64, data: &[u8]) -> u64 {
///     DISPATCH.call(state, data)
/// }
/// ```
pub struct Crc64Dispatcher {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<&'static Selected<Crc64Fn>>,

  #[cfg(not(feature = "std"))]
  cached: core::sync::atomic::AtomicPtr<Selected<Crc64Fn>>,

  /// Chooses the best kernel; called once.
  selector: fn() -> &'static Selected<Crc64Fn>,
}

impl Crc64Dispatcher {
  /// Create a new dispatcher with the given selector function.
  #[must_use]
  pub const fn new(selector: fn() -> &'static Selected<Crc64Fn>) -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),

      #[cfg(not(feature = "std"))]
      cached: core::sync::atomic::AtomicPtr::new(core::ptr::null_mut()),

      selector,
    }
  }

  /// Get the selected kernel, initializing on first call.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Selected<Crc64Fn> {
    #[cfg(feature = "std")]
    {
      **self.inner.get_or_init(self.selector)
    }

    #[cfg(not(feature = "std"))]
    {
      use core::sync::atomic::Ordering;

      let cached = self.cached.load(Ordering::Acquire);
      if cached.is_null() {
        let selected = (self.selector)();
        self
          .cached
          .store(core::ptr::from_ref(selected).cast_mut(), Ordering::Release);
        *selected
      } else {
        // SAFETY: the only non-null value ever stored is a `&'static Selected`,
        // and nothing writes through it.
        #[allow(unsafe_code)]
        unsafe {
          *cached
        }
      }
    }
  }

  /// Get the name of the selected backend.
  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    self.get().name
  }

  /// Call the selected kernel.
  #[inline]
  #[must_use]
  pub fn call(&self, state: u64, data: &[u8]) -> u64 {
    (self.get().func)(state, data)
  }
}

impl core::fmt::Debug for Crc64Dispatcher {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Crc64Dispatcher").finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use core::sync::atomic::{AtomicUsize, Ordering};

  use platform::caps::{aarch64, x86};

  use super::*;

  fn portable_crc64(_state: u64, _data: &[u8]) -> u64 {
    0xDEAD_BEEF
  }

  fn fast_crc64(_state: u64, _data: &[u8]) -> u64 {
    0xCAFE_BABE
  }

  #[test]
  fn test_candidate_creation() {
    let c: Candidate<Crc64Fn> = Candidate::new("test", Caps::NONE, portable_crc64);
    assert_eq!(c.selected.name, "test");
    assert_eq!(c.requires, Caps::NONE);
  }

  #[test]
  fn test_select_portable_fallback() {
    let candidates: &[Candidate<Crc64Fn>] = candidates![
      "fast" => x86::PCLMUL_READY => fast_crc64,
      "portable" => Caps::NONE => portable_crc64,
    ];

    let selected = select(Caps::NONE, candidates);
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(0, &[]), 0xDEAD_BEEF);
  }

  #[test]
  fn test_select_best_match() {
    let candidates: &[Candidate<Crc64Fn>] = candidates![
      "fast" => x86::PCLMUL_READY => fast_crc64,
      "portable" => Caps::NONE => portable_crc64,
    ];

    let selected = select(x86::PCLMUL_READY, candidates);
    assert_eq!(selected.name, "fast");
    assert_eq!((selected.func)(0, &[]), 0xCAFE_BABE);
  }

  #[test]
  fn test_select_skips_unavailable() {
    let candidates: &[Candidate<Crc64Fn>] = candidates![
      "pmull" => aarch64::PMULL_READY => fast_crc64,
      "pclmul" => x86::PCLMUL_READY => fast_crc64,
      "portable" => Caps::NONE => portable_crc64,
    ];

    assert_eq!(select(x86::PCLMUL_READY, candidates).name, "pclmul");
    // A partial feature set does not qualify.
    assert_eq!(select(x86::PCLMULQDQ, candidates).name, "portable");
  }

  #[test]
  #[should_panic(expected = "portable fallback")]
  fn test_select_panics_without_fallback() {
    let candidates: &[Candidate<Crc64Fn>] = candidates!["fast" => x86::PCLMUL_READY => fast_crc64];
    let _ = select(Caps::NONE, candidates);
  }

  fn test_selector() -> &'static Selected<Crc64Fn> {
    const TEST: &Selected<Crc64Fn> = &Selected::new("test", portable_crc64);
    TEST
  }

  #[test]
  fn test_crc64_dispatcher() {
    static DISPATCH: Crc64Dispatcher = Crc64Dispatcher::new(test_selector);

    let selected = DISPATCH.get();
    assert_eq!(selected.name, "test");

    // Second call returns the cached result.
    let selected2 = DISPATCH.get();
    assert_eq!(selected2.name, "test");

    assert_eq!(DISPATCH.call(0, &[]), 0xDEAD_BEEF);
    assert_eq!(DISPATCH.backend_name(), "test");
  }

  static SELECTOR_CALLS: AtomicUsize = AtomicUsize::new(0);

  fn counting_selector() -> &'static Selected<Crc64Fn> {
    const LIST: &[Candidate<Crc64Fn>] = candidates![
      "fast" => x86::PCLMUL_READY => fast_crc64,
      "portable" => Caps::NONE => portable_crc64,
    ];
    SELECTOR_CALLS.fetch_add(1, Ordering::Relaxed);
    select(Caps::NONE, LIST)
  }

  // Runs on both the `OnceLock` and the `AtomicPtr` cache; check the latter
  // with `cargo test -p backend --no-default-features`.
  #[test]
  fn test_crc64_dispatcher_selects_once() {
    static DISPATCH: Crc64Dispatcher = Crc64Dispatcher::new(counting_selector);

    for _ in 0..4 {
      assert_eq!(DISPATCH.backend_name(), "portable");
      assert_eq!(DISPATCH.call(7, b"abc"), 0xDEAD_BEEF);
    }
    assert_eq!(SELECTOR_CALLS.load(Ordering::Relaxed), 1);
  }

  #[test]
  fn test_select_borrows_from_a_static_list() {
    static LIST: &[Candidate<Crc64Fn>] = candidates!["portable" => Caps::NONE => portable_crc64];
    let selected: &'static Selected<Crc64Fn> = select(Caps::NONE, LIST);
    assert!(core::ptr::eq(selected, &LIST[0].selected));
  }
}
