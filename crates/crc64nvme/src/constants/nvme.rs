//! CRC-64/NVME constants.
//!
//! Polynomial: 0xAD93D23594C93659 (reflected: 0x9A6C9329AC4BC9B5)
//!
//! Used by the NVMe storage standard and AWS S3.

/// CRC-64/NVME polynomial in reflected (bit-reversed) form.
pub const POLYNOMIAL: u64 = 0x9A6C_9329_AC4B_C9B5;

/// CRC-64/NVME polynomial in normal (non-reflected) form.
pub const POLYNOMIAL_NORMAL: u64 = 0xAD93_D235_94C9_3659;

/// Slicing-by-8 lookup tables; row 0 is the classic byte table.
///
/// Total size: 8 * 256 * 8 = 16KB, 64-byte aligned.
pub static TABLES: super::Aligned64<[[u64; 256]; 8]> =
  super::Aligned64(super::tables::generate_slicing_tables_64(POLYNOMIAL));

/// Folding and reduction constants for reflected CRC-64/NVME.
///
/// Lane pairs are given as `(high, low)`, the argument order of
/// `_mm_set_epi64x`. A 16-byte lane `v` is advanced by `d` bytes as
/// `v.low ⊗ low ⊕ v.high ⊗ high`.
pub mod fold {
  use super::super::gf2;

  /// CRC-64/NVME polynomial with explicit x^64 term (normal form).
  const POLY_FULL: u128 = (1u128 << 64) | (super::POLYNOMIAL_NORMAL as u128);

  const fn xpow_mod(n: u32) -> u64 {
    gf2::xpow_mod_64(n, POLY_FULL)
  }

  /// Reflected folding key for a byte distance: `reflect64(x^(8d-1) mod P)`.
  pub const fn key(distance_bytes: u32) -> u64 {
    let bits = distance_bytes * 8;
    gf2::reflect_bits_u64(xpow_mod(bits - 1), 64)
  }

  /// Fold coefficient for a distance (bytes) as `(high, low)`.
  pub const fn coeff(distance_bytes: u32) -> (u64, u64) {
    (key(distance_bytes), key(distance_bytes + 8))
  }

  /// 16B → 8B fold key.
  pub const KEY_16: u64 = key(16);

  /// Advance 8 lanes by one 128-byte block.
  pub const COEFF_128: (u64, u64) = coeff(128);
  /// Advance 4 lanes by one 64-byte block.
  pub const COEFF_64: (u64, u64) = coeff(64);
  /// Advance a single lane by 16 bytes.
  pub const COEFF_16: (u64, u64) = coeff(16);

  /// Lane-collapse coefficients, distances 112 down to 16 bytes.
  ///
  /// With `n` lanes, lane `i` sits `16 * (n - 1 - i)` bytes before the last
  /// lane and uses entry `8 - n + i`.
  pub const LANE_COLLAPSE: [(u64, u64); 7] =
    [coeff(112), coeff(96), coeff(80), coeff(64), coeff(48), coeff(32), coeff(16)];

  /// Barrett reduction constants `(poly, mu)` for reflected CRC-64/NVME.
  ///
  /// - `poly` = low 64 bits of reflect65(x^64 + P(x))
  /// - `mu` = reflect64(floor(x^127 / (x^64 + P(x))))
  pub const BARRETT: (u64, u64) = {
    let poly_ref = gf2::reflect_bits_u128(POLY_FULL, 65);
    let poly = (poly_ref & ((1u128 << 64) - 1)) as u64;

    let q = gf2::gf2_div_128(1u128 << 127, POLY_FULL) as u64;
    let mu = gf2::reflect_bits_u64(q, 64);

    (poly, mu)
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_polynomial_forms_agree() {
    assert_eq!(POLYNOMIAL, POLYNOMIAL_NORMAL.reverse_bits());
  }

  #[test]
  fn test_table_row_zero_is_byte_table() {
    assert_eq!(TABLES.0[0][1], 0x7F6E_F0C8_3035_8979);
    assert_eq!(TABLES.0[0][128], POLYNOMIAL);
  }

  #[test]
  fn test_tables_are_cache_aligned() {
    assert_eq!(core::ptr::addr_of!(TABLES) as usize % 64, 0);
  }

  #[test]
  fn test_fold_keys() {
    assert_eq!(fold::KEY_16, 0x21E9_761E_2526_21AC);
    assert_eq!(fold::COEFF_128, (0x5F85_2FB6_1E8D_92DC, 0xA1CA_681E_733F_9C40));
    assert_eq!(fold::COEFF_16, (fold::KEY_16, fold::key(24)));
    assert_eq!(fold::LANE_COLLAPSE[3], fold::COEFF_64);
    assert_eq!(fold::LANE_COLLAPSE[6], fold::COEFF_16);
  }

  #[test]
  fn test_barrett_constants() {
    assert_eq!(fold::BARRETT, (0x34D9_2653_5897_936B, 0x27EC_FA32_9AEF_9F77));
    // The reciprocal polynomial is the reflected one shifted over the x^0 term.
    assert_eq!(fold::BARRETT.0, (POLYNOMIAL << 1) | 1);
  }
}
