//! GF(2) polynomial arithmetic for constant generation.
//!
//! Const-time operations used to compute folding keys and Barrett reduction
//! constants at compile time. Polynomials with an explicit x^64 term are
//! carried in `u128`.

// ─────────────────────────────────────────────────────────────────────────────
// Bit Reflection
// ─────────────────────────────────────────────────────────────────────────────

/// Reflect (bit-reverse) the lower `width` bits of `value`.
///
/// For example, `reflect_bits_u64(0b1010, 4)` returns `0b0101`.
#[inline]
pub const fn reflect_bits_u64(value: u64, width: u32) -> u64 {
  let mut result = 0u64;
  let mut i = 0u32;
  while i < width {
    if (value >> i) & 1 != 0 {
      result |= 1 << (width - 1 - i);
    }
    i += 1;
  }
  result
}

/// Reflect (bit-reverse) the lower `width` bits of a 128-bit value.
#[inline]
pub const fn reflect_bits_u128(value: u128, width: u32) -> u128 {
  let mut result = 0u128;
  let mut i = 0u32;
  while i < width {
    if (value >> i) & 1 != 0 {
      result |= 1u128 << (width - 1 - i);
    }
    i += 1;
  }
  result
}

// ─────────────────────────────────────────────────────────────────────────────
// Degree and Division
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the degree of a polynomial (position of highest set bit).
///
/// The zero polynomial reports degree 0.
#[inline]
pub const fn deg_u128(x: u128) -> u32 {
  if x == 0 {
    return 0;
  }
  (128u32 - x.leading_zeros()) - 1
}

/// GF(2) polynomial division: `dividend / divisor`, returning the quotient.
#[inline]
pub const fn gf2_div_128(dividend: u128, divisor: u128) -> u128 {
  let mut dd = dividend;
  let mut q: u128 = 0;

  while dd != 0 && deg_u128(dd) >= deg_u128(divisor) {
    let shift = deg_u128(dd) - deg_u128(divisor);
    q ^= 1u128 << shift;
    dd ^= divisor << shift;
  }

  q
}

// ─────────────────────────────────────────────────────────────────────────────
// Modular Multiplication
// ─────────────────────────────────────────────────────────────────────────────

/// Multiply two 64-bit polynomials in GF(2) and reduce mod `poly_full`.
///
/// `poly_full` is the 65-bit polynomial with explicit x^64 term, e.g.
/// `(1u128 << 64) | normal_poly`.
#[inline]
pub const fn gf2_mul_mod_64(a: u64, b: u64, poly_full: u128) -> u64 {
  // Schoolbook carryless multiply: 64x64 -> 127 bits.
  let mut product: u128 = 0;
  let mut i = 0;
  while i < 64 {
    if (b >> i) & 1 != 0 {
      product ^= (a as u128) << i;
    }
    i += 1;
  }

  let mut result = product;
  let mut bit: i32 = 127;
  while bit >= 64 {
    if (result >> (bit as u32)) & 1 != 0 {
      result ^= poly_full << ((bit - 64) as u32);
    }
    bit -= 1;
  }

  result as u64
}

/// Compute x^n mod `poly_full` in GF(2) by square-and-multiply.
#[inline]
pub const fn xpow_mod_64(n: u32, poly_full: u128) -> u64 {
  if n < 64 {
    return 1u64 << n;
  }

  let mut result: u64 = 1;
  let mut base: u64 = 2;
  let mut exp = n;

  while exp > 0 {
    if exp & 1 != 0 {
      result = gf2_mul_mod_64(result, base, poly_full);
    }
    base = gf2_mul_mod_64(base, base, poly_full);
    exp >>= 1;
  }

  result
}
