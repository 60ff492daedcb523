//! Slicing-by-8 lookup table generation for reflected 64-bit CRCs.
//!
//! - Table 0: CRC contribution of each byte value
//! - Tables 1-7: CRC contribution of bytes at positions 1-7 earlier in stream
//!
//! Total size: 8 × 256 × 8 = 16KB.

// Loop indices are bounded by the fixed 8×256 table shape.
#![allow(clippy::indexing_slicing)]

/// Generate base CRC64 lookup table (table 0) for a reflected polynomial.
pub const fn generate_table_0_64(poly: u64) -> [u64; 256] {
  let mut table = [0u64; 256];
  let mut i = 0usize;

  while i < 256 {
    let mut crc = i as u64;
    let mut j = 0;
    while j < 8 {
      if crc & 1 != 0 {
        crc = (crc >> 1) ^ poly;
      } else {
        crc >>= 1;
      }
      j += 1;
    }
    table[i] = crc;
    i += 1;
  }

  table
}

/// Generate all 8 slicing-by-8 tables for a reflected 64-bit CRC.
///
/// Table `t` advances a byte through `t` further zero bytes.
pub const fn generate_slicing_tables_64(poly: u64) -> [[u64; 256]; 8] {
  let table0 = generate_table_0_64(poly);
  let mut tables = [[0u64; 256]; 8];
  tables[0] = table0;

  let mut t = 1;
  while t < 8 {
    let mut i = 0;
    while i < 256 {
      let prev = tables[t - 1][i];
      tables[t][i] = (prev >> 8) ^ table0[(prev & 0xFF) as usize];
      i += 1;
    }
    t += 1;
  }

  tables
}
