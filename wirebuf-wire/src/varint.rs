// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./varint_test.rs"]
mod varint_test;

use crate::{Error, Result};

/// The longest possible varint: ten 7-bit groups cover 64 bits.
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes `v` occupies as a varint, 1 through 10.
#[must_use]
pub const fn size_varint(v: u64) -> usize {
  match v {
    0x0 ..= 0x7F => 1,
    0x80 ..= 0x3FFF => 2,
    0x4000 ..= 0x1F_FFFF => 3,
    0x20_0000 ..= 0xFFF_FFFF => 4,
    0x1000_0000 ..= 0x7_FFFF_FFFF => 5,
    0x8_0000_0000 ..= 0x3FF_FFFF_FFFF => 6,
    0x400_0000_0000 ..= 0x1_FFFF_FFFF_FFFF => 7,
    0x2_0000_0000_0000 ..= 0xFF_FFFF_FFFF_FFFF => 8,
    0x100_0000_0000_0000 ..= 0x7FFF_FFFF_FFFF_FFFF => 9,
    _ => 10,
  }
}

/// Writes `v` as a varint at the start of `dst` and returns the bytes written.
///
/// `dst` must have at least [`size_varint`]`(v)` bytes of space.
pub fn encode_varint(dst: &mut [u8], v: u64) -> usize {
  let size = size_varint(v);
  debug_assert!(size <= dst.len(), "varint needs {size} bytes, have {}", dst.len());
  let mut remaining = v;
  #[allow(clippy::cast_possible_truncation)]
  for byte in &mut dst[.. size - 1] {
    *byte = (remaining as u8) | 0x80;
    remaining >>= 7;
  }
  #[allow(clippy::cast_possible_truncation)]
  {
    dst[size - 1] = remaining as u8;
  }
  size
}

/// Decodes a varint at the start of `src`, returning `(bytes_consumed, value)`.
///
/// Fails with [`Error::InvalidVarInt`] when ten groups pass without a terminating
/// byte or the buffer ends mid-sequence.
pub fn decode_varint(src: &[u8]) -> Result<(usize, u64)> {
  let mut value: u64 = 0;
  for (group, &byte) in src.iter().enumerate().take(MAX_VARINT_LEN) {
    value |= u64::from(byte & 0x7F) << (group * 7);
    if byte & 0x80 == 0 {
      return Ok((group + 1, value));
    }
  }
  Err(Error::InvalidVarInt)
}

/// Zigzag-maps a signed 32-bit value so small magnitudes encode as short varints.
#[must_use]
pub const fn encode_zigzag32(v: i32) -> u32 {
  ((v << 1) ^ (v >> 31)) as u32
}

/// Inverse of [`encode_zigzag32`].
#[must_use]
pub const fn decode_zigzag32(z: u32) -> i32 {
  ((z >> 1) as i32) ^ -((z & 1) as i32)
}

/// Zigzag-maps a signed 64-bit value so small magnitudes encode as short varints.
#[must_use]
pub const fn encode_zigzag64(v: i64) -> u64 {
  ((v << 1) ^ (v >> 63)) as u64
}

/// Inverse of [`encode_zigzag64`].
#[must_use]
pub const fn decode_zigzag64(z: u64) -> i64 {
  ((z >> 1) as i64) ^ -((z & 1) as i64)
}
