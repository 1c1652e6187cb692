// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./fixed_test.rs"]
mod fixed_test;

use crate::{Error, Result};

// Fixed-width values are laid out little-endian one byte at a time, independent of
// host endianness. Floats and doubles travel as their IEEE-754 bit patterns through
// the unsigned codecs, never through numeric conversion.

/// Writes `v` little-endian into the first 4 bytes of `dst`.
pub fn encode_fixed32(dst: &mut [u8], v: u32) -> usize {
  debug_assert!(dst.len() >= 4, "fixed32 needs 4 bytes, have {}", dst.len());
  #[allow(clippy::cast_possible_truncation)]
  for (i, byte) in dst[.. 4].iter_mut().enumerate() {
    *byte = (v >> (i * 8)) as u8;
  }
  4
}

/// Writes `v` little-endian into the first 8 bytes of `dst`.
pub fn encode_fixed64(dst: &mut [u8], v: u64) -> usize {
  debug_assert!(dst.len() >= 8, "fixed64 needs 8 bytes, have {}", dst.len());
  #[allow(clippy::cast_possible_truncation)]
  for (i, byte) in dst[.. 8].iter_mut().enumerate() {
    *byte = (v >> (i * 8)) as u8;
  }
  8
}

pub fn encode_float(dst: &mut [u8], v: f32) -> usize {
  encode_fixed32(dst, v.to_bits())
}

pub fn encode_double(dst: &mut [u8], v: f64) -> usize {
  encode_fixed64(dst, v.to_bits())
}

/// Reads a little-endian u32 from the start of `src`.
pub fn decode_fixed32(src: &[u8]) -> Result<(usize, u32)> {
  if src.len() < 4 {
    return Err(Error::InvalidData);
  }
  let mut v: u32 = 0;
  for i in 0 .. 4 {
    v |= u32::from(src[i]) << (i * 8);
  }
  Ok((4, v))
}

/// Reads a little-endian u64 from the start of `src`.
pub fn decode_fixed64(src: &[u8]) -> Result<(usize, u64)> {
  if src.len() < 8 {
    return Err(Error::InvalidData);
  }
  let mut v: u64 = 0;
  for i in 0 .. 8 {
    v |= u64::from(src[i]) << (i * 8);
  }
  Ok((8, v))
}

pub fn decode_float(src: &[u8]) -> Result<(usize, f32)> {
  decode_fixed32(src).map(|(size, bits)| (size, f32::from_bits(bits)))
}

pub fn decode_double(src: &[u8]) -> Result<(usize, f64)> {
  decode_fixed64(src).map(|(size, bits)| (size, f64::from_bits(bits)))
}
