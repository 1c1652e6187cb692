// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

use crate::Error;
use crate::fixed::{
  decode_double, decode_fixed32, decode_fixed64, decode_float, encode_double, encode_fixed32,
  encode_fixed64, encode_float,
};
use assert_matches::assert_matches;

#[test]
fn fixed32_little_endian_layout() {
  let mut buffer = [0_u8; 4];
  encode_fixed32(&mut buffer, 0x1234_5678);
  assert_eq!(buffer, [0x78, 0x56, 0x34, 0x12]);

  let (size, decoded) = decode_fixed32(&buffer).unwrap();
  assert_eq!(size, 4);
  assert_eq!(decoded, 0x1234_5678);
}

#[test]
fn fixed64_little_endian_layout() {
  let mut buffer = [0_u8; 8];
  encode_fixed64(&mut buffer, 0x0102_0304_0506_0708);
  assert_eq!(buffer, [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]);

  let (size, decoded) = decode_fixed64(&buffer).unwrap();
  assert_eq!(size, 8);
  assert_eq!(decoded, 0x0102_0304_0506_0708);
}

#[test]
fn fixed_roundtrip_extremes() {
  let mut buffer = [0_u8; 8];
  for value in [0_u32, 1, u32::MAX] {
    encode_fixed32(&mut buffer, value);
    assert_eq!(decode_fixed32(&buffer).unwrap().1, value);
  }
  for value in [0_u64, 1, u64::MAX] {
    encode_fixed64(&mut buffer, value);
    assert_eq!(decode_fixed64(&buffer).unwrap().1, value);
  }
}

#[test]
fn floats_travel_as_bit_patterns() {
  let mut buffer = [0_u8; 8];

  for value in [0.0_f32, -0.0, 1.5, f32::MIN, f32::MAX, f32::INFINITY] {
    encode_float(&mut buffer, value);
    let (size, decoded) = decode_float(&buffer).unwrap();
    assert_eq!(size, 4);
    assert_eq!(decoded.to_bits(), value.to_bits());
  }

  for value in [0.0_f64, -0.0, 1.5, f64::MIN, f64::MAX, f64::NEG_INFINITY] {
    encode_double(&mut buffer, value);
    let (size, decoded) = decode_double(&buffer).unwrap();
    assert_eq!(size, 8);
    assert_eq!(decoded.to_bits(), value.to_bits());
  }

  // NaN payloads survive because nothing converts through a numeric value.
  let nan = f64::from_bits(0x7FF8_0000_DEAD_BEEF);
  encode_double(&mut buffer, nan);
  assert_eq!(decode_double(&buffer).unwrap().1.to_bits(), nan.to_bits());
}

#[test]
fn short_buffers_error() {
  for len in 0 .. 4 {
    assert_matches!(decode_fixed32(&[0xFF; 8][.. len]), Err(Error::InvalidData));
  }
  for len in 0 .. 8 {
    assert_matches!(decode_fixed64(&[0xFF; 8][.. len]), Err(Error::InvalidData));
  }
}
