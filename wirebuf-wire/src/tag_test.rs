// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

use crate::tag::{MAX_GROUP_DEPTH, Tag, WireType, decode_tag, encode_tag, size_tag, skip_value};
use crate::varint::encode_varint;
use crate::{Error, Result};
use assert_matches::assert_matches;
use rstest::rstest;

#[rstest]
#[case(1, WireType::Varint, &[0x08])]
#[case(1, WireType::LengthDelimited, &[0x0A])]
#[case(4, WireType::Varint, &[0x20])]
#[case(8, WireType::Varint, &[0x40])]
#[case(10, WireType::Fixed32, &[0x55])]
#[case(16, WireType::Varint, &[0x80, 0x01])]
fn tag_wire_bytes(#[case] field_number: i32, #[case] wire_type: WireType, #[case] wire: &[u8]) {
  let mut buffer = [0_u8; 10];
  let size = encode_tag(&mut buffer, field_number, wire_type);
  assert_eq!(&buffer[.. size], wire);
  assert_eq!(size_tag(field_number), wire.len());

  let (consumed, tag) = decode_tag(wire).unwrap();
  assert_eq!(consumed, wire.len());
  assert_eq!(tag, Tag::new(field_number, wire_type));
}

#[test]
fn tag_roundtrip_large_field_numbers() {
  let mut buffer = [0_u8; 10];
  for field_number in [1, 15, 16, 2047, 2048, 0x1FFF_FFFF, i32::MAX] {
    for wire_type in [WireType::Varint, WireType::Fixed64, WireType::LengthDelimited] {
      let size = encode_tag(&mut buffer, field_number, wire_type);
      assert_eq!(size, size_tag(field_number));
      let (consumed, tag) = decode_tag(&buffer).unwrap();
      assert_eq!(consumed, size);
      assert_eq!(tag.field_number, field_number);
      assert_eq!(tag.wire_type, wire_type);
    }
  }
}

#[test]
fn tag_field_number_overflow_errors() {
  // (i32::MAX + 1) << 3 | varint: one past the representable field number range.
  let mut buffer = [0_u8; 10];
  let size = encode_varint(&mut buffer, (u64::from(u32::MAX >> 1) + 1) << 3);
  assert_matches!(decode_tag(&buffer[.. size]), Err(Error::InvalidTag));
}

#[rstest]
#[case(6)]
#[case(7)]
fn tag_reserved_wire_types_error(#[case] wire_type_bits: u64) {
  let mut buffer = [0_u8; 10];
  let size = encode_varint(&mut buffer, (1 << 3) | wire_type_bits);
  assert_matches!(decode_tag(&buffer[.. size]), Err(Error::InvalidTag));
}

fn tag_bytes(field_number: i32, wire_type: WireType) -> Vec<u8> {
  let mut buffer = [0_u8; 10];
  let size = encode_tag(&mut buffer, field_number, wire_type);
  buffer[.. size].to_vec()
}

#[test]
fn skip_fixed_and_varint_values() {
  assert_eq!(skip_value(&[0x96, 0x01, 0xAA], WireType::Varint).unwrap(), 2);
  assert_eq!(skip_value(&[0; 8], WireType::Fixed32).unwrap(), 4);
  assert_eq!(skip_value(&[0; 8], WireType::Fixed64).unwrap(), 8);
  assert_matches!(skip_value(&[0; 3], WireType::Fixed32), Err(Error::InvalidData));
  assert_matches!(skip_value(&[0; 7], WireType::Fixed64), Err(Error::InvalidData));
}

#[test]
fn skip_length_delimited_value() {
  let bytes = [0x05, b'h', b'e', b'l', b'l', b'o', 0xFF];
  assert_eq!(skip_value(&bytes, WireType::LengthDelimited).unwrap(), 6);
  assert_matches!(
    skip_value(&bytes[.. 4], WireType::LengthDelimited),
    Err(Error::InvalidData)
  );
}

#[test]
fn skip_group_walks_to_matching_end() {
  // group { field 2 = varint 5; nested group { field 4 = fixed32 } }
  let mut bytes = Vec::new();
  bytes.extend(tag_bytes(2, WireType::Varint));
  bytes.push(0x05);
  bytes.extend(tag_bytes(3, WireType::StartGroup));
  bytes.extend(tag_bytes(4, WireType::Fixed32));
  bytes.extend([0; 4]);
  bytes.extend(tag_bytes(3, WireType::EndGroup));
  bytes.extend(tag_bytes(1, WireType::EndGroup));
  bytes.extend([0xAA, 0xBB]); // trailing data past the group

  let skipped = skip_value(&bytes, WireType::StartGroup).unwrap();
  assert_eq!(skipped, bytes.len() - 2);
}

#[test]
fn skip_unterminated_group_errors() {
  let mut bytes = Vec::new();
  bytes.extend(tag_bytes(2, WireType::Varint));
  bytes.push(0x05);
  assert_matches!(skip_value(&bytes, WireType::StartGroup), Err(Error::InvalidTag));
}

#[test]
fn skip_lone_end_group_errors() {
  assert_matches!(skip_value(&[0x0C], WireType::EndGroup), Err(Error::InvalidTag));
}

#[test]
fn skip_group_depth_is_bounded() {
  let start: Vec<u8> = (0 .. MAX_GROUP_DEPTH + 4)
    .flat_map(|_| tag_bytes(1, WireType::StartGroup))
    .collect();
  assert_matches!(skip_value(&start, WireType::StartGroup), Err(Error::InvalidTag));
}

#[test]
fn skip_any_truncation_errors_not_panics() {
  let mut bytes = Vec::new();
  bytes.extend(tag_bytes(2, WireType::Varint));
  bytes.push(0x05);
  bytes.extend(tag_bytes(3, WireType::LengthDelimited));
  bytes.extend([0x02, 0xAA, 0xBB]);
  bytes.extend(tag_bytes(1, WireType::EndGroup));

  for len in 0 .. bytes.len() {
    let result: Result<usize> = skip_value(&bytes[.. len], WireType::StartGroup);
    assert!(result.is_err(), "truncation at {len} unexpectedly succeeded");
  }
}
