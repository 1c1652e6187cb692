// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

use crate::writer::Writer;
use pretty_assertions::assert_eq;
use wirebuf_wire::WireType;
use wirebuf_wire::size::{size_bytes_field, size_int32, size_sint32, size_tag};

#[test]
fn string_field_wire_bytes() {
  let mut buf = vec![0_u8; size_bytes_field(1, 5)];
  let mut writer = Writer::new(&mut buf);
  writer.append_string(1, "hello");
  assert_eq!(writer.pos(), buf.len());
  assert_eq!(buf, [0x0A, 0x05, b'h', b'e', b'l', b'l', b'o']);
}

#[test]
fn int32_field_wire_bytes() {
  let mut buf = vec![0_u8; size_tag(4) + size_int32(150)];
  let mut writer = Writer::new(&mut buf);
  writer.append_int32(4, 150);
  assert_eq!(writer.pos(), buf.len());
  assert_eq!(buf, [0x20, 0x96, 0x01]);
}

#[test]
fn sint32_field_wire_bytes() {
  let mut buf = vec![0_u8; size_tag(8) + size_sint32(-1)];
  let mut writer = Writer::new(&mut buf);
  writer.append_sint32(8, -1);
  assert_eq!(writer.pos(), buf.len());
  assert_eq!(buf, [0x40, 0x01]);
}

#[test]
fn fixed32_field_wire_bytes() {
  let mut buf = vec![0_u8; 5];
  let mut writer = Writer::new(&mut buf);
  writer.append_fixed32(10, 0x1234_5678);
  assert_eq!(writer.pos(), buf.len());
  assert_eq!(buf, [0x55, 0x78, 0x56, 0x34, 0x12]);
}

#[test]
fn bool_and_enum_fields() {
  let mut buf = vec![0_u8; 4];
  let mut writer = Writer::new(&mut buf);
  writer.append_bool(1, true);
  writer.append_enum(2, 3);
  assert_eq!(writer.pos(), 4);
  assert_eq!(buf, [0x08, 0x01, 0x10, 0x03]);
}

#[test]
fn bytes_tag_supports_streamed_payloads() {
  // Header written by the writer, payload streamed by the caller: the shape nested
  // message encoding uses once the sub-message size is known.
  let payload = [0xDE, 0xAD, 0xBE, 0xEF];
  let mut buf = vec![0_u8; size_bytes_field(3, payload.len())];
  let mut writer = Writer::new(&mut buf);
  writer.append_bytes_tag(3, payload.len());
  writer.append_raw_bytes(&payload);
  assert_eq!(writer.pos(), buf.len());
  assert_eq!(buf, [0x1A, 0x04, 0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn floats_write_bit_patterns() {
  let mut buf = vec![0_u8; 5 + 9];
  let mut writer = Writer::new(&mut buf);
  writer.append_float(1, -0.0);
  writer.append_double(2, 1.0);
  assert_eq!(writer.pos(), buf.len());
  assert_eq!(buf[.. 5], [0x0D, 0x00, 0x00, 0x00, 0x80]);
  assert_eq!(buf[5 ..], [0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F]);
}

#[test]
fn writer_fills_exactly_sized_buffer() {
  let mut buf = vec![0_u8; size_tag(1) + 8 + size_bytes_field(2, 3)];
  let mut writer = Writer::new(&mut buf);
  writer.append_fixed64(1, 42);
  writer.append_bytes(2, b"abc");
  assert_eq!(writer.remaining(), 0);
}

#[test]
fn append_tag_wire_types() {
  let mut buf = vec![0_u8; 6];
  let mut writer = Writer::new(&mut buf);
  for wire_type in [
    WireType::Varint,
    WireType::Fixed64,
    WireType::LengthDelimited,
    WireType::StartGroup,
    WireType::EndGroup,
    WireType::Fixed32,
  ] {
    writer.append_tag(1, wire_type);
  }
  assert_eq!(buf, [0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D]);
}
