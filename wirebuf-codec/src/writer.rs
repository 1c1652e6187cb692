// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./writer_test.rs"]
mod writer_test;

use crate::descriptor::{ScalarKind, ScalarValue};
use wirebuf_wire::fixed;
use wirebuf_wire::tag::{WireType, encode_tag};
use wirebuf_wire::varint::{encode_varint, encode_zigzag32, encode_zigzag64};

//
// Writer
//

/// Append-only cursor over a caller-supplied, exactly-sized output buffer.
///
/// The caller computes the total size with the size estimators, allocates exactly
/// that much, and writes in one forward pass. Appending past the end is a contract
/// violation — the size pass and write pass diverged — and trips debug assertions
/// and slice bounds checks rather than returning an error. One writer, one thread.
#[derive(Debug)]
pub struct Writer<'a> {
  buf: &'a mut [u8],
  pos: usize,
}

impl<'a> Writer<'a> {
  #[must_use]
  pub fn new(buf: &'a mut [u8]) -> Self {
    Self { buf, pos: 0 }
  }

  /// Bytes appended so far.
  #[must_use]
  pub const fn pos(&self) -> usize {
    self.pos
  }

  #[must_use]
  pub const fn remaining(&self) -> usize {
    self.buf.len() - self.pos
  }

  pub fn append_tag(&mut self, field_number: i32, wire_type: WireType) {
    debug_assert!(self.remaining() > 0, "tag for field {field_number} past buffer end");
    self.pos += encode_tag(&mut self.buf[self.pos ..], field_number, wire_type);
  }

  /// Raw varint, no tag: length prefixes and packed elements.
  pub fn append_varint(&mut self, v: u64) {
    self.pos += encode_varint(&mut self.buf[self.pos ..], v);
  }

  /// Raw payload bytes, no tag and no length prefix.
  pub fn append_raw_bytes(&mut self, bytes: &[u8]) {
    debug_assert!(bytes.len() <= self.remaining(), "payload past buffer end");
    self.buf[self.pos .. self.pos + bytes.len()].copy_from_slice(bytes);
    self.pos += bytes.len();
  }

  pub fn append_uint32(&mut self, field_number: i32, v: u32) {
    self.append_tag(field_number, WireType::Varint);
    self.append_varint(u64::from(v));
  }

  pub fn append_uint64(&mut self, field_number: i32, v: u64) {
    self.append_tag(field_number, WireType::Varint);
    self.append_varint(v);
  }

  /// Negative values sign-extend to 64 bits, always costing 10 bytes.
  #[allow(clippy::cast_sign_loss)]
  pub fn append_int32(&mut self, field_number: i32, v: i32) {
    self.append_tag(field_number, WireType::Varint);
    self.append_varint(v as i64 as u64);
  }

  #[allow(clippy::cast_sign_loss)]
  pub fn append_int64(&mut self, field_number: i32, v: i64) {
    self.append_tag(field_number, WireType::Varint);
    self.append_varint(v as u64);
  }

  pub fn append_sint32(&mut self, field_number: i32, v: i32) {
    self.append_tag(field_number, WireType::Varint);
    self.append_varint(u64::from(encode_zigzag32(v)));
  }

  pub fn append_sint64(&mut self, field_number: i32, v: i64) {
    self.append_tag(field_number, WireType::Varint);
    self.append_varint(encode_zigzag64(v));
  }

  pub fn append_bool(&mut self, field_number: i32, v: bool) {
    self.append_tag(field_number, WireType::Varint);
    self.append_varint(u64::from(v));
  }

  pub fn append_enum(&mut self, field_number: i32, v: i32) {
    self.append_int32(field_number, v);
  }

  pub fn append_fixed32(&mut self, field_number: i32, v: u32) {
    self.append_tag(field_number, WireType::Fixed32);
    self.pos += fixed::encode_fixed32(&mut self.buf[self.pos ..], v);
  }

  pub fn append_fixed64(&mut self, field_number: i32, v: u64) {
    self.append_tag(field_number, WireType::Fixed64);
    self.pos += fixed::encode_fixed64(&mut self.buf[self.pos ..], v);
  }

  #[allow(clippy::cast_sign_loss)]
  pub fn append_sfixed32(&mut self, field_number: i32, v: i32) {
    self.append_fixed32(field_number, v as u32);
  }

  #[allow(clippy::cast_sign_loss)]
  pub fn append_sfixed64(&mut self, field_number: i32, v: i64) {
    self.append_fixed64(field_number, v as u64);
  }

  pub fn append_float(&mut self, field_number: i32, v: f32) {
    self.append_fixed32(field_number, v.to_bits());
  }

  pub fn append_double(&mut self, field_number: i32, v: f64) {
    self.append_fixed64(field_number, v.to_bits());
  }

  /// Tag plus length prefix only; the caller streams the payload afterwards. Used
  /// when the payload is a nested message whose size the caller already computed.
  pub fn append_bytes_tag(&mut self, field_number: i32, len: usize) {
    self.append_tag(field_number, WireType::LengthDelimited);
    self.append_varint(len as u64);
  }

  pub fn append_bytes(&mut self, field_number: i32, bytes: &[u8]) {
    self.append_bytes_tag(field_number, bytes.len());
    self.append_raw_bytes(bytes);
  }

  pub fn append_string(&mut self, field_number: i32, s: &str) {
    self.append_bytes(field_number, s.as_bytes());
  }

  /// Payload only, no tag: packed repeated elements.
  ///
  /// Panics if `value`'s variant does not belong to `kind` (encode-side programmer
  /// error).
  #[allow(clippy::cast_sign_loss)]
  pub fn append_raw_scalar(&mut self, kind: ScalarKind, value: ScalarValue) {
    match (kind, value) {
      (ScalarKind::Int32 | ScalarKind::Enum, ScalarValue::I32(v)) => {
        self.append_varint(v as i64 as u64);
      },
      (ScalarKind::Int64, ScalarValue::I64(v)) => self.append_varint(v as u64),
      (ScalarKind::Uint32, ScalarValue::U32(v)) => self.append_varint(u64::from(v)),
      (ScalarKind::Uint64, ScalarValue::U64(v)) => self.append_varint(v),
      (ScalarKind::Sint32, ScalarValue::I32(v)) => {
        self.append_varint(u64::from(encode_zigzag32(v)));
      },
      (ScalarKind::Sint64, ScalarValue::I64(v)) => self.append_varint(encode_zigzag64(v)),
      (ScalarKind::Bool, ScalarValue::Bool(v)) => self.append_varint(u64::from(v)),
      (ScalarKind::Fixed32, ScalarValue::U32(v)) => {
        self.pos += fixed::encode_fixed32(&mut self.buf[self.pos ..], v);
      },
      (ScalarKind::Sfixed32, ScalarValue::I32(v)) => {
        self.pos += fixed::encode_fixed32(&mut self.buf[self.pos ..], v as u32);
      },
      (ScalarKind::Float, ScalarValue::F32(v)) => {
        self.pos += fixed::encode_fixed32(&mut self.buf[self.pos ..], v.to_bits());
      },
      (ScalarKind::Fixed64, ScalarValue::U64(v)) => {
        self.pos += fixed::encode_fixed64(&mut self.buf[self.pos ..], v);
      },
      (ScalarKind::Sfixed64, ScalarValue::I64(v)) => {
        self.pos += fixed::encode_fixed64(&mut self.buf[self.pos ..], v as u64);
      },
      (ScalarKind::Double, ScalarValue::F64(v)) => {
        self.pos += fixed::encode_fixed64(&mut self.buf[self.pos ..], v.to_bits());
      },
      (kind, value) => panic!("scalar value {value:?} does not belong to kind {kind:?}"),
    }
  }

  /// Tagged scalar of any kind, one entry point for descriptor-driven callers.
  pub fn append_scalar(&mut self, field_number: i32, kind: ScalarKind, value: ScalarValue) {
    self.append_tag(field_number, kind.wire_type());
    self.append_raw_scalar(kind, value);
  }
}
