// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

//! Encode-side size-then-write protocol.
//!
//! The wire format puts a length prefix before every sub-message and supports no
//! backpatching, so encoding runs twice: once against [`SizeEmit`] to compute the
//! exact output size, then against [`WriteEmit`] over a buffer of exactly that size.
//! Any divergence between the passes corrupts length prefixes, so every emission
//! rule in this module is written once against `dyn Emit` and shared by both passes.
//!
//! Default elision and packed selection happen here, identically in both passes:
//! singular scalars equal to their (possibly custom) default are omitted; absent
//! (`None`) bytes/string/message slots encode a zero-length entry to preserve
//! explicit-null semantics; repeated scalars pack at two or more elements.

#[cfg(test)]
#[path = "./encode_test.rs"]
mod encode_test;

use crate::descriptor::{ScalarKind, ScalarValue};
use crate::writer::Writer;
use bytes::Bytes;
use wirebuf_wire::WireType;
use wirebuf_wire::tag::size_tag;
use wirebuf_wire::varint::size_varint;

//
// Emit
//

/// One output surface for both passes: byte math in the size pass, buffer writes in
/// the write pass.
pub trait Emit {
  fn tag(&mut self, field_number: i32, wire_type: WireType);
  fn varint(&mut self, v: u64);
  fn raw_scalar(&mut self, kind: ScalarKind, value: ScalarValue);
  fn raw_bytes(&mut self, bytes: &[u8]);
}

/// Size pass: accumulates the exact byte count the write pass will produce.
#[derive(Debug, Default)]
pub struct SizeEmit {
  total: usize,
}

impl SizeEmit {
  #[must_use]
  pub const fn new() -> Self {
    Self { total: 0 }
  }

  #[must_use]
  pub const fn total(&self) -> usize {
    self.total
  }
}

impl Emit for SizeEmit {
  fn tag(&mut self, field_number: i32, _wire_type: WireType) {
    self.total += size_tag(field_number);
  }

  fn varint(&mut self, v: u64) {
    self.total += size_varint(v);
  }

  fn raw_scalar(&mut self, kind: ScalarKind, value: ScalarValue) {
    self.total += kind.payload_size(value);
  }

  fn raw_bytes(&mut self, bytes: &[u8]) {
    self.total += bytes.len();
  }
}

/// Write pass over an exactly-sized buffer.
#[derive(Debug)]
pub struct WriteEmit<'w, 'b> {
  writer: &'w mut Writer<'b>,
}

impl<'w, 'b> WriteEmit<'w, 'b> {
  pub fn new(writer: &'w mut Writer<'b>) -> Self {
    Self { writer }
  }
}

impl Emit for WriteEmit<'_, '_> {
  fn tag(&mut self, field_number: i32, wire_type: WireType) {
    self.writer.append_tag(field_number, wire_type);
  }

  fn varint(&mut self, v: u64) {
    self.writer.append_varint(v);
  }

  fn raw_scalar(&mut self, kind: ScalarKind, value: ScalarValue) {
    self.writer.append_raw_scalar(kind, value);
  }

  fn raw_bytes(&mut self, bytes: &[u8]) {
    self.writer.append_raw_bytes(bytes);
  }
}

//
// Encode
//

/// A message body: emits its fields, in one fixed order, to whichever pass is
/// running. Generated code implements this per message type.
pub trait Encode {
  fn emit_fields(&self, out: &mut dyn Emit);
}

/// Exact encoded size of a message body (no outer tag or length prefix).
#[must_use]
pub fn encoded_size(message: &dyn Encode) -> usize {
  let mut size = SizeEmit::new();
  message.emit_fields(&mut size);
  size.total()
}

/// Sizes, allocates exactly, and writes in one forward pass.
#[must_use]
pub fn encode_to_vec(message: &dyn Encode) -> Vec<u8> {
  let size = encoded_size(message);
  let mut buf = vec![0_u8; size];
  let mut writer = Writer::new(&mut buf);
  message.emit_fields(&mut WriteEmit::new(&mut writer));
  debug_assert_eq!(writer.pos(), size, "size pass and write pass diverged");
  buf
}

/// [`encode_to_vec`] for transport layers that hand off owned buffers.
#[must_use]
pub fn encode_to_bytes(message: &dyn Encode) -> Bytes {
  Bytes::from(encode_to_vec(message))
}

// Runs an emission closure against a throwaway size pass; used wherever a length
// prefix needs the nested size before the nested bytes.
fn emitted_size(emit: impl FnOnce(&mut dyn Emit)) -> usize {
  let mut size = SizeEmit::new();
  emit(&mut size);
  size.total()
}

//
// Field emission rules
//

/// Singular scalar/enum: omitted entirely when equal to the default — the type's
/// zero value, or `custom_default` when the schema declared one.
pub fn scalar_field(
  out: &mut dyn Emit,
  field_number: i32,
  kind: ScalarKind,
  value: ScalarValue,
  custom_default: Option<ScalarValue>,
) {
  let default = custom_default.unwrap_or_else(|| kind.default_value());
  if value == default {
    return;
  }
  out.tag(field_number, kind.wire_type());
  out.raw_scalar(kind, value);
}

/// Singular bytes: equal to default → omitted; absent (`None`) → zero-length value,
/// preserving explicit-empty semantics.
pub fn bytes_field(out: &mut dyn Emit, field_number: i32, value: Option<&[u8]>, default: &[u8]) {
  match value {
    Some(bytes) if bytes == default => {},
    Some(bytes) => {
      out.tag(field_number, WireType::LengthDelimited);
      out.varint(bytes.len() as u64);
      out.raw_bytes(bytes);
    },
    None => {
      out.tag(field_number, WireType::LengthDelimited);
      out.varint(0);
    },
  }
}

pub fn string_field(out: &mut dyn Emit, field_number: i32, value: Option<&str>, default: &str) {
  bytes_field(out, field_number, value.map(str::as_bytes), default.as_bytes());
}

/// Singular message: omitted when the nested body has no non-default fields, i.e.
/// sizes to zero.
pub fn message_field(out: &mut dyn Emit, field_number: i32, message: &dyn Encode) {
  let size = encoded_size(message);
  if size == 0 {
    return;
  }
  out.tag(field_number, WireType::LengthDelimited);
  out.varint(size as u64);
  message.emit_fields(out);
}

/// Repeated scalar/enum: empty → omitted; one element → unpacked (cheaper than a
/// packed wrapper); two or more → packed under a single length-delimited tag.
pub fn repeated_scalar_field(
  out: &mut dyn Emit,
  field_number: i32,
  kind: ScalarKind,
  values: &[ScalarValue],
) {
  match values {
    [] => {},
    [value] => {
      out.tag(field_number, kind.wire_type());
      out.raw_scalar(kind, *value);
    },
    values => {
      let payload: usize = values.iter().map(|value| kind.payload_size(*value)).sum();
      out.tag(field_number, WireType::LengthDelimited);
      out.varint(payload as u64);
      for value in values {
        out.raw_scalar(kind, *value);
      }
    },
  }
}

/// Repeated bytes: a `None` slot encodes tag + zero length rather than being
/// skipped, preserving the source array's positional nulls.
pub fn repeated_bytes_field(out: &mut dyn Emit, field_number: i32, slots: &[Option<&[u8]>]) {
  for slot in slots {
    out.tag(field_number, WireType::LengthDelimited);
    match slot {
      Some(bytes) => {
        out.varint(bytes.len() as u64);
        out.raw_bytes(bytes);
      },
      None => out.varint(0),
    }
  }
}

/// Repeated message, same positional-null rule as repeated bytes.
pub fn repeated_message_field(
  out: &mut dyn Emit,
  field_number: i32,
  slots: &[Option<&dyn Encode>],
) {
  for slot in slots {
    out.tag(field_number, WireType::LengthDelimited);
    match slot {
      Some(message) => {
        let size = encoded_size(*message);
        out.varint(size as u64);
        message.emit_fields(out);
      },
      None => out.varint(0),
    }
  }
}

/// One half of a map entry on the encode side.
pub enum EntryValue<'a> {
  Scalar(ScalarKind, ScalarValue),
  Bytes(&'a [u8]),
  Str(&'a str),
  Message(&'a dyn Encode),
}

// Map entries are elision-free: keys and values are written even when they equal
// their defaults.
fn entry_field(out: &mut dyn Emit, field_number: i32, value: &EntryValue<'_>) {
  match value {
    EntryValue::Scalar(kind, value) => {
      out.tag(field_number, kind.wire_type());
      out.raw_scalar(*kind, *value);
    },
    EntryValue::Bytes(bytes) => {
      out.tag(field_number, WireType::LengthDelimited);
      out.varint(bytes.len() as u64);
      out.raw_bytes(bytes);
    },
    EntryValue::Str(s) => {
      out.tag(field_number, WireType::LengthDelimited);
      out.varint(s.len() as u64);
      out.raw_bytes(s.as_bytes());
    },
    EntryValue::Message(message) => {
      let size = encoded_size(*message);
      out.tag(field_number, WireType::LengthDelimited);
      out.varint(size as u64);
      message.emit_fields(out);
    },
  }
}

/// Map: one length-delimited entry per pair, key as field 1 and value as field 2.
/// Entry order follows the iterator; the wire format mandates no key order.
pub fn map_field(
  out: &mut dyn Emit,
  field_number: i32,
  entries: &[(EntryValue<'_>, EntryValue<'_>)],
) {
  for (key, value) in entries {
    let entry_size = emitted_size(|out| {
      entry_field(out, 1, key);
      entry_field(out, 2, value);
    });
    out.tag(field_number, WireType::LengthDelimited);
    out.varint(entry_size as u64);
    entry_field(out, 1, key);
    entry_field(out, 2, value);
  }
}
