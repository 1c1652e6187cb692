// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

//! Decode-side field access protocol.
//!
//! An outer [`MessageScan`](crate::scan::MessageScan) feeds each field occurrence to
//! the cursor matching its descriptor; the cursors record byte offsets only. Values
//! materialize lazily from the borrowed buffer when `next()` is called:
//!
//! - singular scalar/bytes/enum: the caller keeps one slot and overwrites it per
//!   occurrence (last occurrence wins, the wire-format duplicate rule);
//! - singular message: [`LazyMessage`] keeps the raw slice and re-reads on every
//!   access, no caching;
//! - repeated scalar/enum: [`RepeatedScalarCursor`], packed and unpacked;
//! - repeated bytes/string/message: [`RepeatedEntryCursor`];
//! - map: [`MapCursor`], entries decoded eagerly but iterated like repeated
//!   messages.

#[cfg(test)]
#[path = "./fields_test.rs"]
mod fields_test;

use crate::descriptor::{MapKeyKind, MapValueKind, ScalarKind, ScalarValue};
use crate::reader::Reader;
use crate::scan::{FieldEntry, MessageScan};
use wirebuf_wire::{Error, Result, WireType};

//
// LazyMessage
//

/// A singular nested-message field: only the raw length-delimited slice is stored.
/// Accessors re-read from the buffer on every call; repeated access trades decode
/// cost for zero up-front allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyMessage<'a> {
  raw: Option<&'a [u8]>,
}

impl<'a> LazyMessage<'a> {
  #[must_use]
  pub const fn empty() -> Self {
    Self { raw: None }
  }

  /// Records an occurrence; later occurrences overwrite earlier ones.
  pub fn set(&mut self, raw: &'a [u8]) {
    self.raw = Some(raw);
  }

  #[must_use]
  pub const fn is_set(&self) -> bool {
    self.raw.is_some()
  }

  #[must_use]
  pub const fn raw(&self) -> Option<&'a [u8]> {
    self.raw
  }

  /// A fresh scan over the message body. Each call starts over at offset zero.
  #[must_use]
  pub fn scan(&self) -> Option<MessageScan<'a>> {
    self.raw.map(|raw| MessageScan::new(Reader::new(raw)))
  }
}

//
// RepeatedScalarCursor
//

/// Cursor over a repeated scalar/enum field, packed or unpacked.
///
/// A length-delimited occurrence marks the field packed and spans the whole blob;
/// any other wire type marks it unpacked. Later occurrences overwrite `packed` and
/// the span end, so a stream mixing packed and unpacked occurrences of one field is
/// read with the *last* occurrence's packedness and earlier occurrences can be
/// misinterpreted. That matches the wire behavior this codec inherits; the flip is
/// logged once per cursor and deliberately not corrected.
#[derive(Debug, Clone)]
pub struct RepeatedScalarCursor {
  field_number: i32,
  kind: ScalarKind,
  first: Option<usize>,
  last: usize,
  packed: bool,
  flip_logged: bool,
}

impl RepeatedScalarCursor {
  #[must_use]
  pub const fn new(field_number: i32, kind: ScalarKind) -> Self {
    Self {
      field_number,
      kind,
      first: None,
      last: 0,
      packed: false,
      flip_logged: false,
    }
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.first.is_none()
  }

  /// Records one occurrence of this field's tag met by the outer scan.
  pub fn observe(&mut self, reader: &Reader<'_>, entry: FieldEntry) -> Result<()> {
    debug_assert_eq!(entry.tag.field_number, self.field_number);
    let packed = entry.tag.wire_type == WireType::LengthDelimited;

    if self.first.is_some() && packed != self.packed && !self.flip_logged {
      log::warn!(
        "repeated field {} switches between packed and unpacked occurrences; decoding uses the \
         last occurrence's form",
        self.field_number,
      );
      self.flip_logged = true;
    }

    if packed {
      let (consumed, payload) = reader.read_bytes(entry.value_offset)?;
      let values_start = entry.value_offset + consumed - payload.len();
      if self.first.is_none() {
        self.first = Some(values_start);
      }
      self.last = entry.value_offset + consumed;
    } else {
      if self.first.is_none() {
        self.first = Some(entry.value_offset);
      }
      self.last = reader.skip(entry.value_offset, entry.tag.wire_type)?;
    }
    self.packed = packed;
    Ok(())
  }

  /// Decodes the next value, or `None` when the sequence is exhausted.
  ///
  /// Packed: sequential values until the blob end. Unpacked: decode one value, peek
  /// at the following tag and continue only when it is this field's tag again.
  pub fn next(&mut self, reader: &Reader<'_>) -> Result<Option<ScalarValue>> {
    let Some(offset) = self.first else {
      return Ok(None);
    };

    if self.packed {
      if offset >= self.last {
        self.first = None;
        return Ok(None);
      }
      let (consumed, value) = reader.read_scalar(self.kind, offset)?;
      self.first = Some(offset + consumed);
      return Ok(Some(value));
    }

    let (consumed, value) = reader.read_scalar(self.kind, offset)?;
    let after = offset + consumed;
    self.first = None;
    if after < reader.len() {
      let (tag_size, tag) = reader.read_tag(after)?;
      if tag.field_number == self.field_number && tag.wire_type == self.kind.wire_type() {
        self.first = Some(after + tag_size);
      }
    }
    Ok(Some(value))
  }
}

//
// RepeatedEntryCursor
//

/// Cursor over a repeated length-delimited field (bytes, string, message, or map
/// entries). Elements need not be contiguous: after each entry the cursor walks
/// tag-by-tag, skipping other fields, until the next occurrence of its own tag or
/// the end of the buffer.
#[derive(Debug, Clone)]
pub struct RepeatedEntryCursor {
  field_number: i32,
  first: Option<usize>,
  last: usize,
  count: usize,
}

impl RepeatedEntryCursor {
  #[must_use]
  pub const fn new(field_number: i32) -> Self {
    Self { field_number, first: None, last: 0, count: 0 }
  }

  /// Occurrences seen by the outer scan so far.
  #[must_use]
  pub const fn count(&self) -> usize {
    self.count
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.count == 0
  }

  /// Records one occurrence. Entries are always length-delimited; anything else is
  /// a wire-type mismatch against the descriptor.
  pub fn observe(&mut self, reader: &Reader<'_>, entry: FieldEntry) -> Result<()> {
    debug_assert_eq!(entry.tag.field_number, self.field_number);
    if entry.tag.wire_type != WireType::LengthDelimited {
      return Err(Error::InvalidTag);
    }
    if self.first.is_none() {
      self.first = Some(entry.value_offset);
    }
    self.last = reader.skip(entry.value_offset, WireType::LengthDelimited)?;
    self.count += 1;
    Ok(())
  }

  /// Yields the next entry's payload as a zero-copy slice.
  pub fn next<'a>(&mut self, reader: &Reader<'a>) -> Result<Option<&'a [u8]>> {
    let Some(offset) = self.first else {
      return Ok(None);
    };
    let (consumed, payload) = reader.read_bytes(offset)?;

    self.first = None;
    let mut pos = offset + consumed;
    while pos < reader.len() {
      let (tag_size, tag) = reader.read_tag(pos)?;
      if tag.field_number == self.field_number && tag.wire_type == WireType::LengthDelimited {
        self.first = Some(pos + tag_size);
        break;
      }
      pos = reader.skip(pos + tag_size, tag.wire_type)?;
    }
    Ok(Some(payload))
  }
}

//
// MapCursor
//

/// A decoded map value; message values stay as raw slices for the caller's own
/// nested decode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapValue<'a> {
  Scalar(ScalarValue),
  Bytes(&'a [u8]),
  Str(&'a str),
  Message(&'a [u8]),
}

/// A decoded map key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapKey<'a> {
  Scalar(ScalarValue),
  Str(&'a str),
}

/// Cursor over a map field: a repeated field of synthetic two-field entry messages,
/// field 1 the key and field 2 the value.
///
/// Each yielded entry is decoded eagerly (entries are small); iteration over entries
/// follows the repeated-message rule. Duplicate keys are NOT deduplicated here —
/// callers building a real mapping apply last-entry-wins themselves, which plain
/// in-order insertion provides.
#[derive(Debug, Clone)]
pub struct MapCursor {
  entries: RepeatedEntryCursor,
  key_kind: MapKeyKind,
  value_kind: MapValueKind,
}

impl MapCursor {
  #[must_use]
  pub const fn new(field_number: i32, key_kind: MapKeyKind, value_kind: MapValueKind) -> Self {
    Self {
      entries: RepeatedEntryCursor::new(field_number),
      key_kind,
      value_kind,
    }
  }

  #[must_use]
  pub const fn count(&self) -> usize {
    self.entries.count()
  }

  pub fn observe(&mut self, reader: &Reader<'_>, entry: FieldEntry) -> Result<()> {
    self.entries.observe(reader, entry)
  }

  /// Decodes the next entry into `(key, value)`. A missing key or value half falls
  /// back to the kind's default, per the wire spec for map entries.
  pub fn next<'a>(&mut self, reader: &Reader<'a>) -> Result<Option<(MapKey<'a>, MapValue<'a>)>> {
    let Some(raw) = self.entries.next(reader)? else {
      return Ok(None);
    };

    let entry_reader = Reader::new(raw);
    let mut scan = MessageScan::new(entry_reader);
    let mut key: Option<MapKey<'a>> = None;
    let mut value: Option<MapValue<'a>> = None;

    while let Some(field) = scan.next_field()? {
      match field.tag.field_number {
        1 => key = Some(Self::decode_key(self.key_kind, &entry_reader, field.value_offset)?),
        2 => value = Some(Self::decode_value(self.value_kind, &entry_reader, field.value_offset)?),
        _ => {},
      }
    }

    let key = match key {
      Some(key) => key,
      None => default_key(self.key_kind),
    };
    let value = match value {
      Some(value) => value,
      None => default_value(self.value_kind),
    };
    Ok(Some((key, value)))
  }

  fn decode_key<'a>(kind: MapKeyKind, reader: &Reader<'a>, offset: usize) -> Result<MapKey<'a>> {
    Ok(match kind {
      MapKeyKind::Scalar(kind) => MapKey::Scalar(reader.read_scalar(kind, offset)?.1),
      MapKeyKind::String => MapKey::Str(reader.read_string(offset)?.1),
    })
  }

  fn decode_value<'a>(
    kind: MapValueKind,
    reader: &Reader<'a>,
    offset: usize,
  ) -> Result<MapValue<'a>> {
    Ok(match kind {
      MapValueKind::Scalar(kind) => MapValue::Scalar(reader.read_scalar(kind, offset)?.1),
      MapValueKind::Bytes => MapValue::Bytes(reader.read_bytes(offset)?.1),
      MapValueKind::String => MapValue::Str(reader.read_string(offset)?.1),
      MapValueKind::Message => MapValue::Message(reader.read_bytes(offset)?.1),
    })
  }
}

const fn default_key(kind: MapKeyKind) -> MapKey<'static> {
  match kind {
    MapKeyKind::Scalar(kind) => MapKey::Scalar(kind.default_value()),
    MapKeyKind::String => MapKey::Str(""),
  }
}

const fn default_value(kind: MapValueKind) -> MapValue<'static> {
  match kind {
    MapValueKind::Scalar(kind) => MapValue::Scalar(kind.default_value()),
    MapValueKind::Bytes => MapValue::Bytes(&[]),
    MapValueKind::String => MapValue::Str(""),
    MapValueKind::Message => MapValue::Message(&[]),
  }
}
