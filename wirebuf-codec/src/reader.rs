// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./reader_test.rs"]
mod reader_test;

use crate::descriptor::{ScalarKind, ScalarValue};
use wirebuf_wire::tag::{Tag, WireType, decode_tag, skip_value};
use wirebuf_wire::varint::{decode_varint, decode_zigzag32, decode_zigzag64};
use wirebuf_wire::{Error, Result, fixed};

//
// Reader
//

/// Stateless bounds-checked view over a borrowed message buffer.
///
/// Every read is pure given an offset and returns `(bytes_consumed, value)`; cursor
/// positions live with the caller. Bytes and string reads return views into the
/// input buffer and never copy. Because nothing here mutates, any number of cursors
/// (or threads) may read one buffer at once.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
  buf: &'a [u8],
}

impl<'a> Reader<'a> {
  #[must_use]
  pub const fn new(buf: &'a [u8]) -> Self {
    Self { buf }
  }

  #[must_use]
  pub const fn len(&self) -> usize {
    self.buf.len()
  }

  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }

  #[must_use]
  pub const fn buf(&self) -> &'a [u8] {
    self.buf
  }

  // Untrusted offsets are validated here once; primitives then see only in-bounds
  // slices.
  fn at(&self, offset: usize) -> Result<&'a [u8]> {
    self.buf.get(offset ..).ok_or(Error::InvalidData)
  }

  pub fn read_tag(&self, offset: usize) -> Result<(usize, Tag)> {
    decode_tag(self.at(offset)?)
  }

  /// Skips one value of `wire_type` at `offset`, returning the offset just past it.
  pub fn skip(&self, offset: usize, wire_type: WireType) -> Result<usize> {
    Ok(offset + skip_value(self.at(offset)?, wire_type)?)
  }

  pub fn read_uint64(&self, offset: usize) -> Result<(usize, u64)> {
    decode_varint(self.at(offset)?)
  }

  /// Varints wider than the target type truncate to its low bits, matching
  /// reference decoding of over-wide writers.
  #[allow(clippy::cast_possible_truncation)]
  pub fn read_uint32(&self, offset: usize) -> Result<(usize, u32)> {
    let (size, v) = self.read_uint64(offset)?;
    Ok((size, v as u32))
  }

  #[allow(clippy::cast_possible_wrap)]
  pub fn read_int64(&self, offset: usize) -> Result<(usize, i64)> {
    let (size, v) = self.read_uint64(offset)?;
    Ok((size, v as i64))
  }

  #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
  pub fn read_int32(&self, offset: usize) -> Result<(usize, i32)> {
    let (size, v) = self.read_uint64(offset)?;
    Ok((size, v as i32))
  }

  pub fn read_sint32(&self, offset: usize) -> Result<(usize, i32)> {
    let (size, v) = self.read_uint32(offset)?;
    Ok((size, decode_zigzag32(v)))
  }

  pub fn read_sint64(&self, offset: usize) -> Result<(usize, i64)> {
    let (size, v) = self.read_uint64(offset)?;
    Ok((size, decode_zigzag64(v)))
  }

  pub fn read_bool(&self, offset: usize) -> Result<(usize, bool)> {
    let (size, v) = self.read_uint64(offset)?;
    Ok((size, v != 0))
  }

  pub fn read_enum(&self, offset: usize) -> Result<(usize, i32)> {
    self.read_int32(offset)
  }

  pub fn read_fixed32(&self, offset: usize) -> Result<(usize, u32)> {
    fixed::decode_fixed32(self.at(offset)?)
  }

  pub fn read_fixed64(&self, offset: usize) -> Result<(usize, u64)> {
    fixed::decode_fixed64(self.at(offset)?)
  }

  #[allow(clippy::cast_possible_wrap)]
  pub fn read_sfixed32(&self, offset: usize) -> Result<(usize, i32)> {
    let (size, v) = self.read_fixed32(offset)?;
    Ok((size, v as i32))
  }

  #[allow(clippy::cast_possible_wrap)]
  pub fn read_sfixed64(&self, offset: usize) -> Result<(usize, i64)> {
    let (size, v) = self.read_fixed64(offset)?;
    Ok((size, v as i64))
  }

  pub fn read_float(&self, offset: usize) -> Result<(usize, f32)> {
    fixed::decode_float(self.at(offset)?)
  }

  pub fn read_double(&self, offset: usize) -> Result<(usize, f64)> {
    fixed::decode_double(self.at(offset)?)
  }

  /// Reads a length-delimited value, returning a zero-copy view of the payload.
  /// Consumed bytes cover the length prefix plus the payload.
  pub fn read_bytes(&self, offset: usize) -> Result<(usize, &'a [u8])> {
    let src = self.at(offset)?;
    let (prefix, len) = decode_varint(src)?;
    let len = usize::try_from(len).map_err(|_| Error::InvalidData)?;
    let end = prefix.checked_add(len).ok_or(Error::InvalidData)?;
    let payload = src.get(prefix .. end).ok_or(Error::InvalidData)?;
    Ok((end, payload))
  }

  pub fn read_string(&self, offset: usize) -> Result<(usize, &'a str)> {
    let (size, payload) = self.read_bytes(offset)?;
    let s = std::str::from_utf8(payload).map_err(|_| Error::InvalidData)?;
    Ok((size, s))
  }

  /// Unified scalar dispatch for descriptor-driven callers.
  pub fn read_scalar(&self, kind: ScalarKind, offset: usize) -> Result<(usize, ScalarValue)> {
    Ok(match kind {
      ScalarKind::Int32 => {
        let (size, v) = self.read_int32(offset)?;
        (size, ScalarValue::I32(v))
      },
      ScalarKind::Int64 => {
        let (size, v) = self.read_int64(offset)?;
        (size, ScalarValue::I64(v))
      },
      ScalarKind::Uint32 => {
        let (size, v) = self.read_uint32(offset)?;
        (size, ScalarValue::U32(v))
      },
      ScalarKind::Uint64 => {
        let (size, v) = self.read_uint64(offset)?;
        (size, ScalarValue::U64(v))
      },
      ScalarKind::Sint32 => {
        let (size, v) = self.read_sint32(offset)?;
        (size, ScalarValue::I32(v))
      },
      ScalarKind::Sint64 => {
        let (size, v) = self.read_sint64(offset)?;
        (size, ScalarValue::I64(v))
      },
      ScalarKind::Bool => {
        let (size, v) = self.read_bool(offset)?;
        (size, ScalarValue::Bool(v))
      },
      ScalarKind::Enum => {
        let (size, v) = self.read_enum(offset)?;
        (size, ScalarValue::I32(v))
      },
      ScalarKind::Fixed32 => {
        let (size, v) = self.read_fixed32(offset)?;
        (size, ScalarValue::U32(v))
      },
      ScalarKind::Fixed64 => {
        let (size, v) = self.read_fixed64(offset)?;
        (size, ScalarValue::U64(v))
      },
      ScalarKind::Sfixed32 => {
        let (size, v) = self.read_sfixed32(offset)?;
        (size, ScalarValue::I32(v))
      },
      ScalarKind::Sfixed64 => {
        let (size, v) = self.read_sfixed64(offset)?;
        (size, ScalarValue::I64(v))
      },
      ScalarKind::Float => {
        let (size, v) = self.read_float(offset)?;
        (size, ScalarValue::F32(v))
      },
      ScalarKind::Double => {
        let (size, v) = self.read_double(offset)?;
        (size, ScalarValue::F64(v))
      },
    })
  }
}
