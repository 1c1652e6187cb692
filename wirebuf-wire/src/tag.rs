// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

#[cfg(test)]
#[path = "./tag_test.rs"]
mod tag_test;

use crate::varint::{decode_varint, encode_varint, size_varint};
use crate::{Error, Result};

/// Group nesting deeper than this fails the skip rather than winding the loop on
/// adversarial headers.
pub const MAX_GROUP_DEPTH: usize = 64;

//
// WireType
//

/// The low 3 bits of a tag: how a field's payload is read or skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
  Varint          = 0,
  Fixed64         = 1,
  LengthDelimited = 2,
  StartGroup      = 3,
  EndGroup        = 4,
  Fixed32         = 5,
}

impl WireType {
  /// Splits a decoded tag key's low 3 bits. Reserved values 6 and 7 fail with
  /// [`Error::InvalidTag`].
  pub fn from_tag_key(key: u64) -> Result<Self> {
    match key & 0x7 {
      0 => Ok(Self::Varint),
      1 => Ok(Self::Fixed64),
      2 => Ok(Self::LengthDelimited),
      3 => Ok(Self::StartGroup),
      4 => Ok(Self::EndGroup),
      5 => Ok(Self::Fixed32),
      _ => Err(Error::InvalidTag),
    }
  }
}

//
// Tag
//

/// A decomposed field key: `(field_number << 3) | wire_type` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
  pub field_number: i32,
  pub wire_type: WireType,
}

impl Tag {
  #[must_use]
  pub const fn new(field_number: i32, wire_type: WireType) -> Self {
    Self { field_number, wire_type }
  }

  /// The varint key this tag encodes to. Field numbers are non-negative in practice;
  /// the cast goes through u32 then widens for the shift.
  #[must_use]
  #[allow(clippy::cast_sign_loss)]
  pub const fn key(self) -> u64 {
    ((self.field_number as u32 as u64) << 3) | self.wire_type as u64
  }
}

/// Encoded size of a tag with the given field number.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn size_tag(field_number: i32) -> usize {
  size_varint((field_number as u32 as u64) << 3)
}

/// Writes the tag for `(field_number, wire_type)` at the start of `dst`.
pub fn encode_tag(dst: &mut [u8], field_number: i32, wire_type: WireType) -> usize {
  encode_varint(dst, Tag::new(field_number, wire_type).key())
}

/// Decodes a tag at the start of `src`, returning `(bytes_consumed, tag)`.
///
/// Fails with [`Error::InvalidTag`] when the shifted field number does not fit a
/// signed 32-bit value or the wire type is reserved.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn decode_tag(src: &[u8]) -> Result<(usize, Tag)> {
  let (size, key) = decode_varint(src)?;
  let wire_type = WireType::from_tag_key(key)?;
  let field_number = key >> 3;
  if field_number > i32::MAX as u64 {
    return Err(Error::InvalidTag);
  }
  Ok((size, Tag::new(field_number as i32, wire_type)))
}

/// Advances past one value of `wire_type` at the start of `src` without decoding it,
/// returning the bytes skipped.
///
/// A lone end-group is unskippable and fails with [`Error::InvalidTag`].
pub fn skip_value(src: &[u8], wire_type: WireType) -> Result<usize> {
  match wire_type {
    WireType::Varint => decode_varint(src).map(|(size, _)| size),
    WireType::Fixed64 => {
      if src.len() < 8 {
        Err(Error::InvalidData)
      } else {
        Ok(8)
      }
    },
    WireType::Fixed32 => {
      if src.len() < 4 {
        Err(Error::InvalidData)
      } else {
        Ok(4)
      }
    },
    WireType::LengthDelimited => {
      let (prefix, len) = decode_varint(src)?;
      let len = usize::try_from(len).map_err(|_| Error::InvalidData)?;
      if src.len() - prefix < len {
        return Err(Error::InvalidData);
      }
      Ok(prefix + len)
    },
    WireType::StartGroup => skip_group(src),
    WireType::EndGroup => Err(Error::InvalidTag),
  }
}

// Deprecated group wire types nest, so the skip walks tags with an explicit depth
// counter rather than recursing; depth is bounded by MAX_GROUP_DEPTH and the walk by
// the remaining buffer. An unterminated group surfaces as InvalidTag.
fn skip_group(src: &[u8]) -> Result<usize> {
  let mut pos = 0;
  let mut depth: usize = 1;
  while depth > 0 {
    let (tag_size, tag) = decode_tag(&src[pos ..]).map_err(|_| Error::InvalidTag)?;
    pos += tag_size;
    match tag.wire_type {
      WireType::StartGroup => {
        depth += 1;
        if depth > MAX_GROUP_DEPTH {
          return Err(Error::InvalidTag);
        }
      },
      WireType::EndGroup => depth -= 1,
      other => pos += skip_value(&src[pos ..], other)?,
    }
  }
  Ok(pos)
}
