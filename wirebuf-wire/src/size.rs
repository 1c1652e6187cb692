// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

//! Exact encoded payload sizes for every scalar and length-delimited kind.
//!
//! The encode protocol pre-sizes its output buffer with these and then writes with no
//! backpatching, so every function here must agree byte-for-byte with the matching
//! encoder.

#[cfg(test)]
#[path = "./size_test.rs"]
mod size_test;

use crate::varint::{encode_zigzag32, encode_zigzag64, size_varint};

pub use crate::tag::size_tag;

#[must_use]
pub const fn size_uint32(v: u32) -> usize {
  size_varint(v as u64)
}

#[must_use]
pub const fn size_uint64(v: u64) -> usize {
  size_varint(v)
}

/// Negative `int32` values sign-extend to 64 bits on the wire and always take 10
/// bytes.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn size_int32(v: i32) -> usize {
  size_varint(v as i64 as u64)
}

#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn size_int64(v: i64) -> usize {
  size_varint(v as u64)
}

#[must_use]
pub const fn size_sint32(v: i32) -> usize {
  size_varint(encode_zigzag32(v) as u64)
}

#[must_use]
pub const fn size_sint64(v: i64) -> usize {
  size_varint(encode_zigzag64(v))
}

#[must_use]
pub const fn size_bool(_v: bool) -> usize {
  1
}

/// Enums travel as `int32` varints.
#[must_use]
pub const fn size_enum(v: i32) -> usize {
  size_int32(v)
}

pub const SIZE_FIXED32: usize = 4;
pub const SIZE_FIXED64: usize = 8;

/// Length prefix plus payload for a length-delimited value of `len` bytes.
#[must_use]
pub const fn size_len_prefixed(len: usize) -> usize {
  size_varint(len as u64) + len
}

/// Full field size for a bytes/string/message field: tag, prefix, payload.
#[must_use]
pub const fn size_bytes_field(field_number: i32, len: usize) -> usize {
  size_tag(field_number) + size_len_prefixed(len)
}
