// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

//! Leaf primitives of the protobuf wire format: varint and zigzag codecs,
//! fixed-width little-endian codecs, tag composition/decomposition and value skipping,
//! and exact encoded-size estimation.
//!
//! Every decode primitive takes a byte slice positioned at the value and returns
//! `(bytes_consumed, value)` so the caller advances its own cursor; no primitive owns
//! mutable state. Encode primitives write into a caller-sized buffer and return the
//! byte count written; an undersized buffer is a contract violation caught by debug
//! assertions and slice bounds checks, not a recoverable error.

pub mod fixed;
pub mod size;
pub mod tag;
pub mod varint;

pub use crate::tag::{Tag, WireType};

/// Errors produced while decoding untrusted wire data.
///
/// Encoding has no error channel: encoders operate on caller-constructed values and
/// write into buffers the caller pre-sized with the [`size`] estimators.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// A varint ran past ten bytes without terminating, or the buffer ended
  /// mid-sequence.
  #[error("invalid varint")]
  InvalidVarInt,
  /// A tag decoded to a field number outside the signed 32-bit range, or to a wire
  /// type that cannot be read or skipped (reserved 6/7, a lone end-group, or an
  /// unterminated group).
  #[error("invalid tag")]
  InvalidTag,
  /// Not enough bytes remained for a fixed-width or length-delimited value, or a
  /// length-delimited string held invalid UTF-8.
  #[error("invalid data")]
  InvalidData,
}

pub type Result<T> = std::result::Result<T, Error>;
