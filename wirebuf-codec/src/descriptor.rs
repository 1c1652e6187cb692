// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

//! The resolved field description handed down from the schema layer.
//!
//! [`FieldDescriptor`] is the only thing the codec learns about a schema: a field
//! number, a kind, and repeatedness. It decides which decode cursor and which encode
//! rule a field uses; the codec never sees message types.

use wirebuf_wire::WireType;
use wirebuf_wire::size::{
  SIZE_FIXED32, SIZE_FIXED64, size_bool, size_enum, size_int32, size_int64, size_sint32,
  size_sint64, size_uint32, size_uint64,
};

//
// ScalarKind
//

/// Every scalar kind of the wire format, one arm per kind.
///
/// Dispatch from kind to size/read/write goes through exhaustive matches on this
/// enum, so adding a kind fails to compile until every table is extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
  Int32,
  Int64,
  Uint32,
  Uint64,
  Sint32,
  Sint64,
  Bool,
  Enum,
  Fixed32,
  Fixed64,
  Sfixed32,
  Sfixed64,
  Float,
  Double,
}

impl ScalarKind {
  /// The wire type an unpacked value of this kind travels under.
  #[must_use]
  pub const fn wire_type(self) -> WireType {
    match self {
      Self::Int32
      | Self::Int64
      | Self::Uint32
      | Self::Uint64
      | Self::Sint32
      | Self::Sint64
      | Self::Bool
      | Self::Enum => WireType::Varint,
      Self::Fixed32 | Self::Sfixed32 | Self::Float => WireType::Fixed32,
      Self::Fixed64 | Self::Sfixed64 | Self::Double => WireType::Fixed64,
    }
  }

  /// The type's default value, the one singular encoding elides.
  #[must_use]
  pub const fn default_value(self) -> ScalarValue {
    match self {
      Self::Int32 | Self::Sint32 | Self::Enum | Self::Sfixed32 => ScalarValue::I32(0),
      Self::Int64 | Self::Sint64 | Self::Sfixed64 => ScalarValue::I64(0),
      Self::Uint32 | Self::Fixed32 => ScalarValue::U32(0),
      Self::Uint64 | Self::Fixed64 => ScalarValue::U64(0),
      Self::Bool => ScalarValue::Bool(false),
      Self::Float => ScalarValue::F32(0.0),
      Self::Double => ScalarValue::F64(0.0),
    }
  }

  /// Encoded payload size of one value of this kind, excluding any tag.
  ///
  /// Panics if `value`'s variant does not belong to this kind; that is a programmer
  /// error on the encode side, which has no error channel.
  #[must_use]
  pub fn payload_size(self, value: ScalarValue) -> usize {
    match (self, value) {
      (Self::Int32, ScalarValue::I32(v)) => size_int32(v),
      (Self::Int64, ScalarValue::I64(v)) => size_int64(v),
      (Self::Uint32, ScalarValue::U32(v)) => size_uint32(v),
      (Self::Uint64, ScalarValue::U64(v)) => size_uint64(v),
      (Self::Sint32, ScalarValue::I32(v)) => size_sint32(v),
      (Self::Sint64, ScalarValue::I64(v)) => size_sint64(v),
      (Self::Bool, ScalarValue::Bool(v)) => size_bool(v),
      (Self::Enum, ScalarValue::I32(v)) => size_enum(v),
      (Self::Fixed32 | Self::Sfixed32 | Self::Float, _) => SIZE_FIXED32,
      (Self::Fixed64 | Self::Sfixed64 | Self::Double, _) => SIZE_FIXED64,
      (kind, value) => panic!("scalar value {value:?} does not belong to kind {kind:?}"),
    }
  }
}

//
// ScalarValue
//

/// A decoded or to-be-encoded scalar, tagged by representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
  I32(i32),
  I64(i64),
  U32(u32),
  U64(u64),
  Bool(bool),
  F32(f32),
  F64(f64),
}

impl ScalarValue {
  #[must_use]
  pub fn as_i32(self) -> Option<i32> {
    match self {
      Self::I32(v) => Some(v),
      _ => None,
    }
  }

  #[must_use]
  pub fn as_i64(self) -> Option<i64> {
    match self {
      Self::I64(v) => Some(v),
      _ => None,
    }
  }

  #[must_use]
  pub fn as_u32(self) -> Option<u32> {
    match self {
      Self::U32(v) => Some(v),
      _ => None,
    }
  }

  #[must_use]
  pub fn as_u64(self) -> Option<u64> {
    match self {
      Self::U64(v) => Some(v),
      _ => None,
    }
  }

  #[must_use]
  pub fn as_bool(self) -> Option<bool> {
    match self {
      Self::Bool(v) => Some(v),
      _ => None,
    }
  }
}

//
// FieldKind / FieldDescriptor
//

/// Kinds a map key may take: integral/bool scalars or strings, per the wire spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKeyKind {
  Scalar(ScalarKind),
  String,
}

/// Kinds a map value may take: anything singular and non-map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapValueKind {
  Scalar(ScalarKind),
  Bytes,
  String,
  Message,
}

/// What a field holds. Map fields name the kinds of their synthetic entry message's
/// key (field 1) and value (field 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Scalar(ScalarKind),
  Bytes,
  String,
  Message,
  Map { key: MapKeyKind, value: MapValueKind },
}

/// One resolved field as the schema layer describes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
  pub field_number: i32,
  pub kind: FieldKind,
  pub repeated: bool,
}

impl FieldDescriptor {
  #[must_use]
  pub const fn new(field_number: i32, kind: FieldKind, repeated: bool) -> Self {
    Self { field_number, kind, repeated }
  }
}
