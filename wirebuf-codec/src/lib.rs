// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

//! Reader/writer surfaces and the field-access protocol over the wirebuf wire format.
//!
//! Decoding is a single linear scan ([`MessageScan`]) that records per-field byte
//! offsets into cursor structs; values materialize only when a cursor's `next()` is
//! called, directly out of the borrowed input buffer. Encoding is two-pass: one
//! traversal routine runs first against a size accumulator and then against an
//! exactly-sized output buffer, so the two passes cannot diverge.
//!
//! The schema layer above this crate hands each field a [`FieldDescriptor`]; nothing
//! here knows message schemas.

pub mod descriptor;
pub mod encode;
pub mod fields;
pub mod reader;
pub mod scan;
pub mod writer;

pub use crate::descriptor::{
  FieldDescriptor, FieldKind, MapKeyKind, MapValueKind, ScalarKind, ScalarValue,
};
pub use crate::encode::{Emit, Encode, encode_to_bytes, encode_to_vec, encoded_size};
pub use crate::fields::{
  LazyMessage, MapCursor, MapKey, MapValue, RepeatedEntryCursor, RepeatedScalarCursor,
};
pub use crate::reader::Reader;
pub use crate::scan::{FieldEntry, MessageScan};
pub use crate::writer::Writer;
pub use wirebuf_wire::{Error, Result, Tag, WireType};
