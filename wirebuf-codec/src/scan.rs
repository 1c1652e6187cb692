// shared-core - bitdrift's common client/server libraries
// Copyright Bitdrift, Inc. All rights reserved.
//
// Use of this source code is governed by a source available license that can be found in the
// LICENSE file or at:
// https://polyformproject.org/wp-content/uploads/2020/06/PolyForm-Shield-1.0.0.txt

use crate::reader::Reader;
use wirebuf_wire::{Result, Tag};

/// One field occurrence met by a scan: its tag and the offset of its value bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEntry {
  pub tag: Tag,
  pub value_offset: usize,
}

//
// MessageScan
//

/// Single linear walk over one message buffer.
///
/// The scan itself skips every value, so callers only record the yielded offsets
/// into their per-field cursor structs and decode later. Scans hold no shared state;
/// any number may walk the same buffer concurrently.
#[derive(Debug, Clone)]
pub struct MessageScan<'a> {
  reader: Reader<'a>,
  offset: usize,
}

impl<'a> MessageScan<'a> {
  #[must_use]
  pub const fn new(reader: Reader<'a>) -> Self {
    Self { reader, offset: 0 }
  }

  #[must_use]
  pub const fn offset(&self) -> usize {
    self.offset
  }

  /// Yields the next field occurrence, or `None` at end of buffer. Errors leave the
  /// scan positioned at the offending field; retrying is not meaningful.
  pub fn next_field(&mut self) -> Result<Option<FieldEntry>> {
    if self.offset >= self.reader.len() {
      return Ok(None);
    }
    let (tag_size, tag) = self.reader.read_tag(self.offset)?;
    let value_offset = self.offset + tag_size;
    self.offset = self.reader.skip(value_offset, tag.wire_type)?;
    Ok(Some(FieldEntry { tag, value_offset }))
  }
}
