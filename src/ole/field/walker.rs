//! Resynchronizing walk over the object streams of an OLE field.
//!
//! The walker does not trust the container layout. It scans for the OLE 1.0
//! version marker, tries to decode one object stream behind it, and on any
//! inconsistency resumes scanning one byte after the marker. Bytes between
//! objects are ignored.
//!
//! ```text
//! u32 version (0x0501)  u32 format  i32 class_len  class bytes
//! format == embedded:   i32 topic_len  topic  i32 item_len  item
//! otherwise:            8 bytes of extent
//! i32 data_len  data bytes
//! ```

use super::types::{ObjectFormat, ObjectSegment, ObjectType};
use crate::FieldOptions;
use crate::common::binary::ByteCursor;
use crate::common::error::{Error, Result};
use crate::ole::consts::{
    FOOTER_LEN, FOOTER_SIGNATURE, OBJECT_MARKER, PRESENTATION_EXTENT_LEN,
};
use memchr::memmem;
use std::iter::FusedIterator;

/// Walk state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    /// Looking for the next object marker
    Scanning,
    /// Marker found at `marker`, decoding the object behind it
    EmittingSegment { marker: usize },
    /// Input exhausted or footer reached
    Done,
}

/// Lazy iterator over the object segments of an OLE field.
///
/// Not restartable: create a new walker to walk the same blob again.
///
/// # Examples
///
/// ```
/// use olefield::parse_container;
///
/// assert_eq!(parse_container(&[]).count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ContainerWalker<'data> {
    cursor: ByteCursor<'data>,
    state: WalkState,
    options: FieldOptions,
}

impl<'data> ContainerWalker<'data> {
    /// Walk `data` from its first byte with default options.
    pub fn new(data: &'data [u8]) -> Self {
        Self::with_options(data, 0, FieldOptions::default())
    }

    /// Walk `data` starting at `offset`.
    pub fn with_options(data: &'data [u8], offset: usize, options: FieldOptions) -> Self {
        Self {
            cursor: ByteCursor::at(data, offset),
            state: WalkState::Scanning,
            options,
        }
    }

    /// Current offset in the blob.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Whether the walk has finished.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == WalkState::Done
    }

    /// Scanning transition: locate the next marker or finish.
    fn scan(&mut self) {
        if self.cursor.remaining() <= FOOTER_LEN {
            if self.cursor.rest().ends_with(FOOTER_SIGNATURE) {
                log::debug!("OLE field footer at offset {}", self.cursor.position());
            }
            self.state = WalkState::Done;
            return;
        }

        match memmem::find(self.cursor.rest(), OBJECT_MARKER) {
            Some(skipped) => {
                let marker = self.cursor.position() + skipped;
                if skipped > 0 {
                    log::debug!(
                        "Skipped {} unrecognized bytes before object marker at {}",
                        skipped,
                        marker
                    );
                }
                self.cursor.seek(marker);
                self.state = WalkState::EmittingSegment { marker };
            },
            None => {
                self.cursor.seek(self.cursor.data().len());
                self.state = WalkState::Done;
            },
        }
    }

    /// Decode the object stream whose marker sits at the cursor.
    fn read_segment(&mut self, marker: usize) -> Result<ObjectSegment<'data>> {
        let cursor = &mut self.cursor;
        cursor.skip(OBJECT_MARKER.len())?;

        let format = ObjectFormat::from_raw(cursor.read_u32_le()?);
        let class_len = read_len(cursor, self.options.max_class_name_len, "class name")?;
        let class_name = cursor.read_bytes(class_len)?;

        if format == ObjectFormat::Embedded {
            for what in ["topic name", "item name"] {
                let len = read_len(cursor, self.options.max_item_name_len, what)?;
                cursor.skip(len)?;
            }
        } else {
            cursor.skip(PRESENTATION_EXTENT_LEN)?;
        }

        let data_len = read_len(cursor, usize::MAX, "payload")?;
        let start = cursor.position();
        let data = cursor.read_bytes(data_len)?;

        Ok(ObjectSegment {
            object_type: ObjectType::from_class_name(class_name),
            format,
            marker_offset: marker,
            start,
            end: start + data_len,
            data,
        })
    }
}

/// Read a signed 32-bit length and check it against `max`.
fn read_len(cursor: &mut ByteCursor<'_>, max: usize, what: &str) -> Result<usize> {
    let at = cursor.position();
    let raw = cursor.read_i32_le()?;
    let len = usize::try_from(raw).map_err(|_| {
        Error::InvalidHeader(format!("negative {} length {} at offset {}", what, raw, at))
    })?;
    if len > max {
        return Err(Error::InvalidHeader(format!(
            "{} length {} at offset {} exceeds limit {}",
            what, len, at, max
        )));
    }
    Ok(len)
}

impl<'data> Iterator for ContainerWalker<'data> {
    type Item = ObjectSegment<'data>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                WalkState::Scanning => self.scan(),
                WalkState::EmittingSegment { marker } => match self.read_segment(marker) {
                    Ok(segment) => {
                        self.state = WalkState::Scanning;
                        if segment.is_empty() && self.options.skip_empty_payloads {
                            continue;
                        }
                        return Some(segment);
                    },
                    Err(e) => {
                        log::debug!("Malformed object at offset {}: {}", marker, e);
                        self.cursor.seek(marker + 1);
                        self.state = WalkState::Scanning;
                    },
                },
                WalkState::Done => return None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_done() {
            return (0, Some(0));
        }
        // Smallest possible object: marker, format, three lengths, extent
        let min_object = OBJECT_MARKER.len() + 4 + 4 + PRESENTATION_EXTENT_LEN + 4;
        (0, Some(self.cursor.remaining() / min_object + 1))
    }
}

impl FusedIterator for ContainerWalker<'_> {}
