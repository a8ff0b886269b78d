//! Access OLE field header.
//!
//! ```text
//! u16 signature (0x1C15)  u16 header_size  u32 object_type
//! u16 friendly_len  u16 class_len  u16 friendly_off  u16 class_off
//! ... names, addressed by offset from the start of the field ...
//! ```
//!
//! The object streams start at `header_size`.

use super::types::decode_ansi;
use crate::common::binary::{ByteCursor, read_u16_le};
use crate::common::error::{Error, Result};
use crate::ole::consts::{FIELD_HEADER_FIXED_SIZE, FIELD_SIGNATURE};

/// Decoded Access OLE field header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OleFieldHeader {
    /// Size of the header, i.e. offset of the first object stream
    pub header_size: u16,
    /// Object type code as stored by the database
    pub object_type: u32,
    /// User-facing name of the object, e.g. "Paintbrush Picture"
    pub friendly_name: String,
    /// OLE class name, e.g. "PBrush"
    pub class_name: String,
}

impl OleFieldHeader {
    /// Check whether `data` starts with the field signature.
    pub fn is_field_header(data: &[u8]) -> bool {
        read_u16_le(data, 0).is_ok_and(|sig| sig == FIELD_SIGNATURE)
    }

    /// Parse the header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let signature = cursor.read_u16_le()?;
        if signature != FIELD_SIGNATURE {
            return Err(Error::InvalidSignature(format!(
                "OLE field signature 0x{:04X}",
                signature
            )));
        }

        let header_size = cursor.read_u16_le()?;
        let object_type = cursor.read_u32_le()?;
        let friendly_len = cursor.read_u16_le()?;
        let class_len = cursor.read_u16_le()?;
        let friendly_off = cursor.read_u16_le()?;
        let class_off = cursor.read_u16_le()?;

        if (header_size as usize) < FIELD_HEADER_FIXED_SIZE {
            return Err(Error::InvalidHeader(format!(
                "OLE field header size {} below fixed part",
                header_size
            )));
        }
        if header_size as usize > data.len() {
            return Err(Error::Exhausted {
                requested: header_size as usize,
                available: data.len(),
            });
        }

        let header = &data[..header_size as usize];
        let friendly_name = name_at(header, friendly_off, friendly_len, "friendly")?;
        let class_name = name_at(header, class_off, class_len, "class")?;

        Ok(Self {
            header_size,
            object_type,
            friendly_name,
            class_name,
        })
    }
}

fn name_at(header: &[u8], offset: u16, len: u16, what: &str) -> Result<String> {
    let start = offset as usize;
    let end = start + len as usize;
    let raw = header.get(start..end).ok_or_else(|| {
        Error::InvalidHeader(format!(
            "{} name [{}, {}) outside header of {} bytes",
            what,
            start,
            end,
            header.len()
        ))
    })?;
    Ok(decode_ansi(raw).into_owned())
}
