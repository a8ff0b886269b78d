// WMF stream parser
//
// Decodes the optional preambles of a metafile picture and iterates over its
// records without materializing them.

use super::constants::{
    META_HEADER_SIZE, META_HEADER_WORDS, META_VERSION_100, META_VERSION_300,
    METAFILEPICT_PREFIX_SIZE, MIN_RECORD_WORDS, PLACEABLE_HEADER_SIZE, PLACEABLE_KEY,
    RECORD_HEADER_SIZE, record,
};
use crate::common::binary::{ByteCursor, read_u16_le, read_u32_le};
use crate::common::error::{Error, Result};
use std::iter::FusedIterator;

/// WMF file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WmfFileType {
    /// Memory metafile
    Memory = 1,
    /// Disk metafile
    Disk = 2,
}

/// Placeable Metafile Header
///
/// Optional preamble carrying a bounding box and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceableHeader {
    /// Key (0x9AC6CDD7)
    pub key: u32,
    /// Left coordinate
    pub left: i16,
    /// Top coordinate
    pub top: i16,
    /// Right coordinate
    pub right: i16,
    /// Bottom coordinate
    pub bottom: i16,
    /// Units per inch
    pub inch: u16,
    /// Checksum over the preceding ten words
    pub checksum: u16,
    computed_checksum: u16,
}

impl PlaceableHeader {
    /// Check if data starts with a placeable header key
    pub fn is_placeable(data: &[u8]) -> bool {
        read_u32_le(data, 0).is_ok_and(|key| key == PLACEABLE_KEY)
    }

    /// Parse placeable header from data
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let words = cursor.read_bytes(PLACEABLE_HEADER_SIZE)?;
        let mut cursor = ByteCursor::new(words);

        let key = cursor.read_u32_le()?;
        if key != PLACEABLE_KEY {
            return Err(Error::InvalidSignature(format!(
                "WMF placeable key 0x{:08X}",
                key
            )));
        }

        let _handle = cursor.read_u16_le()?;
        let left = cursor.read_i16_le()?;
        let top = cursor.read_i16_le()?;
        let right = cursor.read_i16_le()?;
        let bottom = cursor.read_i16_le()?;
        let inch = cursor.read_u16_le()?;
        let _reserved = cursor.read_u32_le()?;
        let checksum = cursor.read_u16_le()?;

        let computed_checksum = words[..20]
            .chunks_exact(2)
            .fold(0u16, |acc, w| acc ^ u16::from_le_bytes([w[0], w[1]]));

        Ok(Self {
            key,
            left,
            top,
            right,
            bottom,
            inch,
            checksum,
            computed_checksum,
        })
    }

    /// Get width in logical units
    pub fn width(&self) -> i32 {
        i32::from(self.right) - i32::from(self.left)
    }

    /// Get height in logical units
    pub fn height(&self) -> i32 {
        i32::from(self.bottom) - i32::from(self.top)
    }

    /// Whether the stored checksum matches the header words.
    pub fn checksum_valid(&self) -> bool {
        self.checksum == self.computed_checksum
    }
}

/// METAFILEPICT16 prefix stored ahead of metafiles in OLE presentation data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetafilePictHeader {
    /// Mapping mode
    pub mapping_mode: i16,
    /// Horizontal extent
    pub x_ext: i16,
    /// Vertical extent
    pub y_ext: i16,
    /// Metafile handle (meaningless once serialized)
    pub handle: u16,
}

impl MetafilePictHeader {
    /// Parse the 8-byte prefix at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        Ok(Self {
            mapping_mode: cursor.read_i16_le()?,
            x_ext: cursor.read_i16_le()?,
            y_ext: cursor.read_i16_le()?,
            handle: cursor.read_u16_le()?,
        })
    }
}

/// WMF standard header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetafileHeader {
    /// File type (1 = memory, 2 = disk)
    pub file_type: WmfFileType,
    /// Header size in words (always 9)
    pub header_size: u16,
    /// Windows version
    pub version: u16,
    /// Size of file in words
    pub file_size: u32,
    /// Number of objects
    pub num_objects: u16,
    /// Size of largest record in words
    pub max_record: u32,
    /// Not used (always 0)
    pub num_params: u16,
}

impl MetafileHeader {
    /// Check whether a plausible standard header starts at `offset`.
    pub fn is_header_at(data: &[u8], offset: usize) -> bool {
        data.get(offset..).is_some_and(|rest| Self::parse(rest).is_ok())
    }

    /// Parse WMF standard header
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);
        let file_type = match cursor.read_u16_le()? {
            1 => WmfFileType::Memory,
            2 => WmfFileType::Disk,
            other => {
                return Err(Error::InvalidHeader(format!("WMF file type {}", other)));
            },
        };

        let header_size = cursor.read_u16_le()?;
        if header_size != META_HEADER_WORDS {
            return Err(Error::InvalidHeader(format!(
                "WMF header size {} words",
                header_size
            )));
        }

        let version = cursor.read_u16_le()?;
        if version != META_VERSION_100 && version != META_VERSION_300 {
            return Err(Error::Unsupported(format!("WMF version 0x{:04X}", version)));
        }

        Ok(Self {
            file_type,
            header_size,
            version,
            file_size: cursor.read_u32_le()?,
            num_objects: cursor.read_u16_le()?,
            max_record: cursor.read_u32_le()?,
            num_params: cursor.read_u16_le()?,
        })
    }
}

/// WMF record
///
/// Borrows its parameters from the metafile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetafileRecord<'data> {
    /// Offset of the record in the scanned buffer
    pub offset: usize,
    /// Record size in words (including size and function)
    pub size: u32,
    /// Record function
    pub function: u16,
    /// Record parameters
    pub params: &'data [u8],
}

impl<'data> MetafileRecord<'data> {
    /// Check if this is an EOF record
    pub const fn is_eof(&self) -> bool {
        self.function == record::EOF
    }

    /// Check if this record paints a device-independent bitmap
    pub const fn is_raster(&self) -> bool {
        matches!(
            self.function,
            record::DIB_BIT_BLT
                | record::DIB_STRETCH_BLT
                | record::SET_DIB_TO_DEV
                | record::STRETCH_DIB
        )
    }

    /// Parameters as the ordered sequence of 16-bit words.
    pub fn words(&self) -> impl Iterator<Item = u16> + use<'data> {
        self.params
            .chunks_exact(2)
            .map(|w| u16::from_le_bytes([w[0], w[1]]))
    }

    /// The `index`-th 16-bit parameter.
    pub fn word(&self, index: usize) -> Option<u16> {
        read_u16_le(self.params, index.checked_mul(2)?).ok()
    }

    /// The 32-bit parameter at byte `offset`.
    pub fn dword_at(&self, offset: usize) -> Option<u32> {
        read_u32_le(self.params, offset).ok()
    }

    /// Parameter bytes starting at `offset`.
    pub fn params_from(&self, offset: usize) -> Option<&'data [u8]> {
        self.params.get(offset..)
    }
}

/// Lazy iterator over the records of a metafile.
///
/// Stops at the EOF record (which is yielded), at a record whose declared
/// size is inconsistent with the remaining bytes, or at the end of input.
#[derive(Debug, Clone)]
pub struct MetafileRecords<'data> {
    cursor: ByteCursor<'data>,
    done: bool,
}

impl<'data> MetafileRecords<'data> {
    /// Iterate over the records in `data` starting at `offset`.
    pub fn new(data: &'data [u8], offset: usize) -> Self {
        Self {
            cursor: ByteCursor::at(data, offset),
            done: false,
        }
    }

    /// Current offset in the buffer.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn read_record(&mut self) -> Result<MetafileRecord<'data>> {
        let offset = self.cursor.position();
        let size = self.cursor.peek_u32_le()?;
        let function = read_u16_le(self.cursor.rest(), 4)?;

        let size_bytes = (size as usize).checked_mul(2).unwrap_or(usize::MAX);
        if size < MIN_RECORD_WORDS || size_bytes > self.cursor.remaining() {
            return Err(Error::InvalidRecord(format!(
                "WMF record 0x{:04X} at offset {} declares {} words, {} bytes left",
                function,
                offset,
                size,
                self.cursor.remaining()
            )));
        }

        self.cursor.skip(RECORD_HEADER_SIZE)?;
        let params = self.cursor.read_bytes(size_bytes - RECORD_HEADER_SIZE)?;

        Ok(MetafileRecord {
            offset,
            size,
            function,
            params,
        })
    }
}

impl<'data> Iterator for MetafileRecords<'data> {
    type Item = MetafileRecord<'data>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.cursor.remaining() < RECORD_HEADER_SIZE {
            if !self.cursor.is_empty() {
                log::debug!(
                    "{} trailing bytes after the last WMF record",
                    self.cursor.remaining()
                );
            }
            self.done = true;
            return None;
        }

        match self.read_record() {
            Ok(record) => {
                if record.is_eof() {
                    self.done = true;
                }
                Some(record)
            },
            Err(e) => {
                log::debug!("Stopping WMF record scan: {}", e);
                self.done = true;
                None
            },
        }
    }
}

impl FusedIterator for MetafileRecords<'_> {}

/// Locate the record stream of a metafile picture payload.
///
/// Returns the decoded preambles and the offset of the first record.
pub(crate) fn locate_records(
    data: &[u8],
) -> (
    Option<PlaceableHeader>,
    Option<MetafilePictHeader>,
    Option<MetafileHeader>,
    usize,
) {
    let mut offset = 0;

    let placeable = if PlaceableHeader::is_placeable(data) {
        offset = PLACEABLE_HEADER_SIZE.min(data.len());
        match PlaceableHeader::parse(data) {
            Ok(header) => {
                if !header.checksum_valid() {
                    log::debug!("WMF placeable header checksum mismatch");
                }
                Some(header)
            },
            Err(e) => {
                log::debug!("Truncated WMF placeable header: {}", e);
                None
            },
        }
    } else {
        None
    };

    let pict = if placeable.is_none()
        && !MetafileHeader::is_header_at(data, 0)
        && MetafileHeader::is_header_at(data, METAFILEPICT_PREFIX_SIZE)
    {
        offset = METAFILEPICT_PREFIX_SIZE;
        MetafilePictHeader::parse(data).ok()
    } else {
        None
    };

    let header = match data.get(offset..).map(MetafileHeader::parse) {
        Some(Ok(header)) => {
            offset += META_HEADER_SIZE;
            Some(header)
        },
        _ => {
            log::debug!("No standard WMF header at offset {}, reading bare records", offset);
            None
        },
    };

    (placeable, pict, header, offset)
}
