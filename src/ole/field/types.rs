//! Object kinds and segments produced by the container walk.

use crate::ole::consts::{
    CLASS_BITMAP, CLASS_DIB, CLASS_METAFILEPICT, CLASS_PACKAGE, FORMAT_EMBEDDED, FORMAT_LINKED,
    FORMAT_PRESENTATION, FORMAT_STATIC,
};
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::ops::Range;

/// Kind of payload carried by an object segment.
///
/// Derived from the OLE 1.0 class name. Class names without a dedicated
/// variant surface as [`ObjectType::Unknown`] with the raw bytes, so new
/// handlers can be added without touching the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType<'data> {
    /// `METAFILEPICT`: a Windows metafile picture
    MetafilePicture,
    /// `DIB`: a device-independent bitmap
    Dib,
    /// `BITMAP`: a device-dependent bitmap
    Bitmap,
    /// `Package`: a packager shell object wrapping a file
    Package,
    /// Any other class name, NUL padding removed
    Unknown(&'data [u8]),
}

impl<'data> ObjectType<'data> {
    /// Classify a raw class name as read from the object stream.
    ///
    /// Trailing NUL bytes are ignored; matching is ASCII case-insensitive.
    pub fn from_class_name(raw: &'data [u8]) -> Self {
        let name = trim_nul(raw);
        if name.eq_ignore_ascii_case(CLASS_METAFILEPICT) {
            Self::MetafilePicture
        } else if name.eq_ignore_ascii_case(CLASS_DIB) {
            Self::Dib
        } else if name.eq_ignore_ascii_case(CLASS_BITMAP) {
            Self::Bitmap
        } else if name.eq_ignore_ascii_case(CLASS_PACKAGE) {
            Self::Package
        } else {
            Self::Unknown(name)
        }
    }

    /// Class name as text.
    pub fn class_name(&self) -> Cow<'data, str> {
        match self {
            Self::MetafilePicture => Cow::Borrowed("METAFILEPICT"),
            Self::Dib => Cow::Borrowed("DIB"),
            Self::Bitmap => Cow::Borrowed("BITMAP"),
            Self::Package => Cow::Borrowed("Package"),
            Self::Unknown(raw) => decode_ansi(*raw),
        }
    }

    /// Whether the payload is a metafile picture.
    #[inline]
    pub const fn is_metafile_picture(&self) -> bool {
        matches!(self, Self::MetafilePicture)
    }

    /// Whether the class name had no dedicated variant.
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// OLE 1.0 format identifier following the version marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectFormat {
    Linked,
    Embedded,
    Static,
    Presentation,
    Other(u32),
}

impl ObjectFormat {
    /// Map a raw format id.
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            FORMAT_LINKED => Self::Linked,
            FORMAT_EMBEDDED => Self::Embedded,
            FORMAT_STATIC => Self::Static,
            FORMAT_PRESENTATION => Self::Presentation,
            other => Self::Other(other),
        }
    }

    /// Raw format id.
    pub const fn raw(&self) -> u32 {
        match self {
            Self::Linked => FORMAT_LINKED,
            Self::Embedded => FORMAT_EMBEDDED,
            Self::Static => FORMAT_STATIC,
            Self::Presentation => FORMAT_PRESENTATION,
            Self::Other(other) => *other,
        }
    }
}

/// One typed payload found in an OLE field.
///
/// `data` is a view into the original blob; `range()` gives its offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSegment<'data> {
    /// Kind of object
    pub object_type: ObjectType<'data>,
    /// OLE 1.0 format of the object stream
    pub format: ObjectFormat,
    /// Offset of the version marker that introduced this segment
    pub marker_offset: usize,
    /// Payload start offset in the blob
    pub start: usize,
    /// Payload end offset in the blob (exclusive)
    pub end: usize,
    /// Payload bytes, `blob[start..end]`
    pub data: &'data [u8],
}

impl<'data> ObjectSegment<'data> {
    /// Payload offsets in the blob.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Payload length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Strip trailing NUL padding.
pub(crate) fn trim_nul(raw: &[u8]) -> &[u8] {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &raw[..end]
}

/// Decode an ANSI (Windows-1252) name, dropping NUL padding.
pub(crate) fn decode_ansi(raw: &[u8]) -> Cow<'_, str> {
    WINDOWS_1252.decode_without_bom_handling(trim_nul(raw)).0
}
