//! Access OLE field container.
//!
//! # Example
//!
//! ```no_run
//! use olefield::ole::OleField;
//!
//! let blob: Vec<u8> = std::fs::read("photo.olefield")?;
//! let field = OleField::parse(&blob);
//! if let Some(header) = field.header() {
//!     println!("{} ({})", header.friendly_name, header.class_name);
//! }
//! for segment in field.segments() {
//!     println!("{} at {:?}", segment.object_type.class_name(), segment.range());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod header;
mod types;
mod walker;

pub use header::OleFieldHeader;
pub use types::{ObjectFormat, ObjectSegment, ObjectType};
pub use walker::ContainerWalker;

use crate::FieldOptions;
use crate::images::{RasterImage, RasterImages};

/// An OLE field blob with its optional header decoded.
#[derive(Debug, Clone)]
pub struct OleField<'data> {
    data: &'data [u8],
    header: Option<OleFieldHeader>,
    options: FieldOptions,
}

impl<'data> OleField<'data> {
    /// Parse a field with default options.
    ///
    /// Never fails: a missing or damaged header only means the object walk
    /// starts at the first byte instead of after the header.
    pub fn parse(data: &'data [u8]) -> Self {
        Self::with_options(data, FieldOptions::default())
    }

    /// Parse a field with explicit options.
    pub fn with_options(data: &'data [u8], options: FieldOptions) -> Self {
        let header = if OleFieldHeader::is_field_header(data) {
            match OleFieldHeader::parse(data) {
                Ok(header) => Some(header),
                Err(e) => {
                    log::warn!("Ignoring damaged OLE field header: {}", e);
                    None
                },
            }
        } else {
            log::debug!("No OLE field header, walking from the first byte");
            None
        };

        Self {
            data,
            header,
            options,
        }
    }

    /// The decoded field header, when present and valid.
    #[inline]
    pub fn header(&self) -> Option<&OleFieldHeader> {
        self.header.as_ref()
    }

    /// The raw field bytes.
    #[inline]
    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    /// Walk the object segments. Each call starts a fresh walk.
    pub fn segments(&self) -> ContainerWalker<'data> {
        let start = self.header.as_ref().map_or(0, |h| h.header_size as usize);
        ContainerWalker::with_options(self.data, start, self.options.clone())
    }

    /// Extract the bitmaps of every metafile picture in the field.
    pub fn images(&self) -> impl Iterator<Item = RasterImage<'data>> + use<'data> {
        let options = self.options.clone();
        self.segments()
            .filter(|segment| segment.object_type.is_metafile_picture())
            .flat_map(move |segment| RasterImages::with_options(segment.data, options.clone()))
    }
}

/// Walk the object segments of an OLE field blob from its first byte.
///
/// Malformed objects are skipped and never reported as errors; an empty or
/// unrecognizable blob yields an empty sequence.
pub fn parse_container(blob: &[u8]) -> ContainerWalker<'_> {
    ContainerWalker::new(blob)
}
