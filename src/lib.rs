//! olefield - A Rust library for parsing Microsoft Access OLE Object fields
//!
//! Access stores embedded objects in "OLE Object" columns as a small field
//! header followed by one or more OLE 1.0 object streams. Pictures usually
//! come as a `METAFILEPICT` presentation stream: a Windows Metafile wrapping
//! a device-independent bitmap.
//!
//! # Features
//!
//! - **Resynchronizing walk**: Damaged or unknown bytes are skipped, never fatal
//! - **Bitmap recovery**: DIB raster records are rebuilt into `.bmp` files
//! - **Zero-copy parsing**: Segments and images borrow from the input blob
//! - **Image conversion**: Re-encode bitmaps as PNG and others (feature `imgconv`)
//!
//! # Example - Extracting pictures
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let blob = std::fs::read("photo.olefield")?;
//!
//! for (i, image) in olefield::extract_images(&blob).enumerate() {
//!     std::fs::write(format!("photo_{}.bmp", i), image.to_bmp())?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Walking the object segments
//!
//! ```no_run
//! use olefield::{parse_container, parse_metafile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let blob = std::fs::read("photo.olefield")?;
//!
//! for segment in parse_container(&blob) {
//!     println!("{} ({} bytes)", segment.object_type.class_name(), segment.len());
//!     if segment.object_type.is_metafile_picture() {
//!         println!("  {} images", parse_metafile(segment.data).count());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

/// Shared decoding primitives and the crate error type
pub mod common;

/// Walk and extraction options
pub mod config;

/// Bitmap extraction from Windows Metafile pictures
pub mod images;

/// Access OLE field container and OLE 1.0 object streams
pub mod ole;

#[cfg(test)]
pub(crate) mod fixtures;

pub use common::{Error, Result};
pub use config::FieldOptions;
pub use images::{RasterImage, RasterImages, parse_metafile};
pub use ole::{ContainerWalker, ObjectSegment, ObjectType, OleField, parse_container};

/// Extract every bitmap painted by the metafile pictures of an OLE field.
///
/// Equivalent to walking the field, keeping the `METAFILEPICT` segments and
/// flattening their images. Never fails.
pub fn extract_images(blob: &[u8]) -> impl Iterator<Item = RasterImage<'_>> {
    OleField::parse(blob).images()
}
