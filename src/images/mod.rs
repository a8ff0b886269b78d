//! Bitmap extraction from metafile pictures.
//!
//! OLE presentation data of type `METAFILEPICT` is a Windows Metafile whose
//! pictures are usually a single DIB raster record. [`parse_metafile`] scans
//! such a payload and yields every bitmap it paints, ready to be written out
//! as a `.bmp` file.
//!
//! # Architecture
//!
//! - `dib`: bitmap info header validation and `.bmp` assembly
//! - `wmf`: metafile preambles, record iteration and raster extraction
//! - `convert`: re-encoding through the `image` crate (feature `imgconv`)
//!
//! # Example
//!
//! ```no_run
//! use olefield::images::parse_metafile;
//!
//! let payload = std::fs::read("picture.wmf")?;
//! for (i, image) in parse_metafile(&payload).enumerate() {
//!     println!("{}x{} at {} bpp", image.width(), image.height(), image.bit_count());
//!     std::fs::write(format!("image_{}.bmp", i), image.to_bmp())?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(feature = "imgconv")]
pub mod convert;
pub mod dib;
pub mod wmf;

pub use dib::{BitmapFileHeader, BitmapInfoHeader, DibUsage, RasterImage};
pub use wmf::{MetafilePicture, RasterImages};

/// Extract the bitmaps embedded in a metafile picture payload.
///
/// Never fails: undecodable records are skipped and a malformed record
/// stream simply ends the sequence.
pub fn parse_metafile(payload: &[u8]) -> RasterImages<'_> {
    RasterImages::new(payload)
}
