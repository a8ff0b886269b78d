// Raster image extraction from metafile pictures
//
// Scans the records of a WMF stream and rebuilds every bitmap painted by a
// DIB raster record. Vector records are skipped.
//
// References:
// - [MS-WMF] 2.3.1: Bitmap Record Types

use super::constants::record;
use super::parser::{
    MetafileHeader, MetafilePictHeader, MetafileRecord, MetafileRecords, PlaceableHeader,
    locate_records,
};
use crate::FieldOptions;
use crate::common::error::Result;
use crate::images::dib::{DibUsage, RasterImage};
use std::iter::FusedIterator;

/// Offset of the DIB in the parameters of META_DIBBITBLT
const DIB_BIT_BLT_OFFSET: usize = 16;
/// Offset of the DIB in the parameters of META_DIBSTRETCHBLT
const DIB_STRETCH_BLT_OFFSET: usize = 20;
/// Offset of the DIB in the parameters of META_SETDIBTODEV
const SET_DIB_TO_DEV_OFFSET: usize = 18;
/// Offset of the DIB in the parameters of META_STRETCHDIB
const STRETCH_DIB_OFFSET: usize = 22;

/// A decoded metafile picture payload.
///
/// # Examples
///
/// ```
/// use olefield::images::MetafilePicture;
///
/// let picture = MetafilePicture::parse(&[]);
/// assert!(picture.header().is_none());
/// assert_eq!(picture.images().count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MetafilePicture<'data> {
    data: &'data [u8],
    placeable: Option<PlaceableHeader>,
    pict: Option<MetafilePictHeader>,
    header: Option<MetafileHeader>,
    records_offset: usize,
    options: FieldOptions,
}

impl<'data> MetafilePicture<'data> {
    /// Decode the preamble of `data` with default options.
    pub fn parse(data: &'data [u8]) -> Self {
        Self::with_options(data, FieldOptions::default())
    }

    /// Decode the preamble of `data` with explicit options.
    pub fn with_options(data: &'data [u8], options: FieldOptions) -> Self {
        let (placeable, pict, header, records_offset) = locate_records(data);
        Self {
            data,
            placeable,
            pict,
            header,
            records_offset,
            options,
        }
    }

    /// Placeable header, when the payload starts with one.
    #[inline]
    pub fn placeable(&self) -> Option<&PlaceableHeader> {
        self.placeable.as_ref()
    }

    /// METAFILEPICT16 prefix, when the payload carries one.
    #[inline]
    pub fn pict(&self) -> Option<&MetafilePictHeader> {
        self.pict.as_ref()
    }

    /// Standard metafile header, absent for bare record streams.
    #[inline]
    pub fn header(&self) -> Option<&MetafileHeader> {
        self.header.as_ref()
    }

    /// Offset of the first record in the payload.
    #[inline]
    pub fn records_offset(&self) -> usize {
        self.records_offset
    }

    /// All records after the preamble, EOF included.
    pub fn records(&self) -> MetafileRecords<'data> {
        MetafileRecords::new(self.data, self.records_offset)
    }

    /// Bitmaps painted by the raster records, in record order.
    pub fn images(&self) -> RasterImages<'data> {
        RasterImages {
            records: self.records(),
            max_image_bytes: self.options.max_image_bytes,
        }
    }
}

/// Lazy iterator over the bitmaps of a metafile picture.
///
/// Records that fail validation are skipped; a record whose size is
/// inconsistent with the payload ends the sequence, keeping the images
/// produced so far.
#[derive(Debug, Clone)]
pub struct RasterImages<'data> {
    records: MetafileRecords<'data>,
    max_image_bytes: usize,
}

impl<'data> RasterImages<'data> {
    /// Scan `payload` with default options.
    pub fn new(payload: &'data [u8]) -> Self {
        Self::with_options(payload, FieldOptions::default())
    }

    /// Scan `payload` with explicit options.
    pub fn with_options(payload: &'data [u8], options: FieldOptions) -> Self {
        MetafilePicture::with_options(payload, options).images()
    }
}

impl<'data> Iterator for RasterImages<'data> {
    type Item = RasterImage<'data>;

    fn next(&mut self) -> Option<Self::Item> {
        for rec in self.records.by_ref() {
            if !rec.is_raster() {
                continue;
            }
            match extract_raster(&rec, self.max_image_bytes) {
                Ok(Some(image)) => return Some(image),
                Ok(None) => {},
                Err(e) => {
                    log::debug!(
                        "Skipping raster record 0x{:04X} at offset {}: {}",
                        rec.function,
                        rec.offset,
                        e
                    );
                },
            }
        }
        None
    }
}

impl FusedIterator for RasterImages<'_> {}

/// Rebuild the bitmap of a raster record.
///
/// Returns `Ok(None)` for records that are not raster records and for the
/// bitmap-less forms of the BitBlt records.
///
/// META_SETDIBTODEV may carry only `ScanCount` (word 1) of the bitmap's
/// scan lines. Such a partial bitmap cannot stand alone as a .bmp file, so
/// a record with fewer scan lines than the declared height is rejected.
pub fn extract_raster<'data>(
    rec: &MetafileRecord<'data>,
    max_image_bytes: usize,
) -> Result<Option<RasterImage<'data>>> {
    let (offset, usage) = match rec.function {
        record::DIB_BIT_BLT | record::DIB_STRETCH_BLT => {
            if rec.size == u32::from(rec.function >> 8) + 3 {
                log::debug!(
                    "Raster record 0x{:04X} at offset {} carries no bitmap (rop 0x{:08X})",
                    rec.function,
                    rec.offset,
                    rec.dword_at(0).unwrap_or_default()
                );
                return Ok(None);
            }
            let offset = if rec.function == record::DIB_BIT_BLT {
                DIB_BIT_BLT_OFFSET
            } else {
                DIB_STRETCH_BLT_OFFSET
            };
            (offset, DibUsage::RgbColors)
        },
        record::SET_DIB_TO_DEV => (SET_DIB_TO_DEV_OFFSET, color_usage(rec, 0)),
        // ColorUsage follows the raster operation
        record::STRETCH_DIB => (STRETCH_DIB_OFFSET, color_usage(rec, 2)),
        _ => return Ok(None),
    };

    let dib = rec.params_from(offset).unwrap_or_default();
    RasterImage::from_dib(dib, usage, max_image_bytes).map(Some)
}

fn color_usage(rec: &MetafileRecord<'_>, word: usize) -> DibUsage {
    DibUsage::from_raw(rec.word(word).unwrap_or_default())
}
