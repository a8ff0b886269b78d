// Device-independent bitmap (DIB) validation and BMP file assembly
//
// A DIB as embedded in metafile records is a BITMAPINFOHEADER (or one of its
// larger successors), an optional color table and the pixel array, back to
// back. Prepending a 14-byte BITMAPFILEHEADER turns it into a .bmp file.
//
// References:
// - [MS-WMF] 2.2.2.9: DeviceIndependentBitmap Object
// - [MS-WMF] 2.2.2.3: BitmapInfoHeader Object

use crate::common::binary::ByteCursor;
use crate::common::error::{Error, Result};
use zerocopy::{IntoBytes, LE, U16, U32};
use zerocopy_derive::{
    FromBytes as DeriveFromBytes, Immutable, IntoBytes as DeriveIntoBytes, KnownLayout, Unaligned,
};

/// Size of the BITMAPFILEHEADER prepended to build a .bmp file
pub const BITMAP_FILE_HEADER_SIZE: usize = 14;

/// Size of a BITMAPINFOHEADER
pub const BITMAP_INFO_HEADER_SIZE: u32 = 40;

/// Header sizes accepted: BITMAPINFOHEADER, the two Adobe extensions,
/// BITMAPV4HEADER and BITMAPV5HEADER
const SUPPORTED_HEADER_SIZES: [u32; 5] = [40, 52, 56, 108, 124];

/// Bitmap compression types
pub mod compression {
    pub const BI_RGB: u32 = 0;
    pub const BI_RLE8: u32 = 1;
    pub const BI_RLE4: u32 = 2;
    pub const BI_BITFIELDS: u32 = 3;
    pub const BI_JPEG: u32 = 4;
    pub const BI_PNG: u32 = 5;
    pub const BI_ALPHABITFIELDS: u32 = 6;
}

/// DIB color table usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DibUsage {
    /// Color table holds RGBQUAD entries
    RgbColors,
    /// Color table holds 16-bit indices into the current logical palette
    PalIndices,
}

impl DibUsage {
    /// Map the ColorUsage field of a metafile record.
    pub const fn from_raw(raw: u16) -> Self {
        if raw == 1 {
            Self::PalIndices
        } else {
            Self::RgbColors
        }
    }
}

/// Decoded BITMAPINFOHEADER fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub header_size: u32,
    pub width: i32,
    /// Positive for bottom-up rows, negative for top-down
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl BitmapInfoHeader {
    /// Parse the header at the start of a DIB.
    pub fn parse(dib: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(dib);
        let header_size = cursor.read_u32_le()?;
        if !SUPPORTED_HEADER_SIZES.contains(&header_size) {
            return Err(Error::Unsupported(format!(
                "bitmap header size {}",
                header_size
            )));
        }

        let header = Self {
            header_size,
            width: cursor.read_i32_le()?,
            height: cursor.read_i32_le()?,
            planes: cursor.read_u16_le()?,
            bit_count: cursor.read_u16_le()?,
            compression: cursor.read_u32_le()?,
            image_size: cursor.read_u32_le()?,
            x_pels_per_meter: cursor.read_i32_le()?,
            y_pels_per_meter: cursor.read_i32_le()?,
            colors_used: cursor.read_u32_le()?,
            colors_important: cursor.read_u32_le()?,
        };

        if header.width <= 0 || header.height == 0 {
            return Err(Error::InvalidBitmap(format!(
                "dimensions {}x{}",
                header.width, header.height
            )));
        }

        let encoded = matches!(
            header.compression,
            compression::BI_JPEG | compression::BI_PNG
        );
        match header.bit_count {
            1 | 4 | 8 | 16 | 24 | 32 => {},
            0 if encoded => {},
            other => {
                return Err(Error::InvalidBitmap(format!("bit count {}", other)));
            },
        }

        Ok(header)
    }

    /// Whether rows are stored bottom-to-top.
    #[inline]
    pub const fn is_bottom_up(&self) -> bool {
        self.height > 0
    }

    /// Whether the pixel array is stored uncompressed.
    #[inline]
    pub const fn is_uncompressed(&self) -> bool {
        matches!(
            self.compression,
            compression::BI_RGB | compression::BI_BITFIELDS | compression::BI_ALPHABITFIELDS
        )
    }

    /// Number of color table entries.
    pub fn color_count(&self) -> Result<usize> {
        let implied = if (1..=8).contains(&self.bit_count) {
            1usize << self.bit_count
        } else {
            0
        };

        if self.colors_used == 0 {
            return Ok(implied);
        }
        let used = self.colors_used as usize;
        if implied != 0 && used > implied {
            return Err(Error::InvalidBitmap(format!(
                "{} colors declared for {} bits per pixel",
                used, self.bit_count
            )));
        }
        Ok(used)
    }

    /// Bytes of channel masks stored between the header and the color table.
    pub const fn mask_len(&self) -> usize {
        if self.header_size != BITMAP_INFO_HEADER_SIZE {
            return 0;
        }
        match self.compression {
            compression::BI_BITFIELDS => 12,
            compression::BI_ALPHABITFIELDS => 16,
            _ => 0,
        }
    }

    /// Byte length of one pixel row, padded to a 4-byte boundary.
    pub fn stride(&self) -> Result<usize> {
        let bits = u64::from(self.width.unsigned_abs()) * u64::from(self.bit_count);
        let stride = bits.div_ceil(32) * 4;
        usize::try_from(stride)
            .map_err(|_| Error::InvalidBitmap(format!("row of {} bits", bits)))
    }

    /// Byte length of the pixel array implied by the header.
    pub fn pixel_array_len(&self) -> Result<usize> {
        if !self.is_uncompressed() {
            if self.image_size == 0 {
                return Err(Error::InvalidBitmap(
                    "compressed bitmap without image size".into(),
                ));
            }
            return Ok(self.image_size as usize);
        }

        self.stride()?
            .checked_mul(self.height.unsigned_abs() as usize)
            .ok_or_else(|| {
                Error::InvalidBitmap(format!(
                    "pixel array of {}x{} overflows",
                    self.width, self.height
                ))
            })
    }
}

/// BITMAPFILEHEADER
#[repr(C)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    DeriveFromBytes,
    DeriveIntoBytes,
    Immutable,
    KnownLayout,
    Unaligned,
)]
pub struct BitmapFileHeader {
    /// Always `BM`
    pub magic: [u8; 2],
    /// Size of the whole .bmp file
    pub file_size: U32<LE>,
    pub reserved1: U16<LE>,
    pub reserved2: U16<LE>,
    /// Offset of the pixel array from the start of the file
    pub pixel_offset: U32<LE>,
}

/// A bitmap recovered from a metafile record.
///
/// Borrows the header, color table and pixel bytes from the payload; nothing
/// is decoded or copied until [`RasterImage::to_bmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterImage<'data> {
    info: BitmapInfoHeader,
    header: &'data [u8],
    color_table: &'data [u8],
    pixels: &'data [u8],
}

impl<'data> RasterImage<'data> {
    /// Validate a DIB and split it into header, color table and pixels.
    ///
    /// Bytes after the pixel array (record padding) are ignored.
    pub fn from_dib(dib: &'data [u8], usage: DibUsage, max_pixel_bytes: usize) -> Result<Self> {
        let info = BitmapInfoHeader::parse(dib)?;

        let colors = info.color_count()?;
        if colors > 0 && usage == DibUsage::PalIndices {
            return Err(Error::Unsupported(
                "color table of palette indices cannot stand alone".into(),
            ));
        }

        let header_len = info.header_size as usize;
        let table_len = info.mask_len() + colors * 4;
        let pixel_len = info.pixel_array_len()?;
        if pixel_len > max_pixel_bytes {
            return Err(Error::InvalidBitmap(format!(
                "pixel array of {} bytes exceeds limit {}",
                pixel_len, max_pixel_bytes
            )));
        }

        bmp_file_len(header_len, table_len, pixel_len)?;

        let mut cursor = ByteCursor::new(dib);
        let header = cursor.read_bytes(header_len)?;
        let color_table = cursor.read_bytes(table_len)?;
        let pixels = cursor.read_bytes(pixel_len).map_err(|_| {
            Error::InvalidBitmap(format!(
                "{}x{}x{} needs {} pixel bytes, record holds {}",
                info.width,
                info.height,
                info.bit_count,
                pixel_len,
                dib.len().saturating_sub(header_len + table_len)
            ))
        })?;

        Ok(Self {
            info,
            header,
            color_table,
            pixels,
        })
    }

    /// Decoded header fields.
    #[inline]
    pub const fn info(&self) -> &BitmapInfoHeader {
        &self.info
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.info.width as u32
    }

    /// Height in rows, regardless of row order.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.info.height.unsigned_abs()
    }

    #[inline]
    pub const fn bit_count(&self) -> u16 {
        self.info.bit_count
    }

    #[inline]
    pub const fn compression(&self) -> u32 {
        self.info.compression
    }

    /// The bitmap info header exactly as stored.
    #[inline]
    pub const fn header_bytes(&self) -> &'data [u8] {
        self.header
    }

    /// Channel masks and color table, exactly as stored.
    #[inline]
    pub const fn color_table(&self) -> &'data [u8] {
        self.color_table
    }

    /// The pixel array, rows padded to 4 bytes.
    #[inline]
    pub const fn pixels(&self) -> &'data [u8] {
        self.pixels
    }

    /// Offset of the pixel array from the start of the DIB.
    #[inline]
    pub const fn pixel_data_offset(&self) -> usize {
        self.header.len() + self.color_table.len()
    }

    /// Length of header, color table and pixels together.
    #[inline]
    pub const fn dib_len(&self) -> usize {
        self.pixel_data_offset() + self.pixels.len()
    }

    /// Size of the .bmp file produced by [`RasterImage::to_bmp`].
    #[inline]
    pub const fn bmp_file_size(&self) -> usize {
        BITMAP_FILE_HEADER_SIZE + self.dib_len()
    }

    /// The BITMAPFILEHEADER for this image.
    pub fn file_header(&self) -> BitmapFileHeader {
        // from_dib rejects files whose size does not fit in 32 bits
        let file_size = u32::try_from(self.bmp_file_size()).unwrap_or(u32::MAX);
        let pixel_offset =
            u32::try_from(BITMAP_FILE_HEADER_SIZE + self.pixel_data_offset()).unwrap_or(u32::MAX);
        BitmapFileHeader {
            magic: *b"BM",
            file_size: U32::new(file_size),
            reserved1: U16::ZERO,
            reserved2: U16::ZERO,
            pixel_offset: U32::new(pixel_offset),
        }
    }

    /// Assemble a standalone .bmp file.
    pub fn to_bmp(&self) -> Vec<u8> {
        let mut bmp = Vec::with_capacity(self.bmp_file_size());
        bmp.extend_from_slice(self.file_header().as_bytes());
        bmp.extend_from_slice(self.header);
        bmp.extend_from_slice(self.color_table);
        bmp.extend_from_slice(self.pixels);
        bmp
    }
}

/// Size of the .bmp file holding the given parts, which must fit the
/// 32-bit size field of the file header.
fn bmp_file_len(header_len: usize, table_len: usize, pixel_len: usize) -> Result<u32> {
    BITMAP_FILE_HEADER_SIZE
        .checked_add(header_len)
        .and_then(|len| len.checked_add(table_len))
        .and_then(|len| len.checked_add(pixel_len))
        .and_then(|len| u32::try_from(len).ok())
        .ok_or_else(|| {
            Error::InvalidBitmap(format!(
                "bitmap of {} pixel bytes does not fit a .bmp file",
                pixel_len
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_24bit_layout() {
        let dib = fixtures::dib(3, 2, 24, 0);
        let image = RasterImage::from_dib(&dib, DibUsage::RgbColors, usize::MAX).unwrap();
        assert_eq!((image.width(), image.height(), image.bit_count()), (3, 2, 24));
        assert_eq!(image.header_bytes().len(), 40);
        assert!(image.color_table().is_empty());
        // 9 bytes per row padded to 12
        assert_eq!(image.pixels().len(), 12 * 2);
        assert_eq!(image.dib_len(), dib.len());
        assert!(image.info().is_bottom_up());
    }

    #[test]
    fn test_8bit_palette() {
        let dib = fixtures::dib(5, 3, 8, 16);
        let image = RasterImage::from_dib(&dib, DibUsage::RgbColors, usize::MAX).unwrap();
        assert_eq!(image.color_table().len(), 16 * 4);
        assert_eq!(image.pixels().len(), 8 * 3);
        assert_eq!(image.pixel_data_offset(), 40 + 64);
    }

    #[test]
    fn test_implied_palette_size() {
        let dib = fixtures::dib(8, 1, 1, 0);
        let image = RasterImage::from_dib(&dib, DibUsage::RgbColors, usize::MAX).unwrap();
        assert_eq!(image.color_table().len(), 2 * 4);
        assert_eq!(image.pixels().len(), 4);
    }

    #[test]
    fn test_bitfields_masks() {
        let mut dib = fixtures::dib(2, 2, 16, 0);
        dib[16..20].copy_from_slice(&compression::BI_BITFIELDS.to_le_bytes());
        // masks go between header and pixels
        dib.splice(40..40, [0u8; 12]);
        let image = RasterImage::from_dib(&dib, DibUsage::RgbColors, usize::MAX).unwrap();
        assert_eq!(image.color_table().len(), 12);
        assert_eq!(image.pixels().len(), 4 * 2);
    }

    #[test]
    fn test_trailing_padding_is_trimmed() {
        let mut dib = fixtures::dib(1, 1, 24, 0);
        let exact = dib.len();
        dib.push(0);
        let image = RasterImage::from_dib(&dib, DibUsage::RgbColors, usize::MAX).unwrap();
        assert_eq!(image.dib_len(), exact);
    }

    #[test]
    fn test_short_pixel_array_rejected() {
        let dib = fixtures::dib(4, 4, 24, 0);
        let err = RasterImage::from_dib(&dib[..dib.len() - 1], DibUsage::RgbColors, usize::MAX);
        assert!(matches!(err, Err(Error::InvalidBitmap(_))));
    }

    #[test]
    fn test_inconsistent_headers_rejected() {
        let usage = DibUsage::RgbColors;

        let mut too_many_colors = fixtures::dib(2, 2, 4, 16);
        too_many_colors[32..36].copy_from_slice(&17u32.to_le_bytes());
        assert!(RasterImage::from_dib(&too_many_colors, usage, usize::MAX).is_err());

        let mut core_header = fixtures::dib(2, 2, 24, 0);
        core_header[0..4].copy_from_slice(&12u32.to_le_bytes());
        assert!(matches!(
            RasterImage::from_dib(&core_header, usage, usize::MAX),
            Err(Error::Unsupported(_))
        ));

        let mut zero_width = fixtures::dib(2, 2, 24, 0);
        zero_width[4..8].copy_from_slice(&0i32.to_le_bytes());
        assert!(RasterImage::from_dib(&zero_width, usage, usize::MAX).is_err());

        let mut odd_depth = fixtures::dib(2, 2, 24, 0);
        odd_depth[14..16].copy_from_slice(&7u16.to_le_bytes());
        assert!(RasterImage::from_dib(&odd_depth, usage, usize::MAX).is_err());

        let mut rle_without_size = fixtures::dib(2, 2, 8, 0);
        rle_without_size[16..20].copy_from_slice(&compression::BI_RLE8.to_le_bytes());
        assert!(RasterImage::from_dib(&rle_without_size, usage, usize::MAX).is_err());
    }

    #[test]
    fn test_palette_indices_rejected() {
        let dib = fixtures::dib(2, 2, 8, 4);
        assert!(RasterImage::from_dib(&dib, DibUsage::PalIndices, usize::MAX).is_err());
        let truecolor = fixtures::dib(2, 2, 24, 0);
        assert!(RasterImage::from_dib(&truecolor, DibUsage::PalIndices, usize::MAX).is_ok());
    }

    #[test]
    fn test_rle8_uses_declared_image_size() {
        let mut dib = fixtures::dib(4, 2, 8, 0);
        let table_end = 40 + 256 * 4;
        dib[16..20].copy_from_slice(&compression::BI_RLE8.to_le_bytes());
        dib[20..24].copy_from_slice(&6u32.to_le_bytes());
        dib.truncate(table_end);
        // two pixels of color 1, end of line, end of bitmap
        let encoded = [0x02, 0x01, 0x00, 0x00, 0x00, 0x01];
        dib.extend(encoded);
        dib.push(0);

        let image = RasterImage::from_dib(&dib, DibUsage::RgbColors, usize::MAX).unwrap();
        assert_eq!(image.compression(), compression::BI_RLE8);
        assert!(!image.info().is_uncompressed());
        assert_eq!(image.pixels(), &encoded[..]);
        assert_eq!(image.pixel_data_offset(), table_end);

        let bmp = image.to_bmp();
        assert_eq!(bmp.len(), 14 + table_end + 6);
        assert_eq!(u32::from_le_bytes(bmp[2..6].try_into().unwrap()) as usize, bmp.len());
        assert_eq!(
            u32::from_le_bytes(bmp[10..14].try_into().unwrap()) as usize,
            14 + table_end
        );
        assert_eq!(&bmp[14..], &dib[..dib.len() - 1]);
    }

    #[test]
    fn test_bmp_file_len_limit() {
        assert_eq!(bmp_file_len(40, 8, 16).unwrap(), 14 + 40 + 8 + 16);
        assert_eq!(
            bmp_file_len(40, 0, u32::MAX as usize - 54).unwrap(),
            u32::MAX
        );
        assert!(matches!(
            bmp_file_len(40, 0, u32::MAX as usize - 53),
            Err(Error::InvalidBitmap(_))
        ));
        assert!(bmp_file_len(124, 1024, usize::MAX - 10).is_err());
    }

    #[test]
    fn test_pixel_limit() {
        let dib = fixtures::dib(4, 4, 24, 0);
        assert!(RasterImage::from_dib(&dib, DibUsage::RgbColors, 47).is_err());
        assert!(RasterImage::from_dib(&dib, DibUsage::RgbColors, 48).is_ok());
    }

    #[test]
    fn test_top_down_height() {
        let mut dib = fixtures::dib(2, 3, 24, 0);
        dib[8..12].copy_from_slice(&(-3i32).to_le_bytes());
        let image = RasterImage::from_dib(&dib, DibUsage::RgbColors, usize::MAX).unwrap();
        assert_eq!(image.height(), 3);
        assert!(!image.info().is_bottom_up());
    }

    #[test]
    fn test_to_bmp_file_header() {
        let dib = fixtures::dib(5, 3, 8, 16);
        let image = RasterImage::from_dib(&dib, DibUsage::RgbColors, usize::MAX).unwrap();
        let bmp = image.to_bmp();

        assert_eq!(&bmp[0..2], b"BM");
        assert_eq!(bmp.len(), image.bmp_file_size());
        assert_eq!(u32::from_le_bytes(bmp[2..6].try_into().unwrap()) as usize, bmp.len());
        assert_eq!(&bmp[6..10], &[0, 0, 0, 0]);
        assert_eq!(
            u32::from_le_bytes(bmp[10..14].try_into().unwrap()),
            14 + 40 + 64
        );
        assert_eq!(&bmp[14..], dib.as_slice());
    }
}
