// Re-encoding of extracted bitmaps
//
// Decodes the assembled .bmp with the `image` crate and writes it back out in
// another format.

use super::dib::RasterImage;
use crate::common::error::Result;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

impl RasterImage<'_> {
    /// Decode the bitmap into a `DynamicImage`.
    pub fn to_dynamic_image(&self) -> Result<DynamicImage> {
        let bmp = self.to_bmp();
        Ok(image::load_from_memory_with_format(&bmp, ImageFormat::Bmp)?)
    }

    /// Encode the bitmap in the specified image format.
    pub fn to_format(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let image = self.to_dynamic_image()?;

        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, format)?;

        Ok(buffer.into_inner())
    }

    /// Encode the bitmap as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        self.to_format(ImageFormat::Png)
    }
}
