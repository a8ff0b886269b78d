//! WMF constants
//!
//! Record function codes and header values used when scanning Windows
//! Metafile streams for embedded bitmaps.

/// WMF record function codes
pub mod record {
    // Control records
    pub const EOF: u16 = 0x0000;
    pub const ESCAPE: u16 = 0x0626;

    // State records
    pub const SET_MAP_MODE: u16 = 0x0103;
    pub const SET_STRETCH_BLT_MODE: u16 = 0x0107;
    pub const SET_WINDOW_ORG: u16 = 0x020B;
    pub const SET_WINDOW_EXT: u16 = 0x020C;

    // Bitmap records
    pub const BIT_BLT: u16 = 0x0922;
    pub const STRETCH_BLT: u16 = 0x0B23;
    pub const DIB_BIT_BLT: u16 = 0x0940;
    pub const DIB_STRETCH_BLT: u16 = 0x0B41;
    pub const SET_DIB_TO_DEV: u16 = 0x0D33;
    pub const STRETCH_DIB: u16 = 0x0F43;
}

/// Placeable metafile header key
pub const PLACEABLE_KEY: u32 = 0x9AC6CDD7;

/// Placeable metafile header size in bytes
pub const PLACEABLE_HEADER_SIZE: usize = 22;

/// METAFILEPICT16 prefix of OLE presentation data, in bytes
pub const METAFILEPICT_PREFIX_SIZE: usize = 8;

/// Standard metafile header size in bytes
pub const META_HEADER_SIZE: usize = 18;

/// Standard metafile header size in 16-bit words
pub const META_HEADER_WORDS: u16 = 9;

/// Metafile versions
pub const META_VERSION_100: u16 = 0x0100;
pub const META_VERSION_300: u16 = 0x0300;

/// Record header size (u32 size in words, u16 function)
pub const RECORD_HEADER_SIZE: usize = 6;

/// Smallest valid record, in 16-bit words
pub const MIN_RECORD_WORDS: u32 = 3;
