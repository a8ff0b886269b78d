// Windows Metafile (WMF) record scanning
//
// Metafile pictures stored by OLE carry their bitmaps inside DIB raster
// records. This module decodes the metafile preambles, walks the records and
// rebuilds those bitmaps.
//
// References:
// - [MS-WMF]: Windows Metafile Format Specification
// - https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-wmf/

pub mod constants;
pub mod extractor;
pub mod parser;

pub use extractor::{MetafilePicture, RasterImages, extract_raster};
pub use parser::{
    MetafileHeader, MetafilePictHeader, MetafileRecord, MetafileRecords, PlaceableHeader,
    WmfFileType,
};
