//! Constants for the Access OLE field container and OLE 1.0 object streams.

/// Signature opening the Access OLE field header
pub const FIELD_SIGNATURE: u16 = 0x1C15;

/// Size of the fixed part of the field header (before the names)
pub const FIELD_HEADER_FIXED_SIZE: usize = 16;

/// OLE 1.0 stream version, little-endian; marks the start of every object
pub const OLE_VERSION: u32 = 0x0000_0501;

/// Byte signature scanned for when looking for the next object
pub const OBJECT_MARKER: &[u8; 4] = b"\x01\x05\x00\x00";

/// Trailing bytes of the end-of-field footer (preceded by one unknown byte)
pub const FOOTER_SIGNATURE: &[u8; 3] = b"\xAD\x05\xFE";

/// Total footer length
pub const FOOTER_LEN: usize = 4;

/// Bytes between the class name and the payload length for non-embedded objects
pub const PRESENTATION_EXTENT_LEN: usize = 8;

// OLE 1.0 format identifiers
/// Linked object
pub const FORMAT_LINKED: u32 = 1;
/// Embedded object
pub const FORMAT_EMBEDDED: u32 = 2;
/// Static (picture only) object
pub const FORMAT_STATIC: u32 = 3;
/// Presentation data
pub const FORMAT_PRESENTATION: u32 = 5;

// Class names with a dedicated ObjectType variant
/// Windows metafile picture
pub const CLASS_METAFILEPICT: &[u8] = b"METAFILEPICT";
/// Device-independent bitmap
pub const CLASS_DIB: &[u8] = b"DIB";
/// Device-dependent bitmap
pub const CLASS_BITMAP: &[u8] = b"BITMAP";
/// Packager shell object
pub const CLASS_PACKAGE: &[u8] = b"Package";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_version_bytes() {
        assert_eq!(*OBJECT_MARKER, OLE_VERSION.to_le_bytes());
        assert_eq!(FOOTER_SIGNATURE.len() + 1, FOOTER_LEN);
    }
}
