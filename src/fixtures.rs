//! Builders for synthetic OLE fields, metafiles and bitmaps used by the tests.

use crate::images::wmf::constants::{PLACEABLE_KEY, record};
use crate::ole::consts::{
    FIELD_HEADER_FIXED_SIZE, FIELD_SIGNATURE, FORMAT_EMBEDDED, FORMAT_PRESENTATION, OBJECT_MARKER,
};

/// Trailer of an Access OLE field
pub const FOOTER: [u8; 4] = [0x00, 0xAD, 0x05, 0xFE];

/// Field header carrying the given names (NULs included as passed).
pub fn field_header(friendly: &[u8], class: &[u8]) -> Vec<u8> {
    let friendly_off = FIELD_HEADER_FIXED_SIZE as u16;
    let class_off = friendly_off + friendly.len() as u16;
    let header_size = class_off + class.len() as u16;

    let mut data = Vec::with_capacity(header_size as usize);
    data.extend(FIELD_SIGNATURE.to_le_bytes());
    data.extend(header_size.to_le_bytes());
    data.extend(2u32.to_le_bytes());
    data.extend((friendly.len() as u16).to_le_bytes());
    data.extend((class.len() as u16).to_le_bytes());
    data.extend(friendly_off.to_le_bytes());
    data.extend(class_off.to_le_bytes());
    data.extend_from_slice(friendly);
    data.extend_from_slice(class);
    data
}

fn object_start(format: u32, class: &[u8]) -> Vec<u8> {
    let mut data = OBJECT_MARKER.to_vec();
    data.extend(format.to_le_bytes());
    data.extend((class.len() as i32).to_le_bytes());
    data.extend_from_slice(class);
    data
}

fn push_payload(data: &mut Vec<u8>, payload: &[u8]) {
    data.extend((payload.len() as i32).to_le_bytes());
    data.extend_from_slice(payload);
}

/// Presentation object stream: class name, extent, payload.
pub fn presentation_object(class: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut data = object_start(FORMAT_PRESENTATION, class);
    data.extend([0u8; 8]);
    push_payload(&mut data, payload);
    data
}

/// Embedded object stream with empty topic and item names.
pub fn embedded_object(class: &[u8], payload: &[u8]) -> Vec<u8> {
    named_embedded_object(class, b"", b"", payload)
}

/// Embedded object stream with the given topic and item names.
pub fn named_embedded_object(class: &[u8], topic: &[u8], item: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut data = object_start(FORMAT_EMBEDDED, class);
    for name in [topic, item] {
        data.extend((name.len() as i32).to_le_bytes());
        data.extend_from_slice(name);
    }
    push_payload(&mut data, payload);
    data
}

/// Uncompressed DIB with a BITMAPINFOHEADER, a grey palette and a 0/1
/// pixel pattern.
pub fn dib(width: i32, height: i32, bit_count: u16, colors_used: u32) -> Vec<u8> {
    let stride = (width as usize * bit_count as usize).div_ceil(32) * 4;
    let colors = match colors_used {
        0 if bit_count <= 8 => 1usize << bit_count,
        n => n as usize,
    };

    let mut data = Vec::new();
    data.extend(40u32.to_le_bytes());
    data.extend(width.to_le_bytes());
    data.extend(height.to_le_bytes());
    data.extend(1u16.to_le_bytes());
    data.extend(bit_count.to_le_bytes());
    data.extend(0u32.to_le_bytes()); // BI_RGB
    data.extend(0u32.to_le_bytes()); // image size
    data.extend(2835i32.to_le_bytes());
    data.extend(2835i32.to_le_bytes());
    data.extend(colors_used.to_le_bytes());
    data.extend(0u32.to_le_bytes());

    for i in 0..colors {
        let level = (i * 255 / colors.max(2).saturating_sub(1)).min(255) as u8;
        data.extend([level, level, level, 0]);
    }
    data.extend((0..stride * height.unsigned_abs() as usize).map(|i| (i % 2) as u8));
    data
}

/// Metafile record with the parameters padded to a whole word.
pub fn wmf_record(function: u16, params: &[u8]) -> Vec<u8> {
    let padded = params.len().next_multiple_of(2);
    let size = 3 + padded / 2;

    let mut data = Vec::with_capacity(size * 2);
    data.extend((size as u32).to_le_bytes());
    data.extend(function.to_le_bytes());
    data.extend_from_slice(params);
    data.resize(size * 2, 0);
    data
}

fn dib_extent(dib: &[u8]) -> (i16, i16) {
    let width = i32::from_le_bytes([dib[4], dib[5], dib[6], dib[7]]);
    let height = i32::from_le_bytes([dib[8], dib[9], dib[10], dib[11]]);
    (width as i16, height.unsigned_abs() as i16)
}

const SRCCOPY: u32 = 0x00CC_0020;

/// META_DIBSTRETCHBLT painting `dib` at its own size.
pub fn dib_stretch_blt(dib: &[u8]) -> Vec<u8> {
    let (width, height) = dib_extent(dib);
    let mut params = SRCCOPY.to_le_bytes().to_vec();
    for word in [height, width, 0, 0, height, width, 0, 0] {
        params.extend(word.to_le_bytes());
    }
    params.extend_from_slice(dib);
    wmf_record(record::DIB_STRETCH_BLT, &params)
}

/// META_DIBBITBLT painting `dib` at the origin.
pub fn dib_bit_blt(dib: &[u8]) -> Vec<u8> {
    let (width, height) = dib_extent(dib);
    let mut params = SRCCOPY.to_le_bytes().to_vec();
    for word in [0, 0, height, width, 0, 0] {
        params.extend(word.to_le_bytes());
    }
    params.extend_from_slice(dib);
    wmf_record(record::DIB_BIT_BLT, &params)
}

/// META_SETDIBTODEV with RGB colors.
pub fn set_dib_to_dev(dib: &[u8]) -> Vec<u8> {
    let (width, height) = dib_extent(dib);
    let mut params = Vec::new();
    for word in [0, height, 0, 0, 0, height, width, 0, 0] {
        params.extend((word as u16).to_le_bytes());
    }
    params.extend_from_slice(dib);
    wmf_record(record::SET_DIB_TO_DEV, &params)
}

/// META_STRETCHDIB with the given color usage.
pub fn stretch_dib(dib: &[u8], usage: u16) -> Vec<u8> {
    let (width, height) = dib_extent(dib);
    let mut params = SRCCOPY.to_le_bytes().to_vec();
    params.extend(usage.to_le_bytes());
    for word in [height, width, 0, 0, height, width, 0, 0] {
        params.extend(word.to_le_bytes());
    }
    params.extend_from_slice(dib);
    wmf_record(record::STRETCH_DIB, &params)
}

/// Memory metafile: standard header, `records`, EOF record.
pub fn metafile(records: &[Vec<u8>]) -> Vec<u8> {
    let eof = wmf_record(record::EOF, &[]);
    let body_len: usize = records.iter().map(Vec::len).sum::<usize>() + eof.len();
    let max_record = records
        .iter()
        .chain([&eof])
        .map(|r| r.len() / 2)
        .max()
        .unwrap_or(3);

    let mut data = Vec::with_capacity(18 + body_len);
    data.extend(1u16.to_le_bytes());
    data.extend(9u16.to_le_bytes());
    data.extend(0x0300u16.to_le_bytes());
    data.extend((((18 + body_len) / 2) as u32).to_le_bytes());
    data.extend(0u16.to_le_bytes());
    data.extend((max_record as u32).to_le_bytes());
    data.extend(0u16.to_le_bytes());
    for r in records {
        data.extend_from_slice(r);
    }
    data.extend(eof);
    data
}

/// Placeable metafile header with a valid checksum.
pub fn placeable_header(left: i16, top: i16, right: i16, bottom: i16) -> Vec<u8> {
    let mut data = PLACEABLE_KEY.to_le_bytes().to_vec();
    data.extend(0u16.to_le_bytes());
    for coord in [left, top, right, bottom] {
        data.extend(coord.to_le_bytes());
    }
    data.extend(1440u16.to_le_bytes());
    data.extend(0u32.to_le_bytes());

    let checksum = data
        .chunks_exact(2)
        .fold(0u16, |acc, w| acc ^ u16::from_le_bytes([w[0], w[1]]));
    data.extend(checksum.to_le_bytes());
    data
}

/// METAFILEPICT16 prefix (MM_ANISOTROPIC) followed by `metafile`.
pub fn metafile_pict(metafile: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + metafile.len());
    data.extend(8i16.to_le_bytes());
    data.extend(1000i16.to_le_bytes());
    data.extend(1000i16.to_le_bytes());
    data.extend(0u16.to_le_bytes());
    data.extend_from_slice(metafile);
    data
}
