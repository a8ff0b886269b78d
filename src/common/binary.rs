//! Bounds-checked little-endian reading over borrowed byte buffers.
//!
//! Everything in this crate reads through [`ByteCursor`]: a forward-only view
//! that never copies the backing buffer and never panics on short input.
//! Reads that run past the end fail with [`BinaryError::Exhausted`] and leave
//! the cursor where it was, so callers can decide how to resynchronize.

use zerocopy::{I16, I32, LE, U16, U32};

/// Binary parsing error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryError {
    /// Not enough data left to satisfy the read
    Exhausted { requested: usize, available: usize },
}

impl std::fmt::Display for BinaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryError::Exhausted {
                requested,
                available,
            } => write!(
                f,
                "Buffer exhausted: requested {} bytes, {} available",
                requested, available
            ),
        }
    }
}

impl std::error::Error for BinaryError {}

/// Result type for binary operations
pub type BinaryResult<T> = Result<T, BinaryError>;

/// Forward-only reader over an immutable byte buffer.
///
/// # Examples
///
/// ```
/// use olefield::common::binary::ByteCursor;
///
/// let mut cursor = ByteCursor::new(&[0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
/// assert_eq!(cursor.read_u16_le().unwrap(), 0x1234);
/// assert_eq!(cursor.read_u32_le().unwrap(), 0x12345678);
/// assert!(cursor.read_u16_le().is_err());
/// assert_eq!(cursor.position(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'data> {
    data: &'data [u8],
    offset: usize,
}

impl<'data> ByteCursor<'data> {
    /// Create a cursor positioned at the start of `data`.
    #[inline]
    pub const fn new(data: &'data [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Create a cursor positioned at `offset` (clamped to the buffer length).
    #[inline]
    pub fn at(data: &'data [u8], offset: usize) -> Self {
        Self {
            data,
            offset: offset.min(data.len()),
        }
    }

    /// Current offset from the start of the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.offset
    }

    /// Number of bytes left to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Whether the cursor has consumed the whole buffer.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The full backing buffer.
    #[inline]
    pub const fn data(&self) -> &'data [u8] {
        self.data
    }

    /// The unread tail of the buffer.
    #[inline]
    pub fn rest(&self) -> &'data [u8] {
        &self.data[self.offset..]
    }

    /// Move to an absolute offset, clamped to the buffer length.
    #[inline]
    pub fn seek(&mut self, offset: usize) {
        self.offset = offset.min(self.data.len());
    }

    #[inline]
    fn ensure(&self, n: usize) -> BinaryResult<()> {
        if n > self.remaining() {
            return Err(BinaryError::Exhausted {
                requested: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them.
    #[inline]
    pub fn read_bytes(&mut self, n: usize) -> BinaryResult<&'data [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Borrow the next `N` bytes as a fixed-size array reference.
    #[inline]
    fn read_array<const N: usize>(&mut self) -> BinaryResult<&'data [u8; N]> {
        let head = self.data[self.offset..]
            .first_chunk::<N>()
            .ok_or(BinaryError::Exhausted {
                requested: N,
                available: self.remaining(),
            })?;
        self.offset += N;
        Ok(head)
    }

    /// Advance by `n` bytes without reading them.
    #[inline]
    pub fn skip(&mut self, n: usize) -> BinaryResult<()> {
        self.ensure(n)?;
        self.offset += n;
        Ok(())
    }

    /// Read a little-endian `u16`.
    #[inline]
    pub fn read_u16_le(&mut self) -> BinaryResult<u16> {
        let bytes = self.read_array::<2>()?;
        Ok(U16::<LE>::from_bytes(*bytes).get())
    }

    /// Read a little-endian `i16`.
    #[inline]
    pub fn read_i16_le(&mut self) -> BinaryResult<i16> {
        let bytes = self.read_array::<2>()?;
        Ok(I16::<LE>::from_bytes(*bytes).get())
    }

    /// Read a little-endian `u32`.
    #[inline]
    pub fn read_u32_le(&mut self) -> BinaryResult<u32> {
        let bytes = self.read_array::<4>()?;
        Ok(U32::<LE>::from_bytes(*bytes).get())
    }

    /// Read a little-endian `i32`.
    #[inline]
    pub fn read_i32_le(&mut self) -> BinaryResult<i32> {
        let bytes = self.read_array::<4>()?;
        Ok(I32::<LE>::from_bytes(*bytes).get())
    }

    /// Read a little-endian `u32` without advancing.
    #[inline]
    pub fn peek_u32_le(&self) -> BinaryResult<u32> {
        self.clone().read_u32_le()
    }
}

/// Read a little-endian `u16` at `offset` without a cursor.
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> BinaryResult<u16> {
    let mut cursor = ByteCursor::new(data);
    cursor.skip(offset)?;
    cursor.read_u16_le()
}

/// Read a little-endian `u32` at `offset` without a cursor.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> BinaryResult<u32> {
    let mut cursor = ByteCursor::new(data);
    cursor.skip(offset)?;
    cursor.read_u32_le()
}
