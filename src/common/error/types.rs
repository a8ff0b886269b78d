//! Error type shared by all olefield parsers.
use thiserror::Error;

/// Main error type for olefield operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input ended before a structure was complete
    #[error("Data exhausted: requested {requested} bytes, {available} available")]
    Exhausted { requested: usize, available: usize },

    /// A magic number or signature did not match
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// A header carried inconsistent size or offset fields
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A metafile record was malformed
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A device-independent bitmap failed size validation
    #[error("Invalid bitmap: {0}")]
    InvalidBitmap(String),

    /// The structure is well-formed but uses a variant not handled here
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Decoding or encoding through the `image` crate failed
    #[cfg(feature = "imgconv")]
    #[error("Image conversion error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for olefield operations.
pub type Result<T> = std::result::Result<T, Error>;
