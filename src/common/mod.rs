//! Common types and utilities shared by the container walk and the metafile
//! scanner.

pub mod binary;
pub mod error;

pub use error::{Error, Result};
