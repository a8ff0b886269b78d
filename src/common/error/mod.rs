//! Unified error types for the olefield library.
//!
//! The two top-level extraction iterators never surface these errors: they
//! turn them into skip decisions. The lower-level header and bitmap parsers
//! return them so callers inspecting individual structures can see why a
//! unit was rejected.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
