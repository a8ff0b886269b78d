//! Configuration types for OLE field walking and image extraction.
//!
//! The defaults are tuned for Access "OLE Object" columns. Tighten the limits
//! when processing untrusted input in bulk.

/// Options controlling the container walk and metafile extraction.
///
/// # Examples
///
/// ```rust
/// use olefield::FieldOptions;
///
/// // Create with defaults
/// let options = FieldOptions::default();
///
/// // Or customize
/// let options = FieldOptions::new()
///     .with_skip_empty_payloads(true)
///     .with_max_image_bytes(16 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOptions {
    /// Longest class name accepted after an object marker, in bytes
    pub max_class_name_len: usize,
    /// Longest topic or item name accepted in an embedded object, in bytes
    pub max_item_name_len: usize,
    /// Whether segments with a zero-length payload are dropped
    pub skip_empty_payloads: bool,
    /// Largest pixel array a reconstructed bitmap may declare, in bytes
    pub max_image_bytes: usize,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            max_class_name_len: 256,
            max_item_name_len: 4096,
            skip_empty_payloads: false,
            max_image_bytes: 256 * 1024 * 1024,
        }
    }
}

impl FieldOptions {
    /// Create a new `FieldOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the longest class name accepted after an object marker.
    ///
    /// Markers followed by a longer declared class name are treated as false
    /// positives and scanning resumes one byte later.
    #[inline]
    pub fn with_max_class_name_len(mut self, len: usize) -> Self {
        self.max_class_name_len = len;
        self
    }

    /// Set the longest topic or item name accepted in an embedded object.
    #[inline]
    pub fn with_max_item_name_len(mut self, len: usize) -> Self {
        self.max_item_name_len = len;
        self
    }

    /// Set whether segments with an empty payload are dropped.
    #[inline]
    pub fn with_skip_empty_payloads(mut self, skip: bool) -> Self {
        self.skip_empty_payloads = skip;
        self
    }

    /// Set the largest pixel array a reconstructed bitmap may declare.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use olefield::FieldOptions;
    ///
    /// let options = FieldOptions::new().with_max_image_bytes(1 << 20);
    /// assert_eq!(options.max_image_bytes, 1 << 20);
    /// ```
    #[inline]
    pub fn with_max_image_bytes(mut self, bytes: usize) -> Self {
        self.max_image_bytes = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let options = FieldOptions::new()
            .with_max_class_name_len(16)
            .with_max_item_name_len(32)
            .with_skip_empty_payloads(true)
            .with_max_image_bytes(64);
        assert_eq!(options.max_class_name_len, 16);
        assert_eq!(options.max_item_name_len, 32);
        assert!(options.skip_empty_payloads);
        assert_eq!(options.max_image_bytes, 64);
        assert_ne!(options, FieldOptions::default());
    }
}
