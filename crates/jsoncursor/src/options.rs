/// Segment capacity used by [`DocumentOptions::default`].
pub const DEFAULT_SEGMENT_CAPACITY: usize = 4096;

/// Configuration for a [`Document`](crate::Document).
///
/// # Examples
///
/// ```rust
/// use jsoncursor::{Document, DocumentOptions};
///
/// let options = DocumentOptions { segment_capacity: 64 };
/// let document = Document::new(options).unwrap();
/// assert_eq!(document.buffer().segment_capacity(), 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Number of bytes each buffer segment holds.
    ///
    /// Small segments waste less memory at the tail of the buffer; large
    /// segments need fewer allocations while a document grows. Must be
    /// positive.
    ///
    /// # Default
    ///
    /// [`DEFAULT_SEGMENT_CAPACITY`]
    pub segment_capacity: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
        }
    }
}
