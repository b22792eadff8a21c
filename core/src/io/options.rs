//! Configuration options for the text reader.

/// Limits applied while reading the text form.
///
/// # Example
///
/// ```
/// use pdb_core::io::ReaderOptions;
///
/// let options = ReaderOptions { max_depth: 64 };
/// assert!(options.max_depth < ReaderOptions::default().max_depth);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Maximum number of collections, nodes and constructor applications
    /// open at once while reading.
    ///
    /// Default: 500
    pub max_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self { max_depth: 500 }
    }
}
