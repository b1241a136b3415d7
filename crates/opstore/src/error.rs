//! Store-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur when constructing a store.
///
/// Runtime operations have no recoverable error surface: typed access is
/// an unchecked caller contract, and out-of-range sequence reads report
/// absence (`None`) rather than an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The configured block size cannot back a store.
    InvalidBlockSize {
        /// The rejected block size in bytes.
        block_size: usize,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBlockSize { block_size } => {
                write!(
                    f,
                    "invalid block size: {block_size} bytes (must be a nonzero multiple of {})",
                    crate::config::BLOCK_BASE_ALIGN
                )
            }
        }
    }
}

impl Error for StoreError {}
