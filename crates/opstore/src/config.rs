//! Store configuration parameters.

use crate::error::StoreError;

/// Guaranteed base alignment of every block, in bytes.
///
/// Block storage is allocated in 64-byte aligned chunks, so offset 0 of
/// every block — and therefore all offset arithmetic within a block — is
/// valid for any value alignment up to this bound. Values with a larger
/// alignment cannot be stored.
pub const BLOCK_BASE_ALIGN: usize = crate::raw::CHUNK_BYTES;

/// Configuration for a [`crate::RawStack`] or [`crate::RawSequence`].
///
/// Controls block sizing only. Validated when a container is constructed;
/// immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Capacity of each block in bytes.
    ///
    /// Default: 4096. Must be a nonzero multiple of [`BLOCK_BASE_ALIGN`]
    /// (blocks are allocated in aligned 64-byte chunks). Also the upper
    /// bound on a single value's worst-case slot: a value whose
    /// `size + alignment - 1` exceeds this can never be stored.
    pub block_size: usize,
}

impl StoreConfig {
    /// Default block capacity: 4KB.
    pub const DEFAULT_BLOCK_SIZE: usize = 4096;

    /// Create a config with the given block size.
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Check the configuration for consistency.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.block_size == 0 || self.block_size % BLOCK_BASE_ALIGN != 0 {
            return Err(StoreError::InvalidBlockSize {
                block_size: self.block_size,
            });
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BLOCK_SIZE)
    }
}
