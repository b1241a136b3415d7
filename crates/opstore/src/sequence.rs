//! The append/random-access container: [`RawSequence`].
//!
//! A `RawSequence` appends type-erased values into the same kind of block
//! storage as [`crate::RawStack`], but never removes anything: its logical
//! buffer — the concatenation of all blocks' committed bytes — only ever
//! grows. Reads are stateless: [`read`](RawSequence::read) decodes a value
//! at a caller-supplied position and hands back the position immediately
//! after it.

use std::mem;

use crate::block::BlockList;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::layout::{aligned_offset, max_slot_size};
use crate::raw;

/// An append-only sequence of type-erased values stored as raw bytes.
///
/// Pushes commit slots exactly as [`crate::RawStack`] does; the cursor
/// only ever advances. Positions are byte offsets into the logical buffer,
/// tracked by the caller alongside the type sequence.
///
/// # Example
///
/// ```
/// use opstore::RawSequence;
///
/// let mut seq = RawSequence::new();
/// seq.push(10u32);
/// seq.push(20u32);
/// // SAFETY: positions and types match what was pushed.
/// let (a, next) = unsafe { seq.read::<u32>(0) }.unwrap();
/// let (b, next) = unsafe { seq.read::<u32>(next) }.unwrap();
/// assert_eq!((a, b), (10, 20));
/// assert!(unsafe { seq.read::<u32>(next) }.is_none());
/// ```
pub struct RawSequence {
    blocks: BlockList,
}

impl RawSequence {
    /// Create an empty sequence with the default block size.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
            .expect("the default store config is always valid")
    }

    /// Create an empty sequence with the given configuration.
    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            blocks: BlockList::new(config.block_size),
        })
    }

    /// Append a value, storing its raw bytes at an aligned offset within
    /// the current block (spilling whole into a fresh block when the
    /// worst-case slot does not fit). O(1) amortized.
    ///
    /// # Panics
    ///
    /// Panics if `T` can never fit a block (`size_of::<T>() +
    /// align_of::<T>() - 1` exceeds the block size) or if
    /// `align_of::<T>()` exceeds [`crate::config::BLOCK_BASE_ALIGN`].
    pub fn push<T>(&mut self, value: T) {
        let size = mem::size_of::<T>();
        let alignment = mem::align_of::<T>();
        self.blocks.ensure_room(max_slot_size(size, alignment));
        let (_, payload) = self.blocks.reserve_and_write(size, alignment);
        raw::write_value(payload, value);
    }

    /// Decode a `T` at the given logical-buffer position, returning the
    /// value and the position immediately after it.
    ///
    /// The position is translated across block boundaries, then rounded up
    /// to `T`'s alignment within the block. Returns `None` when the
    /// position lies at or beyond the committed length, or when the
    /// aligned read would reach past the block's committed bytes — both
    /// signal end-of-data or a malformed position rather than a fault.
    /// O(number of blocks).
    ///
    /// The returned next position is `position + size_of::<T>()`, computed
    /// from the *unaligned* input position: a walk over values of mixed
    /// alignments does not advance past padding or block-tail slack, so
    /// callers walking such a sequence must track real offsets themselves.
    /// Homogeneous-alignment walks starting at 0 self-align.
    ///
    /// # Safety
    ///
    /// A successful read must target a slot that was pushed as exactly
    /// this `T`; the sequence stores no type information and cannot check
    /// it. `T: Copy` is required because the sequence keeps the bytes: a
    /// non-`Copy` type would mint a second owner.
    #[allow(unsafe_code)]
    pub unsafe fn read<T: Copy>(&self, position: usize) -> Option<(T, usize)> {
        let size = mem::size_of::<T>();
        let alignment = mem::align_of::<T>();
        let (block_index, local) = self.blocks.translate(position)?;
        let aligned = aligned_offset(local, alignment);
        let payload = self.blocks.read_at(block_index, aligned, size)?;
        // SAFETY: the caller guarantees this position addresses a slot
        // written as a `T`; `T: Copy` makes the duplication sound.
        let value = unsafe { raw::read_value_copy::<T>(payload) };
        Some((value, position + size))
    }

    /// Length of the logical buffer in bytes: the total committed bytes
    /// across all blocks. Monotonically non-decreasing.
    pub fn len_bytes(&self) -> usize {
        self.blocks.total_used()
    }

    /// Number of blocks allocated so far. Blocks are never freed while the
    /// sequence lives.
    pub fn block_count(&self) -> usize {
        self.blocks.block_count()
    }

    /// Total memory usage of the backing blocks in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.memory_bytes()
    }
}

impl Default for RawSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    fn tiny_sequence() -> RawSequence {
        RawSequence::with_config(StoreConfig::new(64)).unwrap()
    }

    #[test]
    fn walk_reproduces_push_order() {
        let mut seq = RawSequence::new();
        for v in [11u32, 22, 33, 44] {
            seq.push(v);
        }
        let mut position = 0;
        for expected in [11u32, 22, 33, 44] {
            let (value, next) = unsafe { seq.read::<u32>(position) }.unwrap();
            assert_eq!(value, expected);
            assert!(next > position);
            position = next;
        }
        assert!(unsafe { seq.read::<u32>(position) }.is_none());
    }

    #[test]
    fn read_at_or_beyond_committed_length_is_absent() {
        let mut seq = RawSequence::new();
        seq.push(1u64);
        assert_eq!(seq.len_bytes(), 8);
        assert!(unsafe { seq.read::<u64>(8) }.is_none());
        assert!(unsafe { seq.read::<u64>(9_999) }.is_none());
        // A position whose aligned read spills past the committed bytes is
        // equally absent rather than a fault.
        assert!(unsafe { seq.read::<u64>(1) }.is_none());
    }

    #[test]
    fn read_on_empty_sequence_is_absent() {
        let seq = RawSequence::new();
        assert!(unsafe { seq.read::<u8>(0) }.is_none());
        assert_eq!(seq.len_bytes(), 0);
    }

    #[test]
    fn mixed_alignment_reads_at_tracked_offsets() {
        let mut seq = RawSequence::new();
        seq.push(7u8); // committed at 0
        seq.push(42u64); // aligned to 8
        seq.push(9u8); // at 16
        assert_eq!(seq.len_bytes(), 17);

        let (a, _) = unsafe { seq.read::<u8>(0) }.unwrap();
        let (b, _) = unsafe { seq.read::<u64>(8) }.unwrap();
        let (c, _) = unsafe { seq.read::<u8>(16) }.unwrap();
        assert_eq!((a, b, c), (7, 42, 9));

        // A position inside the padding rounds up to the same payload.
        let (padded, next) = unsafe { seq.read::<u64>(1) }.unwrap();
        assert_eq!(padded, 42);
        // Next position is the unaligned input plus size: the documented
        // asymmetry for heterogeneously aligned walks.
        assert_eq!(next, 9);
    }

    #[test]
    fn spill_starts_fresh_block_readable_at_translated_position() {
        let mut seq = tiny_sequence();
        seq.push([1u8; 60]);
        assert_eq!(seq.block_count(), 1);
        seq.push(2u64);
        assert_eq!(seq.block_count(), 2);

        // Block 0 committed 60 bytes, so global position 60 lands at the
        // spilled block's offset 0.
        let (value, _) = unsafe { seq.read::<u64>(60) }.unwrap();
        assert_eq!(value, 2);
        assert_eq!(seq.len_bytes(), 68);
    }

    #[test]
    fn len_bytes_is_monotone() {
        let mut seq = tiny_sequence();
        let mut last = seq.len_bytes();
        for i in 0..50u64 {
            seq.push(i);
            assert!(seq.len_bytes() > last);
            last = seq.len_bytes();
        }
    }

    #[test]
    #[should_panic(expected = "value slot needs")]
    fn oversized_value_panics() {
        let mut seq = tiny_sequence();
        seq.push([0u8; 65]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn homogeneous_walk_reproduces_values(
                values in proptest::collection::vec(any::<u64>(), 0..300),
            ) {
                // u64 slots never pad after position 0 and fill blocks
                // exactly, so the naive walk stays aligned across spills.
                let mut seq = RawSequence::with_config(StoreConfig::new(64)).unwrap();
                for &v in &values {
                    seq.push(v);
                }
                let mut position = 0;
                for &expected in &values {
                    let (value, next) = unsafe { seq.read::<u64>(position) }.unwrap();
                    prop_assert_eq!(value, expected);
                    position = next;
                }
                let past_end = unsafe { seq.read::<u64>(position) };
                prop_assert!(past_end.is_none());
            }

            #[test]
            fn absent_for_all_positions_at_or_past_the_end(
                count in 0usize..50,
                beyond in 0usize..1000,
            ) {
                let mut seq = RawSequence::new();
                for i in 0..count {
                    seq.push(i as u32);
                }
                let end = seq.len_bytes();
                let past_end = unsafe { seq.read::<u32>(end + beyond) };
                prop_assert!(past_end.is_none());
            }
        }
    }
}
