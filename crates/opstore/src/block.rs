//! Fixed-capacity byte blocks and the growable block list.
//!
//! A [`Block`] is a fixed-capacity (default 4096 bytes) zero-initialised
//! byte buffer with a used-length cursor. A [`BlockList`] is an ordered,
//! append-only collection of blocks plus a current-block cursor: when a
//! slot cannot fit in the current block's remaining capacity, the cursor
//! advances and a fresh block is allocated if none exists beyond it.
//! Blocks, once appended, persist for the list's lifetime. Slots are never
//! split across two blocks.
//!
//! Committing a slot is a two-step protocol shared by both containers:
//! [`BlockList::ensure_room`] reserves worst-case space, then
//! [`BlockList::reserve_and_write`] places the payload at the aligned
//! offset and commits exactly `aligned_start + size` bytes — trailing
//! slack past the payload is never committed.

use crate::layout::aligned_offset;
use crate::raw::{self, Chunk, CHUNK_BYTES, ZERO_CHUNK};

/// A single fixed-capacity byte block with a used-length cursor.
///
/// Backing storage is allocated to full capacity at creation and
/// zero-initialised; bytes beyond `used` are unused padding capacity, not
/// committed value data. Capacities are whole multiples of
/// [`crate::config::BLOCK_BASE_ALIGN`] so that offset 0 of every block is
/// aligned for any supported value alignment.
pub struct Block {
    /// Backing storage, in 64-byte aligned chunks.
    data: Vec<Chunk>,
    /// Committed length in bytes. Invariant: `used <= capacity()`.
    used: usize,
}

impl Block {
    /// Create a zeroed block with the given capacity in bytes.
    ///
    /// `capacity` must be a nonzero multiple of
    /// [`crate::config::BLOCK_BASE_ALIGN`]; callers route through a
    /// validated [`crate::StoreConfig`].
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0 && capacity % CHUNK_BYTES == 0);
        Self {
            data: vec![ZERO_CHUNK; capacity / CHUNK_BYTES],
            used: 0,
        }
    }

    /// Committed length in bytes.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len() * CHUNK_BYTES
    }

    /// Remaining uncommitted capacity in bytes.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.used
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.capacity()
    }

    /// Set the committed length directly (stack pop restore path).
    pub(crate) fn set_used(&mut self, used: usize) {
        debug_assert!(used <= self.capacity());
        self.used = used;
    }

    /// Commit one slot: place `size` payload bytes at the aligned offset
    /// and advance `used` to exactly `aligned_start + size`.
    ///
    /// Returns the aligned start offset and the payload region. The caller
    /// must have ensured room for the worst-case slot first.
    pub(crate) fn reserve(&mut self, size: usize, alignment: usize) -> (usize, &mut [u8]) {
        let aligned_start = aligned_offset(self.used, alignment);
        debug_assert!(aligned_start + size <= self.capacity());
        self.used = aligned_start + size;
        let bytes = raw::chunks_as_bytes_mut(&mut self.data);
        (aligned_start, &mut bytes[aligned_start..aligned_start + size])
    }

    /// A `size`-byte view at `offset`, or `None` if the range reaches past
    /// the committed length.
    pub fn read_at(&self, offset: usize, size: usize) -> Option<&[u8]> {
        let end = offset.checked_add(size)?;
        if end > self.used {
            return None;
        }
        Some(&raw::chunks_as_bytes(&self.data)[offset..end])
    }
}

/// A growable, append-only list of [`Block`]s with a current-block cursor.
///
/// Shared by [`crate::RawStack`] and [`crate::RawSequence`] (each owns its
/// own instance). The stack moves the cursor both ways as slots are pushed
/// and popped; the sequence only ever advances it.
pub struct BlockList {
    blocks: Vec<Block>,
    block_size: usize,
    /// Index of the block currently receiving writes.
    current: usize,
}

impl BlockList {
    /// Create a block list with one pre-allocated block of `block_size`
    /// bytes. `block_size` must be a nonzero multiple of
    /// [`crate::config::BLOCK_BASE_ALIGN`].
    pub fn new(block_size: usize) -> Self {
        debug_assert!(block_size > 0 && block_size % CHUNK_BYTES == 0);
        Self {
            blocks: vec![Block::new(block_size)],
            block_size,
            current: 0,
        }
    }

    /// Guarantee the next `reserve_and_write` fits in one block without
    /// crossing a boundary, advancing the cursor (and allocating a fresh
    /// block if none exists beyond it) when the current block is too full.
    ///
    /// # Panics
    ///
    /// Panics if `max_slot` exceeds the block capacity: such a value can
    /// never fit any block, which is a caller contract violation on an
    /// infallible push surface.
    pub fn ensure_room(&mut self, max_slot: usize) {
        assert!(
            max_slot <= self.block_size,
            "value slot needs {max_slot} bytes but blocks hold {} bytes",
            self.block_size
        );
        if self.blocks[self.current].remaining() >= max_slot {
            return;
        }
        let next = self.current + 1;
        if next == self.blocks.len() {
            self.blocks.push(Block::new(self.block_size));
        }
        // A reused block was emptied by pops; a fresh one starts empty.
        debug_assert_eq!(self.blocks[next].used(), 0);
        self.current = next;
    }

    /// Commit one slot in the current block. See [`Block::reserve`].
    ///
    /// # Panics
    ///
    /// Panics if `alignment` exceeds [`crate::config::BLOCK_BASE_ALIGN`]:
    /// block bases are only guaranteed aligned up to that bound, so offset
    /// arithmetic cannot place such a value correctly.
    pub fn reserve_and_write(&mut self, size: usize, alignment: usize) -> (usize, &mut [u8]) {
        assert!(
            alignment <= CHUNK_BYTES,
            "value alignment {alignment} exceeds the block base alignment {CHUNK_BYTES}"
        );
        self.blocks[self.current].reserve(size, alignment)
    }

    /// The trailing `size` committed bytes of the current block — the
    /// payload of the most recently committed slot (stack pop path).
    pub(crate) fn top_payload(&self, size: usize, alignment: usize) -> &[u8] {
        let block = &self.blocks[self.current];
        debug_assert!(block.used() >= size);
        let start = block.used() - size;
        // The commit protocol makes `used - size` the aligned start.
        debug_assert_eq!(start % alignment, 0);
        block
            .read_at(start, size)
            .expect("top payload lies within the committed region")
    }

    /// Restore the cursor and committed length recorded before a push.
    ///
    /// A slot is never split across blocks, so a pop that leaves the
    /// current block behind steps back exactly one block, zeroing the
    /// abandoned block's committed length.
    pub(crate) fn restore(&mut self, block: usize, used: usize) {
        debug_assert!(block <= self.current);
        if block != self.current {
            debug_assert_eq!(block + 1, self.current);
            self.blocks[self.current].set_used(0);
            self.current = block;
        }
        self.blocks[self.current].set_used(used);
    }

    /// A `size`-byte view at `offset` within block `index`, or `None` if
    /// the block does not exist or the range reaches past its committed
    /// length.
    pub fn read_at(&self, index: usize, offset: usize, size: usize) -> Option<&[u8]> {
        self.blocks.get(index)?.read_at(offset, size)
    }

    /// Translate a global logical-buffer position into a
    /// `(block_index, local_offset)` pair by walking blocks in order, or
    /// `None` if the position lies at or beyond the total committed
    /// length.
    pub fn translate(&self, position: usize) -> Option<(usize, usize)> {
        let mut remaining = position;
        for (index, block) in self.blocks.iter().enumerate() {
            if remaining < block.used() {
                return Some((index, remaining));
            }
            remaining -= block.used();
        }
        None
    }

    /// Index of the block currently receiving writes.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Committed length of the current block in bytes.
    pub fn current_used(&self) -> usize {
        self.blocks[self.current].used()
    }

    /// True iff the cursor is at block 0 with nothing committed.
    pub fn at_origin(&self) -> bool {
        self.current == 0 && self.blocks[0].used() == 0
    }

    /// Number of blocks allocated so far.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Block capacity in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total committed bytes across all blocks.
    pub fn total_used(&self) -> usize {
        self.blocks.iter().map(Block::used).sum()
    }

    /// Total memory usage of all backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.iter().map(Block::memory_bytes).sum()
    }
}
