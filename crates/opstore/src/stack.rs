//! The LIFO container: [`RawStack`].
//!
//! A `RawStack` stores heterogeneous fixed-layout values as raw bytes. The
//! caller tracks the exact type sequence: `push` is safe, but [`pop`] and
//! [`drop_top`] are unchecked contracts — the type parameter must match
//! the value actually at the top, and the container never verifies it.
//!
//! [`pop`]: RawStack::pop
//! [`drop_top`]: RawStack::drop_top

use std::mem;

use crate::block::BlockList;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::layout::max_slot_size;
use crate::raw;

/// Restore point recorded at push time: the cursor and committed length
/// as they were before the slot was committed.
///
/// Leading padding is part of a slot's committed region, and its width
/// (`aligned_start - previous_used`) is not a function of the popped
/// type's size and alignment alone — a 4-aligned value pushed at offset 8
/// pads 0 bytes, at offset 1 it pads 3. Recording the pre-push state makes
/// pop exact where stateless arithmetic cannot be. Marks hold offsets
/// only, never type information.
#[derive(Clone, Copy)]
struct SlotMark {
    /// Cursor position before the push.
    block: usize,
    /// Committed length of that block before the push.
    used: usize,
}

/// A LIFO stack of type-erased values stored as raw bytes.
///
/// Values of any type are pushed into fixed-capacity byte blocks with
/// manual alignment handling, and popped back out by a caller that
/// supplies the type at each depth. Intended to back a stack-machine
/// evaluator's operand stack, where the evaluator independently knows the
/// type of every operand it pushed.
///
/// Single-owner, single-threaded: all mutation goes through `&mut self`.
///
/// # Example
///
/// ```
/// use opstore::RawStack;
///
/// let mut stack = RawStack::new();
/// stack.push(42i64);
/// stack.push(3.14f64);
/// // SAFETY: popped in exact reverse push order with matching types.
/// let f: f64 = unsafe { stack.pop() };
/// let i: i64 = unsafe { stack.pop() };
/// assert_eq!((f, i), (3.14, 42));
/// assert!(stack.is_empty());
/// ```
pub struct RawStack {
    blocks: BlockList,
    /// One restore point per live slot, in push order.
    marks: Vec<SlotMark>,
}

impl RawStack {
    /// Create an empty stack with the default block size.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
            .expect("the default store config is always valid")
    }

    /// Create an empty stack with the given configuration.
    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self {
            blocks: BlockList::new(config.block_size),
            marks: Vec::new(),
        })
    }

    /// Push a value onto the stack, storing its raw bytes at an aligned
    /// offset within the current block (spilling to a fresh block when the
    /// worst-case slot does not fit).
    ///
    /// The value is moved into the stack: its destructor will not run
    /// unless it is later reconstituted by [`pop`](Self::pop). O(1)
    /// amortized.
    ///
    /// # Panics
    ///
    /// Panics if `T` can never fit a block (`size_of::<T>() +
    /// align_of::<T>() - 1` exceeds the block size) or if
    /// `align_of::<T>()` exceeds [`crate::config::BLOCK_BASE_ALIGN`].
    pub fn push<T>(&mut self, value: T) {
        let size = mem::size_of::<T>();
        let alignment = mem::align_of::<T>();
        let mark = SlotMark {
            block: self.blocks.current_index(),
            used: self.blocks.current_used(),
        };
        self.blocks.ensure_room(max_slot_size(size, alignment));
        let (_, payload) = self.blocks.reserve_and_write(size, alignment);
        raw::write_value(payload, value);
        self.marks.push(mark);
    }

    /// Pop the most recently pushed value as a `T`, moving it out of the
    /// stack and retiring its slot (including leading padding). O(1).
    ///
    /// # Safety
    ///
    /// The top slot must have been pushed as exactly this `T`. The stack
    /// stores no type information and cannot check this; a mismatch is
    /// undefined behavior.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[allow(unsafe_code)]
    pub unsafe fn pop<T>(&mut self) -> T {
        let size = mem::size_of::<T>();
        let alignment = mem::align_of::<T>();
        let mark = self.marks.pop().expect("pop on an empty RawStack");
        // SAFETY: the caller guarantees the top slot holds a `T`; the
        // commit protocol places its payload as the trailing `size`
        // committed bytes of the current block, and the restore below
        // retires the slot so ownership is not duplicated.
        let value = unsafe { raw::read_value::<T>(self.blocks.top_payload(size, alignment)) };
        self.blocks.restore(mark.block, mark.used);
        value
    }

    /// Pop the top value as a `T` and drop it.
    ///
    /// Unlike bytes merely left in the stack, the discarded value's
    /// destructor does run.
    ///
    /// # Safety
    ///
    /// Same contract as [`pop`](Self::pop).
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[allow(unsafe_code)]
    pub unsafe fn drop_top<T>(&mut self) {
        // SAFETY: forwarded to the caller unchanged.
        drop(unsafe { self.pop::<T>() });
    }

    /// True iff the cursor is at block 0 with nothing committed.
    ///
    /// Zero-sized values commit no bytes and are invisible to this check;
    /// [`depth`](Self::depth) counts them.
    pub fn is_empty(&self) -> bool {
        let empty = self.blocks.at_origin();
        // No live slots implies nothing committed (not the converse: ZSTs).
        debug_assert!(!self.marks.is_empty() || empty);
        empty
    }

    /// Number of live slots.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    /// Committed bytes in the block currently receiving writes.
    ///
    /// Diagnostic surface: the committed length advances by leading
    /// padding plus payload on push and rewinds exactly on pop.
    pub fn committed_bytes(&self) -> usize {
        self.blocks.current_used()
    }

    /// Number of blocks allocated so far. Blocks are never freed while the
    /// stack lives.
    pub fn block_count(&self) -> usize {
        self.blocks.block_count()
    }

    /// Total memory usage of the backing blocks in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.memory_bytes()
    }
}

impl Default for RawStack {
    fn default() -> Self {
        Self::new()
    }
}
