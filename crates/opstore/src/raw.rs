//! Low-level primitives for type-erased value storage.
//!
//! This is the only module in the crate that may contain `unsafe` code.
//! Every unsafe operation carries a `// SAFETY:` comment, and every
//! function that cannot be made sound through runtime checks states its
//! contract in a `# Safety` section. Nothing here inspects bytes to infer
//! a type: type evidence is always supplied by the caller as a generic
//! parameter.

#![allow(unsafe_code)]

use std::mem;
use std::ptr;
use std::slice;

/// Size and guaranteed base alignment of a storage chunk, in bytes.
///
/// Blocks are built from whole chunks, so a block's base address — and
/// therefore offset 0 of every block — is aligned for any value alignment
/// up to this bound.
pub(crate) const CHUNK_BYTES: usize = 64;

/// A 64-byte, 64-aligned unit of block storage.
///
/// Backing blocks with `Vec<Chunk>` instead of `Vec<u8>` is what makes
/// offset arithmetic trustworthy: a `Vec<u8>`'s base address carries no
/// alignment guarantee, so "offset 8 is 8-aligned" would not hold.
#[repr(C, align(64))]
#[derive(Clone, Copy)]
pub(crate) struct Chunk(pub(crate) [u8; CHUNK_BYTES]);

/// A fully zeroed chunk, used when allocating fresh block storage.
pub(crate) const ZERO_CHUNK: Chunk = Chunk([0u8; CHUNK_BYTES]);

/// View a chunk slice as its underlying bytes.
pub(crate) fn chunks_as_bytes(chunks: &[Chunk]) -> &[u8] {
    // SAFETY: `Chunk` is a repr(C) wrapper around `[u8; CHUNK_BYTES]` with
    // no padding, so `chunks.len() * CHUNK_BYTES` initialised bytes live at
    // the slice's base address for its whole lifetime.
    unsafe { slice::from_raw_parts(chunks.as_ptr().cast::<u8>(), chunks.len() * CHUNK_BYTES) }
}

/// View a chunk slice as its underlying bytes, mutably.
pub(crate) fn chunks_as_bytes_mut(chunks: &mut [Chunk]) -> &mut [u8] {
    // SAFETY: as `chunks_as_bytes`, and the `&mut` borrow of `chunks` makes
    // this the unique view of those bytes.
    unsafe { slice::from_raw_parts_mut(chunks.as_mut_ptr().cast::<u8>(), chunks.len() * CHUNK_BYTES) }
}

/// Move `value` into `dst`, which must be its exact payload region.
///
/// The value's bytes become owned by the buffer: no destructor runs until
/// some later call reconstitutes the value with [`read_value`]. This
/// function is safe because writing a `T` over dead buffer bytes cannot
/// produce an invalid value — at worst a value left in the buffer is
/// leaked, never double-dropped.
///
/// # Panics
///
/// Panics if `dst` is not exactly `size_of::<T>()` bytes or is misaligned
/// for `T`.
pub(crate) fn write_value<T>(dst: &mut [u8], value: T) {
    assert_eq!(dst.len(), mem::size_of::<T>(), "payload region size mismatch");
    assert_eq!(
        dst.as_ptr() as usize % mem::align_of::<T>(),
        0,
        "payload region misaligned for value type"
    );
    // SAFETY: `dst` is valid for writes of `size_of::<T>()` bytes and
    // aligned for `T` (both asserted above). `ptr::write` moves `value`
    // without reading or dropping the destination bytes.
    unsafe { ptr::write(dst.as_mut_ptr().cast::<T>(), value) }
}

/// Reconstitute a `T` from its payload bytes, retiring them.
///
/// This is a move, not a copy-then-destroy: the source bytes are left
/// untouched and must never be interpreted as a live `T` again.
///
/// # Safety
///
/// - `src` must be the exact payload region written by a matching
///   [`write_value::<T>`] call, with the same `T`.
/// - The caller must ensure the region is logically retired afterwards
///   (the stack shrinks its committed length), or that `T: Copy` holds
///   (the sequence), so that ownership is never duplicated.
pub(crate) unsafe fn read_value<T>(src: &[u8]) -> T {
    debug_assert_eq!(src.len(), mem::size_of::<T>());
    debug_assert_eq!(src.as_ptr() as usize % mem::align_of::<T>(), 0);
    // SAFETY: per the function contract, `src` holds a valid `T` at an
    // aligned address, and the caller takes over ownership of the value.
    unsafe { ptr::read(src.as_ptr().cast::<T>()) }
}

/// Decode a copy of a `T` from its payload bytes without retiring them.
///
/// # Safety
///
/// `src` must be the exact payload region written by a matching
/// [`write_value::<T>`] call, with the same `T`.
pub(crate) unsafe fn read_value_copy<T: Copy>(src: &[u8]) -> T {
    // SAFETY: `T: Copy` means duplicating the value cannot double any
    // ownership; the remaining contract is forwarded to the caller.
    unsafe { read_value(src) }
}
