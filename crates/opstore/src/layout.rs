//! Alignment arithmetic shared by both containers.
//!
//! This is the only place offset/padding math lives. The stack and the
//! sequence both commit slots through [`crate::block::BlockList`], which in
//! turn uses these functions, so the two containers cannot drift apart in
//! their padding arithmetic.

/// Round `raw_offset` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two; this is debug-asserted and otherwise
/// unspecified. For an already-aligned offset the result is the offset
/// itself.
pub fn aligned_offset(raw_offset: usize, alignment: usize) -> usize {
    debug_assert!(
        alignment.is_power_of_two(),
        "alignment {alignment} is not a power of two"
    );
    (raw_offset + alignment - 1) & !(alignment - 1)
}

/// Worst-case slot size for a value of the given size and alignment.
///
/// A value written at an arbitrary offset may need up to `alignment - 1`
/// bytes of leading padding before its payload, so `size + alignment - 1`
/// bytes always suffice regardless of where the slot starts.
pub fn max_slot_size(size: usize, alignment: usize) -> usize {
    size + alignment - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_offset_identity_when_aligned() {
        assert_eq!(aligned_offset(0, 8), 0);
        assert_eq!(aligned_offset(16, 8), 16);
        assert_eq!(aligned_offset(64, 64), 64);
    }

    #[test]
    fn aligned_offset_rounds_up() {
        assert_eq!(aligned_offset(1, 8), 8);
        assert_eq!(aligned_offset(7, 8), 8);
        assert_eq!(aligned_offset(9, 8), 16);
        assert_eq!(aligned_offset(5, 4), 8);
    }

    #[test]
    fn aligned_offset_alignment_one_is_identity() {
        for offset in 0..32 {
            assert_eq!(aligned_offset(offset, 1), offset);
        }
    }

    #[test]
    fn max_slot_size_values() {
        assert_eq!(max_slot_size(8, 8), 15);
        assert_eq!(max_slot_size(4, 4), 7);
        assert_eq!(max_slot_size(1, 1), 1);
        assert_eq!(max_slot_size(0, 1), 0);
        assert_eq!(max_slot_size(16, 16), 31);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn aligned_offset_is_multiple_of_alignment(
                offset in 0usize..100_000,
                shift in 0u32..7,
            ) {
                let alignment = 1usize << shift;
                prop_assert_eq!(aligned_offset(offset, alignment) % alignment, 0);
            }

            #[test]
            fn aligned_offset_within_one_alignment(
                offset in 0usize..100_000,
                shift in 0u32..7,
            ) {
                let alignment = 1usize << shift;
                let aligned = aligned_offset(offset, alignment);
                prop_assert!(aligned >= offset);
                prop_assert!(aligned < offset + alignment);
            }

            #[test]
            fn max_slot_always_covers_worst_case_padding(
                offset in 0usize..100_000,
                size in 0usize..512,
                shift in 0u32..7,
            ) {
                let alignment = 1usize << shift;
                let aligned = aligned_offset(offset, alignment);
                // A slot reserved at `offset` with max_slot_size bytes always
                // reaches past the aligned payload end.
                prop_assert!(aligned + size <= offset + max_slot_size(size, alignment));
            }
        }
    }
}
