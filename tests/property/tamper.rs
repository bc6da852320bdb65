//! Single-byte damage anywhere in the frame is detected.

use super::common::filled_stack;
use guardstack::layout::SENTINEL_SIZE;
use guardstack::testing::overwrite_raw;
use guardstack::ErrorKind;
use proptest::prelude::*;

proptest! {
    /// Property: flipping any bits of any byte fails verification, and the
    /// reported kind matches the region that was hit.
    #[test]
    fn prop_any_byte_flip_is_detected(
        len in 0u64..8,
        offset_seed in any::<usize>(),
        mask in 1u8..=255,
    ) {
        let mut stack = filled_stack(len, 8);
        let image = stack.raw_bytes();
        let offset = offset_seed % image.len();
        let trailer_pos = stack.layout().trailer_pos();

        prop_assert!(overwrite_raw(&mut stack, offset, &[image[offset] ^ mask]));
        let kind = stack.verify().unwrap_err().kind();

        let expected = if offset < SENTINEL_SIZE {
            ErrorKind::CorruptedLeadingSentinel
        } else if offset >= trailer_pos {
            ErrorKind::CorruptedTrailingSentinel
        } else {
            ErrorKind::ChecksumMismatch
        };
        prop_assert_eq!(kind, expected);
    }

    /// Property: once failed, every operation keeps failing the same way.
    #[test]
    fn prop_failure_is_sticky(offset_seed in any::<usize>(), pushes in 0u64..4) {
        let mut stack = filled_stack(3, 4);
        let image = stack.raw_bytes();
        let offset = offset_seed % image.len();
        prop_assert!(overwrite_raw(&mut stack, offset, &[!image[offset]]));

        let first = stack.verify().unwrap_err().kind();
        for value in 0..pushes {
            prop_assert_eq!(stack.push(value).unwrap_err().kind(), first);
        }
        prop_assert_eq!(stack.pop().unwrap_err().kind(), first);
        prop_assert_eq!(stack.fault(), Some(first));
    }
}
