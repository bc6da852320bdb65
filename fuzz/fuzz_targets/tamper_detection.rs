// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for tamper detection.
//!
//! Builds a stack, overwrites a run of frame bytes with fuzzer data, then
//! verifies. Any write that changes the image without forging the checksum
//! must be reported, and the reported kind must respect the check order.

#![no_main]

use arbitrary::Arbitrary;
use guardstack::layout::{CHECKSUM_POS, LIVE_POS, SENTINEL_SIZE};
use guardstack::testing::overwrite_raw;
use guardstack::{ErrorKind, Stack};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct TamperInput {
    values: Vec<u16>,
    offset: u16,
    patch: Vec<u8>,
}

fuzz_target!(|input: TamperInput| {
    let mut stack: Stack<u16> = Stack::with_capacity(4);
    for &value in input.values.iter().take(64) {
        stack.push(value).expect("untampered push");
    }

    let before = stack.raw_bytes();
    let offset = usize::from(input.offset) % before.len();
    let patch = &input.patch[..input.patch.len().min(before.len() - offset)];
    if !overwrite_raw(&mut stack, offset, patch) {
        return;
    }

    let after = stack.raw_bytes();
    let result = stack.verify();
    if after == before {
        assert!(result.is_ok());
        return;
    }

    // a patch that also rewrites the checksum to the recomputed value is a
    // valid frame, not a missed detection
    let checksum_rewritten = after[CHECKSUM_POS..LIVE_POS] != before[CHECKSUM_POS..LIVE_POS];
    let kind = match result {
        Ok(_) => {
            assert!(checksum_rewritten, "changed frame passed verification");
            return;
        }
        Err(err) => err.kind(),
    };
    let trailer_pos = stack.layout().trailer_pos();
    let leading_changed = after[..SENTINEL_SIZE] != before[..SENTINEL_SIZE];
    let trailing_changed = after[trailer_pos..] != before[trailer_pos..];

    if leading_changed {
        assert_eq!(kind, ErrorKind::CorruptedLeadingSentinel);
    } else if trailing_changed {
        assert_eq!(kind, ErrorKind::CorruptedTrailingSentinel);
    } else {
        assert!(kind.is_corruption());
        assert_ne!(kind, ErrorKind::NullInstance);
    }

    // terminal: further use reports the same kind
    assert_eq!(stack.push(0).unwrap_err().kind(), kind);
});
