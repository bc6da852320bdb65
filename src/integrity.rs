// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Checksum and invariant verification.
//!
//! # Checksum
//!
//! CRC32 over every byte of the frame except the checksum field itself:
//! the leading sentinel, then everything from the live-count through the
//! trailing sentinel (live and poisoned slots alike). The CRC starts from
//! the instance seed, and the seed fills the upper half of the stored value,
//! so identical frames owned by stacks with different seeds never share a
//! checksum.
//!
//! # Verification order
//!
//! Checks stop at the first violation:
//!
//! 1. instance present
//! 2. leading sentinel
//! 3. trailing sentinel
//! 4. checksum
//! 5. live-count ≤ capacity, and capacity matches the physical slot count
//! 6. every slot at or past the live count is poison
//!
//! A live slot that looks like poison is legal data; it is logged and
//! reported, never failed.

use crc32fast::Hasher as Crc32Hasher;
use serde::Serialize;
use tracing::{trace, warn};

use crate::diagnostic::SlotState;
use crate::error::ErrorKind;
use crate::identity::StackId;
use crate::layout::{is_poison_bytes, HeaderFields, CHECKSUM_POS, LIVE_POS, SENTINEL};
use crate::storage::Storage;

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub live_count: usize,
    pub capacity: usize,
    pub checksum: u64,
    /// Live slots whose bytes equal the poison pattern.
    pub poison_like_live: Vec<usize>,
}

impl IntegrityReport {
    pub fn has_warnings(&self) -> bool {
        !self.poison_like_live.is_empty()
    }
}

/// Digest of the frame, seeded with `stack`.
pub fn compute_checksum<S: Storage + ?Sized>(frame: &S, stack: StackId) -> u64 {
    let seed = stack.seed();
    let header = frame.header();

    let mut hasher = Crc32Hasher::new_with_initial(seed);
    hasher.update(&header[..CHECKSUM_POS]);
    hasher.update(&header[LIVE_POS..]);
    hasher.update(frame.payload());
    hasher.update(frame.trailer());

    (u64::from(seed) << 32) | u64::from(hasher.finalize())
}

/// Recompute and store the checksum. Last step of every mutation.
pub fn seal<S: Storage + ?Sized>(frame: &mut S, stack: StackId) {
    let checksum = compute_checksum(frame, stack);
    frame.set_checksum(checksum);
    trace!(stack = %stack, checksum = format_args!("{:#018x}", checksum), "placed checksum");
}

/// Run the full check sequence against `frame`.
pub fn check<S: Storage + ?Sized>(
    frame: Option<&S>,
    stack: StackId,
) -> Result<IntegrityReport, ErrorKind> {
    let Some(frame) = frame else {
        return Err(ErrorKind::NullInstance);
    };

    if frame.leading_sentinel() != SENTINEL {
        return Err(ErrorKind::CorruptedLeadingSentinel);
    }
    if frame.trailing_sentinel() != SENTINEL {
        return Err(ErrorKind::CorruptedTrailingSentinel);
    }

    let checksum = frame.checksum();
    if checksum != compute_checksum(frame, stack) {
        return Err(ErrorKind::ChecksumMismatch);
    }

    let live_count = frame.live_count();
    let capacity = frame.capacity_field();
    let slot_count = frame.layout().capacity();
    if live_count > capacity || capacity != slot_count {
        return Err(ErrorKind::LiveCountExceedsCapacity);
    }
    let live_end = live_count;

    let mut poison_like_live = Vec::new();
    for index in 0..live_end {
        if is_poison_bytes(frame.slot(index)) {
            warn!(stack = %stack, slot = index, "live slot equals the poison pattern");
            poison_like_live.push(index);
        }
    }

    if let Some(index) = (live_end..slot_count).find(|&i| !is_poison_bytes(frame.slot(i))) {
        return Err(ErrorKind::NonPoisonTailSlot { index });
    }

    Ok(IntegrityReport {
        live_count,
        capacity,
        checksum,
        poison_like_live,
    })
}

/// Classify every physical slot, and list live slots that look like poison.
pub fn classify_slots<S: Storage + ?Sized>(frame: &S) -> (Vec<SlotState>, Vec<usize>) {
    let live_count = frame.live_count();
    let slot_count = frame.layout().capacity();

    let mut poison_like = Vec::new();
    let states = (0..slot_count)
        .map(|index| {
            let poisoned = is_poison_bytes(frame.slot(index));
            if index < live_count {
                if poisoned {
                    poison_like.push(index);
                }
                SlotState::Live
            } else if poisoned {
                SlotState::Poisoned
            } else {
                SlotState::Anomalous
            }
        })
        .collect();

    (states, poison_like)
}
