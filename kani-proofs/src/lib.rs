// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Kani model checking proofs for guardstack frame arithmetic.
//!
//! This standalone crate extracts the layout arithmetic, growth step and
//! poison comparison, and proves them for all inputs using Kani.
//!
//! Run with: `cargo kani`
//!
//! ## Verified Properties
//!
//! 1. **No overflow**: a checked layout never overflows when computing offsets
//! 2. **Disjoint slots**: slot ranges tile the payload without overlap
//! 3. **Trailer placement**: the trailing sentinel starts right after the last slot
//! 4. **Growth**: the next capacity is strictly larger, or overflow is reported
//! 5. **Poison**: a single changed byte is never mistaken for poison

use core::mem::size_of;

pub const SENTINEL_SIZE: usize = size_of::<u64>();
pub const CHECKSUM_SIZE: usize = size_of::<u64>();
pub const COUNT_SIZE: usize = size_of::<usize>();
pub const PAYLOAD_POS: usize = SENTINEL_SIZE + CHECKSUM_SIZE + 2 * COUNT_SIZE;
pub const FRAMING_SIZE: usize = PAYLOAD_POS + SENTINEL_SIZE;
pub const POISON_BYTE: u8 = b'#';

// ============================================================================
// FRAME ARITHMETIC (copied from src/layout.rs)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    slot_width: usize,
    capacity: usize,
}

impl FrameLayout {
    pub const fn checked(slot_width: usize, capacity: usize) -> Option<Self> {
        let Some(payload) = slot_width.checked_mul(capacity) else {
            return None;
        };
        if payload.checked_add(FRAMING_SIZE).is_none() {
            return None;
        }
        Some(Self {
            slot_width,
            capacity,
        })
    }

    pub const fn payload_len(&self) -> usize {
        self.slot_width * self.capacity
    }

    pub const fn trailer_pos(&self) -> usize {
        PAYLOAD_POS + self.payload_len()
    }

    pub const fn total_size(&self) -> usize {
        self.trailer_pos() + SENTINEL_SIZE
    }

    pub const fn slot_start(&self, index: usize) -> usize {
        PAYLOAD_POS + index * self.slot_width
    }
}

/// Capacity after one doubling step (copied from src/growth.rs).
pub fn next_capacity(current: usize) -> Option<usize> {
    if current == 0 {
        Some(1)
    } else {
        current.checked_mul(2)
    }
}

pub fn is_poison_bytes(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == POISON_BYTE)
}

// ============================================================================
// KANI MODEL CHECKING PROOFS
// ============================================================================

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Verify a checked layout computes every offset without overflow.
    #[kani::proof]
    fn verify_checked_layout_no_overflow() {
        let width: usize = kani::any();
        let capacity: usize = kani::any();

        if let Some(layout) = FrameLayout::checked(width, capacity) {
            let total = layout.total_size();
            kani::assert(total >= FRAMING_SIZE, "framing is always present");
            kani::assert(
                total - FRAMING_SIZE == width * capacity,
                "payload is exactly capacity slots",
            );
        }
    }

    /// Verify neighbouring slots touch but never overlap, and the last slot
    /// ends where the trailer begins.
    #[kani::proof]
    fn verify_slots_tile_payload() {
        let width: usize = kani::any_where(|&w| w > 0 && w <= 64);
        let capacity: usize = kani::any_where(|&c| c > 0 && c <= 1 << 16);
        let layout = FrameLayout::checked(width, capacity).unwrap();

        let index: usize = kani::any_where(|&i| i + 1 < capacity);
        kani::assert(
            layout.slot_start(index) + width == layout.slot_start(index + 1),
            "slots are contiguous",
        );
        kani::assert(
            layout.slot_start(capacity - 1) + width == layout.trailer_pos(),
            "trailer follows the last slot",
        );
        kani::assert(layout.slot_start(0) == PAYLOAD_POS, "payload starts after header");
    }

    /// Verify growth always makes room, or reports overflow.
    #[kani::proof]
    fn verify_growth_is_monotonic() {
        let current: usize = kani::any();
        match next_capacity(current) {
            Some(next) => {
                kani::assert(next > current, "growth adds at least one slot");
                kani::assert(current == 0 || next == current * 2, "growth doubles");
            }
            None => kani::assert(current > usize::MAX / 2, "only huge capacities overflow"),
        }
    }

    /// Verify one changed byte in an 8-byte slot is never taken for poison.
    #[kani::proof]
    #[kani::unwind(9)]
    fn verify_poison_detects_single_byte() {
        let mut slot = [POISON_BYTE; 8];
        kani::assert(is_poison_bytes(&slot), "fresh slot is poison");

        let index: usize = kani::any_where(|&i| i < 8);
        let value: u8 = kani::any_where(|&v| v != POISON_BYTE);
        slot[index] = value;
        kani::assert(!is_poison_bytes(&slot), "changed slot is not poison");
    }
}
