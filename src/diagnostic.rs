// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structured failure payload.
//!
//! A [`Snapshot`] freezes everything a report renderer needs: the raw frame,
//! every header field, both checksums and a per-slot classification. The
//! judgements (sentinel intact, checksum matches, slot state) are made here,
//! by the integrity engine, so renderers only format.

use serde::Serialize;

use crate::error::ErrorKind;
use crate::identity::StackId;
use crate::integrity::{classify_slots, compute_checksum};
use crate::layout::{HeaderFields, SENTINEL};
use crate::storage::Storage;

/// Classification of one payload slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Below the live count; holds caller data.
    Live,
    /// Unused and still poison.
    Poisoned,
    /// Unused but overwritten.
    Anomalous,
}

/// Frozen view of one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Failure that triggered the capture; `None` for an on-demand snapshot.
    pub kind: Option<ErrorKind>,
    pub stack: StackId,
    pub element_type: &'static str,
    pub element_size: usize,
    pub raw_bytes: Vec<u8>,
    pub leading_sentinel: u64,
    pub trailing_sentinel: u64,
    pub stored_checksum: u64,
    pub computed_checksum: u64,
    pub live_count: usize,
    pub capacity: usize,
    /// One entry per physical slot.
    pub slots: Vec<SlotState>,
    /// Live slots whose bytes happen to equal the poison pattern.
    pub poison_like_live: Vec<usize>,
}

impl Snapshot {
    pub(crate) fn capture<S: Storage + ?Sized>(
        frame: &S,
        stack: StackId,
        element_type: &'static str,
        kind: Option<ErrorKind>,
    ) -> Self {
        let (slots, poison_like_live) = classify_slots(frame);
        Self {
            kind,
            stack,
            element_type,
            element_size: frame.layout().slot_width(),
            raw_bytes: frame.to_bytes(),
            leading_sentinel: frame.leading_sentinel(),
            trailing_sentinel: frame.trailing_sentinel(),
            stored_checksum: frame.checksum(),
            computed_checksum: compute_checksum(frame, stack),
            live_count: frame.live_count(),
            capacity: frame.capacity_field(),
            slots,
            poison_like_live,
        }
    }

    pub fn leading_intact(&self) -> bool {
        self.leading_sentinel == SENTINEL
    }

    pub fn trailing_intact(&self) -> bool {
        self.trailing_sentinel == SENTINEL
    }

    pub fn checksum_matches(&self) -> bool {
        self.stored_checksum == self.computed_checksum
    }

    /// Live count within capacity, and capacity equal to the slots present.
    pub fn counts_consistent(&self) -> bool {
        self.live_count <= self.capacity && self.capacity == self.slots.len()
    }

    /// Raw bytes of slot `index`.
    pub fn slot_bytes(&self, index: usize) -> Option<&[u8]> {
        if index >= self.slots.len() {
            return None;
        }
        let start = crate::layout::PAYLOAD_POS + index * self.element_size;
        self.raw_bytes.get(start..start + self.element_size)
    }

    pub fn is_poison_like(&self, index: usize) -> bool {
        self.poison_like_live.contains(&index)
    }
}
