// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary framing of a guarded buffer.
//!
//! Every stack, heap-backed or inline, keeps its elements inside the same
//! framed image. The header is parsed with fixed offsets, the payload is a run
//! of equally sized slots, and a second sentinel closes the frame:
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬──────────┬─────────────────────────┬──────────┐
//! │ SENTINEL │ CHECKSUM │   LIVE   │ CAPACITY │ SLOT 0 │ SLOT 1 │ ...   │ SENTINEL │
//! │    8B    │    8B    │  usize   │  usize   │   capacity × width      │    8B    │
//! └──────────┴──────────┴──────────┴──────────┴─────────────────────────┴──────────┘
//! ```
//!
//! All integers are native byte order. `FrameLayout` is the single source of
//! truth for where a slot or the trailing sentinel lives. Header fields are
//! read and written through [`HeaderFields`], which copies bytes in and out
//! instead of casting pointers.

use std::mem::size_of;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::storage::Storage;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Value written at both ends of every frame.
pub const SENTINEL: u64 = 0xDEDD_A1C0_FFEE;

/// Byte repeated across every unused slot.
pub const POISON_BYTE: u8 = b'#';

/// Width of each sentinel.
pub const SENTINEL_SIZE: usize = size_of::<u64>();

/// Width of the checksum field.
pub const CHECKSUM_SIZE: usize = size_of::<u64>();

/// Width of the live-count and capacity fields (platform word).
pub const COUNT_SIZE: usize = size_of::<usize>();

pub const CHECKSUM_POS: usize = SENTINEL_SIZE;
pub const LIVE_POS: usize = CHECKSUM_POS + CHECKSUM_SIZE;
pub const CAPACITY_POS: usize = LIVE_POS + COUNT_SIZE;
pub const PAYLOAD_POS: usize = CAPACITY_POS + COUNT_SIZE;

/// Everything before the first slot.
pub const HEADER_SIZE: usize = PAYLOAD_POS;

/// Fixed bytes per frame, independent of capacity.
pub const FRAMING_SIZE: usize = HEADER_SIZE + SENTINEL_SIZE;

/// Slots allocated by `Stack::new()`.
pub const DEFAULT_CAPACITY: usize = 10;

/// Suggested capacity for inline stacks when nothing better is known.
pub const DEFAULT_FIXED_CAPACITY: usize = 2048;

// ============================================================================
// FRAME LAYOUT
// ============================================================================

/// Offsets of one frame, derived from slot width and slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameLayout {
    slot_width: usize,
    capacity: usize,
}

impl FrameLayout {
    /// Layout for `capacity` slots of `slot_width` bytes, or `None` if the
    /// framed size does not fit in `usize`.
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

    /// Layout for `capacity` slots of `slot_width` bytes.
    ///
    /// # Panics
    /// Panics if the framed size overflows `usize`.
    pub fn new(slot_width: usize, capacity: usize) -> Self {
        Self::checked(slot_width, capacity).unwrap_or_else(|| capacity_overflow())
    }

    /// Layout for `capacity` elements of type `T`.
    pub fn of<T>(capacity: usize) -> Self {
        Self::new(size_of::<T>(), capacity)
    }

    pub const fn slot_width(&self) -> usize {
        self.slot_width
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes occupied by all slots.
    pub const fn payload_len(&self) -> usize {
        self.slot_width * self.capacity
    }

    /// Offset of the trailing sentinel.
    pub const fn trailer_pos(&self) -> usize {
        PAYLOAD_POS + self.payload_len()
    }

    /// Size of the whole framed image.
    pub const fn total_size(&self) -> usize {
        self.trailer_pos() + SENTINEL_SIZE
    }

    /// Byte range of slot `index` relative to the start of the payload.
    pub const fn slot_range(&self, index: usize) -> Range<usize> {
        let start = index * self.slot_width;
        start..start + self.slot_width
    }

    /// Byte range of slot `index` relative to the start of the frame.
    pub const fn absolute_slot_range(&self, index: usize) -> Range<usize> {
        let start = PAYLOAD_POS + index * self.slot_width;
        start..start + self.slot_width
    }

    /// Same framing, `capacity` slots.
    pub fn with_capacity(&self, capacity: usize) -> Self {
        Self::new(self.slot_width, capacity)
    }
}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow() -> ! {
    panic!("guarded stack capacity overflow")
}

// ============================================================================
// HEADER FIELD ACCESS
// ============================================================================

fn read_u64(bytes: &[u8], pos: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[pos..pos + 8]);
    u64::from_ne_bytes(raw)
}

fn read_usize(bytes: &[u8], pos: usize) -> usize {
    let mut raw = [0u8; COUNT_SIZE];
    raw.copy_from_slice(&bytes[pos..pos + COUNT_SIZE]);
    usize::from_ne_bytes(raw)
}

/// Typed access to the fixed header fields and the trailing sentinel.
///
/// Blanket-implemented for every [`Storage`]; reads never trust the stored
/// capacity to locate the trailer, the storage knows its physical size.
pub trait HeaderFields: Storage {
    fn leading_sentinel(&self) -> u64 {
        read_u64(self.header(), 0)
    }

    fn set_leading_sentinel(&mut self, value: u64) {
        self.header_mut()[..SENTINEL_SIZE].copy_from_slice(&value.to_ne_bytes());
    }

    fn checksum(&self) -> u64 {
        read_u64(self.header(), CHECKSUM_POS)
    }

    fn set_checksum(&mut self, value: u64) {
        self.header_mut()[CHECKSUM_POS..LIVE_POS].copy_from_slice(&value.to_ne_bytes());
    }

    fn live_count(&self) -> usize {
        read_usize(self.header(), LIVE_POS)
    }

    fn set_live_count(&mut self, value: usize) {
        self.header_mut()[LIVE_POS..CAPACITY_POS].copy_from_slice(&value.to_ne_bytes());
    }

    fn capacity_field(&self) -> usize {
        read_usize(self.header(), CAPACITY_POS)
    }

    fn set_capacity_field(&mut self, value: usize) {
        self.header_mut()[CAPACITY_POS..PAYLOAD_POS].copy_from_slice(&value.to_ne_bytes());
    }

    fn trailing_sentinel(&self) -> u64 {
        read_u64(self.trailer(), 0)
    }

    fn set_trailing_sentinel(&mut self, value: u64) {
        self.trailer_mut().copy_from_slice(&value.to_ne_bytes());
    }
}

impl<S: Storage + ?Sized> HeaderFields for S {}

// ============================================================================
// POISON
// ============================================================================

/// A `T` whose every byte is [`POISON_BYTE`].
pub fn poison_value<T: Pod>() -> T {
    let mut value = T::zeroed();
    bytemuck::bytes_of_mut(&mut value).fill(POISON_BYTE);
    value
}

/// Byte-wise comparison against the poison pattern, whatever `T` means.
pub fn is_poison<T: Pod>(value: &T) -> bool {
    is_poison_bytes(bytemuck::bytes_of(value))
}

pub fn is_poison_bytes(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == POISON_BYTE)
}

pub fn fill_poison(bytes: &mut [u8]) {
    bytes.fill(POISON_BYTE);
}
