// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Frame owners.
//!
//! Two ways to hold a framed image:
//!
//! - [`HeapFrame`]: one contiguous heap allocation, replaced wholesale on
//!   growth.
//! - [`InlineFrame`]: header, slots and trailer embedded in the container
//!   itself, sized by a const-generic slot count. Nothing to free on drop.
//!
//! Both hand out the same three segments (header, payload, trailer). The
//! integrity engine and the stack only ever talk to [`Storage`].

use std::mem::size_of;

use bytemuck::Pod;

use crate::layout::{poison_value, FrameLayout, HEADER_SIZE, PAYLOAD_POS, SENTINEL_SIZE};

/// Segmented byte view over a framed image.
pub trait Storage {
    /// Physical layout of this frame.
    fn layout(&self) -> FrameLayout;

    /// Sentinel, checksum, live-count and capacity.
    fn header(&self) -> &[u8];
    fn header_mut(&mut self) -> &mut [u8];

    /// All slots, live and poisoned.
    fn payload(&self) -> &[u8];
    fn payload_mut(&mut self) -> &mut [u8];

    /// Trailing sentinel.
    fn trailer(&self) -> &[u8];
    fn trailer_mut(&mut self) -> &mut [u8];

    fn slot(&self, index: usize) -> &[u8] {
        let range = self.layout().slot_range(index);
        &self.payload()[range]
    }

    fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let range = self.layout().slot_range(index);
        &mut self.payload_mut()[range]
    }

    /// The framed image as one byte string, in layout order.
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.layout().total_size());
        bytes.extend_from_slice(self.header());
        bytes.extend_from_slice(self.payload());
        bytes.extend_from_slice(self.trailer());
        bytes
    }

    /// Mutable access to the byte at `offset` of the framed image.
    fn byte_mut(&mut self, offset: usize) -> Option<&mut u8> {
        let trailer_pos = self.layout().trailer_pos();
        if offset < PAYLOAD_POS {
            self.header_mut().get_mut(offset)
        } else if offset < trailer_pos {
            self.payload_mut().get_mut(offset - PAYLOAD_POS)
        } else {
            self.trailer_mut().get_mut(offset - trailer_pos)
        }
    }
}

/// Storage that can be allocated at any capacity.
pub trait Growable: Storage + Sized {
    /// A zero-filled frame with the given layout.
    fn allocate(layout: FrameLayout) -> Self;
}

// ============================================================================
// HEAP FRAME
// ============================================================================

/// One heap allocation holding the whole frame.
#[derive(Debug, Clone)]
pub struct HeapFrame {
    bytes: Box<[u8]>,
    layout: FrameLayout,
}

impl Growable for HeapFrame {
    fn allocate(layout: FrameLayout) -> Self {
        Self {
            bytes: vec![0u8; layout.total_size()].into_boxed_slice(),
            layout,
        }
    }
}

impl Storage for HeapFrame {
    fn layout(&self) -> FrameLayout {
        self.layout
    }

    fn header(&self) -> &[u8] {
        &self.bytes[..PAYLOAD_POS]
    }

    fn header_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[..PAYLOAD_POS]
    }

    fn payload(&self) -> &[u8] {
        &self.bytes[PAYLOAD_POS..self.layout.trailer_pos()]
    }

    fn payload_mut(&mut self) -> &mut [u8] {
        let end = self.layout.trailer_pos();
        &mut self.bytes[PAYLOAD_POS..end]
    }

    fn trailer(&self) -> &[u8] {
        &self.bytes[self.layout.trailer_pos()..]
    }

    fn trailer_mut(&mut self) -> &mut [u8] {
        let start = self.layout.trailer_pos();
        &mut self.bytes[start..]
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    fn byte_mut(&mut self, offset: usize) -> Option<&mut u8> {
        self.bytes.get_mut(offset)
    }
}

// ============================================================================
// INLINE FRAME
// ============================================================================

/// Frame embedded in its owner, `N` slots of `T`.
///
/// Fields are laid out in frame order; slots start poisoned.
#[derive(Debug, Clone)]
#[repr(C)]
pub struct InlineFrame<T, const N: usize> {
    header: [u8; HEADER_SIZE],
    slots: [T; N],
    trailer: [u8; SENTINEL_SIZE],
}

impl<T: Pod, const N: usize> InlineFrame<T, N> {
    pub fn new() -> Self {
        Self {
            header: [0u8; HEADER_SIZE],
            slots: [poison_value::<T>(); N],
            trailer: [0u8; SENTINEL_SIZE],
        }
    }
}

impl<T: Pod, const N: usize> Default for InlineFrame<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod, const N: usize> Storage for InlineFrame<T, N> {
    fn layout(&self) -> FrameLayout {
        FrameLayout::new(size_of::<T>(), N)
    }

    fn header(&self) -> &[u8] {
        &self.header
    }

    fn header_mut(&mut self) -> &mut [u8] {
        &mut self.header
    }

    fn payload(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }

    fn payload_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.slots)
    }

    fn trailer(&self) -> &[u8] {
        &self.trailer
    }

    fn trailer_mut(&mut self) -> &mut [u8] {
        &mut self.trailer
    }
}
