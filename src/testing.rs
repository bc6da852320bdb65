// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fault injection shared across unit, integration, fuzz and CLI code.
//!
//! Safe code cannot scribble over a stack's frame, so these helpers do it on
//! purpose. Helpers ending in `_resealed` recompute the checksum afterwards,
//! which lets a test reach the checks that come after the checksum.

#![doc(hidden)]

use bytemuck::Pod;

use crate::growth::GrowthPolicy;
use crate::integrity::seal;
use crate::layout::{HeaderFields, CHECKSUM_POS};
use crate::stack::GuardedStack;
use crate::storage::Storage;

/// Frame region to damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    LeadingSentinel,
    TrailingSentinel,
    Checksum,
    /// Live count pushed past capacity, checksum recomputed.
    LiveCount,
    /// First unused slot overwritten, checksum recomputed.
    TailSlot,
    /// One payload byte flipped, checksum left stale.
    Payload,
}

impl Target {
    pub const ALL: [Target; 6] = [
        Target::LeadingSentinel,
        Target::TrailingSentinel,
        Target::Checksum,
        Target::LiveCount,
        Target::TailSlot,
        Target::Payload,
    ];

    /// Damage `stack` in this region. Returns `false` when the frame has no
    /// such region (e.g. no unused slot left).
    pub fn apply<T, S, P>(self, stack: &mut GuardedStack<T, S, P>) -> bool
    where
        T: Pod,
        S: Storage,
        P: GrowthPolicy<S>,
    {
        match self {
            Target::LeadingSentinel => {
                zero_leading_sentinel(stack);
                true
            }
            Target::TrailingSentinel => {
                corrupt_trailing_sentinel(stack);
                true
            }
            Target::Checksum => flip_byte(stack, CHECKSUM_POS),
            Target::LiveCount => {
                let capacity = stack.capacity();
                set_live_count_resealed(stack, capacity + 1);
                true
            }
            Target::TailSlot => {
                let live = stack.len();
                scribble_slot_resealed(stack, live, 0)
            }
            Target::Payload => {
                if stack.layout().payload_len() == 0 {
                    return false;
                }
                let offset = stack.layout().absolute_slot_range(0).start;
                flip_byte(stack, offset)
            }
        }
    }
}

pub fn zero_leading_sentinel<T, S, P>(stack: &mut GuardedStack<T, S, P>)
where
    T: Pod,
    S: Storage,
    P: GrowthPolicy<S>,
{
    stack.frame_mut().set_leading_sentinel(0);
}

/// Write garbage over the trailing sentinel, as an off-by-one write would.
pub fn corrupt_trailing_sentinel<T, S, P>(stack: &mut GuardedStack<T, S, P>)
where
    T: Pod,
    S: Storage,
    P: GrowthPolicy<S>,
{
    stack.frame_mut().trailer_mut().fill(0xAB);
}

/// Copy `bytes` into the frame at `offset`. Returns `false` if out of range.
pub fn overwrite_raw<T, S, P>(stack: &mut GuardedStack<T, S, P>, offset: usize, bytes: &[u8]) -> bool
where
    T: Pod,
    S: Storage,
    P: GrowthPolicy<S>,
{
    let frame = stack.frame_mut();
    if offset + bytes.len() > frame.layout().total_size() {
        return false;
    }
    for (i, &byte) in bytes.iter().enumerate() {
        match frame.byte_mut(offset + i) {
            Some(slot) => *slot = byte,
            None => return false,
        }
    }
    true
}

/// Invert one byte of the frame.
pub fn flip_byte<T, S, P>(stack: &mut GuardedStack<T, S, P>, offset: usize) -> bool
where
    T: Pod,
    S: Storage,
    P: GrowthPolicy<S>,
{
    match stack.frame_mut().byte_mut(offset) {
        Some(byte) => {
            *byte = !*byte;
            true
        }
        None => false,
    }
}

/// Set one byte of slot `index` and reseal.
pub fn scribble_slot_resealed<T, S, P>(
    stack: &mut GuardedStack<T, S, P>,
    index: usize,
    value: u8,
) -> bool
where
    T: Pod,
    S: Storage,
    P: GrowthPolicy<S>,
{
    if index >= stack.layout().capacity() {
        return false;
    }
    let id = stack.id();
    let frame = stack.frame_mut();
    frame.slot_mut(index)[0] = value;
    seal(frame, id);
    true
}

pub fn set_live_count_resealed<T, S, P>(stack: &mut GuardedStack<T, S, P>, live: usize)
where
    T: Pod,
    S: Storage,
    P: GrowthPolicy<S>,
{
    let id = stack.id();
    let frame = stack.frame_mut();
    frame.set_live_count(live);
    seal(frame, id);
}
