// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Growth policies.
//!
//! The policy is part of the stack's type, so whether a stack can grow is
//! known at compile time:
//!
//! - [`Doubling`] relocates the live slots into a fresh frame with twice the
//!   capacity. The old frame is only released once every slot has moved.
//! - [`Refuse`] never grows; an overflowing push fails with
//!   [`ErrorKind::GrowthOnFixedCapacity`] before anything is written.
//!
//! A grown frame comes back sealed: sentinels, doubled capacity, unchanged
//! live count, poisoned tail and a fresh checksum.

use tracing::{debug, trace};

use crate::error::ErrorKind;
use crate::identity::StackId;
use crate::integrity::seal;
use crate::layout::{fill_poison, HeaderFields, SENTINEL};
use crate::storage::{Growable, Storage};

/// How a full stack makes room for one more element.
pub trait GrowthPolicy<S: Storage> {
    /// Name used in logs and reports.
    const NAME: &'static str;

    /// Produce a replacement frame holding the same live elements.
    fn grow(frame: &S, stack: StackId) -> Result<S, ErrorKind>;
}

/// Double the capacity on overflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct Doubling;

/// Fail on overflow.
#[derive(Debug, Clone, Copy, Default)]
pub struct Refuse;

/// Capacity after one doubling step. An empty frame grows to one slot.
pub fn next_capacity(current: usize) -> Option<usize> {
    if current == 0 {
        Some(1)
    } else {
        current.checked_mul(2)
    }
}

impl<S: Growable> GrowthPolicy<S> for Doubling {
    const NAME: &'static str = "doubling";

    fn grow(frame: &S, stack: StackId) -> Result<S, ErrorKind> {
        let old_layout = frame.layout();
        let live = frame.live_count();
        let capacity = next_capacity(old_layout.capacity())
            .unwrap_or_else(|| crate::layout::capacity_overflow());
        let layout = old_layout.with_capacity(capacity);

        debug!(
            stack = %stack,
            from = old_layout.capacity(),
            to = capacity,
            old_bytes = old_layout.total_size(),
            new_bytes = layout.total_size(),
            "growing frame"
        );

        let mut fresh = S::allocate(layout);
        for index in 0..live {
            fresh.slot_mut(index).copy_from_slice(frame.slot(index));
        }
        let tail_start = layout.slot_range(live).start;
        fill_poison(&mut fresh.payload_mut()[tail_start..]);

        fresh.set_leading_sentinel(SENTINEL);
        fresh.set_trailing_sentinel(SENTINEL);
        trace!(stack = %stack, bytes = layout.total_size(), "placed sentinels");

        fresh.set_live_count(live);
        fresh.set_capacity_field(capacity);
        trace!(stack = %stack, live, capacity, "set sizes");

        seal(&mut fresh, stack);

        debug!(stack = %stack, relocated = live, "growth complete");
        Ok(fresh)
    }
}

impl<S: Storage> GrowthPolicy<S> for Refuse {
    const NAME: &'static str = "refuse";

    fn grow(_frame: &S, stack: StackId) -> Result<S, ErrorKind> {
        debug!(stack = %stack, "growth refused on fixed-capacity stack");
        Err(ErrorKind::GrowthOnFixedCapacity)
    }
}
