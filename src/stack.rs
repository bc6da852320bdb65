// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The guarded stack.
//!
//! [`GuardedStack`] is generic over where its frame lives (`S`) and what it
//! does when full (`P`). The two common shapes have aliases:
//!
//! | Alias              | Storage              | Policy     |
//! |--------------------|----------------------|------------|
//! | `Stack<T>`         | `HeapFrame`          | `Doubling` |
//! | `FixedStack<T, N>` | `InlineFrame<T, N>`  | `Refuse`   |
//!
//! Every mutating call verifies the frame on entry and on exit. The first
//! failure, corruption or misuse, is recorded and the instance becomes
//! unusable: every later call fails with the same kind and a fresh snapshot.
//!
//! ```
//! use guardstack::Stack;
//!
//! let mut stack: Stack<u64> = Stack::new();
//! stack.push(1)?;
//! stack.push(2)?;
//! assert_eq!(stack.pop()?, 2);
//! assert_eq!(stack.len(), 1);
//! # Ok::<(), guardstack::StackError>(())
//! ```

use std::any::type_name;
use std::cell::Cell;
use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::Pod;
use tracing::{debug, error, trace};

use crate::diagnostic::Snapshot;
use crate::error::{ErrorKind, Result, StackError};
use crate::growth::{Doubling, GrowthPolicy, Refuse};
use crate::identity::{Registration, StackId};
use crate::integrity::{self, IntegrityReport};
use crate::layout::{fill_poison, FrameLayout, HeaderFields, SENTINEL};
use crate::options::StackOptions;
use crate::storage::{Growable, HeapFrame, InlineFrame, Storage};

/// Growable, heap-backed stack.
pub type Stack<T> = GuardedStack<T, HeapFrame, Doubling>;

/// Fixed-capacity stack with its frame stored inline.
pub type FixedStack<T, const N: usize> = GuardedStack<T, InlineFrame<T, N>, Refuse>;

/// Self-verifying LIFO container.
pub struct GuardedStack<T, S, P> {
    frame: S,
    registration: Registration,
    fault: Cell<Option<ErrorKind>>,
    _marker: PhantomData<(fn() -> T, P)>,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl<T: Pod, P: GrowthPolicy<HeapFrame>> GuardedStack<T, HeapFrame, P> {
    /// Heap stack with the default capacity.
    pub fn new() -> Self {
        Self::with_options(StackOptions::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(StackOptions::default().initial_capacity(capacity))
    }

    /// Heap stack with an explicit identity.
    pub fn with_id(id: StackId, capacity: usize) -> Self {
        Self::with_options(StackOptions::default().initial_capacity(capacity).id(id))
    }

    pub fn with_options(options: StackOptions) -> Self {
        let registration = match options.id {
            Some(id) => Registration::explicit(id),
            None => Registration::allocate(),
        };
        let layout = FrameLayout::of::<T>(options.initial_capacity);
        debug!(
            stack = %registration.id(),
            bytes = layout.total_size(),
            "allocated heap frame"
        );
        Self::from_frame(HeapFrame::allocate(layout), registration)
    }
}

impl<T: Pod, P: GrowthPolicy<HeapFrame>> Default for GuardedStack<T, HeapFrame, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod, const N: usize> GuardedStack<T, InlineFrame<T, N>, Refuse> {
    /// Inline stack of exactly `N` slots.
    pub fn new() -> Self {
        Self::from_frame(InlineFrame::new(), Registration::allocate())
    }

    pub fn with_id(id: StackId) -> Self {
        Self::from_frame(InlineFrame::new(), Registration::explicit(id))
    }
}

impl<T: Pod, const N: usize> Default for GuardedStack<T, InlineFrame<T, N>, Refuse> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod, S: Storage, P: GrowthPolicy<S>> GuardedStack<T, S, P> {
    fn from_frame(mut frame: S, registration: Registration) -> Self {
        assert!(size_of::<T>() != 0, "zero-sized elements cannot be guarded");

        let stack = registration.id();
        let capacity = frame.layout().capacity();
        debug!(
            stack = %stack,
            logger = %stack.logger_name(),
            element = type_name::<T>(),
            element_size = size_of::<T>(),
            capacity,
            policy = P::NAME,
            "constructing stack"
        );

        frame.set_leading_sentinel(SENTINEL);
        frame.set_trailing_sentinel(SENTINEL);
        trace!(stack = %stack, bytes = frame.layout().total_size(), "placed sentinels");

        frame.set_live_count(0);
        frame.set_capacity_field(capacity);
        trace!(stack = %stack, live = 0, capacity, "set sizes");

        fill_poison(frame.payload_mut());
        integrity::seal(&mut frame, stack);

        debug!(stack = %stack, "construction complete");
        Self {
            frame,
            registration,
            fault: Cell::new(None),
            _marker: PhantomData,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn id(&self) -> StackId {
        self.registration.id()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.frame.live_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.frame.capacity_field()
    }

    /// Failure that made this instance unusable, if any.
    pub fn fault(&self) -> Option<ErrorKind> {
        self.fault.get()
    }

    /// The framed image, byte for byte.
    pub fn raw_bytes(&self) -> Vec<u8> {
        self.frame.to_bytes()
    }

    /// Physical layout of the current frame.
    pub fn layout(&self) -> FrameLayout {
        self.frame.layout()
    }

    /// Snapshot of the current frame without raising anything.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.frame, self.id(), type_name::<T>(), self.fault.get())
    }

    // ========================================================================
    // VERIFICATION
    // ========================================================================

    /// Check every frame invariant, in priority order. A failure here is
    /// recorded like any other and makes the stack unusable.
    pub fn verify(&self) -> Result<IntegrityReport> {
        Self::verify_instance(Some(self))
    }

    /// [`verify`](Self::verify) for a possibly missing instance.
    pub fn verify_instance(stack: Option<&Self>) -> Result<IntegrityReport> {
        let Some(stack) = stack else {
            error!("verification requested on a missing stack instance");
            return Err(StackError::null_instance());
        };
        debug!(stack = %stack.id(), "verifying frame");
        stack.guard()
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Push `value`, growing the frame if the policy allows.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.guard()?;
        let stack = self.id();

        if self.frame.live_count() == self.frame.capacity_field() {
            debug!(stack = %stack, capacity = self.capacity(), "frame full");
            self.grow()?;
        }

        let live = self.frame.live_count();
        self.frame
            .slot_mut(live)
            .copy_from_slice(bytemuck::bytes_of(&value));
        trace!(stack = %stack, slot = live, "placed element");

        self.frame.set_live_count(live + 1);
        trace!(stack = %stack, live = live + 1, "set live count");

        integrity::seal(&mut self.frame, stack);
        self.guard()?;
        Ok(())
    }

    /// Remove and return the most recently pushed element.
    pub fn pop(&mut self) -> Result<T> {
        self.guard()?;
        let stack = self.id();

        let live = self.frame.live_count();
        if live == 0 {
            return Err(self.fail(ErrorKind::PopOnEmpty));
        }

        let index = live - 1;
        let value: T = bytemuck::pod_read_unaligned(self.frame.slot(index));
        fill_poison(self.frame.slot_mut(index));
        trace!(stack = %stack, slot = index, "took element, slot poisoned");

        self.frame.set_live_count(index);
        trace!(stack = %stack, live = index, "set live count");

        integrity::seal(&mut self.frame, stack);
        self.guard()?;
        Ok(value)
    }

    fn grow(&mut self) -> Result<()> {
        let grown = P::grow(&self.frame, self.id()).map_err(|kind| self.fail(kind))?;
        // old frame released here, after every element moved
        self.frame = grown;
        self.guard()?;
        Ok(())
    }

    /// Verify, recording the first failure.
    fn guard(&self) -> Result<IntegrityReport> {
        if let Some(kind) = self.fault.get() {
            return Err(self.failure(kind));
        }
        integrity::check(Some(&self.frame), self.id()).map_err(|kind| self.fail(kind))
    }

    fn fail(&self, kind: ErrorKind) -> StackError {
        self.fault.set(Some(kind));
        error!(
            stack = %self.id(),
            code = kind.code(),
            "stack is now unusable: {}",
            kind
        );
        self.failure(kind)
    }

    fn failure(&self, kind: ErrorKind) -> StackError {
        let snapshot = Snapshot::capture(&self.frame, self.id(), type_name::<T>(), Some(kind));
        StackError::new(kind, self.id(), snapshot)
    }

    /// Direct frame access for fault injection.
    pub(crate) fn frame_mut(&mut self) -> &mut S {
        &mut self.frame
    }
}

impl<T, S, P> Drop for GuardedStack<T, S, P> {
    fn drop(&mut self) {
        debug!(stack = %self.registration.id(), "dropping stack, frame released");
    }
}

impl<T, S, P> std::fmt::Debug for GuardedStack<T, S, P>
where
    S: Storage,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedStack")
            .field("id", &self.registration.id())
            .field("len", &self.frame.live_count())
            .field("capacity", &self.frame.capacity_field())
            .field("fault", &self.fault.get())
            .finish()
    }
}
