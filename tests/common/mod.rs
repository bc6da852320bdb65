//! Shared test utilities and fixtures.

#![allow(dead_code)]

use bytemuck::{Pod, Zeroable};
use guardstack::{ErrorKind, SlotState, Snapshot, Stack, StackError};

// ============================================================================
// FIXTURES
// ============================================================================

/// Element with several fields and no padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Record {
    pub id: u32,
    pub weight: u32,
    pub stamp: u64,
}

pub fn record(id: u32) -> Record {
    Record {
        id,
        weight: id.wrapping_mul(7),
        stamp: u64::from(id) << 20,
    }
}

/// Growable stack holding `0..len`.
pub fn filled_stack(len: u64, capacity: usize) -> Stack<u64> {
    let mut stack = Stack::with_capacity(capacity);
    for value in 0..len {
        stack.push(value).expect("push on a healthy stack");
    }
    stack
}

// ============================================================================
// ASSERTIONS
// ============================================================================

/// Every slot at or past the live count is still poison.
pub fn assert_tail_poisoned(snapshot: &Snapshot) {
    for (index, state) in snapshot.slots.iter().enumerate().skip(snapshot.live_count) {
        assert_eq!(
            *state,
            SlotState::Poisoned,
            "slot {} of stack {} is not poison",
            index,
            snapshot.stack
        );
    }
}

/// Failure kind, with the snapshot attached.
pub fn assert_failed_with(err: &StackError, kind: ErrorKind) {
    assert_eq!(err.kind(), kind, "unexpected failure: {}", err);
    let snapshot = err.snapshot().expect("failures carry a snapshot");
    assert_eq!(snapshot.kind, Some(kind));
}
