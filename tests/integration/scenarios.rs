//! Lifecycle scenarios for growable and fixed stacks.

use super::common::{assert_failed_with, assert_tail_poisoned};
use guardstack::testing::{corrupt_trailing_sentinel, overwrite_raw, zero_leading_sentinel};
use guardstack::{live_stacks, ErrorKind, FixedStack, Stack, StackId, StackOptions};

#[test]
fn independent_stacks_do_not_interfere() {
    let mut first: Stack<i32> = Stack::new();
    let mut second: Stack<i32> = Stack::new();

    first.push(1).unwrap();
    second.push(4).unwrap();

    assert_eq!(first.pop().unwrap(), 1);
    assert_eq!(second.pop().unwrap(), 4);
    assert_eq!(first.len(), 0);
    assert_eq!(second.len(), 0);
    assert!(first.verify().is_ok());
    assert!(second.verify().is_ok());
}

#[test]
fn eleventh_push_doubles_capacity() {
    let mut stack: Stack<u32> = Stack::with_capacity(10);
    for value in 0..11 {
        stack.push(value).unwrap();
    }
    assert_eq!(stack.capacity(), 20);
    assert_eq!(stack.len(), 11);
    assert_tail_poisoned(&stack.snapshot());

    let popped: Vec<u32> = std::iter::from_fn(|| stack.pop().ok()).take(11).collect();
    assert_eq!(popped, (0..11).rev().collect::<Vec<_>>());
}

#[test]
fn full_fixed_stack_survives_pop_repush_loop() {
    let mut stack: FixedStack<u64, 1000> = FixedStack::new();
    for value in 0..1000 {
        stack.push(value).unwrap();
    }

    for iteration in 0..1000u64 {
        let value = stack.pop().unwrap();
        assert_eq!(stack.len(), 999);
        stack.push(value + iteration).unwrap();
        assert_eq!(stack.len(), 1000);
    }
    assert_eq!(stack.capacity(), 1000);
    assert!(stack.verify().is_ok());
}

#[test]
fn pop_after_drain_fails() {
    let mut stack: Stack<u8> = Stack::new();
    stack.push(42).unwrap();
    assert_eq!(stack.pop().unwrap(), 42);

    let before = stack.raw_bytes();
    let err = stack.pop().unwrap_err();
    assert_failed_with(&err, ErrorKind::PopOnEmpty);
    assert_eq!(err.kind().code(), 6);
    assert_eq!(stack.raw_bytes(), before);
}

#[test]
fn trailing_corruption_beats_checksum() {
    let mut stack: Stack<u64> = Stack::new();
    stack.push(1).unwrap();
    corrupt_trailing_sentinel(&mut stack);

    let err = stack.verify().unwrap_err();
    assert_failed_with(&err, ErrorKind::CorruptedTrailingSentinel);
    assert!(err.kind().is_corruption());
}

#[test]
fn zeroed_leading_sentinel_stops_everything() {
    let mut stack: FixedStack<u32, 4> = FixedStack::new();
    stack.push(3).unwrap();
    zero_leading_sentinel(&mut stack);
    let before = stack.raw_bytes();

    assert_failed_with(&stack.push(4).unwrap_err(), ErrorKind::CorruptedLeadingSentinel);
    assert_failed_with(&stack.pop().unwrap_err(), ErrorKind::CorruptedLeadingSentinel);
    assert_eq!(stack.raw_bytes(), before);
}

#[test]
fn explicit_ids_are_kept() {
    let heap: Stack<u16> = Stack::with_options(StackOptions::default().id(StackId::new(900)));
    let fixed: FixedStack<u16, 2> = FixedStack::with_id(StackId::new(901));
    assert_eq!(heap.id(), StackId::new(900));
    assert_eq!(fixed.id().get(), 901);
    assert!(live_stacks() >= 2);
}

#[test]
fn frame_from_same_numbered_explicit_stack_is_rejected() {
    let mut allocated: Stack<u64> = Stack::with_capacity(4);
    let mut donor: Stack<u64> = Stack::with_id(allocated.id(), 4);
    donor.push(0xDEAD).unwrap();

    assert_eq!(donor.id().get(), allocated.id().get());
    assert_ne!(donor.id().seed(), allocated.id().seed());

    let image = donor.raw_bytes();
    assert!(overwrite_raw(&mut allocated, 0, &image));
    assert_failed_with(&allocated.verify().unwrap_err(), ErrorKind::ChecksumMismatch);
    assert!(allocated.pop().is_err());
}

#[test]
fn stacks_move_between_threads() {
    let mut stack: Stack<u64> = Stack::with_capacity(2);
    stack.push(1).unwrap();

    let mut stack = std::thread::spawn(move || {
        stack.push(2).unwrap();
        stack
    })
    .join()
    .unwrap();

    assert_eq!(stack.pop().unwrap(), 2);
    assert_eq!(stack.pop().unwrap(), 1);
}
