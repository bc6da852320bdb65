//! Verification order and what each check reports.

use super::common::{assert_failed_with, filled_stack};
use guardstack::layout::{CHECKSUM_POS, PAYLOAD_POS};
use guardstack::testing::{
    corrupt_trailing_sentinel, flip_byte, overwrite_raw, scribble_slot_resealed,
    set_live_count_resealed, zero_leading_sentinel,
};
use guardstack::{ErrorKind, Stack};

#[test]
fn healthy_stack_verifies_with_checksum() {
    let stack = filled_stack(3, 4);
    let report = stack.verify().unwrap();
    assert_eq!(report.live_count, 3);
    assert_eq!(report.capacity, 4);
    assert_eq!(report.checksum >> 32, u64::from(stack.id().seed()));
}

#[test]
fn leading_sentinel_is_checked_first() {
    let mut stack = filled_stack(2, 4);
    zero_leading_sentinel(&mut stack);
    corrupt_trailing_sentinel(&mut stack);
    assert_failed_with(&stack.verify().unwrap_err(), ErrorKind::CorruptedLeadingSentinel);
}

#[test]
fn trailing_sentinel_beats_checksum() {
    let mut stack = filled_stack(2, 4);
    corrupt_trailing_sentinel(&mut stack);
    let err = stack.verify().unwrap_err();
    assert_failed_with(&err, ErrorKind::CorruptedTrailingSentinel);
    assert!(!err.snapshot().unwrap().checksum_matches());
}

#[test]
fn stale_checksum_is_a_mismatch() {
    let mut stack = filled_stack(2, 4);
    assert!(flip_byte(&mut stack, CHECKSUM_POS));
    assert_failed_with(&stack.verify().unwrap_err(), ErrorKind::ChecksumMismatch);
}

#[test]
fn payload_write_without_reseal_is_a_mismatch() {
    let mut stack = filled_stack(2, 4);
    assert!(overwrite_raw(&mut stack, PAYLOAD_POS, &[0xFF]));
    assert_failed_with(&stack.verify().unwrap_err(), ErrorKind::ChecksumMismatch);
}

#[test]
fn live_count_past_capacity_is_reported() {
    let mut stack = filled_stack(2, 4);
    set_live_count_resealed(&mut stack, 5);
    assert_failed_with(&stack.verify().unwrap_err(), ErrorKind::LiveCountExceedsCapacity);
}

#[test]
fn dirty_tail_reports_first_slot() {
    let mut stack = filled_stack(1, 6);
    assert!(scribble_slot_resealed(&mut stack, 4, 0));
    assert!(scribble_slot_resealed(&mut stack, 2, 0));
    let err = stack.verify().unwrap_err();
    assert_failed_with(&err, ErrorKind::NonPoisonTailSlot { index: 2 });
    assert_eq!(err.to_string(), format!("guarded stack failure [5]: {}", err.kind()));
}

#[test]
fn poison_like_live_element_is_legal() {
    let mut stack: Stack<u32> = Stack::with_capacity(2);
    stack.push(u32::from_ne_bytes([b'#'; 4])).unwrap();
    let report = stack.verify().unwrap();
    assert!(report.has_warnings());
    assert_eq!(report.poison_like_live, vec![0]);
    assert_eq!(stack.pop().unwrap(), u32::from_ne_bytes([b'#'; 4]));
}

#[test]
fn corruption_is_caught_before_mutation() {
    let mut stack = filled_stack(2, 4);
    zero_leading_sentinel(&mut stack);
    let before = stack.raw_bytes();

    assert_failed_with(&stack.push(7).unwrap_err(), ErrorKind::CorruptedLeadingSentinel);
    assert_failed_with(&stack.pop().unwrap_err(), ErrorKind::CorruptedLeadingSentinel);
    assert_eq!(stack.raw_bytes(), before);
    assert_eq!(stack.len(), 2);
}

#[test]
fn missing_instance_is_null() {
    let err = Stack::<u8>::verify_instance(None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NullInstance);
    assert_eq!(err.kind().code(), 0);
    assert!(err.snapshot().is_none());
}

#[test]
fn same_contents_different_ids_differ() {
    let a = filled_stack(3, 4);
    let b = filled_stack(3, 4);
    assert_ne!(a.id(), b.id());
    assert_ne!(a.verify().unwrap().checksum, b.verify().unwrap().checksum);
}
