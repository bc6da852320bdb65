//! Doubling and refusal at the stack level.

use super::common::{assert_failed_with, assert_tail_poisoned, record, Record};
use guardstack::{ErrorKind, FixedStack, GuardedStack, HeapFrame, Refuse, Stack};

#[test]
fn growth_doubles_and_preserves_order() {
    let mut stack: Stack<Record> = Stack::with_capacity(3);
    for id in 0..4 {
        stack.push(record(id)).unwrap();
    }
    assert_eq!(stack.capacity(), 6);
    assert_eq!(stack.len(), 4);
    assert_tail_poisoned(&stack.snapshot());

    for id in (0..4).rev() {
        assert_eq!(stack.pop().unwrap(), record(id));
    }
}

#[test]
fn repeated_growth_from_one() {
    let mut stack: Stack<u8> = Stack::with_capacity(1);
    let mut seen = vec![stack.capacity()];
    for value in 0..17 {
        stack.push(value).unwrap();
        if seen.last() != Some(&stack.capacity()) {
            seen.push(stack.capacity());
        }
    }
    assert_eq!(seen, vec![1, 2, 4, 8, 16, 32]);
    assert!(stack.verify().is_ok());
}

#[test]
fn growth_never_shrinks() {
    let mut stack: Stack<u32> = Stack::with_capacity(2);
    for value in 0..5 {
        stack.push(value).unwrap();
    }
    while stack.pop().is_ok() && !stack.is_empty() {}
    assert_eq!(stack.capacity(), 8);
}

#[test]
fn fixed_overflow_leaves_frame_untouched() {
    let mut stack: FixedStack<u32, 2> = FixedStack::new();
    stack.push(1).unwrap();
    stack.push(2).unwrap();
    let before = stack.raw_bytes();

    let err = stack.push(3).unwrap_err();
    assert_failed_with(&err, ErrorKind::GrowthOnFixedCapacity);
    assert!(err.kind().is_usage());
    assert_eq!(stack.raw_bytes(), before);
    assert_eq!(stack.capacity(), 2);
}

#[test]
fn refusing_heap_stack_behaves_like_fixed() {
    let mut stack: GuardedStack<u64, HeapFrame, Refuse> = GuardedStack::with_capacity(1);
    stack.push(5).unwrap();
    assert_failed_with(&stack.push(6).unwrap_err(), ErrorKind::GrowthOnFixedCapacity);
    assert_eq!(stack.fault(), Some(ErrorKind::GrowthOnFixedCapacity));
}
