//! Frame invariants after arbitrary untampered use.

use super::common::assert_tail_poisoned;
use super::{ops_strategy, Op};
use guardstack::{ErrorKind, FixedStack, Stack};
use proptest::prelude::*;

proptest! {
    /// Property: verify succeeds and the tail is poison after every step.
    #[test]
    fn prop_verify_holds_after_every_op(ops in ops_strategy()) {
        let mut stack: Stack<u64> = Stack::with_capacity(2);
        for op in ops {
            match op {
                Op::Push(value) => stack.push(value).unwrap(),
                Op::Pop if stack.is_empty() => continue,
                Op::Pop => {
                    stack.pop().unwrap();
                }
            }
            let report = stack.verify().unwrap();
            prop_assert!(report.live_count <= report.capacity);
            assert_tail_poisoned(&stack.snapshot());
        }
    }

    /// Property: capacity is always a power-of-two multiple of the start.
    #[test]
    fn prop_capacity_doubles(start in 1usize..9, pushes in 0usize..200) {
        let mut stack: Stack<u16> = Stack::with_capacity(start);
        for value in 0..pushes {
            stack.push(value as u16).unwrap();
        }
        let ratio = stack.capacity() / start;
        prop_assert_eq!(stack.capacity() % start, 0);
        prop_assert!(ratio.is_power_of_two());
        prop_assert!(stack.capacity() >= pushes);
        prop_assert!(stack.capacity() < (pushes * 2).max(start + 1));
    }

    /// Property: a fixed stack holds exactly N, and the N+1th push changes nothing.
    #[test]
    fn prop_fixed_overflow_is_inert(values in prop::collection::vec(any::<u32>(), 16)) {
        let mut stack: FixedStack<u32, 16> = FixedStack::new();
        for &value in &values {
            stack.push(value).unwrap();
        }
        let before = stack.raw_bytes();
        prop_assert_eq!(stack.push(0).unwrap_err().kind(), ErrorKind::GrowthOnFixedCapacity);
        prop_assert_eq!(stack.raw_bytes(), before);
    }
}
