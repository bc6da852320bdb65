//! LIFO agreement with a `Vec` model.

use super::common::{record, Record};
use super::{ops_strategy, Op};
use guardstack::{ErrorKind, Stack};
use proptest::prelude::*;

proptest! {
    /// Property: pops return pushes in exact reverse order, across growth.
    #[test]
    fn prop_pops_reverse_pushes(values in prop::collection::vec(any::<u64>(), 0..300), capacity in 0usize..16) {
        let mut stack: Stack<u64> = Stack::with_capacity(capacity);
        for &value in &values {
            stack.push(value).unwrap();
        }
        prop_assert_eq!(stack.len(), values.len());

        for &expected in values.iter().rev() {
            prop_assert_eq!(stack.pop().unwrap(), expected);
        }
        prop_assert!(stack.is_empty());
    }

    /// Property: any interleaving agrees with a Vec model until the first
    /// pop on empty, which is terminal.
    #[test]
    fn prop_matches_vec_model(ops in ops_strategy(), capacity in 0usize..8) {
        let mut stack: Stack<u64> = Stack::with_capacity(capacity);
        let mut model: Vec<u64> = Vec::new();

        for op in ops {
            match op {
                Op::Push(value) => {
                    stack.push(value).unwrap();
                    model.push(value);
                }
                Op::Pop => match model.pop() {
                    Some(expected) => {
                        prop_assert_eq!(stack.pop().unwrap(), expected);
                    }
                    None => {
                        prop_assert_eq!(stack.pop().unwrap_err().kind(), ErrorKind::PopOnEmpty);
                        return Ok(());
                    }
                },
            }
            prop_assert_eq!(stack.len(), model.len());
        }
    }

    /// Property: multi-field records survive relocation byte for byte.
    #[test]
    fn prop_records_survive_growth(ids in prop::collection::vec(any::<u32>(), 1..64)) {
        let mut stack: Stack<Record> = Stack::with_capacity(1);
        for &id in &ids {
            stack.push(record(id)).unwrap();
        }
        for &id in ids.iter().rev() {
            prop_assert_eq!(stack.pop().unwrap(), record(id));
        }
    }
}
