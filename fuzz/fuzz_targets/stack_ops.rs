// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for arbitrary push/pop sequences.
//!
//! Replays the sequence against both variants and a `Vec` model. Without
//! tampering, the only failures allowed are the two usage errors, and the
//! stack must agree with the model up to the first one.

#![no_main]

use arbitrary::Arbitrary;
use guardstack::{ErrorKind, FixedStack, Stack};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Push(u32),
    Pop,
    Verify,
}

#[derive(Debug, Arbitrary)]
struct OpsInput {
    /// Initial capacity of the growable stack (capped below)
    capacity: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: OpsInput| {
    let ops = &input.ops[..input.ops.len().min(2048)];

    let mut heap: Stack<u32> = Stack::with_capacity(usize::from(input.capacity % 32));
    let mut fixed: FixedStack<u32, 64> = FixedStack::new();
    let mut model: Vec<u32> = Vec::new();
    let mut fixed_alive = true;

    for op in ops {
        match *op {
            Op::Push(value) => {
                heap.push(value).expect("growable push never fails untampered");
                if fixed_alive {
                    match fixed.push(value) {
                        Ok(()) => assert!(model.len() < 64),
                        Err(err) => {
                            assert_eq!(err.kind(), ErrorKind::GrowthOnFixedCapacity);
                            assert_eq!(model.len(), 64);
                            fixed_alive = false;
                        }
                    }
                }
                model.push(value);
            }
            Op::Pop => {
                let expected = model.pop();
                match expected {
                    Some(value) => {
                        assert_eq!(heap.pop().expect("non-empty pop"), value);
                        if fixed_alive {
                            assert_eq!(fixed.pop().expect("non-empty pop"), value);
                        }
                    }
                    None => {
                        assert_eq!(heap.pop().unwrap_err().kind(), ErrorKind::PopOnEmpty);
                        return;
                    }
                }
            }
            Op::Verify => {
                let report = heap.verify().expect("untampered stack verifies");
                assert_eq!(report.live_count, model.len());
                if fixed_alive {
                    fixed.verify().expect("untampered stack verifies");
                }
            }
        }
        assert_eq!(heap.len(), model.len());
    }
});
