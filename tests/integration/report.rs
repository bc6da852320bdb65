//! Dumps produced from real failures.

use guardstack::report::{dump_lines, render, to_json, Tag};
use guardstack::testing::{scribble_slot_resealed, Target};
use guardstack::{ErrorKind, SlotState, Stack};

#[test]
fn dump_marks_the_damaged_slot() {
    let mut stack: Stack<u32> = Stack::with_capacity(4);
    stack.push(1).unwrap();
    assert!(scribble_slot_resealed(&mut stack, 2, 0));

    let err = stack.verify().unwrap_err();
    let snapshot = err.snapshot().unwrap();
    assert_eq!(snapshot.slots[2], SlotState::Anomalous);

    let lines = dump_lines(snapshot);
    let bad: Vec<&str> = lines
        .iter()
        .filter(|line| line.tag == Tag::Bad)
        .map(|line| line.field.as_str())
        .collect();
    assert_eq!(bad, vec!["2"]);

    let text = render(snapshot);
    assert!(text.contains("(BAD) [2] == 00 23 23 23"));
    assert!(text.contains("error [5]"));
}

#[test]
fn dump_shows_both_checksums_on_mismatch() {
    let mut stack: Stack<u64> = Stack::with_capacity(2);
    stack.push(5).unwrap();
    assert!(Target::Payload.apply(&mut stack));

    let err = stack.verify().unwrap_err();
    let text = render(err.snapshot().unwrap());
    assert!(text.contains("(BAD) [CHECKSUM]"));
    assert!(text.contains("(computed "));
}

#[test]
fn every_target_renders() {
    for target in Target::ALL {
        let mut stack: Stack<u64> = Stack::with_capacity(4);
        stack.push(1).unwrap();
        assert!(target.apply(&mut stack), "{:?}", target);

        let err = stack.verify().unwrap_err();
        let snapshot = err.snapshot().unwrap();
        assert!(!render(snapshot).is_empty());

        let json: serde_json::Value = serde_json::from_str(&to_json(snapshot).unwrap()).unwrap();
        assert_eq!(json["code"], err.kind().code());
    }
}

#[test]
fn healthy_snapshot_has_no_error() {
    let stack: Stack<u8> = Stack::with_capacity(1);
    let snapshot = stack.snapshot();
    assert_eq!(snapshot.kind, None);
    assert!(render(&snapshot).contains("error: none"));
    assert_ne!(Some(ErrorKind::PopOnEmpty), snapshot.kind);
}
