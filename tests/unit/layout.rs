//! Frame geometry as seen through a live stack.

use super::common::{record, Record};
use guardstack::layout::{
    is_poison, poison_value, FrameLayout, FRAMING_SIZE, HEADER_SIZE, PAYLOAD_POS, SENTINEL_SIZE,
};
use guardstack::{FixedStack, Stack, DEFAULT_CAPACITY, POISON_BYTE, SENTINEL};

#[test]
fn raw_image_matches_layout() {
    let stack: Stack<u32> = Stack::with_capacity(5);
    let layout = stack.layout();
    let bytes = stack.raw_bytes();

    assert_eq!(bytes.len(), layout.total_size());
    assert_eq!(bytes.len(), FRAMING_SIZE + 5 * 4);
    assert_eq!(&bytes[..SENTINEL_SIZE], &SENTINEL.to_ne_bytes());
    assert_eq!(&bytes[layout.trailer_pos()..], &SENTINEL.to_ne_bytes());
    assert!(bytes[PAYLOAD_POS..layout.trailer_pos()]
        .iter()
        .all(|&b| b == POISON_BYTE));
}

#[test]
fn header_counts_are_native_words() {
    let mut stack: Stack<u16> = Stack::with_capacity(3);
    stack.push(9).unwrap();
    stack.push(10).unwrap();
    let bytes = stack.raw_bytes();

    let word = std::mem::size_of::<usize>();
    let live = usize::from_ne_bytes(bytes[16..16 + word].try_into().unwrap());
    let capacity = usize::from_ne_bytes(bytes[16 + word..16 + 2 * word].try_into().unwrap());
    assert_eq!(live, 2);
    assert_eq!(capacity, 3);
    assert_eq!(HEADER_SIZE, 16 + 2 * word);
}

#[test]
fn element_bytes_land_in_their_slot() {
    let mut stack: Stack<Record> = Stack::with_capacity(2);
    stack.push(record(1)).unwrap();
    stack.push(record(2)).unwrap();

    let layout = stack.layout();
    let bytes = stack.raw_bytes();
    assert_eq!(
        &bytes[layout.absolute_slot_range(1)],
        bytemuck::bytes_of(&record(2))
    );
}

#[test]
fn inline_and_heap_frames_share_a_layout() {
    let fixed: FixedStack<Record, 4> = FixedStack::new();
    let heap: Stack<Record> = Stack::with_capacity(4);
    assert_eq!(fixed.layout(), heap.layout());
    assert_eq!(fixed.raw_bytes().len(), heap.raw_bytes().len());
}

#[test]
fn default_capacity_is_ten() {
    let stack: Stack<u8> = Stack::new();
    assert_eq!(stack.capacity(), DEFAULT_CAPACITY);
    assert_eq!(stack.layout(), FrameLayout::of::<u8>(10));
}

#[test]
fn poison_record_is_recognized() {
    let poisoned: Record = poison_value();
    assert!(is_poison(&poisoned));
    assert!(!is_poison(&record(0)));
}
