// tests/ring_properties.rs

use std::collections::VecDeque;

use proptest::prelude::*;
use ringsh::buffer::{ElementReader, RingBuffer};

#[derive(Debug, Clone)]
enum Op {
    Push(u8),
    Pop,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..4).prop_map(|b| Op::Push(b'a' + b)),
        2 => Just(Op::Pop),
    ]
}

/// Reference element size over an unbounded queue.
fn reference_size(queue: &VecDeque<u8>, delimiter: u8, end_of_stream: bool) -> usize {
    match queue.iter().position(|&b| b == delimiter) {
        Some(idx) => idx + 1,
        None if end_of_stream => queue.len(),
        None => 0,
    }
}

/// Reference tokenization of a whole input.
fn reference_elements(input: &[u8], delimiter: u8) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for &b in input {
        current.push(b);
        if b == delimiter {
            out.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

proptest! {
    // Random push/pop interleavings behave like a bounded VecDeque, wrap
    // around included, and the element query agrees with the reference.
    #[test]
    fn ring_matches_bounded_queue(
        capacity in 1usize..16,
        ops in proptest::collection::vec(op_strategy(), 0..200),
    ) {
        let mut ring = RingBuffer::with_capacity(capacity).unwrap();
        let mut model: VecDeque<u8> = VecDeque::new();

        for op in ops {
            match op {
                Op::Push(b) => {
                    let accepted = ring.push(b);
                    prop_assert_eq!(accepted, model.len() < capacity);
                    if accepted {
                        model.push_back(b);
                    }
                }
                Op::Pop => {
                    prop_assert_eq!(ring.pop(), model.pop_front());
                }
            }

            prop_assert_eq!(ring.len(), model.len());
            prop_assert_eq!(ring.free_space(), capacity - model.len());
            for eos in [false, true] {
                let expected = reference_size(&model, b'b', eos);
                prop_assert_eq!(ring.next_element_size(b'b', eos), expected);
                // Pure query: asking again changes nothing.
                prop_assert_eq!(ring.next_element_size(b'b', eos), expected);
            }
        }
    }

    #[test]
    fn push_then_pop_round_trips(
        capacity in 1usize..32,
        offset in 0usize..32,
        data in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut ring = RingBuffer::with_capacity(capacity).unwrap();
        // Move the cursors so the data wraps.
        for _ in 0..(offset % capacity) {
            ring.push(0);
            ring.pop();
        }

        let data = &data[..data.len().min(capacity)];
        prop_assert_eq!(ring.push_slice(data), data.len());
        let popped: Vec<u8> = (0..data.len()).filter_map(|_| ring.pop()).collect();
        prop_assert_eq!(popped.as_slice(), data);
        prop_assert!(ring.is_empty());
    }

    #[test]
    fn overflow_keeps_prefix(
        capacity in 1usize..16,
        data in proptest::collection::vec(any::<u8>(), 0..48),
    ) {
        let mut ring = RingBuffer::with_capacity(capacity).unwrap();
        let accepted = ring.push_slice(&data);
        let kept = data.len().min(capacity);
        prop_assert_eq!(accepted, kept);
        prop_assert_eq!(ring.iter().collect::<Vec<_>>(), data[..kept].to_vec());
    }

    // With every element no longer than the capacity, the streaming reader
    // extracts exactly what an unbounded tokenizer would.
    #[test]
    fn reader_matches_unbounded_reference(
        capacity in 1usize..12,
        fields in proptest::collection::vec(proptest::collection::vec(b'a'..=b'z', 0..12), 0..20),
        trailing in any::<bool>(),
    ) {
        let mut input = Vec::new();
        for field in &fields {
            let field = &field[..field.len().min(capacity - 1)];
            input.extend_from_slice(field);
            input.push(b',');
        }
        if trailing && capacity > 1 {
            input.push(b'z');
        }

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let got = rt.block_on(async {
            let mut reader = ElementReader::new(&input[..], capacity).unwrap();
            let mut out = Vec::new();
            while let Some(el) = reader.next_element(b',').await.unwrap() {
                out.push(el);
            }
            out
        });

        prop_assert_eq!(got, reference_elements(&input, b','));
    }
}
