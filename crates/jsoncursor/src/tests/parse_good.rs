use alloc::vec::Vec;

use rstest::rstest;

use super::utils::{Snapshot, parse_closed};
use crate::{Document, Status, Value};

fn tokens(snapshots: &[Snapshot]) -> Vec<Value> {
    snapshots.iter().filter_map(|s| s.token.clone()).collect()
}

#[rstest]
fn null_reports_column_four(#[values(1, 2, 3, 4, 64)] capacity: usize) {
    let mut doc = Document::with_segment_capacity(capacity).unwrap();
    doc.feed("null").unwrap();
    let id = doc.start();
    // Nothing after the keyword yet, so it may still grow.
    assert_eq!(doc.state(id).unwrap().status(), Status::NeedsMoreInput);

    doc.close();
    let id = doc.advance(id).unwrap();
    let state = doc.state(id).unwrap();
    assert_eq!(state.status(), Status::Ok);
    assert_eq!(state.token(), Some(&Value::Null));
    assert_eq!(state.position().line(), 0);
    assert_eq!(state.position().column(), 4);
}

#[rstest]
#[case("true", Value::Boolean(true))]
#[case("false", Value::Boolean(false))]
#[case("null", Value::Null)]
#[case(" \t\r\nfalse", Value::Boolean(false))]
fn single_keyword(#[case] src: &str, #[case] expected: Value, #[values(1, 3, 4096)] capacity: usize) {
    let snapshots = parse_closed(src.as_bytes(), capacity);
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].status, Status::Ok);
    assert_eq!(snapshots[0].token, Some(expected));
    assert_eq!(snapshots[1].status, Status::EndOfInput);
}

#[rstest]
#[case("null:")]
#[case("null,")]
#[case("null]")]
#[case("null}")]
#[case("null ")]
#[case("null\n")]
fn keyword_followed_by_terminator(#[case] src: &str) {
    let snapshots = parse_closed(src.as_bytes(), 2);
    assert_eq!(snapshots[0].status, Status::Ok);
    // The terminator is left for the next advance.
    assert_eq!(snapshots[0].index, 4);
}

#[test]
fn sequence_of_keywords() {
    let snapshots = parse_closed(b"true false\nnull\n\n  true", 5);
    assert_eq!(
        tokens(&snapshots),
        [
            Value::Boolean(true),
            Value::Boolean(false),
            Value::Null,
            Value::Boolean(true)
        ]
    );
    let positions: Vec<_> = snapshots.iter().map(|s| (s.line, s.column)).collect();
    assert_eq!(positions, [(0, 4), (0, 10), (1, 4), (3, 6), (3, 6)]);
    assert_eq!(snapshots.last().unwrap().status, Status::EndOfInput);
}

#[test]
fn produced_values_keep_chain_depth_constant() {
    let snapshots = parse_closed(b"true true true true", 3);
    let depths: Vec<_> = snapshots.iter().map(|s| s.depth).collect();
    // Scalars replace each other under the root; the final end-of-input
    // state extends the chain by one.
    assert_eq!(depths, [1, 1, 1, 1, 2]);
}

#[test]
fn whitespace_only_never_reports_unexpected() {
    let mut doc = Document::with_segment_capacity(2).unwrap();
    doc.feed(" \n\t\r  ").unwrap();
    let id = doc.start();
    assert_eq!(doc.state(id).unwrap().status(), Status::NeedsMoreInput);

    doc.close();
    let id = doc.advance(id).unwrap();
    let state = doc.state(id).unwrap();
    assert_eq!(state.status(), Status::EndOfInput);
    assert_eq!((state.position().line(), state.position().column()), (1, 4));
}

#[test]
fn empty_closed_document_ends_immediately() {
    let snapshots = parse_closed(b"", 8);
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].status, Status::EndOfInput);
    assert_eq!(snapshots[0].index, 0);
}

#[test]
fn positions_are_canonical_for_the_segment_capacity() {
    let mut doc = Document::with_segment_capacity(5).unwrap();
    doc.feed("true ").unwrap();
    let first = doc.start();
    let position = doc.state(first).unwrap().position();
    assert_eq!(position.index(), 4);
    assert_eq!((position.segment(), position.offset()), (0, 4));

    let second = doc.advance(first).unwrap();
    let state = doc.state(second).unwrap();
    assert_eq!(state.status(), Status::NeedsMoreInput);
    assert_eq!(state.position().index(), 5);
    // Sits at the start of a segment that does not exist yet.
    assert_eq!((state.position().segment(), state.position().offset()), (1, 0));
    assert_eq!(doc.buffer().segment_count(), 1);

    doc.feed("null ").unwrap();
    let third = doc.advance(second).unwrap();
    let state = doc.state(third).unwrap();
    assert_eq!(state.token(), Some(&Value::Null));
    assert_eq!(state.position().location().segment, 1);
}
