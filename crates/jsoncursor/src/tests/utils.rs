use alloc::vec::Vec;

use crate::{Document, StateId, Status, Value};

/// A parse state stripped of its arena identity, so runs can be compared.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) status: Status,
    pub(crate) token: Option<Value>,
    pub(crate) index: usize,
    pub(crate) line: usize,
    pub(crate) column: usize,
    pub(crate) found: Option<u8>,
    pub(crate) depth: usize,
}

pub(crate) fn snapshot(doc: &Document, id: StateId) -> Snapshot {
    let state = doc.state(id).expect("live state");
    let position = state.position();
    Snapshot {
        status: state.status(),
        token: state.token().cloned(),
        index: position.index(),
        line: position.line(),
        column: position.column(),
        found: state.found(),
        depth: doc.depth(id).expect("live state"),
    }
}

/// Splits `src` into chunks whose sizes are derived from `splits`.
pub(crate) fn partition<'a>(src: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    let mut rest = src;
    for s in splits {
        if rest.is_empty() {
            break;
        }
        let size = 1 + s % rest.len();
        let (head, tail) = rest.split_at(size);
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

/// Advances from `head` until the cursor suspends or the input ends,
/// recording every state that is not suspended. Unexpected tokens are
/// recorded and stepped past.
pub(crate) fn drain(doc: &mut Document, head: &mut Option<StateId>, out: &mut Vec<Snapshot>) {
    loop {
        let id = match *head {
            None => doc.start(),
            Some(id) => doc.advance(id).expect("head is live"),
        };
        *head = Some(id);

        let status = doc.state(id).expect("live state").status();
        if status == Status::NeedsMoreInput {
            return;
        }
        out.push(snapshot(doc, id));
        if matches!(status, Status::EndOfInput | Status::Error) {
            return;
        }
    }
}

/// Parses a closed document to the end, stepping past unexpected tokens.
pub(crate) fn parse_all(doc: &mut Document) -> Vec<Snapshot> {
    assert!(doc.is_closed());
    let mut out = Vec::new();
    let mut id = doc.start();
    loop {
        out.push(snapshot(doc, id));
        let status = doc.state(id).expect("live state").status();
        if matches!(status, Status::EndOfInput | Status::Error) {
            return out;
        }
        id = doc.advance(id).expect("head is live");
    }
}

/// Feeds `src` in one go, closes the document, and parses it to the end.
pub(crate) fn parse_closed(src: &[u8], capacity: usize) -> Vec<Snapshot> {
    let mut doc = Document::with_segment_capacity(capacity).expect("positive capacity");
    doc.feed(src).expect("open document");
    doc.close();
    parse_all(&mut doc)
}

#[test]
fn partition_covers_input() {
    let src = b"true false";
    let chunks = partition(src, &[2, 0, 7]);
    let expected: [&[u8]; 4] = [b"tru", b"e", b" f", b"alse"];
    assert_eq!(chunks, expected);
    assert_eq!(chunks.concat(), src);
}
