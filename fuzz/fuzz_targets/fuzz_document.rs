#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use jsoncursor::{Document, ParseState, StateId, Status, Value};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 5; // 1 capacity byte + 4-byte split seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[b" ", b"\t", b"\n", b"\r", b"\r\n"];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Mostly well-formed input: keywords, damaged keywords and stray bytes,
/// separated by whitespace.
#[derive(Debug, Arbitrary)]
enum Token {
    Null,
    True,
    False,
    /// A keyword cut short or with a wrong byte spliced in.
    Damaged(u8, u8),
    Stray(u8),
}

impl Token {
    fn write(&self, out: &mut Vec<u8>) {
        const KEYWORDS: [&[u8]; 3] = [b"null", b"true", b"false"];
        match *self {
            Token::Null => out.extend_from_slice(KEYWORDS[0]),
            Token::True => out.extend_from_slice(KEYWORDS[1]),
            Token::False => out.extend_from_slice(KEYWORDS[2]),
            Token::Damaged(which, byte) => {
                let keyword = KEYWORDS[usize::from(which) % KEYWORDS.len()];
                let cut = usize::from(byte) % keyword.len();
                out.extend_from_slice(&keyword[..cut]);
                out.push(byte);
            }
            Token::Stray(byte) => out.push(byte),
        }
    }
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if max_size < HEADER {
        return fuzzer_mutate(data, size, max_size);
    }
    if size >= HEADER && !seed.is_multiple_of(10) {
        return fuzzer_mutate(data, size, max_size);
    }

    data[0] = with_rng(|rng| rng.next_u32() as u8);
    data[1..HEADER].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

    let mut body = Vec::new();
    let raw: Vec<u8> = with_rng(|rng| (0..max_size).map(|_| rng.random::<u8>()).collect());
    let mut u = Unstructured::new(&raw);
    while HEADER + body.len() < max_size {
        let Ok(token) = Token::arbitrary(&mut u) else {
            break;
        };
        token.write(&mut body);
        let ws = WS_TABLE[with_rng(|rng| rng.random_range(0..WS_TABLE.len()))];
        body.extend_from_slice(ws);
    }

    let len = body.len().min(max_size - HEADER);
    data[HEADER..HEADER + len].copy_from_slice(&body[..len]);
    HEADER + len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// Drives `doc` from `head` until it runs out of input, recording every
/// state that is not a transient need-more-input state.
fn drain(doc: &mut Document, head: &mut Option<StateId>, committed: &mut Vec<ParseState>) {
    loop {
        let id = match *head {
            None => doc.start(),
            Some(id) => doc.advance(id).unwrap(),
        };
        *head = Some(id);
        let state = doc.state(id).unwrap();
        match state.status() {
            Status::NeedsMoreInput => return,
            Status::EndOfInput | Status::Error => {
                committed.push(state.clone());
                return;
            }
            Status::Ok | Status::UnexpectedToken => committed.push(state.clone()),
        }
    }
}

/// Feeds every chunk, closes, then parses: only the chunk boundaries differ
/// between runs.
fn parse_closed(chunks: &[&[u8]], capacity: usize) -> (Vec<u8>, Vec<ParseState>) {
    let mut doc = Document::with_segment_capacity(capacity).unwrap();
    for chunk in chunks {
        doc.feed(chunk).unwrap();
    }
    doc.close();
    let mut committed = Vec::new();
    drain(&mut doc, &mut None, &mut committed);
    (doc.extract(0..doc.len()).unwrap(), committed)
}

/// Advances after every chunk, suspending and resuming around keywords.
fn parse_interleaved(chunks: &[&[u8]], capacity: usize) -> Vec<ParseState> {
    let mut doc = Document::with_segment_capacity(capacity).unwrap();
    let mut head = None;
    let mut committed = Vec::new();
    for chunk in chunks {
        doc.feed(chunk).unwrap();
        drain(&mut doc, &mut head, &mut committed);
    }
    doc.close();
    drain(&mut doc, &mut head, &mut committed);
    committed
}

fn strip(states: &[ParseState]) -> Vec<(Status, Option<Value>, usize, Option<u8>)> {
    states
        .iter()
        .map(|s| (s.status(), s.token().cloned(), s.position().index(), s.found()))
        .collect()
}

fn document(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let capacity = 1 + usize::from(data[0] % 32);
    let split_seed = u64::from(u32::from_le_bytes(data[1..HEADER].try_into().unwrap()));
    let data = &data[HEADER..];
    let chunks = split_into_chunks(data, split_seed);

    let (bytes, chunked) = parse_closed(&chunks, capacity);
    assert_eq!(bytes, data, "buffer contents depend on chunking");
    let (_, whole) = parse_closed(&[data], 4096);
    assert_eq!(strip(&chunked), strip(&whole), "parse depends on chunking");

    let interleaved = parse_interleaved(&chunks, capacity);
    assert_eq!(
        strip(&interleaved),
        strip(&whole),
        "advancing between chunks commits different states"
    );
    assert!(
        interleaved
            .windows(2)
            .all(|w| w[0].position().index() <= w[1].position().index()),
        "committed positions moved backwards"
    );
    assert!(
        !interleaved.iter().any(|s| s.status() == Status::Error),
        "invariant error on well-fed input"
    );
    assert_eq!(
        interleaved.last().map(ParseState::status),
        Some(Status::EndOfInput),
        "closed document did not reach end of input"
    );
}

fuzz_target!(|data: &[u8]| document(data));

/// Splits `data` into non-empty chunks whose sizes derive from `split_seed`.
fn split_into_chunks(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut seed = split_seed;
    while start < data.len() {
        let remaining = data.len() - start;
        let size = (seed as usize % remaining) + 1;
        chunks.push(&data[start..start + size]);
        start += size;
        seed = seed.rotate_left(7) ^ 0x9e37_79b9;
    }
    chunks
}
