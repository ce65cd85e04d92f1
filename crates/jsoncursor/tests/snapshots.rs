#![expect(missing_docs)]

use insta::assert_snapshot;
use jsoncursor::{Document, StateId, Status};

mod common;

fn drive(doc: &mut Document, head: &mut Option<StateId>, lines: &mut Vec<String>) {
    loop {
        let id = match *head {
            None => doc.start(),
            Some(id) => doc.advance(id).expect("head is live"),
        };
        *head = Some(id);

        let state = doc.state(id).expect("live state");
        let detail = match (state.token(), state.found()) {
            (Some(token), _) => token.to_string(),
            (None, Some(b)) => char::from(b).to_string(),
            (None, None) => "-".to_string(),
        };
        let position = state.position();
        lines.push(format!(
            "  {:?} {detail} @{} {}:{} depth={}",
            state.status(),
            position.index(),
            position.line(),
            position.column(),
            doc.depth(id).expect("live state"),
        ));

        if matches!(state.status(), Status::NeedsMoreInput | Status::EndOfInput) {
            return;
        }
    }
}

#[test]
fn snapshot_chunked_session() {
    common::init_tracing();

    let mut doc = Document::with_segment_capacity(4).unwrap();
    let mut head = None;
    let mut lines = Vec::new();
    for chunk in common::SESSION {
        lines.push(format!("feed {chunk:?}"));
        doc.feed(chunk).unwrap();
        drive(&mut doc, &mut head, &mut lines);
    }
    lines.push("close".to_string());
    doc.close();
    drive(&mut doc, &mut head, &mut lines);

    assert_snapshot!(lines.join("\n"), @r#"
    feed "nu"
      NeedsMoreInput - @0 0:0 depth=2
    feed "ll tr"
      Ok null @4 0:4 depth=1
      NeedsMoreInput - @5 0:5 depth=2
    feed "ue\nfal"
      Ok true @9 0:9 depth=1
      NeedsMoreInput - @10 1:0 depth=2
    feed "se"
      NeedsMoreInput - @10 1:0 depth=2
    feed " null"
      Ok false @15 1:5 depth=1
      NeedsMoreInput - @16 1:6 depth=2
    feed "x ?"
      UnexpectedToken x @21 1:11 depth=1
      UnexpectedToken ? @23 1:13 depth=2
      NeedsMoreInput - @23 1:13 depth=3
    close
      EndOfInput - @23 1:13 depth=3
    "#);

    let segments: Vec<String> = doc
        .buffer()
        .segments()
        .iter()
        .map(|s| format!("{s:?}"))
        .collect();
    assert_snapshot!(segments.join("\n"), @r#"
    Segment { capacity: 4, filled: 4, data: "null" }
    Segment { capacity: 4, filled: 4, data: " tru" }
    Segment { capacity: 4, filled: 4, data: "e\nfa" }
    Segment { capacity: 4, filled: 4, data: "lse " }
    Segment { capacity: 4, filled: 4, data: "null" }
    Segment { capacity: 4, filled: 3, data: "x ?" }
    "#);
}
