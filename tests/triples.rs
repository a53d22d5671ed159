use std::io::Write;

use cord_miner::nlp::openie::{analyze_file, filter_file};
use cord_miner::nlp::triples::{parse_triples, triples_to_line, Span, Triple};
use tempfile::NamedTempFile;

#[test]
fn span_round_trips_through_the_wire_format() {
    let span = Span::parse("flu#3,10").unwrap();
    assert_eq!(span.text, "flu");
    assert_eq!((span.start, span.end), (3, 10));
    assert_eq!(span.len(), 7);
    assert_eq!(span.to_string(), "flu#3,10");
}

#[test]
fn triple_round_trips_through_the_wire_format() {
    let raw = "a virus#0,7|||causes#8,14|||fatigue#15,22";
    let triple = Triple::parse(raw).unwrap();
    assert_eq!(triple.subject.text, "a virus");
    assert_eq!(triple.relation.text, "causes");
    assert_eq!(triple.object.text, "fatigue");
    assert_eq!(triple.to_string(), raw);
}

#[test]
fn triple_lines_round_trip() {
    let line = "a#0,1|||r#2,3|||b#4,5\tc#0,1|||s#2,3|||d#4,5";
    let triples = parse_triples(line).unwrap();
    assert_eq!(triples.len(), 2);
    assert_eq!(triples_to_line(&triples), line);
}

#[test]
fn empty_line_holds_no_triples() {
    assert!(parse_triples("").unwrap().is_empty());
}

#[test]
fn malformed_spans_and_triples_are_rejected() {
    assert!(Span::parse("flu").is_err());
    assert!(Span::parse("flu#three,ten").is_err());
    assert!(Triple::parse("a#0,1|||b#2,3").is_err());
}

#[test]
fn filter_keeps_the_most_compact_triple() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(
        input,
        "doc1\tA#0,5|||r#6,7|||b#8,20\tA#0,2|||r#3,4|||b#5,6"
    )
    .unwrap();
    input.flush().unwrap();
    let output = NamedTempFile::new().unwrap();

    filter_file(input.path(), output.path()).unwrap();
    let written = std::fs::read_to_string(output.path()).unwrap();
    assert_eq!(written, "doc1\tA#0,2|||r#3,4|||b#5,6\n");
}

#[test]
fn analyze_counts_relations_and_prunes_stopwords() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(input, "x#0,1|||causes#0,6|||y#0,1").unwrap();
    writeln!(input, "x#0,1|||causes#0,6|||z#0,1").unwrap();
    writeln!(input, "x#0,1|||is#0,2|||y#0,1").unwrap();
    input.flush().unwrap();
    let output = NamedTempFile::new().unwrap();

    analyze_file(input.path(), output.path()).unwrap();
    let written = std::fs::read_to_string(output.path()).unwrap();
    assert_eq!(written, "causes\t2\n", "stopword relation should be pruned");
}
