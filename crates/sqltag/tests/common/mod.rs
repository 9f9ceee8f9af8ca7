#![allow(dead_code)]

use sqltag::{ClauseKind, Document, Error, ParseError};

pub fn parse(sql: &str) -> Document {
    sqltag::parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> Error {
    sqltag::parse(sql).expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn malformed(sql: &str) -> ParseError {
    match parse_err(sql) {
        Error::MalformedInput(e) => e,
        other => panic!("Expected MalformedInput for: {sql}, got {other:?}"),
    }
}

/// Verifies exact reconstruction, and that re-parsing the output
/// reconstructs the same text again.
pub fn round_trip(sql: &str) {
    let rendered1 = parse(sql).to_text();
    assert_eq!(rendered1, sql, "Round-trip changed the text");
    let rendered2 = parse(&rendered1).to_text();
    assert_eq!(
        rendered1, rendered2,
        "Re-parse failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

/// Applies `text` to `clause` and returns the resulting statement.
pub fn with_clause(sql: &str, clause: ClauseKind, text: &str) -> String {
    let mut doc = parse(sql);
    doc.set_clause(clause, text)
        .unwrap_or_else(|e| panic!("Failed to set {clause} on: {sql}\nError: {e:?}"));
    doc.to_text()
}

/// Names of the tag nodes directly under the root.
pub fn top_level(doc: &Document) -> Vec<&'static str> {
    let tree = doc.tree();
    tree.top_level_tags()
        .filter_map(|id| tree.node(id).ok().and_then(|n| n.kind()).map(|k| k.name))
        .collect()
}
