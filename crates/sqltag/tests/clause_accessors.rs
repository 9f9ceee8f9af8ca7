//! Tests for reading, inserting, replacing and removing clauses.

mod common;
use common::*;

use sqltag::{ClauseKind, Error};

#[test]
fn get_missing_where_is_empty() {
    let doc = parse("SELECT a FROM b");
    assert_eq!(doc.get_clause(ClauseKind::Where), "");
}

#[test]
fn get_existing_clauses() {
    let doc = parse("SELECT a FROM t WHERE x = 1 GROUP BY a ORDER BY a DESC FOR UPDATE NOWAIT");
    assert_eq!(doc.get_clause(ClauseKind::From), "t");
    assert_eq!(doc.get_clause(ClauseKind::Where), "x = 1");
    assert_eq!(doc.get_clause(ClauseKind::GroupBy), "a");
    assert_eq!(doc.get_clause(ClauseKind::OrderBy), "a DESC");
    assert_eq!(doc.get_clause(ClauseKind::ForUpdate), "NOWAIT");
}

#[test]
fn get_clause_is_trimmed() {
    let doc = parse("SELECT a FROM t WHERE   x = 1  \n ORDER BY a  ");
    assert_eq!(doc.where_clause(), "x = 1");
    assert_eq!(doc.order_by_clause(), "a");
}

#[test]
fn set_where_on_statement_without_where() {
    let mut doc = parse("SELECT a FROM b");
    doc.set_clause(ClauseKind::Where, "c=1").unwrap();
    assert_eq!(doc.get_clause(ClauseKind::Where), "c=1");
    assert_eq!(doc.to_text(), "SELECT a FROM b WHERE c=1");
}

#[test]
fn set_where_lands_right_after_from() {
    assert_eq!(
        with_clause("SELECT a FROM t GROUP BY a ORDER BY a", ClauseKind::Where, "x > 2"),
        "SELECT a FROM t WHERE x > 2 GROUP BY a ORDER BY a"
    );
    assert_eq!(
        with_clause("SELECT a FROM t START WITH p IS NULL", ClauseKind::Where, "x > 2"),
        "SELECT a FROM t WHERE x > 2 START WITH p IS NULL"
    );
}

#[test]
fn set_order_by_before_for_update() {
    assert_eq!(
        with_clause("SELECT a FROM t FOR UPDATE", ClauseKind::OrderBy, "a DESC"),
        "SELECT a FROM t ORDER BY a DESC FOR UPDATE"
    );
}

#[test]
fn set_order_by_appended_last() {
    assert_eq!(
        with_clause("SELECT a FROM t WHERE x = 1", ClauseKind::OrderBy, "a"),
        "SELECT a FROM t WHERE x = 1 ORDER BY a"
    );
    assert_eq!(
        with_clause("SELECT a FROM t\n", ClauseKind::OrderBy, "a"),
        "SELECT a FROM t ORDER BY a\n"
    );
}

#[test]
fn set_group_by_and_start_with_order() {
    let mut doc = parse("SELECT a FROM t WHERE x = 1 ORDER BY a");
    doc.set_clause(ClauseKind::GroupBy, "a").unwrap();
    doc.set_clause(ClauseKind::StartWith, "p IS NULL").unwrap();
    assert_eq!(
        doc.to_text(),
        "SELECT a FROM t WHERE x = 1 START WITH p IS NULL GROUP BY a ORDER BY a"
    );
}

#[test]
fn set_for_update_appended() {
    assert_eq!(
        with_clause("SELECT a FROM t ORDER BY a", ClauseKind::ForUpdate, "NOWAIT"),
        "SELECT a FROM t ORDER BY a FOR UPDATE NOWAIT"
    );
}

#[test]
fn replace_existing_where() {
    let mut doc = parse("select a from t where x = 1 order by a");
    doc.set_where_clause("y = 'it''s'").unwrap();
    assert_eq!(doc.to_text(), "select a from t where y = 'it''s' order by a");
    assert_eq!(doc.where_clause(), "y = 'it''s'");
}

#[test]
fn replace_keeps_nested_structure() {
    let mut doc = parse("SELECT a FROM t WHERE x = 1");
    doc.set_where_clause("x IN (SELECT y FROM u WHERE z = 2)").unwrap();
    assert_eq!(top_level(&doc), vec!["SELECT", "FROM", "WHERE"]);
    assert_eq!(doc.where_clause(), "x IN (SELECT y FROM u WHERE z = 2)");
}

#[test]
fn remove_where() {
    let mut doc = parse("SELECT a FROM t WHERE x=1");
    doc.set_clause(ClauseKind::Where, "").unwrap();
    assert_eq!(doc.to_text(), "SELECT a FROM t");
    assert_eq!(doc.get_clause(ClauseKind::Where), "");
}

#[test]
fn remove_middle_clause() {
    let mut doc = parse("SELECT a FROM t WHERE x=1 ORDER BY a FOR UPDATE");
    doc.set_order_by_clause("").unwrap();
    assert_eq!(doc.to_text(), "SELECT a FROM t WHERE x=1 FOR UPDATE");
}

#[test]
fn remove_then_insert_again() {
    let mut doc = parse("SELECT a FROM t WHERE x=1 ORDER BY a");
    doc.set_where_clause("").unwrap();
    doc.set_where_clause("y=2").unwrap();
    assert_eq!(doc.to_text(), "SELECT a FROM t WHERE y=2 ORDER BY a");
}

#[test]
fn repeated_edits_keep_the_arena_small() {
    let mut doc = parse("SELECT a FROM t");
    for i in 0..1000 {
        doc.set_where_clause(&format!("x = {i}")).unwrap();
        if i % 3 == 1 {
            doc.set_where_clause("").unwrap();
        }
    }
    assert_eq!(doc.to_text(), "SELECT a FROM t WHERE x = 999");
    let tree = doc.tree();
    let highest = tree
        .descendants(tree.root())
        .unwrap()
        .into_iter()
        .map(sqltag::NodeId::index)
        .max()
        .unwrap();
    assert!(highest < 16, "arena grew to slot {highest}");
}

#[test]
fn where_without_from_fails() {
    let mut doc = parse("SELECT 1");
    let err = doc.set_clause(ClauseKind::Where, "x = 1").unwrap_err();
    assert_eq!(
        err,
        Error::StructuralPrecondition {
            clause: "WHERE",
            required: "FROM"
        }
    );
    assert_eq!(doc.to_text(), "SELECT 1");
}

#[test]
fn order_by_without_from_is_allowed() {
    assert_eq!(
        with_clause("SELECT 1", ClauseKind::OrderBy, "1"),
        "SELECT 1 ORDER BY 1"
    );
}

#[test]
fn malformed_clause_text_rejected() {
    let mut doc = parse("SELECT a FROM t WHERE x = 1");
    let err = doc.set_where_clause("x = (1").unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));
    assert_eq!(doc.to_text(), "SELECT a FROM t WHERE x = 1");
}

#[test]
fn clause_text_with_sibling_clause_rejected() {
    let mut doc = parse("SELECT a FROM t");
    let err = doc.set_where_clause("x = 1 ORDER BY a").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(doc.to_text(), "SELECT a FROM t");
    assert!(!doc.has_clause(ClauseKind::Where));
}

#[test]
fn set_clause_text_kept_verbatim() {
    let mut doc = parse("SELECT a FROM t");
    doc.set_where_clause("  x = 1 ").unwrap();
    assert_eq!(doc.where_clause(), "  x = 1 ");
}

#[test]
fn edited_document_reparses_identically() {
    let mut doc = parse("SELECT a FROM t FOR UPDATE");
    doc.set_where_clause("b = 'x'").unwrap();
    doc.set_order_by_clause("a").unwrap();
    let text = doc.to_text();
    assert_eq!(text, "SELECT a FROM t WHERE b = 'x' ORDER BY a FOR UPDATE");
    round_trip(&text);
    let reparsed = parse(&text);
    assert_eq!(reparsed.where_clause(), "b = 'x'");
    assert_eq!(reparsed.order_by_clause(), "a");
}

#[test]
fn verbatim_whitespace_grammar() {
    let grammar = sqltag::SqlGrammar::new().with_whitespace_skipping(false);
    let mut doc = sqltag::parse_with("SELECT a FROM t WHERE x = 1", grammar).unwrap();
    assert_eq!(doc.where_clause(), " x = 1");
    doc.set_order_by_clause("a").unwrap();
    assert_eq!(doc.to_text(), "SELECT a FROM t WHERE x = 1 ORDER BY a");
    assert_eq!(doc.order_by_clause(), "a");
}
