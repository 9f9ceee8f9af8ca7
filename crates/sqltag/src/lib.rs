//! # sqltag
//!
//! A lossless SQL clause tree with clause-level editing.
//!
//! This crate provides:
//! - A priority-ordered tag engine that splits a statement into clause tags,
//!   parenthesis groups, quoted literals and literal text
//! - Exact reconstruction: `parse(sql)?.to_text() == sql`
//! - Get/set access to individual clauses, keeping SQL clause order when a
//!   clause is added
//!
//! ## Editing clauses
//!
//! ```rust
//! use sqltag::{parse, ClauseKind};
//!
//! let mut doc = parse("SELECT a FROM t FOR UPDATE")?;
//! assert_eq!(doc.get_clause(ClauseKind::Where), "");
//!
//! doc.set_clause(ClauseKind::OrderBy, "a DESC")?;
//! assert_eq!(doc.to_text(), "SELECT a FROM t ORDER BY a DESC FOR UPDATE");
//!
//! // Empty text removes the clause.
//! doc.set_clause(ClauseKind::OrderBy, "")?;
//! assert_eq!(doc.to_text(), "SELECT a FROM t FOR UPDATE");
//! # Ok::<(), sqltag::Error>(())
//! ```
//!
//! ## Malformed input
//!
//! Unterminated literals and unbalanced parentheses are rejected:
//!
//! ```rust
//! use sqltag::{parse, Error};
//!
//! let err = parse("SELECT a FROM t WHERE x='unterminated").unwrap_err();
//! assert!(matches!(err, Error::MalformedInput(_)));
//! ```

pub mod document;
pub mod error;
pub mod grammar;
pub mod parser;
pub mod snapshot;
pub mod span;
pub mod tag;
pub mod tree;

pub use document::{ClauseKind, Document};
pub use error::{Error, ParseError, Result};
pub use grammar::{Grammar, SqlGrammar};
pub use parser::{is_tag_at, is_tag_at_with, parse, parse_with, MAX_DEPTH};
pub use snapshot::NodeSnapshot;
pub use span::Span;
pub use tag::{ClauseRules, Matcher, TagKind, TagVariant};
pub use tree::{Node, NodeData, NodeId, ParseTree, TagData};
