//! Parsed statements and clause-level editing.

use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::grammar::{Grammar, SqlGrammar};
use crate::parser::parse_with;
use crate::tag::TagKind;
use crate::tree::{NodeId, ParseTree};

/// The clauses that may appear at most once at the top level of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    From,
    Where,
    StartWith,
    GroupBy,
    OrderBy,
    ForUpdate,
}

impl ClauseKind {
    /// All clause kinds, in statement order.
    pub const ALL: [Self; 6] = [
        Self::From,
        Self::Where,
        Self::StartWith,
        Self::GroupBy,
        Self::OrderBy,
        Self::ForUpdate,
    ];

    /// Name of the tag kind backing this clause.
    #[must_use]
    pub const fn tag_name(self) -> &'static str {
        match self {
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::StartWith => "START WITH",
            Self::GroupBy => "GROUP BY",
            Self::OrderBy => "ORDER BY",
            Self::ForUpdate => "FOR UPDATE",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// A parsed statement.
///
/// Owns its tree exclusively; edits take `&mut self`, so they are serialized
/// by construction. Re-parse to start over.
#[derive(Debug, Clone)]
pub struct Document<G: Grammar = SqlGrammar> {
    tree: ParseTree,
    grammar: G,
}

impl<G: Grammar> Document<G> {
    pub(crate) const fn new(tree: ParseTree, grammar: G) -> Self {
        Self { tree, grammar }
    }

    /// Parses `text` with `grammar`. Same as [`crate::parse_with`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] for unterminated delimited tags and
    /// repeated singleton clauses.
    pub fn parse(text: &str, grammar: G) -> Result<Self> {
        parse_with(text, grammar)
    }

    /// Returns the parse tree.
    #[must_use]
    pub const fn tree(&self) -> &ParseTree {
        &self.tree
    }

    /// Returns the grammar.
    #[must_use]
    pub const fn grammar(&self) -> &G {
        &self.grammar
    }

    /// Reconstructs the statement text.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.tree.to_text()
    }

    /// Returns true if the clause is present.
    #[must_use]
    pub fn has_clause(&self, clause: ClauseKind) -> bool {
        self.clause_node(clause).is_some()
    }

    /// Returns the body of a clause, without its keyword. Empty when the
    /// clause is absent.
    #[must_use]
    pub fn get_clause(&self, clause: ClauseKind) -> String {
        self.clause_node(clause)
            .and_then(|id| self.tree.text_of(id).ok())
            .unwrap_or_default()
    }

    /// Sets the body of a clause. An empty `text` removes the clause.
    ///
    /// An absent clause is inserted at the position SQL clause order
    /// requires. The text is parsed before anything changes, so a failed
    /// call leaves the document as it was.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedInput`] if `text` does not parse
    /// - [`Error::InvalidArgument`] if `text` contains another top-level
    ///   clause, or the grammar has no tag for `clause`
    /// - [`Error::StructuralPrecondition`] if the clause must follow a clause
    ///   that is absent (WHERE without FROM)
    pub fn set_clause(&mut self, clause: ClauseKind, text: &str) -> Result<()> {
        let kind = self.clause_kind(clause)?;

        if text.is_empty() {
            if let Some(id) = self.tree.find_singleton(kind) {
                self.tree.remove(id)?;
                debug!(clause = kind.name, "removed clause");
            }
            return Ok(());
        }

        // Edit a copy so a rejected body never leaves an empty clause behind.
        let mut scratch = self.tree.clone();
        let id = match scratch.find_singleton(kind) {
            Some(id) => id,
            None => {
                let id = scratch.insert_at_rank(kind)?;
                debug!(clause = kind.name, "inserted clause");
                id
            }
        };
        scratch.replace_contents(id, text, &self.grammar)?;
        self.tree = scratch;
        debug!(clause = kind.name, len = text.len(), "replaced clause body");
        Ok(())
    }

    /// Returns the WHERE clause body.
    #[must_use]
    pub fn where_clause(&self) -> String {
        self.get_clause(ClauseKind::Where)
    }

    /// Sets the WHERE clause body; empty removes it.
    ///
    /// # Errors
    ///
    /// See [`Document::set_clause`].
    pub fn set_where_clause(&mut self, text: &str) -> Result<()> {
        self.set_clause(ClauseKind::Where, text)
    }

    /// Returns the ORDER BY clause body.
    #[must_use]
    pub fn order_by_clause(&self) -> String {
        self.get_clause(ClauseKind::OrderBy)
    }

    /// Sets the ORDER BY clause body; empty removes it.
    ///
    /// # Errors
    ///
    /// See [`Document::set_clause`].
    pub fn set_order_by_clause(&mut self, text: &str) -> Result<()> {
        self.set_clause(ClauseKind::OrderBy, text)
    }

    fn clause_node(&self, clause: ClauseKind) -> Option<NodeId> {
        let kind = self.grammar.find_tag(clause.tag_name())?;
        self.tree.find_singleton(kind)
    }

    fn clause_kind(&self, clause: ClauseKind) -> Result<&'static TagKind> {
        self.grammar.find_tag(clause.tag_name()).ok_or_else(|| {
            Error::invalid_argument(format!(
                "grammar {} has no {clause} tag",
                self.grammar.name()
            ))
        })
    }
}

impl<G: Grammar> fmt::Display for Document<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
