//! Parsing entry points.
//!
//! [`parse`] turns a statement into a [`Document`]; [`is_tag_at`] exposes the
//! single-position dispatch the engine uses, for tooling.

mod engine;

pub use engine::MAX_DEPTH;
pub(crate) use engine::{Element, Engine};

use tracing::debug;

use crate::document::Document;
use crate::error::{Error, ParseError, Result};
use crate::grammar::{Grammar, SqlGrammar};
use crate::span::Span;
use crate::tag::TagKind;
use crate::tree::ParseTree;

/// Parses a SQL statement with the default [`SqlGrammar`].
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if a delimited tag is never closed or a
/// singleton clause appears twice at the top level.
pub fn parse(text: &str) -> Result<Document> {
    parse_with(text, SqlGrammar::new())
}

/// Parses a statement with the given grammar.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with<G: Grammar>(text: &str, grammar: G) -> Result<Document<G>> {
    let elements = Engine::new(&grammar, text).parse_statement()?;
    check_singletons(&elements)?;
    debug!(
        grammar = grammar.name(),
        len = text.len(),
        top_level = elements.len(),
        "parsed statement"
    );
    let tree = ParseTree::from_elements(elements, Span::new(0, text.len()));
    Ok(Document::new(tree, grammar))
}

/// Returns the tag kind whose start marker begins at `position`, using the
/// default grammar.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `position` is past the end of `text`
/// or not on a character boundary.
pub fn is_tag_at(text: &str, position: usize) -> Result<Option<&'static TagKind>> {
    is_tag_at_with(&SqlGrammar::new(), text, position)
}

/// Like [`is_tag_at`], with an explicit grammar.
///
/// # Errors
///
/// See [`is_tag_at`].
pub fn is_tag_at_with<G: Grammar + ?Sized>(
    grammar: &G,
    text: &str,
    position: usize,
) -> Result<Option<&'static TagKind>> {
    check_position(text, position)?;
    Ok(grammar.match_tag(text, position).map(|(kind, _)| kind))
}

pub(crate) fn check_position(text: &str, position: usize) -> Result<()> {
    if position > text.len() {
        return Err(Error::invalid_argument(format!(
            "position {position} is out of range for text of length {}",
            text.len()
        )));
    }
    if !text.is_char_boundary(position) {
        return Err(Error::invalid_argument(format!(
            "position {position} is not on a character boundary"
        )));
    }
    Ok(())
}

fn check_singletons(elements: &[Element]) -> std::result::Result<(), ParseError> {
    let mut seen: Vec<&'static str> = Vec::new();
    for element in elements {
        if let Element::Tag { kind, span, .. } = element {
            if !kind.is_singleton() {
                continue;
            }
            if seen.contains(&kind.name) {
                return Err(ParseError::duplicate_clause(kind.name, *span));
            }
            seen.push(kind.name);
        }
    }
    Ok(())
}
