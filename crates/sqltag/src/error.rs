//! Error types.

use crate::span::Span;

/// Describes where and why input text could not be turned into a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {}..{}", .span.start, .span.end)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the offending tag's start marker.
    pub span: Span,
    /// Name of the tag kind involved.
    pub tag: &'static str,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, tag: &'static str, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            tag,
        }
    }

    /// A delimited tag whose end marker never showed up before its scope ended.
    #[must_use]
    pub fn unterminated(tag: &'static str, span: Span) -> Self {
        Self::new(format!("Unterminated {tag}"), tag, span)
    }

    /// Tags nested deeper than `limit`.
    #[must_use]
    pub fn too_deep(tag: &'static str, span: Span, limit: usize) -> Self {
        Self::new(format!("{tag} nested deeper than {limit} levels"), tag, span)
    }

    /// A singleton clause that appears twice at the top level.
    #[must_use]
    pub fn duplicate_clause(tag: &'static str, span: Span) -> Self {
        Self::new(format!("Duplicate {tag} clause"), tag, span)
    }
}

/// Errors reported by parsing and tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The text is not a well-formed statement.
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] ParseError),

    /// A caller passed an argument the operation cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A clause cannot be inserted because a clause it depends on is absent.
    #[error("Cannot insert {clause} clause: no {required} clause present")]
    StructuralPrecondition {
        /// The clause being inserted.
        clause: &'static str,
        /// The clause it must follow.
        required: &'static str,
    },
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, Error>;
