//! Tag kinds: the grammar metadata the parse engine dispatches on.
//!
//! A [`TagKind`] is static configuration. Each kind carries its start matcher
//! and, depending on its [`TagVariant`], either an end matcher (delimited
//! constructs such as parenthesis groups and quoted literals) or nothing more
//! (prefix constructs such as clause keywords, whose extent is decided by the
//! engine when the next sibling clause begins).

pub mod catalog;
pub mod matchers;

use std::fmt;

/// A pure matcher: given the full text and a byte position, returns the
/// position right after the match, or `None`.
///
/// Matchers only look at `text[position..]` and return `None` for positions
/// at or past the end of the text.
pub type Matcher = fn(&str, usize) -> Option<usize>;

/// How the extent of a tag is determined.
#[derive(Clone, Copy)]
pub enum TagVariant {
    /// Explicit start and end markers, e.g. `( ... )` or `' ... '`.
    Delimited {
        /// Recognizes the opening marker.
        start: Matcher,
        /// Recognizes the closing marker.
        end: Matcher,
        /// Recognizes an escaped closing marker (e.g. `''` inside `'...'`).
        /// Checked before `end` at every position.
        escape: Option<Matcher>,
        /// Closing marker written for nodes created by editing.
        close: &'static str,
        /// Opening marker written for nodes created by editing.
        open: &'static str,
        /// The end of the text also closes the tag, with an empty end marker.
        open_ended: bool,
    },
    /// Start marker only; the content runs until the next sibling clause or
    /// the end of the enclosing scope.
    Prefix {
        /// Recognizes the keyword.
        start: Matcher,
        /// Keyword written for nodes created by editing.
        keyword: &'static str,
    },
}

/// Placement rules for clause kinds that live directly under the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseRules {
    /// Relative position among sibling clauses; lower ranks come first.
    pub rank: u16,
    /// At most one instance may exist under the root.
    pub singleton: bool,
    /// Name of the clause that must already be present for this one to be
    /// inserted.
    pub requires: Option<&'static str>,
}

/// A kind of tag known to a grammar.
#[derive(Clone, Copy)]
pub struct TagKind {
    /// Identifier, also used as the lookup key.
    pub name: &'static str,
    /// Delimited or prefix behavior.
    pub variant: TagVariant,
    /// Whether the contents are parsed recursively. Quoted literals and
    /// comments keep their contents as one opaque text leaf.
    pub owns_contents: bool,
    /// Clause placement rules, for clause keywords.
    pub clause: Option<ClauseRules>,
}

impl TagKind {
    /// Tries the start matcher at `position`.
    #[must_use]
    pub fn match_start(&self, text: &str, position: usize) -> Option<usize> {
        match self.variant {
            TagVariant::Delimited { start, .. } | TagVariant::Prefix { start, .. } => {
                start(text, position)
            }
        }
    }

    /// Tries the end matcher at `position`. Prefix kinds never match.
    #[must_use]
    pub fn match_end(&self, text: &str, position: usize) -> Option<usize> {
        match self.variant {
            TagVariant::Delimited { end, .. } => end(text, position),
            TagVariant::Prefix { .. } => None,
        }
    }

    /// Tries the escape matcher at `position`, if the kind has one.
    #[must_use]
    pub fn match_escape(&self, text: &str, position: usize) -> Option<usize> {
        match self.variant {
            TagVariant::Delimited {
                escape: Some(escape),
                ..
            } => escape(text, position),
            _ => None,
        }
    }

    /// Returns true for delimited kinds.
    #[must_use]
    pub const fn is_delimited(&self) -> bool {
        matches!(self.variant, TagVariant::Delimited { .. })
    }

    /// Returns true for delimited kinds closed by the end of the text.
    #[must_use]
    pub const fn is_open_ended(&self) -> bool {
        matches!(
            self.variant,
            TagVariant::Delimited {
                open_ended: true,
                ..
            }
        )
    }

    /// Returns true for prefix kinds.
    #[must_use]
    pub const fn is_prefix(&self) -> bool {
        matches!(self.variant, TagVariant::Prefix { .. })
    }

    /// Returns true for clause kinds allowed at most once under the root.
    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.clause.is_some_and(|rules| rules.singleton)
    }

    /// Structural rank, for clause kinds.
    #[must_use]
    pub fn rank(&self) -> Option<u16> {
        self.clause.map(|rules| rules.rank)
    }

    /// Appends the canonical start marker to `output`.
    pub fn write_start(&self, output: &mut String) {
        match self.variant {
            TagVariant::Delimited { open, .. } => output.push_str(open),
            TagVariant::Prefix { keyword, .. } => output.push_str(keyword),
        }
    }

    /// Appends the canonical end marker to `output`. Prefix kinds write nothing.
    pub fn write_end(&self, output: &mut String) {
        if let TagVariant::Delimited { close, .. } = self.variant {
            output.push_str(close);
        }
    }
}

impl PartialEq for TagKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TagKind {}

impl fmt::Debug for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self.variant {
            TagVariant::Delimited { .. } => "Delimited",
            TagVariant::Prefix { .. } => "Prefix",
        };
        f.debug_struct("TagKind")
            .field("name", &self.name)
            .field("variant", &variant)
            .field("owns_contents", &self.owns_contents)
            .field("clause", &self.clause)
            .finish()
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
