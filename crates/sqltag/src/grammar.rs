//! Grammar configuration.
//!
//! A grammar supplies the ordered tag catalog and the options the parse
//! engine honors. Most callers use [`SqlGrammar`].

use crate::tag::catalog::SQL_TAGS;
use crate::tag::TagKind;

/// Trait for grammar-specific behavior.
pub trait Grammar {
    /// Returns the name of the grammar.
    fn name(&self) -> &'static str;

    /// Returns the tag kinds in dispatch priority order.
    fn tags(&self) -> &'static [&'static TagKind];

    /// Whether whitespace is insignificant between tags.
    ///
    /// When enabled, whitespace is still kept in the tree, but the whitespace
    /// after a clause keyword and at the end of a clause body is kept outside
    /// the clause body, so clause text comes back trimmed.
    fn skip_whitespace(&self) -> bool {
        true
    }

    /// Looks up a tag kind by name.
    fn find_tag(&self, name: &str) -> Option<&'static TagKind> {
        self.tags().iter().copied().find(|kind| kind.name == name)
    }

    /// Returns the first tag kind whose start matcher accepts at `position`.
    fn match_tag(&self, text: &str, position: usize) -> Option<(&'static TagKind, usize)> {
        self.tags()
            .iter()
            .find_map(|kind| kind.match_start(text, position).map(|end| (*kind, end)))
    }

    /// Returns the prefix tag kind starting at `position`, if any. Prefix
    /// kinds end the content of the prefix tag before them.
    fn match_sibling(&self, text: &str, position: usize) -> Option<&'static TagKind> {
        self.tags()
            .iter()
            .copied()
            .filter(|kind| kind.is_prefix())
            .find(|kind| kind.match_start(text, position).is_some())
    }
}

/// The SQL clause grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlGrammar {
    skip_whitespace: bool,
}

impl SqlGrammar {
    /// Creates the grammar with whitespace skipping enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            skip_whitespace: true,
        }
    }

    /// Enables or disables whitespace skipping.
    #[must_use]
    pub const fn with_whitespace_skipping(mut self, enabled: bool) -> Self {
        self.skip_whitespace = enabled;
        self
    }
}

impl Default for SqlGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar for SqlGrammar {
    fn name(&self) -> &'static str {
        "sql"
    }

    fn tags(&self) -> &'static [&'static TagKind] {
        SQL_TAGS
    }

    fn skip_whitespace(&self) -> bool {
        self.skip_whitespace
    }
}
