//! Source location tracking for parsed tags.

use std::ops::Range;

use serde::Serialize;

/// A byte range `[start, end)` in the text a tree was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns the slice of `text` covered by this span, if it is in bounds.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(3, 3).is_empty());
    }

    #[test]
    fn test_span_contains() {
        let outer = Span::new(0, 10);
        assert!(outer.contains(Span::new(2, 4)));
        assert!(outer.contains(outer));
        assert!(!outer.contains(Span::new(8, 12)));
    }

    #[test]
    fn test_span_slice() {
        let text = "SELECT a FROM b";
        assert_eq!(Span::new(9, 13).slice(text), Some("FROM"));
        assert_eq!(Span::new(9, 99).slice(text), None);
    }

    #[test]
    fn test_span_from_range() {
        assert_eq!(Span::from(2..7), Span::new(2, 7));
    }
}
