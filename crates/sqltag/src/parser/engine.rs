//! Recursive-descent tag engine.
//!
//! The engine walks the text once. At each position it checks, in order:
//! the nearest enclosing delimited tag's end marker, the start of a sibling
//! clause (only inside prefix content), and the grammar's tag kinds in
//! priority order. Anything else accumulates into a literal run that is
//! emitted as a text leaf when the next tag starts or the scope ends.
//!
//! Every nested tag costs a few stack frames here and in the tree walks, so
//! nesting is capped at [`MAX_DEPTH`] tags.

use tracing::trace;

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::span::Span;
use crate::tag::matchers::{literal_unit_len, trailing_whitespace_len, whitespace_len};
use crate::tag::TagKind;

/// Deepest tag nesting accepted. Top-level tags are at depth 1; deeper
/// input fails with a nesting error instead of exhausting the stack.
pub const MAX_DEPTH: usize = 128;

/// An owned, not-yet-attached piece of a parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Element {
    Text {
        text: String,
        span: Span,
    },
    Tag {
        kind: &'static TagKind,
        start_marker: String,
        gap: String,
        end_marker: String,
        children: Vec<Element>,
        span: Span,
    },
}

impl Element {
    pub(crate) const fn span(&self) -> Span {
        match self {
            Self::Text { span, .. } | Self::Tag { span, .. } => *span,
        }
    }
}

/// Why a block stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    /// Reached the end of the text.
    ScopeEnd,
    /// The enclosing delimited tag's end marker starts here.
    Closer,
    /// A sibling clause starts here.
    Sibling,
}

struct Block {
    elements: Vec<Element>,
    end: usize,
    stop: Stop,
}

/// Parses text against a grammar.
pub(crate) struct Engine<'a, G: Grammar + ?Sized> {
    grammar: &'a G,
    text: &'a str,
}

impl<'a, G: Grammar + ?Sized> Engine<'a, G> {
    pub(crate) const fn new(grammar: &'a G, text: &'a str) -> Self {
        Self { grammar, text }
    }

    /// Parses the whole text as a top-level statement.
    pub(crate) fn parse_statement(&self) -> Result<Vec<Element>, ParseError> {
        let block = self.parse_block(0, None, false, 1)?;
        debug_assert_eq!(block.stop, Stop::ScopeEnd);
        Ok(block.elements)
    }

    /// Parses the whole text as the content of a `kind` tag sitting at
    /// `depth`, inside the delimited tag `enclosing` (if any).
    ///
    /// Returns `Ok(Err(stop_position))` when the content would end before the
    /// end of the text, e.g. a clause body containing a sibling clause keyword
    /// or a `)` closing the group around it.
    pub(crate) fn parse_contents(
        &self,
        kind: &'static TagKind,
        enclosing: Option<&'static TagKind>,
        depth: usize,
    ) -> Result<Result<Vec<Element>, usize>, ParseError> {
        if kind.is_delimited() && !kind.owns_contents {
            return Ok(match self.scan_opaque(kind, 0) {
                Ok(end_marker) => Err(end_marker),
                Err(len) => Ok(self.text_leaf(0, len).into_iter().collect()),
            });
        }
        let (closer, in_prefix) = if kind.is_prefix() {
            (enclosing, true)
        } else {
            (Some(kind), false)
        };
        let block = self.parse_block(0, closer, in_prefix, depth + 1)?;
        Ok(match block.stop {
            Stop::ScopeEnd => Ok(block.elements),
            Stop::Closer | Stop::Sibling => Err(block.end),
        })
    }

    /// Parses tags and literal runs from `start` until the scope ends.
    ///
    /// `closer` is the nearest enclosing delimited tag; `in_prefix` is set
    /// while parsing the content of a prefix tag, where a sibling clause
    /// keyword ends the block. `depth` is the depth of the tags found here.
    fn parse_block(
        &self,
        start: usize,
        closer: Option<&'static TagKind>,
        in_prefix: bool,
        depth: usize,
    ) -> Result<Block, ParseError> {
        let text = self.text;
        let skip_whitespace = self.grammar.skip_whitespace();
        let mut elements = Vec::new();
        let mut cursor = start;
        let mut pending = start;

        loop {
            if skip_whitespace {
                cursor += whitespace_len(&text[cursor..]);
            }

            let stop = if cursor >= text.len() {
                Some(Stop::ScopeEnd)
            } else if closer.is_some_and(|kind| kind.match_end(text, cursor).is_some()) {
                Some(Stop::Closer)
            } else if in_prefix {
                self.grammar.match_sibling(text, cursor).map(|_| Stop::Sibling)
            } else {
                None
            };

            if let Some(stop) = stop {
                elements.extend(self.text_leaf(pending, cursor));
                return Ok(Block {
                    elements,
                    end: cursor,
                    stop,
                });
            }

            match self.grammar.match_tag(text, cursor) {
                Some((kind, marker_end)) => {
                    if depth > MAX_DEPTH {
                        return Err(ParseError::too_deep(
                            kind.name,
                            Span::new(cursor, marker_end),
                            MAX_DEPTH,
                        ));
                    }
                    elements.extend(self.text_leaf(pending, cursor));
                    trace!(tag = kind.name, position = cursor, depth, "recognized tag");
                    let (element, next) = if kind.is_prefix() {
                        self.parse_prefix(kind, cursor, marker_end, closer, depth)?
                    } else {
                        self.parse_delimited(kind, cursor, marker_end, depth)?
                    };
                    elements.push(element);
                    cursor = next;
                    pending = next;
                }
                None => cursor += literal_unit_len(&text[cursor..]),
            }
        }
    }

    /// Parses a prefix tag whose keyword spans `start..marker_end`.
    ///
    /// Returns the element and the position after its content. Trailing
    /// whitespace of the content is left for the caller when the grammar
    /// skips whitespace.
    fn parse_prefix(
        &self,
        kind: &'static TagKind,
        start: usize,
        marker_end: usize,
        closer: Option<&'static TagKind>,
        depth: usize,
    ) -> Result<(Element, usize), ParseError> {
        let text = self.text;
        let skip_whitespace = self.grammar.skip_whitespace();
        let content_start = if skip_whitespace {
            marker_end + whitespace_len(&text[marker_end..])
        } else {
            marker_end
        };

        let block = self.parse_block(content_start, closer, true, depth + 1)?;
        let mut children = block.elements;
        let mut end = block.end;

        if skip_whitespace {
            if let Some(Element::Text { text: leaf, span }) = children.last_mut() {
                let trailing = trailing_whitespace_len(leaf);
                leaf.truncate(leaf.len() - trailing);
                span.end -= trailing;
                end = span.end;
                if leaf.is_empty() {
                    children.pop();
                }
            }
        }

        let (gap, end) = if children.is_empty() {
            (String::new(), marker_end)
        } else {
            (text[marker_end..content_start].to_string(), end)
        };

        let element = Element::Tag {
            kind,
            start_marker: text[start..marker_end].to_string(),
            gap,
            end_marker: String::new(),
            children,
            span: Span::new(start, end),
        };
        Ok((element, end))
    }

    /// Parses a delimited tag whose start marker spans `start..marker_end`.
    fn parse_delimited(
        &self,
        kind: &'static TagKind,
        start: usize,
        marker_end: usize,
        depth: usize,
    ) -> Result<(Element, usize), ParseError> {
        let text = self.text;
        let unterminated = || ParseError::unterminated(kind.name, Span::new(start, marker_end));
        let (children, content_end) = if kind.owns_contents {
            let block = self.parse_block(marker_end, Some(kind), false, depth + 1)?;
            if block.stop != Stop::Closer {
                return Err(unterminated());
            }
            (block.elements, block.end)
        } else {
            let content_end = match self.scan_opaque(kind, marker_end) {
                Ok(end) => end,
                Err(len) if kind.is_open_ended() => len,
                Err(_) => return Err(unterminated()),
            };
            (self.text_leaf(marker_end, content_end).into_iter().collect(), content_end)
        };

        let end = match kind.match_end(text, content_end) {
            Some(end) => end,
            None if content_end == text.len() && kind.is_open_ended() => content_end,
            None => return Err(unterminated()),
        };

        let element = Element::Tag {
            kind,
            start_marker: text[start..marker_end].to_string(),
            gap: String::new(),
            end_marker: text[content_end..end].to_string(),
            children,
            span: Span::new(start, end),
        };
        Ok((element, end))
    }

    /// Scans opaque contents from `start` up to the end marker of `kind`,
    /// stepping over escaped end markers. Returns the position of the end
    /// marker, or `Err(len)` when the text ends first.
    fn scan_opaque(&self, kind: &'static TagKind, start: usize) -> Result<usize, usize> {
        let text = self.text;
        let mut cursor = start;
        while cursor < text.len() {
            if let Some(next) = kind.match_escape(text, cursor) {
                cursor = next;
            } else if kind.match_end(text, cursor).is_some() {
                return Ok(cursor);
            } else {
                cursor += text[cursor..].chars().next().map_or(1, char::len_utf8);
            }
        }
        Err(text.len())
    }

    fn text_leaf(&self, start: usize, end: usize) -> Option<Element> {
        (start < end).then(|| Element::Text {
            text: self.text[start..end].to_string(),
            span: Span::new(start, end),
        })
    }
}
