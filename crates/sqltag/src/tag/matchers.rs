//! Building blocks for tag matchers.
//!
//! All helpers are pure and never panic: positions past the end of the text
//! or inside a multi-byte character simply do not match.

/// Returns true for characters that may continue an identifier.
#[must_use]
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Length in bytes of the whitespace run at the start of `text`.
#[must_use]
pub fn whitespace_len(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

/// Length in bytes of the trailing whitespace run of `text`.
#[must_use]
pub fn trailing_whitespace_len(text: &str) -> usize {
    text.len() - text.trim_end().len()
}

/// Matches `marker` literally at `position`.
#[must_use]
pub fn match_marker(text: &str, position: usize, marker: &str) -> Option<usize> {
    text.get(position..)?
        .starts_with(marker)
        .then_some(position + marker.len())
}

/// Matches a keyword made of one or more `words`, case-insensitively.
///
/// Words must be separated by at least one whitespace character, and the
/// keyword must not be followed by an identifier character, so `FROM` does
/// not match the start of `fromage`.
#[must_use]
pub fn match_keyword(text: &str, position: usize, words: &[&str]) -> Option<usize> {
    let mut pos = position;
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let gap = whitespace_len(text.get(pos..)?);
            if gap == 0 {
                return None;
            }
            pos += gap;
        }
        let candidate = text.get(pos..)?.get(..word.len())?;
        if !candidate.eq_ignore_ascii_case(word) {
            return None;
        }
        pos += word.len();
    }
    match text.get(pos..)?.chars().next() {
        Some(c) if is_ident_char(c) => None,
        _ => Some(pos),
    }
}

/// Matches a doubled quote character, the escape form inside quoted text.
#[must_use]
pub fn match_doubled(text: &str, position: usize, quote: char) -> Option<usize> {
    let rest = text.get(position..)?;
    let mut chars = rest.chars();
    (chars.next() == Some(quote) && chars.next() == Some(quote))
        .then_some(position + 2 * quote.len_utf8())
}

/// Length of the literal unit at the start of `text`: a whole identifier run,
/// or a single character.
#[must_use]
pub fn literal_unit_len(text: &str) -> usize {
    let mut chars = text.char_indices();
    match chars.next() {
        None => 0,
        Some((_, c)) if is_ident_char(c) => chars
            .find(|&(_, c)| !is_ident_char(c))
            .map_or(text.len(), |(i, _)| i),
        Some((_, c)) => c.len_utf8(),
    }
}
