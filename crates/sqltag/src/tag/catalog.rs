//! The SQL clause catalog.
//!
//! [`SQL_TAGS`] is ordered by dispatch priority: at a given position the first
//! kind whose start matcher accepts wins. Clause keywords come first, then the
//! generic delimited constructs.

use super::matchers::{match_doubled, match_keyword, match_marker};
use super::{ClauseRules, TagKind, TagVariant};

fn select_start(text: &str, position: usize) -> Option<usize> {
    match_keyword(text, position, &["SELECT"])
}

fn from_start(text: &str, position: usize) -> Option<usize> {
    match_keyword(text, position, &["FROM"])
}

fn where_start(text: &str, position: usize) -> Option<usize> {
    match_keyword(text, position, &["WHERE"])
}

fn group_by_start(text: &str, position: usize) -> Option<usize> {
    match_keyword(text, position, &["GROUP", "BY"])
}

fn start_with_start(text: &str, position: usize) -> Option<usize> {
    match_keyword(text, position, &["START", "WITH"])
}

fn order_by_start(text: &str, position: usize) -> Option<usize> {
    match_keyword(text, position, &["ORDER", "BY"])
}

fn for_update_start(text: &str, position: usize) -> Option<usize> {
    match_keyword(text, position, &["FOR", "UPDATE"])
}

fn open_paren(text: &str, position: usize) -> Option<usize> {
    match_marker(text, position, "(")
}

fn close_paren(text: &str, position: usize) -> Option<usize> {
    match_marker(text, position, ")")
}

fn single_quote(text: &str, position: usize) -> Option<usize> {
    match_marker(text, position, "'")
}

fn doubled_single_quote(text: &str, position: usize) -> Option<usize> {
    match_doubled(text, position, '\'')
}

fn double_quote(text: &str, position: usize) -> Option<usize> {
    match_marker(text, position, "\"")
}

fn doubled_double_quote(text: &str, position: usize) -> Option<usize> {
    match_doubled(text, position, '"')
}

fn comment_open(text: &str, position: usize) -> Option<usize> {
    match_marker(text, position, "/*")
}

fn comment_close(text: &str, position: usize) -> Option<usize> {
    match_marker(text, position, "*/")
}

fn dash_dash(text: &str, position: usize) -> Option<usize> {
    match_marker(text, position, "--")
}

/// Zero-width: the newline stays outside the comment.
fn line_end(text: &str, position: usize) -> Option<usize> {
    text.get(position..)?.starts_with('\n').then_some(position)
}

const fn clause(rank: u16, singleton: bool, requires: Option<&'static str>) -> Option<ClauseRules> {
    Some(ClauseRules {
        rank,
        singleton,
        requires,
    })
}

pub static SELECT: TagKind = TagKind {
    name: "SELECT",
    variant: TagVariant::Prefix {
        start: select_start,
        keyword: "SELECT",
    },
    owns_contents: true,
    clause: clause(0, false, None),
};

pub static FROM: TagKind = TagKind {
    name: "FROM",
    variant: TagVariant::Prefix {
        start: from_start,
        keyword: "FROM",
    },
    owns_contents: true,
    clause: clause(10, true, Some("SELECT")),
};

pub static WHERE: TagKind = TagKind {
    name: "WHERE",
    variant: TagVariant::Prefix {
        start: where_start,
        keyword: "WHERE",
    },
    owns_contents: true,
    clause: clause(20, true, Some("FROM")),
};

pub static START_WITH: TagKind = TagKind {
    name: "START WITH",
    variant: TagVariant::Prefix {
        start: start_with_start,
        keyword: "START WITH",
    },
    owns_contents: true,
    clause: clause(30, true, Some("FROM")),
};

pub static GROUP_BY: TagKind = TagKind {
    name: "GROUP BY",
    variant: TagVariant::Prefix {
        start: group_by_start,
        keyword: "GROUP BY",
    },
    owns_contents: true,
    clause: clause(40, true, Some("FROM")),
};

pub static ORDER_BY: TagKind = TagKind {
    name: "ORDER BY",
    variant: TagVariant::Prefix {
        start: order_by_start,
        keyword: "ORDER BY",
    },
    owns_contents: true,
    clause: clause(50, true, None),
};

pub static FOR_UPDATE: TagKind = TagKind {
    name: "FOR UPDATE",
    variant: TagVariant::Prefix {
        start: for_update_start,
        keyword: "FOR UPDATE",
    },
    owns_contents: true,
    clause: clause(60, true, None),
};

pub static BRACES: TagKind = TagKind {
    name: "BRACES",
    variant: TagVariant::Delimited {
        start: open_paren,
        end: close_paren,
        escape: None,
        open: "(",
        close: ")",
        open_ended: false,
    },
    owns_contents: true,
    clause: None,
};

pub static STRING_LITERAL: TagKind = TagKind {
    name: "STRING_LITERAL",
    variant: TagVariant::Delimited {
        start: single_quote,
        end: single_quote,
        escape: Some(doubled_single_quote),
        open: "'",
        close: "'",
        open_ended: false,
    },
    owns_contents: false,
    clause: None,
};

pub static QUOTED_IDENTIFIER: TagKind = TagKind {
    name: "QUOTED_IDENTIFIER",
    variant: TagVariant::Delimited {
        start: double_quote,
        end: double_quote,
        escape: Some(doubled_double_quote),
        open: "\"",
        close: "\"",
        open_ended: false,
    },
    owns_contents: false,
    clause: None,
};

pub static BLOCK_COMMENT: TagKind = TagKind {
    name: "BLOCK_COMMENT",
    variant: TagVariant::Delimited {
        start: comment_open,
        end: comment_close,
        escape: None,
        open: "/*",
        close: "*/",
        open_ended: false,
    },
    owns_contents: false,
    clause: None,
};

pub static LINE_COMMENT: TagKind = TagKind {
    name: "LINE_COMMENT",
    variant: TagVariant::Delimited {
        start: dash_dash,
        end: line_end,
        escape: None,
        open: "--",
        close: "",
        open_ended: true,
    },
    owns_contents: false,
    clause: None,
};

/// All SQL tag kinds in dispatch order.
pub static SQL_TAGS: &[&TagKind] = &[
    &SELECT,
    &FROM,
    &WHERE,
    &GROUP_BY,
    &START_WITH,
    &ORDER_BY,
    &FOR_UPDATE,
    &BRACES,
    &STRING_LITERAL,
    &QUOTED_IDENTIFIER,
    &BLOCK_COMMENT,
    &LINE_COMMENT,
];
