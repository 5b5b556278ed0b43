//! Inline highlight markup: `[g]…[/g]` spans within free text.
//!
//! The scan is an exact-literal match at the cursor; anything that is not
//! precisely `[g]` or `[/g]` is ordinary text. There is no escaping and no
//! nesting depth: an open tag re-asserts the highlight color, a close tag
//! re-asserts the base color, whichever was seen last wins.

use crate::config::Rgb;

const TAG_OPEN: &str = "[g]";
const TAG_CLOSE: &str = "[/g]";

/// One display character paired with its resolved color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub ch: char,
    pub color: Rgb,
}

/// Convert raw text into a flat token sequence, consuming highlight tags.
///
/// Newlines are emitted as ordinary tokens; the layout engine treats them
/// as forced breaks. An unterminated `[g]` leaves the remainder of the
/// text highlighted.
pub fn tokenize(text: &str, base: Rgb, highlight: Rgb) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(text.len());
    let mut color = base;
    let mut i = 0;
    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with(TAG_OPEN) {
            color = highlight;
            i += TAG_OPEN.len();
            continue;
        }
        if rest.starts_with(TAG_CLOSE) {
            color = base;
            i += TAG_CLOSE.len();
            continue;
        }
        if let Some(ch) = rest.chars().next() {
            tokens.push(Token { ch, color });
            i += ch.len_utf8();
        } else {
            break;
        }
    }
    tokens
}
