//! Search — find the next match of a Vim pattern.
//!
//! Provides forward (`/`) and backward (`?`) search over a text buffer.
//! Patterns are translated by [`crate::pattern`] and matched with the
//! `regex` crate against the whole buffer, so matches may span lines.
//!
//! # Search flow
//!
//! 1. User presses `/` or `?` → the command-line overlay opens
//! 2. Each keystroke extracts the pattern and calls [`find_next`] from the
//!    caret position saved when the overlay opened
//! 3. A match is highlighted and the caret jumps to its start
//! 4. No match (or a half-typed pattern) puts the caret back
//!
//! # Origin
//!
//! The character at `from` is never a candidate: forward search wants the
//! first match starting after it, backward search the last one starting
//! before it. With `wrapscan` the search continues from the other end of
//! the buffer and may come back around to `from` itself.

use regex::Regex;

use crate::buffer::Buffer;
use crate::pattern::{self, PatternError};
use crate::position::TextRange;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Search direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// The character that starts a search in this direction and ends its
    /// pattern (`/` forward, `?` backward).
    #[must_use]
    pub const fn delimiter(self) -> char {
        match self {
            Self::Forward => '/',
            Self::Backward => '?',
        }
    }
}

// ---------------------------------------------------------------------------
// Search functions
// ---------------------------------------------------------------------------

/// Find the next match of the Vim `pattern` from char offset `from`.
///
/// Returns the match as a char-offset range. An empty pattern never
/// matches. `magic` selects how the pattern is read (see
/// [`crate::pattern::translate`]).
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern cannot be compiled.
#[allow(clippy::fn_params_excessive_bools)]
pub fn find_next(
    buf: &Buffer,
    pattern: &str,
    from: usize,
    ignore_case: bool,
    magic: bool,
    direction: SearchDirection,
    wrapscan: bool,
) -> Result<Option<TextRange>, PatternError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    let regex = pattern::translate(pattern, ignore_case, magic)?;
    let text = buf.contents();
    let from_byte = buf.rope().char_to_byte(from.min(buf.len_chars()));

    let found = match direction {
        SearchDirection::Forward => {
            let after = next_char_boundary(&text, from_byte);
            let ahead = (after <= text.len())
                .then(|| regex.find_at(&text, after))
                .flatten();
            match ahead {
                Some(m) => Some(m),
                None if wrapscan => regex.find(&text),
                None => None,
            }
        }
        SearchDirection::Backward => match last_match(&regex, &text, Some(from_byte)) {
            Some(m) => Some(m),
            None if wrapscan => last_match(&regex, &text, None),
            None => None,
        },
    };

    Ok(found.map(|m| {
        let rope = buf.rope();
        TextRange::new(rope.byte_to_char(m.start()), rope.byte_to_char(m.end()))
    }))
}

/// The last match starting before `limit` (a byte offset), or the last
/// match anywhere when `limit` is `None`.
///
/// Steps one character at a time instead of using `find_iter`, so a match
/// overlapping an earlier one is still found.
fn last_match<'t>(regex: &Regex, text: &'t str, limit: Option<usize>) -> Option<regex::Match<'t>> {
    let mut last = None;
    let mut at = 0;
    while at <= text.len() {
        let Some(m) = regex.find_at(text, at) else {
            break;
        };
        if limit.is_some_and(|limit| m.start() >= limit) {
            break;
        }
        at = next_char_boundary(text, m.start());
        last = Some(m);
    }
    last
}

/// Byte offset of the char after the one at `byte`. Past the end of `text`
/// when `byte` is already at the end.
fn next_char_boundary(text: &str, byte: usize) -> usize {
    text[byte..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| byte + c.len_utf8())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
