//! Vim search patterns.
//!
//! Three jobs, all on the raw text typed after `/` or `?`:
//!
//! - [`skip_regexp`] finds where the pattern ends. The rest of the line
//!   (`/foo/e+1`) is an offset the overlay does not interpret.
//! - [`ignore_case`] applies `ignorecase` and `smartcase`.
//! - [`translate`] turns a Vim pattern into a compiled [`Regex`], with
//!   `magic` on or off.
//!
//! # Translation table
//!
//! | Vim          | regex       | Meaning                         |
//! |--------------|-------------|---------------------------------|
//! | `\(` `\)`    | `(` `)`     | Group                           |
//! | `\|`         | `\|`        | Alternation                     |
//! | `\+`         | `+`         | One or more                     |
//! | `\=` `\?`    | `?`         | Zero or one                     |
//! | `\{n,m}`     | `{n,m}`     | Counted (`\{-n,m}` is lazy)     |
//! | `\<` `\>`    | `\b`        | Word boundary                   |
//! | `\c` `\C`    |             | Force ignore / match case       |
//! | `[...]`      | `[...]`     | Collection, POSIX classes kept  |
//! | `* . ^ $`    | same        | Magic atoms                     |
//!
//! Anything else is matched literally, including bare `( ) | + ? { }`.
//!
//! With `nomagic` the atoms `* . [` lose their meaning and are literal
//! unless escaped: `\*`, `\.` and `\[...]` repeat, match any character and
//! open a collection. `^` and `$` behave the same either way.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// A pattern the regex engine cannot use.
///
/// While the user is still typing most of these are transient (`\(` before
/// its `\)` arrives), so callers previewing a search treat them as "no match".
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("E939: unclosed \\{{ in pattern")]
    UnclosedBrace,

    #[error("E554: syntax error in \\{{{0}}}")]
    InvalidBrace(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, PatternError>;

// ---------------------------------------------------------------------------
// Pattern extent
// ---------------------------------------------------------------------------

/// Byte index of the first unescaped `delimiter` in `text`, or `text.len()`.
///
/// A backslash escapes the character after it. A closed `[...]` collection
/// is skipped as a unit, so `/[/]` does not end at the inner `/`; an
/// unclosed `[` is an ordinary character. With `magic` off a collection
/// opens with `\[` instead of `[`.
#[must_use]
pub fn skip_regexp(text: &str, delimiter: char, magic: bool) -> usize {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < text.len() {
        let Some(ch) = text[i..].chars().next() else {
            break;
        };
        if ch == delimiter {
            return i;
        }
        let opens_collection = if magic {
            ch == '['
        } else {
            ch == '\\' && bytes.get(i + 1) == Some(&b'[')
        };
        if opens_collection {
            let body = if magic { i + 1 } else { i + 2 };
            if let Some(end) = skip_collection(text, body) {
                i = end;
                continue;
            }
        }
        if ch == '\\' {
            i += 1;
            match text[i..].chars().next() {
                Some(next) => i += next.len_utf8(),
                None => break,
            }
            continue;
        }
        i += ch.len_utf8();
    }
    text.len()
}

/// The pattern part of `text`: everything before the first unescaped
/// `delimiter`, always treating `[` as magic.
#[must_use]
pub fn extract_pattern(text: &str, delimiter: char) -> &str {
    &text[..skip_regexp(text, delimiter, true)]
}

/// Given `start` just past a `[`, return the byte index just past the
/// matching `]`, or `None` if the collection never closes.
fn skip_collection(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = start;
    if bytes.get(i) == Some(&b'^') {
        i += 1;
    }
    // A leading `]` or `-` is literal.
    if matches!(bytes.get(i), Some(b']' | b'-')) {
        i += 1;
    }
    while i < bytes.len() && bytes[i] != b']' {
        match bytes[i] {
            b'-' if bytes.get(i + 1).is_some_and(|&b| b != b']') => {
                i += 1;
                i += char_len_at(text, i);
            }
            b'\\' if bytes.get(i + 1).is_some() => {
                i += 1;
                i += char_len_at(text, i);
            }
            b'[' => i += class_len(&text[i..]).unwrap_or(1),
            _ => i += char_len_at(text, i),
        }
    }
    (i < bytes.len()).then_some(i + 1)
}

/// Length of a `[:name:]`, `[=x=]` or `[.x.]` item at the start of `s`.
fn class_len(s: &str) -> Option<usize> {
    let kind = *s.as_bytes().get(1)?;
    if !matches!(kind, b':' | b'=' | b'.') {
        return None;
    }
    let close = [kind, b']'];
    let body = &s.as_bytes()[2..];
    let end = body.windows(2).position(|w| w == close.as_slice())?;
    if end == 0 {
        return None;
    }
    if kind == b':' && !body[..end].iter().all(u8::is_ascii_alphabetic) {
        return None;
    }
    Some(2 + end + 2)
}

fn char_len_at(text: &str, i: usize) -> usize {
    text[i..].chars().next().map_or(1, char::len_utf8)
}

// ---------------------------------------------------------------------------
// Case
// ---------------------------------------------------------------------------

/// The case-folding options a search consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CasePolicy {
    pub ignorecase: bool,
    pub smartcase: bool,
}

/// Whether `pattern` should match ignoring case.
///
/// With `ignorecase` off the answer is always no. With it on, `smartcase`
/// turns it back off for patterns containing an uppercase letter, unless
/// `no_smartcase` is set (used for patterns that did not come from typing).
#[must_use]
pub fn ignore_case(pattern: &str, policy: CasePolicy, no_smartcase: bool) -> bool {
    if !policy.ignorecase {
        return false;
    }
    if policy.smartcase && !no_smartcase {
        return !has_uppercase(pattern);
    }
    true
}

/// True if `pattern` has an uppercase letter outside an escape sequence.
///
/// `\S` or `\W` name character classes, not letters, so they do not count.
#[must_use]
pub fn has_uppercase(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            chars.next();
        } else if ch.is_uppercase() {
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Compile a Vim pattern.
///
/// `ignore_case` is the result of [`ignore_case`]; a `\c` or `\C` anywhere
/// in the pattern overrides it. Anchors match at line boundaries. `magic`
/// is the option of the same name.
///
/// # Errors
///
/// Malformed `\{...}` counts and anything the regex engine rejects (an
/// unbalanced `\(` for instance).
pub fn translate(pattern: &str, ignore_case: bool, magic: bool) -> Result<Regex> {
    let mut out = Translation {
        magic,
        ..Translation::default()
    };
    out.run(pattern)?;
    let regex = RegexBuilder::new(&out.regex)
        .case_insensitive(out.case.unwrap_or(ignore_case))
        .multi_line(true)
        .build()?;
    Ok(regex)
}

#[derive(Default)]
struct Translation {
    regex: String,
    /// `\c` / `\C` seen in the pattern.
    case: Option<bool>,
    /// Whether the last emitted piece can take a quantifier.
    can_repeat: bool,
    magic: bool,
}

impl Translation {
    fn run(&mut self, pattern: &str) -> Result<()> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;
        // True at the start of the pattern and of each branch or group,
        // where `^` is an anchor.
        let mut at_branch_start = true;
        while i < chars.len() {
            let ch = chars[i];
            let branch_start = std::mem::take(&mut at_branch_start);
            match ch {
                '\\' => {
                    i += 1;
                    let Some(&next) = chars.get(i) else {
                        self.literal('\\');
                        break;
                    };
                    match next {
                        '(' => {
                            self.push("(", false);
                            at_branch_start = true;
                        }
                        ')' => self.push(")", true),
                        '|' => {
                            self.push("|", false);
                            at_branch_start = true;
                        }
                        '+' => self.quantifier("+", next),
                        '=' | '?' => self.quantifier("?", next),
                        '{' => {
                            let (counted, len) = brace_quantifier(&chars[i + 1..])?;
                            i += len;
                            if self.can_repeat {
                                self.push(&counted, false);
                            } else {
                                self.literal('{');
                            }
                        }
                        '<' | '>' => self.push(r"\b", false),
                        's' | 'S' | 'd' | 'D' | 'w' | 'W' | 'n' | 't' | 'r' => {
                            self.regex.push('\\');
                            self.regex.push(next);
                            self.can_repeat = true;
                        }
                        'e' => self.push(r"\x1b", true),
                        'c' => self.case = Some(true),
                        'C' => self.case = Some(false),
                        '*' if !self.magic => self.quantifier("*", '*'),
                        '.' if !self.magic => self.push(".", true),
                        '[' if !self.magic => match collection(&chars[i..]) {
                            Some((class, len)) => {
                                self.push(&class, true);
                                i += len - 1;
                            }
                            None => self.literal('['),
                        },
                        other => self.literal(other),
                    }
                }
                '[' if self.magic => match collection(&chars[i..]) {
                    Some((class, len)) => {
                        self.push(&class, true);
                        i += len - 1;
                    }
                    None => self.literal('['),
                },
                '*' if self.magic => self.quantifier("*", '*'),
                '.' if self.magic => self.push(".", true),
                '^' if branch_start => self.push("^", false),
                '$' if ends_branch(&chars[i + 1..]) => self.push("$", false),
                other => self.literal(other),
            }
            i += 1;
        }
        Ok(())
    }

    fn push(&mut self, piece: &str, can_repeat: bool) {
        self.regex.push_str(piece);
        self.can_repeat = can_repeat;
    }

    fn literal(&mut self, ch: char) {
        let mut buf = [0; 4];
        self.regex.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
        self.can_repeat = true;
    }

    /// A quantifier with nothing to repeat matches itself, as in Vim.
    fn quantifier(&mut self, piece: &str, literal: char) {
        if self.can_repeat {
            self.push(piece, false);
        } else {
            self.literal(literal);
        }
    }
}

/// `$` is an anchor only at the end of the pattern or a branch.
fn ends_branch(rest: &[char]) -> bool {
    matches!(rest, [] | ['\\', '|' | ')', ..])
}

/// Parse the body of `\{...}` (after the `{`). Returns the regex quantifier
/// and how many chars were consumed, including the closing `}` or `\}`.
fn brace_quantifier(rest: &[char]) -> Result<(String, usize)> {
    let close = rest
        .iter()
        .position(|&c| c == '}')
        .ok_or(PatternError::UnclosedBrace)?;
    let mut body: String = rest[..close].iter().collect();
    if body.ends_with('\\') {
        body.pop();
    }
    let (lazy, counts) = body
        .strip_prefix('-')
        .map_or((false, body.as_str()), |c| (true, c));
    let valid = counts.chars().all(|c| c.is_ascii_digit() || c == ',')
        && counts.matches(',').count() <= 1;
    if !valid {
        return Err(PatternError::InvalidBrace(body));
    }
    let mut quantifier = match counts.split_once(',') {
        None if counts.is_empty() => "*".to_string(),
        None => format!("{{{counts}}}"),
        Some((min, max)) => {
            let min = if min.is_empty() { "0" } else { min };
            if max.is_empty() {
                format!("{{{min},}}")
            } else {
                format!("{{{min},{max}}}")
            }
        }
    };
    if lazy {
        quantifier.push('?');
    }
    Ok((quantifier, close + 1))
}

/// Translate a `[...]` collection starting at `chars[0] == '['`.
///
/// Returns the regex class and the number of chars consumed, or `None` when
/// the collection is not closed.
fn collection(chars: &[char]) -> Option<(String, usize)> {
    let mut class = String::from("[");
    let mut i = 1;
    if chars.get(i) == Some(&'^') {
        class.push('^');
        i += 1;
    }
    match chars.get(i) {
        Some(']') => {
            class.push_str(r"\]");
            i += 1;
        }
        Some('-') => {
            class.push_str(r"\-");
            i += 1;
        }
        _ => {}
    }
    while let Some(&ch) = chars.get(i) {
        match ch {
            ']' => {
                class.push(']');
                return Some((class, i + 1));
            }
            '\\' => {
                let next = *chars.get(i + 1)?;
                match next {
                    'n' | 't' | 'r' => {
                        class.push('\\');
                        class.push(next);
                    }
                    'e' => class.push_str(r"\x1b"),
                    _ => push_class_literal(&mut class, next),
                }
                i += 2;
            }
            '[' => {
                let tail: String = chars[i..].iter().collect();
                match class_len(&tail).map(|bytes| tail[..bytes].chars().count()) {
                    Some(len) if chars[i + 1] == ':' => {
                        class.extend(&chars[i..i + len]);
                        i += len;
                    }
                    Some(len) => {
                        // `[=x=]` and `[.x.]`: the single character inside.
                        for &c in &chars[i + 2..i + len - 2] {
                            push_class_literal(&mut class, c);
                        }
                        i += len;
                    }
                    None => {
                        class.push_str(r"\[");
                        i += 1;
                    }
                }
            }
            // Range dash, or a literal dash right before the closing `]`.
            '-' if chars.get(i + 1) == Some(&']') => {
                class.push_str(r"\-");
                i += 1;
            }
            '&' | '~' => {
                class.push('\\');
                class.push(ch);
                i += 1;
            }
            _ => {
                class.push(ch);
                i += 1;
            }
        }
    }
    None
}

fn push_class_literal(class: &mut String, ch: char) {
    if matches!(ch, '\\' | ']' | '[' | '^' | '-' | '&' | '~') {
        class.push('\\');
    }
    class.push(ch);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
