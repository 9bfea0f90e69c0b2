// SPDX-License-Identifier: MIT
//
// Key events delivered to the overlay.
//
// The host translates whatever its toolkit produces into `KeyEvent`
// values. For scripted sessions and tests, `parse_keys` reads Vim key
// notation (`foo<CR>`, `<C-u>`, `<Esc>`) into the same events.

use bitflags::bitflags;
use thiserror::Error;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A keyboard event with key identity, modifiers, and press state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys (Shift, Alt, Ctrl, etc.).
    pub modifiers: Modifiers,
    /// Press, repeat, or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with the given modifiers.
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }

    /// An unmodified key press.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// An unmodified printable character.
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    /// `Ctrl` + character.
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::CTRL)
    }

    /// True for presses and auto-repeats; releases carry no input.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }
}

/// Key press / repeat / release distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEventKind {
    /// Initial key press (or a host that cannot tell).
    #[default]
    Press,
    /// Key held down long enough to trigger auto-repeat.
    Repeat,
    /// Key released.
    Release,
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char). Function keys F1–F35 use [`F`](KeyCode::F).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character (printable).
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Function keys ───────────────────────────────────────────
    /// F1 through F35.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
        const SUPER = 0b0000_1000;
    }
}

// ─── Key notation ───────────────────────────────────────────────────────────

/// Errors from [`parse_keys`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// A `<...>` token with a name we do not know.
    #[error("unknown key name <{0}>")]
    UnknownKey(String),

    /// A modifier prefix with nothing after it, e.g. `<C->`.
    #[error("missing key after modifiers in <{0}>")]
    MissingKey(String),
}

/// Parse Vim key notation into key events.
///
/// Plain characters map to [`KeyCode::Char`]. Angle-bracket tokens name
/// special keys (`<CR>`, `<Esc>`, `<BS>`, `<Left>`, `<F5>`, `<lt>`) and
/// may carry modifier prefixes (`<C-u>`, `<S-Tab>`, `<A-x>`). A `<` with
/// no closing `>` is taken literally.
///
/// # Errors
///
/// Returns [`KeyParseError`] for a closed token that names no key.
pub fn parse_keys(notation: &str) -> Result<Vec<KeyEvent>, KeyParseError> {
    let mut keys = Vec::new();
    let mut rest = notation;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(close) = rest[1..].find('>') {
                let token = &rest[1..=close];
                // `<>` and tokens containing spaces are literal text.
                if !token.is_empty() && !token.contains(char::is_whitespace) {
                    keys.push(parse_token(token)?);
                    rest = &rest[close + 2..];
                    continue;
                }
            }
        }
        keys.push(KeyEvent::char(ch));
        rest = &rest[ch.len_utf8()..];
    }

    Ok(keys)
}

/// Parse the inside of a `<...>` token.
fn parse_token(token: &str) -> Result<KeyEvent, KeyParseError> {
    let mut modifiers = Modifiers::empty();
    let mut name = token;

    // Modifier prefixes: a single letter followed by '-'.
    while name.len() >= 2 && name.as_bytes()[1] == b'-' {
        let flag = match name.as_bytes()[0].to_ascii_uppercase() {
            b'C' => Modifiers::CTRL,
            b'S' => Modifiers::SHIFT,
            b'A' | b'M' => Modifiers::ALT,
            b'D' => Modifiers::SUPER,
            _ => break,
        };
        modifiers |= flag;
        name = &name[2..];
    }

    if name.is_empty() {
        return Err(KeyParseError::MissingKey(token.to_string()));
    }

    let code = key_code(name).ok_or_else(|| KeyParseError::UnknownKey(token.to_string()))?;
    Ok(KeyEvent::new(code, modifiers))
}

/// Map a key name (without modifiers) to a `KeyCode`.
fn key_code(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(ch));
    }

    let code = match name.to_ascii_lowercase().as_str() {
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" => KeyCode::Escape,
        "bs" | "backspace" => KeyCode::Backspace,
        "del" | "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "bslash" => KeyCode::Char('\\'),
        "bar" => KeyCode::Char('|'),
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        other => {
            let n: u8 = other.strip_prefix('f')?.parse().ok()?;
            if !(1..=35).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
    };
    Some(code)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
