//! The entry field — the text typed after the label.
//!
//! Tracks the text and a cursor within it. The label glyph is not stored;
//! it's rendered in front of the field.
//!
//! # Keys
//!
//! | Key                          | Effect                                  |
//! |------------------------------|-----------------------------------------|
//! | printable                    | Insert at cursor                        |
//! | `<BS>` / `<C-h>`             | Delete before cursor; cancels when empty|
//! | `<Del>`                      | Delete at cursor                        |
//! | `<C-w>`                      | Delete word before cursor               |
//! | `<C-u>`                      | Delete everything before cursor         |
//! | `<Left>` `<Right>`           | Move cursor                             |
//! | `<Home>` / `<C-b>`           | Cursor to start                         |
//! | `<End>` / `<C-e>`            | Cursor to end                           |
//! | `<CR>` / `<C-j>` / `<C-m>`   | Submit                                  |
//! | `<Esc>` / `<C-c>` / `<C-[>`  | Cancel                                  |

use n_surface::{KeyCode, KeyEvent, Modifiers};

/// What a key did to the entry field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKey {
    /// The text changed.
    Edited,
    /// Only the cursor moved.
    Moved,
    /// The user committed the line.
    Submit,
    /// The user abandoned the line.
    Cancel,
    /// Nothing happened.
    Ignored,
}

/// The editable text of the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryField {
    /// The entry text (without the label).
    input: String,

    /// Cursor position within `input` (char offset, 0-indexed).
    cursor: usize,
}

impl EntryField {
    /// Create an empty entry field.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    /// Replace the text and put the cursor at its end.
    pub fn set_text(&mut self, text: &str) {
        self.input.clear();
        self.input.push_str(text);
        self.cursor = self.len();
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.input
    }

    /// The cursor position within the text (char offset).
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Length in chars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.input.chars().count()
    }

    // -- Editing ------------------------------------------------------------

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor (backspace).
    /// Returns `true` if a character was deleted.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    /// Delete the character at the cursor (delete key).
    /// Returns `true` if a character was deleted.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let byte_idx = self.char_to_byte(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    /// Delete the word before the cursor, plus any blanks between it and
    /// the cursor. A word is a run of keyword characters or a run of other
    /// non-blank characters.
    pub fn delete_word_before(&mut self) -> bool {
        let chars: Vec<char> = self.input.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1].is_whitespace() {
            start -= 1;
        }
        if start > 0 {
            let keyword = is_keyword(chars[start - 1]);
            while start > 0
                && !chars[start - 1].is_whitespace()
                && is_keyword(chars[start - 1]) == keyword
            {
                start -= 1;
            }
        }
        self.delete_before(start)
    }

    /// Delete everything before the cursor.
    pub fn delete_to_start(&mut self) -> bool {
        self.delete_before(0)
    }

    /// Clear the text and reset the cursor.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // -- Cursor -------------------------------------------------------------

    /// Move the cursor one position to the left.
    pub const fn move_left(&mut self) -> bool {
        let moved = self.cursor > 0;
        self.cursor = self.cursor.saturating_sub(1);
        moved
    }

    /// Move the cursor one position to the right.
    pub fn move_right(&mut self) -> bool {
        let moved = self.cursor < self.len();
        if moved {
            self.cursor += 1;
        }
        moved
    }

    /// Move the cursor to the beginning.
    pub const fn move_home(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    /// Move the cursor to the end.
    pub fn move_end(&mut self) -> bool {
        let end = self.len();
        let moved = self.cursor != end;
        self.cursor = end;
        moved
    }

    // -- Keys ---------------------------------------------------------------

    /// Apply one key to the field.
    pub fn handle_key(&mut self, key: &KeyEvent) -> EntryKey {
        if !key.is_press() {
            return EntryKey::Ignored;
        }
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        match key.code {
            KeyCode::Enter => EntryKey::Submit,
            KeyCode::Escape => EntryKey::Cancel,
            KeyCode::Char(ch) if ctrl => self.handle_ctrl(ch.to_ascii_lowercase()),
            KeyCode::Char(ch) if !key.modifiers.intersects(Modifiers::ALT | Modifiers::SUPER) => {
                self.insert_char(ch);
                EntryKey::Edited
            }
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => edited(self.delete()),
            KeyCode::Left => moved(self.move_left()),
            KeyCode::Right => moved(self.move_right()),
            KeyCode::Home => moved(self.move_home()),
            KeyCode::End => moved(self.move_end()),
            _ => EntryKey::Ignored,
        }
    }

    fn handle_ctrl(&mut self, ch: char) -> EntryKey {
        match ch {
            'j' | 'm' => EntryKey::Submit,
            'c' | '[' => EntryKey::Cancel,
            'h' => self.handle_backspace(),
            'w' => edited(self.delete_word_before()),
            'u' => edited(self.delete_to_start()),
            'b' => moved(self.move_home()),
            'e' => moved(self.move_end()),
            _ => EntryKey::Ignored,
        }
    }

    /// Backspace on an empty field leaves the command line, as in Vim.
    fn handle_backspace(&mut self) -> EntryKey {
        if self.is_empty() {
            EntryKey::Cancel
        } else {
            edited(self.backspace())
        }
    }

    // -- Internal -----------------------------------------------------------

    /// Delete chars `[start, cursor)` and put the cursor at `start`.
    fn delete_before(&mut self, start: usize) -> bool {
        if start >= self.cursor {
            return false;
        }
        let from = self.char_to_byte(start);
        let to = self.char_to_byte(self.cursor);
        self.input.replace_range(from..to, "");
        self.cursor = start;
        true
    }

    /// Convert a char offset to a byte offset in `self.input`.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(byte_idx, _)| byte_idx)
    }
}

const fn edited(changed: bool) -> EntryKey {
    if changed {
        EntryKey::Edited
    } else {
        EntryKey::Ignored
    }
}

const fn moved(changed: bool) -> EntryKey {
    if changed {
        EntryKey::Moved
    } else {
        EntryKey::Ignored
    }
}

fn is_keyword(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
