//! The editor seen from outside: a caret, a scrolled viewport and
//! highlights over a buffer.
//!
//! [`HostEditor`] is the capability set other components (the command-line
//! overlay above all) drive an editor through. [`TextEditor`] is the
//! in-memory implementation: a [`Buffer`], a caret offset, a viewport that
//! follows the caret, and a [`Highlights`] store.
//!
//! # Units
//!
//! | Quantity          | Unit                                   |
//! |-------------------|----------------------------------------|
//! | caret             | absolute char offset                   |
//! | vertical scroll   | first visible line (0-indexed)         |
//! | horizontal scroll | first visible display column           |

use n_surface::NodeId;
use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use crate::highlight::{HighlightId, Highlights};
use crate::position::{Position, TextRange};

/// Handle that names an editor to whoever owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditorId(u32);

impl EditorId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// HostEditor
// ---------------------------------------------------------------------------

/// What an editor must offer to be driven by the command-line overlay.
///
/// Moving the caret may scroll the viewport to keep it visible, so callers
/// restoring a saved view set the caret first and the scroll offsets after.
pub trait HostEditor {
    fn id(&self) -> EditorId;

    fn buffer(&self) -> &Buffer;

    /// Caret position as an absolute char offset.
    fn caret_offset(&self) -> usize;

    /// Move the caret. Offsets past the end of the buffer are clamped.
    fn move_caret(&mut self, offset: usize);

    fn vertical_scroll_offset(&self) -> usize;

    fn horizontal_scroll_offset(&self) -> usize;

    fn scroll_vertically(&mut self, offset: usize);

    fn scroll_horizontally(&mut self, offset: usize);

    /// Paint `range` as a search match. Returns the handle to remove it by.
    fn add_highlight(&mut self, range: TextRange) -> HighlightId;

    /// Remove a highlight. Unknown handles are ignored.
    fn remove_highlight(&mut self, id: HighlightId);

    /// The surface node showing this editor's text, if it is on screen.
    fn content_view(&self) -> Option<NodeId>;
}

// ---------------------------------------------------------------------------
// Display columns
// ---------------------------------------------------------------------------

/// Convert a char column offset to a display column position.
///
/// Walks the character iterator, expanding tabs to the next tab stop and
/// accounting for wide characters (which consume 2 display columns). Stops
/// at `char_col` or when the characters run out.
#[must_use]
pub fn char_col_to_display_col<I: Iterator<Item = char>>(
    chars: I,
    char_col: usize,
    tab_width: u8,
) -> usize {
    let tab_w = tab_width.max(1) as usize;
    let mut display_col = 0;

    for (i, ch) in chars.enumerate() {
        if i >= char_col {
            break;
        }
        match ch {
            '\n' | '\r' => break,
            '\t' => display_col = (display_col / tab_w + 1) * tab_w,
            _ => display_col += ch.width().unwrap_or(0),
        }
    }

    display_col
}

// ---------------------------------------------------------------------------
// TextEditor
// ---------------------------------------------------------------------------

/// An in-memory editor over one buffer.
#[derive(Debug, Clone)]
pub struct TextEditor {
    id: EditorId,
    buffer: Buffer,
    caret: usize,

    /// First visible buffer line (0-indexed).
    top_line: usize,

    /// Horizontal scroll offset in display columns.
    left_col: usize,

    /// Viewport size in lines and display columns.
    rows: usize,
    cols: usize,

    tab_width: u8,
    highlights: Highlights,
    content_view: Option<NodeId>,
}

impl TextEditor {
    /// Create an editor with the caret at the start and a 24x80 viewport.
    #[must_use]
    pub const fn new(id: EditorId, buffer: Buffer) -> Self {
        Self {
            id,
            buffer,
            caret: 0,
            top_line: 0,
            left_col: 0,
            rows: 24,
            cols: 80,
            tab_width: 4,
            highlights: Highlights::new(),
            content_view: None,
        }
    }

    /// Set the viewport size (each dimension at least 1).
    #[must_use]
    pub fn with_viewport(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows.max(1);
        self.cols = cols.max(1);
        self.ensure_caret_visible();
        self
    }

    /// Attach the editor to the surface node that displays it.
    pub const fn set_content_view(&mut self, node: Option<NodeId>) {
        self.content_view = node;
    }

    /// Set the tab stop width (minimum 1).
    pub fn set_tab_width(&mut self, width: u8) {
        self.tab_width = width.max(1);
    }

    // -- Accessors ----------------------------------------------------------

    /// The caret as (line, col).
    #[must_use]
    pub fn caret_position(&self) -> Position {
        self.buffer
            .char_idx_to_pos(self.caret)
            .unwrap_or(Position::ZERO)
    }

    #[inline]
    #[must_use]
    pub const fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    // -- Scrolling ----------------------------------------------------------

    /// Adjust the scroll position so the caret is inside the viewport.
    fn ensure_caret_visible(&mut self) {
        let caret = self.caret_position();

        // Vertical: caret line must be within [top_line, top_line + rows)
        if caret.line < self.top_line {
            self.top_line = caret.line;
        }
        if caret.line >= self.top_line + self.rows {
            self.top_line = caret.line - self.rows + 1;
        }

        // Horizontal: caret display column must be within [left_col, left_col + cols)
        let display_col = self.buffer.line(caret.line).map_or(0, |line| {
            char_col_to_display_col(line.chars(), caret.col, self.tab_width)
        });
        if display_col < self.left_col {
            self.left_col = display_col;
        }
        if display_col >= self.left_col + self.cols {
            self.left_col = display_col - self.cols + 1;
        }
    }
}

impl HostEditor for TextEditor {
    fn id(&self) -> EditorId {
        self.id
    }

    fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    fn caret_offset(&self) -> usize {
        self.caret
    }

    fn move_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.buffer.len_chars());
        self.ensure_caret_visible();
    }

    fn vertical_scroll_offset(&self) -> usize {
        self.top_line
    }

    fn horizontal_scroll_offset(&self) -> usize {
        self.left_col
    }

    fn scroll_vertically(&mut self, offset: usize) {
        self.top_line = offset.min(self.buffer.line_count().saturating_sub(1));
    }

    fn scroll_horizontally(&mut self, offset: usize) {
        self.left_col = offset;
    }

    fn add_highlight(&mut self, range: TextRange) -> HighlightId {
        self.highlights.add(range)
    }

    fn remove_highlight(&mut self, id: HighlightId) {
        self.highlights.remove(id);
    }

    fn content_view(&self) -> Option<NodeId> {
        self.content_view
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
