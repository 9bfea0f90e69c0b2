//! Incremental search: preview the match while the pattern is typed.
//!
//! When a `/` or `?` overlay opens with `incsearch` on, the editor's caret
//! and scroll offsets are saved in a [`ViewportSnapshot`] and the binder is
//! armed. Every change to the entry text then:
//!
//! 1. extracts the pattern (text up to an unescaped delimiter),
//! 2. decides case sensitivity from `ignorecase` / `smartcase`,
//!    and compiles the pattern as `magic` says,
//! 3. drops the previous preview highlight,
//! 4. searches from the *saved* caret, never the previewed one,
//! 5. on a match highlights it and moves the caret to its start,
//!    otherwise moves the caret back to the saved offset.
//!
//! Closing the overlay puts caret and scroll back exactly as saved. The
//! buffer text is never touched.

use n_editor::pattern;
use n_editor::{find_next, HighlightId, HostEditor, Options, SearchDirection, TextRange};
use tracing::debug;

use crate::label::Label;
use crate::preview::PreviewHighlight;

// ---------------------------------------------------------------------------
// ViewportSnapshot
// ---------------------------------------------------------------------------

/// Caret and scroll offsets at the moment the overlay opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSnapshot {
    pub caret_offset: usize,
    pub vertical_scroll_offset: usize,
    pub horizontal_scroll_offset: usize,
}

impl ViewportSnapshot {
    #[must_use]
    pub fn capture<E: HostEditor + ?Sized>(editor: &E) -> Self {
        Self {
            caret_offset: editor.caret_offset(),
            vertical_scroll_offset: editor.vertical_scroll_offset(),
            horizontal_scroll_offset: editor.horizontal_scroll_offset(),
        }
    }

    /// Put the editor back. The caret goes first because moving it may
    /// scroll; the saved scroll offsets then win.
    pub fn restore<E: HostEditor + ?Sized>(&self, editor: &mut E) {
        editor.move_caret(self.caret_offset);
        editor.scroll_vertically(self.vertical_scroll_offset);
        editor.scroll_horizontally(self.horizontal_scroll_offset);
    }
}

// ---------------------------------------------------------------------------
// IncSearch
// ---------------------------------------------------------------------------

/// Outcome of one preview update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    /// The pattern matched here; the caret is at `range.start`.
    Match(TextRange),
    /// No match (or no usable pattern yet); the caret is back at the
    /// saved offset.
    Reverted,
}

/// State of an armed binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmedSearch {
    direction: SearchDirection,
    snapshot: ViewportSnapshot,
    preview: PreviewHighlight,
}

/// The incremental-search binder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IncSearch {
    #[default]
    Idle,
    Armed(ArmedSearch),
}

/// Whether an overlay with `label` previews searches, given the current
/// `incsearch` option.
#[must_use]
pub const fn applies(label: Label, incsearch: bool) -> bool {
    label.is_search() && incsearch
}

impl IncSearch {
    /// Arm for `label` if incremental search applies, capturing the
    /// editor's viewport. Otherwise stay idle.
    #[must_use]
    pub fn arm<E: HostEditor + ?Sized>(label: Label, incsearch: bool, editor: &E) -> Self {
        match label.search_direction() {
            Some(direction) if incsearch => Self::Armed(ArmedSearch {
                direction,
                snapshot: ViewportSnapshot::capture(editor),
                preview: PreviewHighlight::new(),
            }),
            _ => Self::Idle,
        }
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        matches!(self, Self::Armed(_))
    }

    #[must_use]
    pub const fn snapshot(&self) -> Option<&ViewportSnapshot> {
        match self {
            Self::Armed(armed) => Some(&armed.snapshot),
            Self::Idle => None,
        }
    }

    #[must_use]
    pub const fn direction(&self) -> Option<SearchDirection> {
        match self {
            Self::Armed(armed) => Some(armed.direction),
            Self::Idle => None,
        }
    }

    /// The handle of the highlight currently previewing a match.
    #[must_use]
    pub const fn preview_highlight(&self) -> Option<HighlightId> {
        match self {
            Self::Armed(armed) => armed.preview.id(),
            Self::Idle => None,
        }
    }

    /// React to new entry text. Returns `None` when idle.
    ///
    /// The end of the pattern is always found with `magic` on, so a `[/]`
    /// collection never ends it early; `options.magic` only decides how the
    /// pattern is compiled.
    pub fn update<E: HostEditor + ?Sized>(
        &mut self,
        editor: &mut E,
        text: &str,
        options: &Options,
    ) -> Option<Preview> {
        let Self::Armed(armed) = self else {
            return None;
        };
        let pattern = pattern::extract_pattern(text, armed.direction.delimiter());
        let ignore_case = pattern::ignore_case(pattern, options.case_policy(), false);

        armed.preview.clear(editor);

        let origin = armed.snapshot.caret_offset;
        let found = find_next(
            editor.buffer(),
            pattern,
            origin,
            ignore_case,
            options.magic,
            armed.direction,
            options.wrapscan,
        )
        .unwrap_or_else(|err| {
            debug!(pattern, %err, "incsearch pattern not usable yet");
            None
        });

        let preview = match found {
            Some(range) => {
                armed.preview.set(editor, range);
                editor.move_caret(range.start);
                Preview::Match(range)
            }
            None => {
                editor.move_caret(origin);
                Preview::Reverted
            }
        };
        debug!(pattern, ignore_case, ?preview, "incsearch preview");
        Some(preview)
    }

    /// Undo the preview: restore caret and scroll from the snapshot and
    /// drop the highlight. Leaves the binder idle.
    pub fn disarm<E: HostEditor + ?Sized>(&mut self, editor: &mut E) {
        if let Self::Armed(mut armed) = std::mem::take(self) {
            armed.snapshot.restore(editor);
            armed.preview.clear(editor);
        }
    }

    /// Go idle without touching any editor, for when the editor is gone.
    pub fn abandon(&mut self) {
        *self = Self::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
