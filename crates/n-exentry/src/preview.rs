//! The single highlight showing the current incremental-search match.

use n_editor::{HighlightId, HostEditor, TextRange};

/// Holds at most one highlight handle. Setting a new one always releases
/// the old one first, so an editor never shows two preview matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewHighlight {
    slot: Option<HighlightId>,
}

impl PreviewHighlight {
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Highlight `range`, replacing any previous preview.
    pub fn set<E: HostEditor + ?Sized>(&mut self, editor: &mut E, range: TextRange) -> HighlightId {
        self.clear(editor);
        let id = editor.add_highlight(range);
        self.slot = Some(id);
        id
    }

    /// Remove the preview highlight. Nothing happens when none is shown.
    pub fn clear<E: HostEditor + ?Sized>(&mut self, editor: &mut E) {
        if let Some(id) = self.slot.take() {
            editor.remove_highlight(id);
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> Option<HighlightId> {
        self.slot
    }
}
