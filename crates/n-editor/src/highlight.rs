//! Range highlights layered over the buffer text.
//!
//! A highlight is a char-offset range the view paints with a search-match
//! color. Each one is identified by a [`HighlightId`] handed out when it is
//! added; removing it later takes the same handle. Ids are never reused
//! within a store, so a stale handle can't remove someone else's highlight.

use crate::position::TextRange;

/// Handle to one highlight in a [`Highlights`] store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HighlightId(u64);

impl HighlightId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The set of live highlights for one editor.
#[derive(Debug, Clone, Default)]
pub struct Highlights {
    entries: Vec<(HighlightId, TextRange)>,
    next_id: u64,
}

impl Highlights {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a highlight and return its handle.
    pub fn add(&mut self, range: TextRange) -> HighlightId {
        let id = HighlightId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, range));
        id
    }

    /// Remove a highlight. Returns `false` if `id` was not live.
    pub fn remove(&mut self, id: HighlightId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|&(live, _)| live != id);
        self.entries.len() != before
    }

    /// The range of a live highlight.
    #[must_use]
    pub fn get(&self, id: HighlightId) -> Option<TextRange> {
        self.entries
            .iter()
            .find_map(|&(live, range)| (live == id).then_some(range))
    }

    /// Live highlights in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (HighlightId, TextRange)> + '_ {
        self.entries.iter().copied()
    }

    /// Highlights covering char `offset`.
    pub fn at(&self, offset: usize) -> impl Iterator<Item = HighlightId> + '_ {
        self.entries
            .iter()
            .filter(move |(_, range)| range.contains(offset))
            .map(|&(id, _)| id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
