//! The glyph in front of the entry field.

use std::fmt;
use std::str::FromStr;

use n_editor::SearchDirection;

use crate::error::ExEntryError;

/// What the overlay was opened for.
///
/// | Glyph | Label            | Purpose                 |
/// |-------|------------------|-------------------------|
/// | `:`   | `Command`        | Ex command line         |
/// | `/`   | `SearchForward`  | Search toward the end   |
/// | `?`   | `SearchBackward` | Search toward the start |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Command,
    SearchForward,
    SearchBackward,
}

impl Label {
    /// The character shown before the entry text.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Command => ':',
            Self::SearchForward => '/',
            Self::SearchBackward => '?',
        }
    }

    /// The search direction, for search labels.
    #[must_use]
    pub const fn search_direction(self) -> Option<SearchDirection> {
        match self {
            Self::Command => None,
            Self::SearchForward => Some(SearchDirection::Forward),
            Self::SearchBackward => Some(SearchDirection::Backward),
        }
    }

    #[must_use]
    pub const fn is_search(self) -> bool {
        self.search_direction().is_some()
    }
}

impl TryFrom<char> for Label {
    type Error = ExEntryError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ':' => Ok(Self::Command),
            '/' => Ok(Self::SearchForward),
            '?' => Ok(Self::SearchBackward),
            other => Err(ExEntryError::InvalidLabel(other.to_string())),
        }
    }
}

impl FromStr for Label {
    type Err = ExEntryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Self::try_from(ch),
            _ => Err(ExEntryError::InvalidLabel(s.to_string())),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
