//! Errors from the command-line overlay.

use n_editor::EditorId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExEntryError {
    /// `activate` while a session is already open. The open session is
    /// left untouched.
    #[error("command-line overlay is already active")]
    AlreadyActive,

    /// The host could not resolve the editor handle.
    #[error("no editor with id {}", .0.raw())]
    NoSuchEditor(EditorId),

    /// A label other than `:`, `/` or `?`.
    #[error("invalid command-line label {0:?}")]
    InvalidLabel(String),
}

pub type Result<T> = std::result::Result<T, ExEntryError>;
