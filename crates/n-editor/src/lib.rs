//! # n-editor — Editor core for n-exline
//!
//! This crate contains the editor-side building blocks the command-line
//! overlay drives:
//!
//! - **[`position`]** — `Position` (line, col) and `TextRange` types, 0-indexed
//! - **[`buffer`]** — `Buffer` wrapping a rope with file loading and coordinate conversion
//! - **[`options`]** — Global options, the `:set` parser, and rc files
//! - **[`pattern`]** — Vim pattern extent, case policy, and translation to `regex`
//! - **[`search`]** — Forward/backward `find_next` with wrapscan
//! - **[`highlight`]** — Match highlights keyed by `HighlightId`
//! - **[`editor`]** — The `HostEditor` trait and the in-memory `TextEditor`

pub mod buffer;
pub mod editor;
pub mod highlight;
pub mod options;
pub mod pattern;
pub mod position;
pub mod search;

pub use buffer::Buffer;
pub use editor::{EditorId, HostEditor, TextEditor};
pub use highlight::{HighlightId, Highlights};
pub use options::{OptionError, OptionId, Options, SetDirective};
pub use pattern::{CasePolicy, PatternError};
pub use position::{Position, TextRange};
pub use search::{find_next, SearchDirection};
