//! # n-exentry — the command-line entry overlay
//!
//! A one-line input strip that floats over the bottom of an editor's
//! viewport while the user types an Ex command (`:`) or a search (`/`, `?`).
//!
//! - **[`panel`]** — `ExEntryPanel`: activation, deactivation, key and surface events
//! - **[`entry`]** — `EntryField`: the editable text and its keys
//! - **[`incsearch`]** — Live search preview with revert-on-no-match
//! - **[`preview`]** — The single preview highlight slot
//! - **[`tracker`]** — Overlay geometry and attachment to the host layer
//! - **[`label`]** — `:`, `/` and `?`
//! - **[`host`]** — The `Host` trait supplying editors, surface and options
//!
//! ```text
//!  keys ──▶ ExEntryPanel ──▶ EntryField
//!                 │  text changed
//!                 ▼
//!             IncSearch ──▶ HostEditor (caret, highlight)
//!                 │
//!  resize ──▶ Attachment ──▶ Surface (overlay bounds)
//! ```

pub mod entry;
pub mod error;
pub mod host;
pub mod incsearch;
pub mod label;
pub mod panel;
pub mod preview;
pub mod tracker;

pub use entry::{EntryField, EntryKey};
pub use error::{ExEntryError, Result};
pub use host::{Host, SingleEditorHost};
pub use incsearch::{IncSearch, Preview, ViewportSnapshot};
pub use label::Label;
pub use panel::ExEntryPanel;
pub use preview::PreviewHighlight;
pub use tracker::{Attachment, BORDER};
