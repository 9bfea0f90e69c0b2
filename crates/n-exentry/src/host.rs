//! The context an overlay runs in.
//!
//! The panel does not own the editors, the UI, or the options. Each call
//! receives them through a [`Host`], borrows what it needs for the duration
//! of that call, and keeps only plain handles (`EditorId`, `NodeId`)
//! between calls.

use n_editor::{EditorId, HostEditor, Options};
use n_surface::{Scene, Surface};

/// Editors, UI surface and options, as seen by the overlay.
pub trait Host {
    type Editor: HostEditor;

    /// Resolve an editor handle.
    fn editor_mut(&mut self, id: EditorId) -> Option<&mut Self::Editor>;

    /// The UI surface. `None` runs the overlay headless: session state is
    /// kept, but nothing is attached or drawn and searches do not preview.
    fn surface_mut(&mut self) -> Option<&mut dyn Surface>;

    fn options(&self) -> &Options;
}

/// A host with exactly one editor and an optional in-memory scene.
#[derive(Debug, Clone)]
pub struct SingleEditorHost<E> {
    pub editor: E,
    pub scene: Option<Scene>,
    pub options: Options,
}

impl<E: HostEditor> SingleEditorHost<E> {
    #[must_use]
    pub fn new(editor: E, scene: Option<Scene>, options: Options) -> Self {
        Self {
            editor,
            scene,
            options,
        }
    }

    /// A host with no surface.
    #[must_use]
    pub fn headless(editor: E, options: Options) -> Self {
        Self::new(editor, None, options)
    }
}

impl<E: HostEditor> Host for SingleEditorHost<E> {
    type Editor = E;

    fn editor_mut(&mut self, id: EditorId) -> Option<&mut E> {
        (self.editor.id() == id).then_some(&mut self.editor)
    }

    fn surface_mut(&mut self) -> Option<&mut dyn Surface> {
        self.scene.as_mut().map(|scene| scene as &mut dyn Surface)
    }

    fn options(&self) -> &Options {
        &self.options
    }
}
