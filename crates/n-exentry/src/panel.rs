//! The command-line overlay controller.
//!
//! [`ExEntryPanel`] ties the pieces together:
//!
//! - the [`EntryField`] the user types into,
//! - the [`IncSearch`] binder previewing `/` and `?` searches,
//! - the [`Attachment`] placing the overlay on the host's overlay layer.
//!
//! # Lifecycle
//!
//! ```text
//!            activate                      handle_key / handle_surface_event
//!  inactive ─────────▶ active (session) ◀──────────────────────────────────┐
//!     ▲                    │                                               │
//!     │    deactivate      │                                               │
//!     └────────────────────┴───────────────────────────────────────────────┘
//! ```
//!
//! A panel belongs to whoever creates it (usually the editor session) and
//! serves one editor at a time. Everything it needs from outside arrives
//! per call through a [`Host`]. Label, count and text stay readable after
//! `deactivate` so the dispatcher can act on a submitted line.

use n_editor::{EditorId, HostEditor};
use n_surface::{KeyEvent, Surface, SurfaceEvent};
use tracing::{debug, trace, warn};

use crate::entry::{EntryField, EntryKey};
use crate::error::{ExEntryError, Result};
use crate::host::Host;
use crate::incsearch::{IncSearch, Preview};
use crate::label::Label;
use crate::tracker::{self, Attachment};

/// What is only true while the overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Session {
    editor: EditorId,
    /// Incremental search applied when the session opened.
    incsearch: bool,
}

/// The command-line entry overlay.
#[derive(Debug, Default)]
pub struct ExEntryPanel {
    session: Option<Session>,
    label: Option<Label>,
    count: u32,
    entry: EntryField,
    incsearch: IncSearch,
    attachment: Option<Attachment>,
    /// Overlay height, from the surface's line height.
    height: i32,
}

impl ExEntryPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Open the overlay for `editor`.
    ///
    /// Whether `/` and `?` searches preview is decided here, from the
    /// `incsearch` option, for the whole session. Without a surface the
    /// session is recorded but nothing is attached and searches never
    /// preview, so the editor's caret and highlights are left alone. An
    /// editor that is not on screen still previews; only the overlay node
    /// is missing.
    ///
    /// # Errors
    ///
    /// [`ExEntryError::AlreadyActive`] if a session is open (it is left as
    /// is), [`ExEntryError::NoSuchEditor`] if the host does not know
    /// `editor`.
    pub fn activate<H: Host>(
        &mut self,
        host: &mut H,
        editor: EditorId,
        label: Label,
        initial_text: &str,
        count: u32,
    ) -> Result<()> {
        if self.session.is_some() {
            return Err(ExEntryError::AlreadyActive);
        }
        let incsearch_option = host.options().incsearch;
        let headless = host.surface_mut().is_none();
        let ed = host
            .editor_mut(editor)
            .ok_or(ExEntryError::NoSuchEditor(editor))?;
        let incsearch = if headless {
            IncSearch::Idle
        } else {
            IncSearch::arm(label, incsearch_option, &*ed)
        };
        let content = ed.content_view();

        self.label = Some(label);
        self.count = count;
        self.entry.set_text(initial_text);
        let applies = incsearch.is_armed();
        self.incsearch = incsearch;

        if let Some(surface) = host.surface_mut() {
            self.height = tracker::preferred_height(surface);
            self.attachment = content.and_then(|c| Attachment::attach(surface, c, self.height));
        }
        self.session = Some(Session {
            editor,
            incsearch: applies,
        });
        debug!(
            %label,
            count,
            incsearch = applies,
            attached = self.attachment.is_some(),
            "command line activated"
        );
        Ok(())
    }

    /// Close the overlay. Does nothing when inactive.
    ///
    /// Detaches from the host (refocusing the editor first when
    /// `refocus_owner` is set) and, when the session previewed searches,
    /// restores the caret and scroll offsets saved at activation and drops
    /// the preview highlight. A dispatcher committing a search runs it
    /// after this.
    pub fn deactivate<H: Host>(&mut self, host: &mut H, refocus_owner: bool) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(attachment) = self.attachment.take() {
            if let Some(surface) = host.surface_mut() {
                attachment.detach(surface, refocus_owner);
            }
        }
        if session.incsearch {
            match host.editor_mut(session.editor) {
                Some(ed) => self.incsearch.disarm(ed),
                None => {
                    warn!(editor = session.editor.raw(), "editor gone before command line closed");
                    self.incsearch.abandon();
                }
            }
        }
        debug!(text = self.entry.text(), "command line deactivated");
    }

    // -- Events -------------------------------------------------------------

    /// Feed a key to the entry field. Text changes run the search preview.
    ///
    /// The caller acts on [`EntryKey::Submit`] and [`EntryKey::Cancel`],
    /// normally by calling [`deactivate`](Self::deactivate). An inactive
    /// panel ignores every key.
    pub fn handle_key<H: Host>(&mut self, host: &mut H, key: &KeyEvent) -> EntryKey {
        if self.session.is_none() {
            return EntryKey::Ignored;
        }
        let outcome = self.entry.handle_key(key);
        if outcome == EntryKey::Edited {
            self.text_changed(host);
        }
        outcome
    }

    /// Replace the entry text as if it had been typed.
    pub fn set_text<H: Host>(&mut self, host: &mut H, text: &str) {
        if self.session.is_none() || self.entry.text() == text {
            return;
        }
        self.entry.set_text(text);
        self.text_changed(host);
    }

    /// React to a host notification. Returns `true` if the overlay was
    /// repositioned.
    ///
    /// Resizes count only when they carry this panel's current
    /// subscription; notifications queued before a detach are dropped.
    pub fn handle_surface_event<H: Host>(&mut self, host: &mut H, event: SurfaceEvent) -> bool {
        let Some(attachment) = self.attachment else {
            return false;
        };
        let Some(surface) = host.surface_mut() else {
            return false;
        };
        match event {
            SurfaceEvent::Resized { subscription, .. } if subscription == attachment.resize => {
                attachment.position(surface, self.height)
            }
            SurfaceEvent::Resized { subscription, .. } => {
                trace!(?subscription, "ignoring stale resize");
                false
            }
            SurfaceEvent::ThemeChanged => {
                self.height = tracker::preferred_height(surface);
                attachment.position(surface, self.height)
            }
        }
    }

    fn text_changed<H: Host>(&mut self, host: &mut H) -> Option<Preview> {
        let session = self.session?;
        if !self.incsearch.is_armed() {
            return None;
        }
        let options = *host.options();
        let ed = host.editor_mut(session.editor)?;
        self.incsearch.update(ed, self.entry.text(), &options)
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The label of the current or last session.
    #[inline]
    #[must_use]
    pub const fn label(&self) -> Option<Label> {
        self.label
    }

    #[inline]
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// The entry text, without the label glyph.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        self.entry.text()
    }

    #[inline]
    #[must_use]
    pub const fn entry(&self) -> &EntryField {
        &self.entry
    }

    /// The editor the open session serves.
    #[must_use]
    pub fn editor(&self) -> Option<EditorId> {
        self.session.map(|s| s.editor)
    }

    /// Whether the open session previews searches.
    #[must_use]
    pub fn incsearch_applies(&self) -> bool {
        self.session.is_some_and(|s| s.incsearch)
    }

    #[inline]
    #[must_use]
    pub const fn incsearch(&self) -> &IncSearch {
        &self.incsearch
    }

    #[inline]
    #[must_use]
    pub const fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Height the overlay wants on `surface`.
    #[must_use]
    pub fn preferred_height(surface: &dyn Surface) -> i32 {
        tracker::preferred_height(surface)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SingleEditorHost;
    use n_editor::{Buffer, Options, TextEditor, TextRange};
    use n_surface::{parse_keys, LayerConfig, Layout, NodeId, Rect, Scene};
    use pretty_assertions::assert_eq;

    const ED: EditorId = EditorId::new(7);

    struct Fixture {
        host: SingleEditorHost<TextEditor>,
        panel: ExEntryPanel,
        layer: NodeId,
        scroll: NodeId,
        content: NodeId,
    }

    /// root(800x600) ─┬─ layer
    ///                └─ frame(0,40 800x560) ── scroll(10,5 700x500) ── content
    fn fixture(text: &str, options: Options) -> Fixture {
        let mut scene = Scene::new(Rect::new(0, 0, 800, 600));
        let root = scene.root();
        let layer = scene.install_overlay_layer(root);
        let frame = scene.add_node(root, Rect::new(0, 40, 800, 560));
        let scroll = scene.add_scroll_pane(frame, Rect::new(10, 5, 700, 500));
        let content = scene.add_node(scroll, Rect::new(0, 0, 700, 2000));
        let mut editor = TextEditor::new(ED, Buffer::from_text(text)).with_viewport(10, 40);
        editor.set_content_view(Some(content));
        Fixture {
            host: SingleEditorHost::new(editor, Some(scene), options),
            panel: ExEntryPanel::new(),
            layer,
            scroll,
            content,
        }
    }

    fn headless(text: &str, options: Options) -> (SingleEditorHost<TextEditor>, ExEntryPanel) {
        let editor = TextEditor::new(ED, Buffer::from_text(text));
        (SingleEditorHost::headless(editor, options), ExEntryPanel::new())
    }

    fn type_keys<H: Host>(panel: &mut ExEntryPanel, host: &mut H, keys: &str) -> Vec<EntryKey> {
        parse_keys(keys)
            .unwrap()
            .iter()
            .map(|k| panel.handle_key(host, k))
            .collect()
    }

    fn scene(f: &Fixture) -> &Scene {
        f.host.scene.as_ref().unwrap()
    }

    // -- Activation ---------------------------------------------------------

    #[test]
    fn activate_records_session() {
        for label in [Label::Command, Label::SearchForward, Label::SearchBackward] {
            let (mut host, mut panel) = headless("abc", Options::default());
            panel.activate(&mut host, ED, label, "init", 3).unwrap();
            assert!(panel.is_active());
            assert_eq!(panel.label(), Some(label));
            assert_eq!(panel.count(), 3);
            assert_eq!(panel.text(), "init");
            assert_eq!(panel.entry().cursor(), 4);
            assert_eq!(panel.editor(), Some(ED));
        }
    }

    #[test]
    fn activate_twice_is_rejected() {
        let (mut host, mut panel) = headless("abc", Options::default());
        panel.activate(&mut host, ED, Label::SearchForward, "a", 1).unwrap();
        let err = panel.activate(&mut host, ED, Label::Command, "b", 2);
        assert_eq!(err, Err(ExEntryError::AlreadyActive));
        assert_eq!(panel.label(), Some(Label::SearchForward));
        assert_eq!(panel.text(), "a");
        assert_eq!(panel.count(), 1);
    }

    #[test]
    fn unknown_editor_is_rejected() {
        let (mut host, mut panel) = headless("abc", Options::default());
        let err = panel.activate(&mut host, EditorId::new(99), Label::Command, "", 1);
        assert_eq!(err, Err(ExEntryError::NoSuchEditor(EditorId::new(99))));
        assert!(!panel.is_active());
        assert_eq!(panel.label(), None);
    }

    #[test]
    fn activate_attaches_to_layer() {
        let mut f = fixture("abc", Options::default());
        f.panel.activate(&mut f.host, ED, Label::Command, "", 1).unwrap();
        let a = *f.panel.attachment().unwrap();
        let scene = scene(&f);
        assert_eq!(a.layer, f.layer);
        assert!(scene.is_visible(f.layer));
        assert_eq!(
            scene.layer_config(f.layer),
            LayerConfig {
                layout: Layout::Absolute,
                opaque: false,
            }
        );
        assert_eq!(scene.focused(), Some(a.overlay));
        assert_eq!(scene.bounds(a.overlay), Rect::new(10, 527, 700, 18));
    }

    #[test]
    fn editor_off_screen_runs_without_attachment() {
        let mut f = fixture("foo bar foo", Options::default());
        f.host.editor.set_content_view(None);
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        assert!(f.panel.attachment().is_none());
        type_keys(&mut f.panel, &mut f.host, "bar");
        assert_eq!(f.host.editor.caret_offset(), 4);
    }

    // -- Scenarios ----------------------------------------------------------

    #[test]
    fn typing_a_pattern_previews_next_match() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        let keys = type_keys(&mut f.panel, &mut f.host, "foo");
        assert_eq!(keys, vec![EntryKey::Edited; 3]);

        let ed = &f.host.editor;
        assert_eq!(ed.caret_offset(), 8);
        assert_eq!(ed.highlights().len(), 1);
        let id = f.panel.incsearch().preview_highlight().unwrap();
        assert_eq!(ed.highlights().get(id), Some(TextRange::new(8, 11)));
    }

    #[test]
    fn pattern_without_match_reverts() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "zzz");
        assert_eq!(f.host.editor.caret_offset(), 0);
        assert!(f.host.editor.highlights().is_empty());
    }

    #[test]
    fn command_label_never_previews() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::Command, "", 1).unwrap();
        assert!(f.panel.incsearch().snapshot().is_none());
        assert!(!f.panel.incsearch_applies());
        type_keys(&mut f.panel, &mut f.host, "foo");
        assert_eq!(f.panel.text(), "foo");
        assert_eq!(f.host.editor.caret_offset(), 0);
        assert!(f.host.editor.highlights().is_empty());
    }

    #[test]
    fn deactivate_twice_is_a_no_op() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "bar");
        f.panel.deactivate(&mut f.host, true);

        let scene_after_first = scene(&f).clone();
        let caret = f.host.editor.caret_offset();
        f.panel.deactivate(&mut f.host, true);
        assert!(!f.panel.is_active());
        assert_eq!(f.host.editor.caret_offset(), caret);
        assert_eq!(scene(&f).focused(), scene_after_first.focused());
        assert_eq!(scene(&f).repaint_count(), scene_after_first.repaint_count());
        assert_eq!(
            scene(&f).layer_config(f.layer),
            scene_after_first.layer_config(f.layer)
        );
    }

    // -- Incremental search -------------------------------------------------

    #[test]
    fn incsearch_off_never_previews() {
        let options = Options {
            incsearch: false,
            ..Options::default()
        };
        let mut f = fixture("foo bar foo", options);
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "bar");
        assert_eq!(f.host.editor.caret_offset(), 0);
        assert!(f.host.editor.highlights().is_empty());
    }

    #[test]
    fn toggling_incsearch_mid_session_changes_nothing() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        f.host.options.incsearch = false;
        type_keys(&mut f.panel, &mut f.host, "bar");
        assert_eq!(f.host.editor.caret_offset(), 4);

        f.panel.deactivate(&mut f.host, false);
        f.host.options.incsearch = true;
        let mut g = fixture("foo bar foo", Options {
            incsearch: false,
            ..Options::default()
        });
        g.panel.activate(&mut g.host, ED, Label::SearchForward, "", 1).unwrap();
        g.host.options.incsearch = true;
        type_keys(&mut g.panel, &mut g.host, "bar");
        assert_eq!(g.host.editor.caret_offset(), 0);
    }

    #[test]
    fn initial_text_does_not_preview() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "bar", 1).unwrap();
        assert_eq!(f.host.editor.caret_offset(), 0);
        type_keys(&mut f.panel, &mut f.host, "<BS>r");
        assert_eq!(f.host.editor.caret_offset(), 4);
    }

    #[test]
    fn backward_search_previews_previous_match() {
        let mut f = fixture("foo bar foo", Options::default());
        f.host.editor.move_caret(8);
        f.panel.activate(&mut f.host, ED, Label::SearchBackward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "foo");
        assert_eq!(f.host.editor.caret_offset(), 0);
    }

    #[test]
    fn editing_back_to_a_match_highlights_again() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "barz");
        assert!(f.host.editor.highlights().is_empty());
        type_keys(&mut f.panel, &mut f.host, "<BS>");
        assert_eq!(f.host.editor.caret_offset(), 4);
        assert_eq!(f.host.editor.highlights().len(), 1);
    }

    #[test]
    fn cursor_motion_does_not_search() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "bar");
        f.host.editor.move_caret(0);
        let keys = type_keys(&mut f.panel, &mut f.host, "<Left><Home>");
        assert_eq!(keys, vec![EntryKey::Moved; 2]);
        assert_eq!(f.host.editor.caret_offset(), 0);
    }

    #[test]
    fn smartcase_uppercase_is_exact() {
        let options = Options {
            ignorecase: true,
            smartcase: true,
            ..Options::default()
        };
        let mut f = fixture("Foo foo FOO", options);
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "foo");
        assert_eq!(f.host.editor.caret_offset(), 4);
        type_keys(&mut f.panel, &mut f.host, "<C-u>FOO");
        assert_eq!(f.host.editor.caret_offset(), 8);
    }

    #[test]
    fn nomagic_option_reaches_preview() {
        let mut options = Options::default();
        options.apply_set("nomagic").unwrap();
        let mut f = fixture("a.c axc", options);
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "a.c");
        assert_eq!(f.host.editor.caret_offset(), 0);

        f.panel.deactivate(&mut f.host, true);
        f.host.options.apply_set("magic").unwrap();
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        type_keys(&mut f.panel, &mut f.host, "a.c");
        assert_eq!(f.host.editor.caret_offset(), 4);
    }

    #[test]
    fn set_text_runs_preview() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        f.panel.set_text(&mut f.host, "bar");
        assert_eq!(f.panel.text(), "bar");
        assert_eq!(f.host.editor.caret_offset(), 4);
    }

    // -- Deactivation -------------------------------------------------------

    #[test]
    fn deactivate_restores_view_and_layer() {
        let text: String = (0..100).map(|i| format!("line {i}\n")).collect();
        let mut f = fixture(&text, Options::default());
        f.host.editor.move_caret(2);
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 1).unwrap();
        let a = *f.panel.attachment().unwrap();
        type_keys(&mut f.panel, &mut f.host, "line 80");
        assert_ne!(f.host.editor.vertical_scroll_offset(), 0);

        f.panel.deactivate(&mut f.host, true);
        assert_eq!(f.host.editor.caret_offset(), 2);
        assert_eq!(f.host.editor.vertical_scroll_offset(), 0);
        assert_eq!(f.host.editor.horizontal_scroll_offset(), 0);
        assert!(f.host.editor.highlights().is_empty());

        let scene = scene(&f);
        assert_eq!(scene.layer_config(f.layer), LayerConfig::default());
        assert!(!scene.is_visible(f.layer));
        assert!(!scene.is_alive(a.overlay));
        assert_eq!(scene.subscription_count(), 0);
        assert_eq!(scene.focused(), Some(f.content));
    }

    #[test]
    fn submitted_text_survives_deactivate() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "", 5).unwrap();
        let keys = type_keys(&mut f.panel, &mut f.host, "bar<CR>");
        assert_eq!(keys.last(), Some(&EntryKey::Submit));
        f.panel.deactivate(&mut f.host, true);
        assert!(!f.panel.is_active());
        assert_eq!(f.panel.text(), "bar");
        assert_eq!(f.panel.label(), Some(Label::SearchForward));
        assert_eq!(f.panel.count(), 5);
        assert_eq!(f.panel.editor(), None);
    }

    #[test]
    fn inactive_panel_ignores_keys() {
        let (mut host, mut panel) = headless("abc", Options::default());
        assert_eq!(type_keys(&mut panel, &mut host, "x"), vec![EntryKey::Ignored]);
        assert_eq!(panel.text(), "");
    }

    #[test]
    fn reactivate_after_deactivate() {
        let mut f = fixture("foo bar foo", Options::default());
        f.panel.activate(&mut f.host, ED, Label::SearchForward, "x", 1).unwrap();
        f.panel.deactivate(&mut f.host, true);
        f.panel.activate(&mut f.host, ED, Label::Command, "", 2).unwrap();
        assert_eq!(f.panel.text(), "");
        assert_eq!(f.panel.label(), Some(Label::Command));
        assert!(scene(&f).is_visible(f.layer));
    }

    // -- Headless -----------------------------------------------------------

    #[test]
    fn headless_records_state_without_preview() {
        let (mut host, mut panel) = headless("foo bar foo", Options::default());
        panel.activate(&mut host, ED, Label::SearchForward, "", 1).unwrap();
        assert!(panel.is_active());
        assert!(panel.attachment().is_none());
        assert!(!panel.incsearch_applies());
        assert_eq!(panel.incsearch().snapshot(), None);

        type_keys(&mut panel, &mut host, "bar");
        assert_eq!(panel.text(), "bar");
        assert_eq!(host.editor.caret_offset(), 0);
        assert!(host.editor.highlights().is_empty());

        panel.deactivate(&mut host, true);
        assert!(!panel.is_active());
        assert_eq!(host.editor.caret_offset(), 0);
    }

    #[test]
    fn headless_leaves_moved_caret_alone() {
        let (mut host, mut panel) = headless("foo bar foo", Options::default());
        panel.activate(&mut host, ED, Label::SearchBackward, "", 1).unwrap();
        host.editor.move_caret(6);
        type_keys(&mut panel, &mut host, "foo");
        panel.deactivate(&mut host, true);
        assert_eq!(host.editor.caret_offset(), 6);
        assert!(host.editor.highlights().is_empty());
    }

    #[test]
    fn headless_ignores_surface_events() {
        let (mut host, mut panel) = headless("abc", Options::default());
        panel.activate(&mut host, ED, Label::Command, "", 1).unwrap();
        assert!(!panel.handle_surface_event(&mut host, SurfaceEvent::ThemeChanged));
    }

    // -- Surface events -----------------------------------------------------

    #[test]
    fn resize_repositions_overlay() {
        let mut f = fixture("abc", Options::default());
        f.panel.activate(&mut f.host, ED, Label::Command, "", 1).unwrap();
        let overlay = f.panel.attachment().unwrap().overlay;
        let root = scene(&f).root();

        let scene = f.host.scene.as_mut().unwrap();
        let _ = scene.resize(f.scroll, Rect::new(10, 5, 600, 300));
        let events = scene.resize(root, Rect::new(0, 0, 800, 400));
        assert_eq!(events.len(), 1);
        for event in events {
            assert!(f.panel.handle_surface_event(&mut f.host, event));
        }
        assert_eq!(scene_bounds(&f, overlay), Rect::new(10, 327, 600, 18));
    }

    fn scene_bounds(f: &Fixture, node: NodeId) -> Rect {
        scene(f).bounds(node)
    }

    #[test]
    fn stale_resize_is_ignored() {
        let mut f = fixture("abc", Options::default());
        f.panel.activate(&mut f.host, ED, Label::Command, "", 1).unwrap();
        let old = f.panel.attachment().unwrap().resize;
        f.panel.deactivate(&mut f.host, false);
        f.panel.activate(&mut f.host, ED, Label::Command, "", 1).unwrap();

        let stale = SurfaceEvent::Resized {
            node: f.layer,
            subscription: old,
        };
        assert!(!f.panel.handle_surface_event(&mut f.host, stale));
    }

    #[test]
    fn resize_after_deactivate_is_ignored() {
        let mut f = fixture("abc", Options::default());
        f.panel.activate(&mut f.host, ED, Label::Command, "", 1).unwrap();
        let resize = f.panel.attachment().unwrap().resize;
        f.panel.deactivate(&mut f.host, false);
        let event = SurfaceEvent::Resized {
            node: f.layer,
            subscription: resize,
        };
        assert!(!f.panel.handle_surface_event(&mut f.host, event));
    }

    #[test]
    fn theme_change_recomputes_height() {
        let mut f = fixture("abc", Options::default());
        f.panel.activate(&mut f.host, ED, Label::Command, "", 1).unwrap();
        let overlay = f.panel.attachment().unwrap().overlay;
        f.host.scene.as_mut().unwrap().set_line_height(20);
        assert!(f.panel.handle_surface_event(&mut f.host, SurfaceEvent::ThemeChanged));
        assert_eq!(scene_bounds(&f, overlay), Rect::new(10, 45 + 500 - 22, 700, 22));
    }

    #[test]
    fn no_scrollable_ancestor_leaves_bounds() {
        let mut scene = Scene::new(Rect::new(0, 0, 200, 100));
        let root = scene.root();
        scene.install_overlay_layer(root);
        let content = scene.add_node(root, Rect::new(0, 0, 200, 100));
        let mut editor = TextEditor::new(ED, Buffer::from_text("abc"));
        editor.set_content_view(Some(content));
        let mut host = SingleEditorHost::new(editor, Some(scene), Options::default());
        let mut panel = ExEntryPanel::new();

        panel.activate(&mut host, ED, Label::Command, "", 1).unwrap();
        let overlay = panel.attachment().unwrap().overlay;
        let bounds = host.scene.as_ref().unwrap().bounds(overlay);
        assert_eq!(bounds, Rect::default());
        assert!(!panel.handle_surface_event(&mut host, SurfaceEvent::ThemeChanged));
    }

    #[test]
    fn preferred_height_from_line_height() {
        let f = fixture("abc", Options::default());
        assert_eq!(ExEntryPanel::preferred_height(scene(&f)), 18);
    }
}
