//! Keeping the overlay on the bottom edge of the editor's viewport.
//!
//! The overlay lives in the host's overlay layer, not inside the editor, so
//! its bounds are computed rather than laid out:
//!
//! ```text
//!  layer ┌──────────────────────────────┐
//!        │  scroll pane ┌────────────┐  │
//!        │              │  content   │  │
//!        │              │            │  │
//!        │              ├────────────┤  │ ← overlay: same x and width,
//!        │              │ /pattern   │  │   bottom aligned, one line tall
//!        │              └────────────┘  │
//!        └──────────────────────────────┘
//! ```
//!
//! The scroll pane is the nearest scrollable ancestor of the content view.
//! Its bounds are in its parent's space, so the corner is converted from
//! there into layer space.

use n_surface::{LayerConfig, Layout, NodeId, Rect, Subscription, Surface};
use tracing::trace;

/// Border drawn around the entry field, in pixels, on each side.
pub const BORDER: i32 = 1;

/// Height of the overlay: one line of text plus the border.
#[must_use]
pub fn preferred_height(surface: &dyn Surface) -> i32 {
    surface.line_height() + 2 * BORDER
}

/// The nearest scrollable ancestor of `node`, not counting `node` itself.
#[must_use]
pub fn scrollable_ancestor(surface: &dyn Surface, node: NodeId) -> Option<NodeId> {
    let mut cursor = surface.parent(node);
    while let Some(id) = cursor {
        if surface.is_scrollable(id) {
            return Some(id);
        }
        cursor = surface.parent(id);
    }
    None
}

/// Where the overlay belongs, in `layer` coordinates. `None` when `content`
/// has no scrollable ancestor.
#[must_use]
pub fn compute_bounds(
    surface: &dyn Surface,
    content: NodeId,
    layer: NodeId,
    preferred_height: i32,
) -> Option<Rect> {
    let scroll = scrollable_ancestor(surface, content)?;
    let viewport = surface.bounds(scroll);
    let strip = viewport
        .translate(0, viewport.h - preferred_height)
        .with_height(preferred_height);
    let origin = surface.convert_point(strip.origin(), surface.parent(scroll), layer);
    Some(strip.with_origin(origin))
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// An overlay node attached to a host layer.
///
/// Exists only between [`attach`](Self::attach) and
/// [`detach`](Self::detach). `saved` is the layer configuration found at
/// attach time and put back at detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attachment {
    pub layer: NodeId,
    pub overlay: NodeId,
    pub content: NodeId,
    pub saved: LayerConfig,
    pub resize: Subscription,
}

impl Attachment {
    /// Attach an overlay for `content` to its overlay layer, position it,
    /// show the layer, and focus the overlay.
    ///
    /// Returns `None` and changes nothing when `content` has no layer.
    pub fn attach(surface: &mut dyn Surface, content: NodeId, height: i32) -> Option<Self> {
        let layer = surface.overlay_layer(content)?;
        let saved = surface.layer_config(layer);
        surface.set_layer_config(
            layer,
            LayerConfig {
                layout: Layout::Absolute,
                opaque: false,
            },
        );
        let overlay = surface.add_child(layer, Rect::default());
        let resize = surface.subscribe_resize(layer);
        let attachment = Self {
            layer,
            overlay,
            content,
            saved,
            resize,
        };
        attachment.position(surface, height);
        surface.set_visible(layer, true);
        surface.request_focus(overlay);
        trace!(?layer, ?overlay, ?saved, "overlay attached");
        Some(attachment)
    }

    /// Move the overlay to hug the viewport bottom and request a repaint.
    /// Returns `false`, leaving the overlay where it is, when there is no
    /// scrollable ancestor.
    pub fn position(&self, surface: &mut dyn Surface, height: i32) -> bool {
        let Some(bounds) = compute_bounds(surface, self.content, self.layer, height) else {
            trace!(content = ?self.content, "no scrollable ancestor, overlay not moved");
            return false;
        };
        surface.set_bounds(self.overlay, bounds);
        surface.repaint(self.layer);
        trace!(%bounds, "overlay positioned");
        true
    }

    /// Undo [`attach`](Self::attach). With `refocus_owner` the editor's
    /// content view gets focus back first.
    pub fn detach(self, surface: &mut dyn Surface, refocus_owner: bool) {
        if refocus_owner {
            surface.request_focus(self.content);
        }
        surface.unsubscribe(self.resize);
        surface.set_visible(self.layer, false);
        surface.remove(self.overlay);
        surface.set_layer_config(self.layer, self.saved);
        trace!(layer = ?self.layer, "overlay detached");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
