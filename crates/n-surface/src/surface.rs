// SPDX-License-Identifier: MIT
//
// The host surface: what the overlay needs from a UI toolkit.
//
// A surface is a tree of nodes. Every node has bounds in its parent's
// coordinate space, may be a scrollable container, and may sit under a
// root that owns an overlay layer (a transparent pane stacked above all
// other content). The overlay attaches itself as a child of that layer.
//
// Resize notifications are explicit: `subscribe_resize` hands back a
// `Subscription` token, the host later reports `SurfaceEvent::Resized`
// carrying that token, and `unsubscribe` ends the wiring. No callbacks
// are stored inside the surface.

use crate::geometry::{Point, Rect};

// ─── Identifiers ────────────────────────────────────────────────────────────

/// Handle to a node in a surface tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Token for one resize subscription. Never reused by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

impl Subscription {
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

// ─── Layer configuration ────────────────────────────────────────────────────

/// How a layer arranges its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Children fill the layer, stacked in insertion order.
    #[default]
    Stack,
    /// Children keep whatever bounds they are given.
    Absolute,
}

/// The mutable presentation state of an overlay layer.
///
/// The overlay changes this while attached and must put back exactly
/// what it found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerConfig {
    pub layout: Layout,
    pub opaque: bool,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Stack,
            opaque: true,
        }
    }
}

// ─── Events ─────────────────────────────────────────────────────────────────

/// A notification from the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A subscribed node changed size.
    Resized {
        node: NodeId,
        subscription: Subscription,
    },
    /// Fonts or colors changed; anything sized from them is stale.
    ThemeChanged,
}

// ─── Surface ────────────────────────────────────────────────────────────────

/// The host UI, seen from the overlay.
pub trait Surface {
    // -- Tree queries -------------------------------------------------------

    /// Parent of `node`, or `None` for a root (or a removed node).
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// True when `node` is a scrollable viewport container.
    fn is_scrollable(&self, node: NodeId) -> bool;

    /// Bounds of `node` in its parent's coordinate space.
    fn bounds(&self, node: NodeId) -> Rect;

    /// The overlay layer that floats above `node`, if its root has one.
    fn overlay_layer(&self, node: NodeId) -> Option<NodeId>;

    /// Height of one line of text in the current editor font.
    fn line_height(&self) -> i32;

    // -- Layer state --------------------------------------------------------

    fn layer_config(&self, layer: NodeId) -> LayerConfig;

    fn set_layer_config(&mut self, layer: NodeId, config: LayerConfig);

    // -- Mutation -----------------------------------------------------------

    fn set_visible(&mut self, node: NodeId, visible: bool);

    /// Add a child node under `parent` and return its handle.
    fn add_child(&mut self, parent: NodeId, bounds: Rect) -> NodeId;

    /// Detach `node` from its parent. The handle is dead afterwards.
    fn remove(&mut self, node: NodeId);

    fn set_bounds(&mut self, node: NodeId, bounds: Rect);

    fn repaint(&mut self, node: NodeId);

    fn request_focus(&mut self, node: NodeId);

    // -- Notifications ------------------------------------------------------

    /// Start reporting resizes of `node`.
    fn subscribe_resize(&mut self, node: NodeId) -> Subscription;

    /// Stop reporting for `subscription`. Unknown tokens are ignored.
    fn unsubscribe(&mut self, subscription: Subscription);

    // -- Provided -----------------------------------------------------------

    /// Origin of `node`'s own coordinate space, in root coordinates.
    ///
    /// `None` stands for root space itself.
    fn origin_in_root(&self, node: Option<NodeId>) -> Point {
        let mut origin = Point::ZERO;
        let mut cursor = node;
        while let Some(id) = cursor {
            let b = self.bounds(id);
            origin = origin.offset(b.x, b.y);
            cursor = self.parent(id);
        }
        origin
    }

    /// Convert `point` from the space of `from` into the space of `to`.
    ///
    /// `from == None` means root coordinates.
    fn convert_point(&self, point: Point, from: Option<NodeId>, to: NodeId) -> Point {
        let src = self.origin_in_root(from);
        let dst = self.origin_in_root(Some(to));
        point.offset(src.x - dst.x, src.y - dst.y)
    }
}
