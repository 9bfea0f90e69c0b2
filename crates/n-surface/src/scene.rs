// SPDX-License-Identifier: MIT
//
// In-memory surface tree.
//
// `Scene` is a plain arena of nodes implementing `Surface`. It has no
// rendering of its own: it records geometry, visibility, focus and
// repaint requests so a driver can print them and tests can assert on
// them. Resizes go through `Scene::resize`, which returns the
// notifications owed to current subscribers instead of invoking
// anything.
//
// Slots of removed nodes are reused by later additions, so a scene that
// attaches and detaches an overlay many times stays the same size. A
// `NodeId` kept past the removal of its node may therefore name a newer
// node.
//
// Layout:
//
//   root ──┬── overlay layer   (installed with `install_overlay_layer`)
//          └── ... scroll pane ── content view

use tracing::trace;

use crate::geometry::Rect;
use crate::surface::{LayerConfig, NodeId, Subscription, Surface, SurfaceEvent};

/// Line height used until the host reports a real font.
const DEFAULT_LINE_HEIGHT: i32 = 16;

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bounds: Rect,
    scrollable: bool,
    visible: bool,
    alive: bool,
    /// Present on overlay layers.
    layer: Option<LayerConfig>,
    /// On a root: the overlay layer floating above it.
    overlay: Option<NodeId>,
}

impl Node {
    const fn new(parent: Option<NodeId>, bounds: Rect) -> Self {
        Self {
            parent,
            children: Vec::new(),
            bounds,
            scrollable: false,
            visible: true,
            alive: true,
            layer: None,
            overlay: None,
        }
    }
}

/// An in-memory [`Surface`].
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    /// Slots of removed nodes, reused last-in first-out.
    free: Vec<NodeId>,
    subscriptions: Vec<(Subscription, NodeId)>,
    next_subscription: u64,
    focused: Option<NodeId>,
    repaints: usize,
    line_height: i32,
}

impl Scene {
    /// Create a scene whose root has the given bounds.
    #[must_use]
    pub fn new(root_bounds: Rect) -> Self {
        Self {
            nodes: vec![Node::new(None, root_bounds)],
            free: Vec::new(),
            subscriptions: Vec::new(),
            next_subscription: 1,
            focused: None,
            repaints: 0,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }

    /// The root node.
    #[inline]
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    // -- Building -----------------------------------------------------------

    /// Add a plain node under `parent`.
    pub fn add_node(&mut self, parent: NodeId, bounds: Rect) -> NodeId {
        let node = Node::new(Some(parent), bounds);
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId::new(self.nodes.len() - 1)
            }
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Add a scrollable viewport container under `parent`.
    pub fn add_scroll_pane(&mut self, parent: NodeId, bounds: Rect) -> NodeId {
        let id = self.add_node(parent, bounds);
        if let Some(n) = self.node_mut(id) {
            n.scrollable = true;
        }
        id
    }

    /// Give `root` an overlay layer covering it. The layer starts hidden
    /// with the default (stacked, opaque) configuration.
    pub fn install_overlay_layer(&mut self, root: NodeId) -> NodeId {
        let size = self.bounds(root);
        let layer = self.add_node(root, Rect::new(0, 0, size.w, size.h));
        if let Some(n) = self.node_mut(layer) {
            n.layer = Some(LayerConfig::default());
            n.visible = false;
        }
        if let Some(r) = self.node_mut(root) {
            r.overlay = Some(layer);
        }
        layer
    }

    pub const fn set_line_height(&mut self, height: i32) {
        self.line_height = height;
    }

    // -- Host-driven changes ------------------------------------------------

    /// Change the bounds of `node` and collect the resize notifications
    /// owed to subscribers.
    ///
    /// A root's overlay layer is resized along with it, as it always
    /// covers the root.
    pub fn resize(&mut self, node: NodeId, bounds: Rect) -> Vec<SurfaceEvent> {
        let mut resized = vec![node];
        self.set_bounds(node, bounds);

        if let Some(layer) = self.node(node).and_then(|n| n.overlay) {
            self.set_bounds(layer, Rect::new(0, 0, bounds.w, bounds.h));
            resized.push(layer);
        }

        let events: Vec<SurfaceEvent> = self
            .subscriptions
            .iter()
            .filter(|(_, target)| resized.contains(target))
            .map(|&(subscription, node)| SurfaceEvent::Resized { node, subscription })
            .collect();
        trace!(?node, %bounds, notifications = events.len(), "scene resize");
        events
    }

    // -- Inspection ---------------------------------------------------------

    /// True when the node exists and is visible.
    #[must_use]
    pub fn is_visible(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.visible)
    }

    /// True until the node is removed.
    #[must_use]
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    /// Live children of `node`, in insertion order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        match self.node(node) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// The node that last received focus.
    #[inline]
    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Number of repaint requests so far.
    #[inline]
    #[must_use]
    pub const fn repaint_count(&self) -> usize {
        self.repaints
    }

    /// Number of node slots, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live resize subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    // -- Internal -----------------------------------------------------------

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).filter(|n| n.alive)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).filter(|n| n.alive)
    }

    fn kill(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(n) => {
                n.alive = false;
                std::mem::take(&mut n.children)
            }
            None => return,
        };
        for child in children {
            self.kill(child);
        }
        if id != self.root() {
            self.free.push(id);
        }
        self.subscriptions.retain(|&(_, target)| target != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
    }
}

impl Surface for Scene {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn is_scrollable(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.scrollable)
    }

    fn bounds(&self, node: NodeId) -> Rect {
        self.node(node).map_or_else(Rect::default, |n| n.bounds)
    }

    fn overlay_layer(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            let n = self.node(id)?;
            if let Some(layer) = n.overlay {
                return Some(layer);
            }
            cursor = n.parent;
        }
        None
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn layer_config(&self, layer: NodeId) -> LayerConfig {
        self.node(layer).and_then(|n| n.layer).unwrap_or_default()
    }

    fn set_layer_config(&mut self, layer: NodeId, config: LayerConfig) {
        if let Some(n) = self.node_mut(layer) {
            n.layer = Some(config);
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(n) = self.node_mut(node) {
            n.visible = visible;
        }
    }

    fn add_child(&mut self, parent: NodeId, bounds: Rect) -> NodeId {
        self.add_node(parent, bounds)
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|&c| c != node);
            }
        }
        self.kill(node);
    }

    fn set_bounds(&mut self, node: NodeId, bounds: Rect) {
        if let Some(n) = self.node_mut(node) {
            n.bounds = bounds;
        }
    }

    fn repaint(&mut self, node: NodeId) {
        if self.node(node).is_some() {
            self.repaints += 1;
        }
    }

    fn request_focus(&mut self, node: NodeId) {
        if self.node(node).is_some() {
            self.focused = Some(node);
        }
    }

    fn subscribe_resize(&mut self, node: NodeId) -> Subscription {
        let subscription = Subscription::new(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push((subscription, node));
        subscription
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscriptions.retain(|&(s, _)| s != subscription);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::surface::Layout;
    use pretty_assertions::assert_eq;

    /// root(800x600) ─┬─ layer
    ///                └─ frame(0,40) ── scroll(10,5 700x500) ── content
    fn window() -> (Scene, NodeId, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new(Rect::new(0, 0, 800, 600));
        let root = scene.root();
        let layer = scene.install_overlay_layer(root);
        let frame = scene.add_node(root, Rect::new(0, 40, 800, 560));
        let scroll = scene.add_scroll_pane(frame, Rect::new(10, 5, 700, 500));
        let content = scene.add_node(scroll, Rect::new(0, 0, 700, 2000));
        (scene, layer, frame, scroll, content)
    }

    #[test]
    fn overlay_layer_found_from_descendant() {
        let (scene, layer, _, _, content) = window();
        assert_eq!(scene.overlay_layer(content), Some(layer));
    }

    #[test]
    fn overlay_layer_starts_hidden_and_default() {
        let (scene, layer, ..) = window();
        assert!(!scene.is_visible(layer));
        assert_eq!(scene.layer_config(layer), LayerConfig::default());
        assert_eq!(scene.bounds(layer), Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn no_layer_without_install() {
        let mut scene = Scene::new(Rect::new(0, 0, 100, 100));
        let child = scene.add_node(scene.root(), Rect::new(0, 0, 10, 10));
        assert_eq!(scene.overlay_layer(child), None);
    }

    #[test]
    fn convert_point_between_spaces() {
        let (scene, layer, frame, scroll, _) = window();
        // Scroll origin in frame space → layer space.
        let p = scene.convert_point(scene.bounds(scroll).origin(), Some(frame), layer);
        assert_eq!(p, Point::new(10, 45));
    }

    #[test]
    fn scrollable_flag() {
        let (scene, _, frame, scroll, _) = window();
        assert!(scene.is_scrollable(scroll));
        assert!(!scene.is_scrollable(frame));
    }

    #[test]
    fn removed_slots_are_reused() {
        let (mut scene, layer, ..) = window();
        let first = scene.add_child(layer, Rect::new(0, 0, 10, 10));
        let slots = scene.capacity();
        scene.remove(first);
        for _ in 0..100 {
            let overlay = scene.add_child(layer, Rect::new(0, 0, 10, 10));
            assert_eq!(scene.children(layer), &[overlay]);
            scene.remove(overlay);
        }
        assert_eq!(scene.capacity(), slots);

        let again = scene.add_child(layer, Rect::new(1, 2, 3, 4));
        assert_eq!(again, first);
        assert_eq!(scene.bounds(again), Rect::new(1, 2, 3, 4));
        assert!(scene.is_visible(again));
        assert!(scene.children(again).is_empty());
    }

    #[test]
    fn remove_kills_subtree_and_subscriptions() {
        let (mut scene, layer, ..) = window();
        let overlay = scene.add_child(layer, Rect::new(0, 0, 10, 10));
        let inner = scene.add_child(overlay, Rect::new(0, 0, 5, 5));
        scene.subscribe_resize(overlay);
        scene.request_focus(overlay);

        scene.remove(overlay);

        assert!(!scene.is_alive(overlay));
        assert!(!scene.is_alive(inner));
        assert!(scene.children(layer).is_empty());
        assert_eq!(scene.subscription_count(), 0);
        assert_eq!(scene.focused(), None);
    }

    #[test]
    fn resize_root_reports_layer_subscribers() {
        let (mut scene, layer, ..) = window();
        let sub = scene.subscribe_resize(layer);
        let root = scene.root();

        let events = scene.resize(root, Rect::new(0, 0, 1024, 768));

        assert_eq!(
            events,
            vec![SurfaceEvent::Resized {
                node: layer,
                subscription: sub
            }]
        );
        assert_eq!(scene.bounds(layer), Rect::new(0, 0, 1024, 768));
    }

    #[test]
    fn resize_unsubscribed_is_silent() {
        let (mut scene, layer, ..) = window();
        let sub = scene.subscribe_resize(layer);
        scene.unsubscribe(sub);
        let root = scene.root();
        assert!(scene.resize(root, Rect::new(0, 0, 10, 10)).is_empty());
    }

    #[test]
    fn subscriptions_are_never_reused() {
        let (mut scene, layer, ..) = window();
        let a = scene.subscribe_resize(layer);
        scene.unsubscribe(a);
        let b = scene.subscribe_resize(layer);
        assert_ne!(a, b);
    }

    #[test]
    fn layer_config_round_trip() {
        let (mut scene, layer, ..) = window();
        let config = LayerConfig {
            layout: Layout::Absolute,
            opaque: false,
        };
        scene.set_layer_config(layer, config);
        assert_eq!(scene.layer_config(layer), config);
    }

    #[test]
    fn repaint_counts_live_nodes_only() {
        let (mut scene, layer, ..) = window();
        scene.repaint(layer);
        scene.repaint(NodeId::new(999));
        assert_eq!(scene.repaint_count(), 1);
    }
}
