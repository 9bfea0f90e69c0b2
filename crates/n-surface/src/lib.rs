// SPDX-License-Identifier: MIT
//
// n-surface — UI substrate for n-exline.
//
// The overlay never talks to a windowing toolkit directly. Everything it
// needs from the host UI goes through the `Surface` trait: a tree of
// nodes with bounds relative to their parent, scrollable containers, and
// an overlay layer (a glass pane) that floats above the editor content.
//
// `Scene` is the in-memory implementation. It backs the scripted driver
// binary and every test in the workspace, and reports resize
// notifications as plain values so the caller decides when to deliver
// them.

pub mod geometry;
pub mod input;
pub mod scene;
pub mod surface;

pub use geometry::{Point, Rect};
pub use input::{parse_keys, KeyCode, KeyEvent, KeyEventKind, KeyParseError, Modifiers};
pub use scene::Scene;
pub use surface::{LayerConfig, Layout, NodeId, Subscription, Surface, SurfaceEvent};
