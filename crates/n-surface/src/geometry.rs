// SPDX-License-Identifier: MIT
//
// Points and rectangles in surface coordinates.
//
// Coordinates are signed: converting a point from one node's space into
// another's can land left of or above the target origin. Every `Rect`
// is expressed in the coordinate space of its node's parent, the same
// convention `Surface::bounds` uses.

use std::fmt;

// ─── Point ──────────────────────────────────────────────────────────────────

/// A point in some node's coordinate space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this point by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ─── Rect ───────────────────────────────────────────────────────────────────

/// A rectangle: origin (x, y) and dimensions (width, height).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// One past the bottom edge.
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> i32 {
        self.y + self.h
    }

    /// Move the rectangle by `(dx, dy)` without changing its size.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Same size, new origin.
    #[inline]
    #[must_use]
    pub const fn with_origin(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    /// Same origin and width, new height.
    #[inline]
    #[must_use]
    pub const fn with_height(self, h: i32) -> Self {
        Self { h, ..self }
    }

    /// True when the rectangle covers no area.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect({}, {} {}x{})", self.x, self.y, self.w, self.h)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
