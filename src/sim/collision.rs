//! Axis-aligned bounding box overlap
//!
//! Every entity in the range (rounds, target, stone, mirror, hazards) is a
//! rectangle anchored at its bottom-left corner. Touching edges do not count.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle, `(x, y)` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        debug_assert!(w >= 0.0 && h >= 0.0, "negative rect size {w}x{h}");
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: DVec2, size: DVec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn pos(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    /// Strict overlap test, see [`collides`]
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        collides(*self, *other)
    }
}

/// True iff the two boxes overlap on both axes (edge contact is a miss)
#[inline]
pub fn collides(a: Rect, b: Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}
