//! Geometry primitives shared by the clip plotter and the context.

use bitflags::bitflags;
use glam::Vec2;

/// Axis-aligned rectangle given as origin plus extent, in pixel units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Axis-aligned box given by its corners, `x0 <= x1`, `y0 <= y1`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClipBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl ClipBox {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn from_rect(rect: &Rect) -> Self {
        Self::new(rect.x, rect.y, rect.x + rect.w, rect.y + rect.h)
    }

    /// Intersection of two boxes.  Degenerate (empty) results collapse onto
    /// the corner of `other` nearest to `self` rather than inverting.
    pub fn intersect(self, other: ClipBox) -> Self {
        Self {
            x0: self.x0.max(other.x0).min(other.x1),
            y0: self.y0.max(other.y0).min(other.y1),
            x1: self.x1.min(other.x1).max(other.x0),
            y1: self.y1.min(other.y1).max(other.y0),
        }
    }
}

bitflags! {
    /// Outcode of a point against a [`ClipBox`].
    ///
    /// An empty set means the point is inside (borders included).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ClipFlags: u32 {
        const X_MIN = 1 << 0;
        const Y_MIN = 1 << 1;
        const X_MAX = 1 << 2;
        const Y_MAX = 1 << 3;
    }
}

/// Classify `p` against the box sides.
pub fn clip_flags(p: Vec2, b: &ClipBox) -> ClipFlags {
    let mut flags = ClipFlags::empty();
    if p.x < b.x0 {
        flags |= ClipFlags::X_MIN;
    }
    if p.x > b.x1 {
        flags |= ClipFlags::X_MAX;
    }
    if p.y < b.y0 {
        flags |= ClipFlags::Y_MIN;
    }
    if p.y > b.y1 {
        flags |= ClipFlags::Y_MAX;
    }
    flags
}
