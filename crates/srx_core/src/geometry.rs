//! Axis-aligned boxes shared by every collision query in the engine.
//!
//! Coordinates are screen-style: +x to the right, +y downward. A box is stored
//! as center + half extents so movement and clamping stay symmetric on both
//! axes; level data is authored as top-left rectangles and converted on load.
//!
//! Overlap is strict: two boxes that only share an edge do not overlap. A
//! resting actor therefore sits exactly on a tile top without being counted
//! as penetrating it.

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center_x: f32,
    pub center_y: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Aabb {
    pub fn from_top_left(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            center_x: x + width * 0.5,
            center_y: y + height * 0.5,
            half_w: width * 0.5,
            half_h: height * 0.5,
        }
    }

    /// Box whose bottom-left corner sits on `(x, y)`; flags and poles are placed this way.
    pub fn from_bottom_left(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_top_left(x, y - height, width, height)
    }

    pub fn left(&self) -> f32 {
        self.center_x - self.half_w
    }

    pub fn right(&self) -> f32 {
        self.center_x + self.half_w
    }

    pub fn top(&self) -> f32 {
        self.center_y - self.half_h
    }

    pub fn bottom(&self) -> f32 {
        self.center_y + self.half_h
    }

    pub fn width(&self) -> f32 {
        self.half_w * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half_h * 2.0
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            center_x: self.center_x + delta.x,
            center_y: self.center_y + delta.y,
            ..*self
        }
    }

    pub fn with_top_left(&self, top_left: Vec2) -> Self {
        Self {
            center_x: top_left.x + self.half_w,
            center_y: top_left.y + self.half_h,
            ..*self
        }
    }

    pub fn with_left(&self, left: f32) -> Self {
        Self {
            center_x: left + self.half_w,
            ..*self
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn has_positive_extent(&self) -> bool {
        self.half_w > 0.0 && self.half_h > 0.0
    }
}

/// Top-left authored rectangle as it appears in level files.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn to_aabb(self) -> Aabb {
        Aabb::from_top_left(self.x, self.y, self.w, self.h)
    }
}
