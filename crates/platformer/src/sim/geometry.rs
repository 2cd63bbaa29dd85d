use serde::Serialize;

/// Axis-aligned box in world pixels. `x`/`y` is the top-left corner and
/// `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict overlap: boxes that only share an edge do not intersect, and
    /// an empty box intersects nothing.
    pub const fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn overlap_x(&self, other: &Rect) -> i32 {
        self.right().min(other.right()) - self.left().max(other.left())
    }

    pub fn overlap_y(&self, other: &Rect) -> i32 {
        self.bottom().min(other.bottom()) - self.top().max(other.top())
    }

    pub fn contains_x(&self, x: i32) -> bool {
        x >= self.left() && x < self.right()
    }
}
