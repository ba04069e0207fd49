//! Layout boxes in document coordinates (CSS pixels).

/// An axis-aligned rectangle. `x`/`y` are the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn top(&self) -> i64 {
        self.y
    }

    #[must_use]
    pub const fn left(&self) -> i64 {
        self.x
    }

    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.y + self.height
    }

    #[must_use]
    pub const fn right(&self) -> i64 {
        self.x + self.width
    }

    #[must_use]
    pub const fn area(&self) -> i64 {
        self.width * self.height
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Grow (or, with negative values, shrink) each edge independently.
    #[must_use]
    pub const fn expand(&self, top: i64, right: i64, bottom: i64, left: i64) -> Self {
        Self {
            x: self.x - left,
            y: self.y - top,
            width: self.width + left + right,
            height: self.height + top + bottom,
        }
    }

    /// Overlap of two rectangles.
    ///
    /// Edge-adjacent rectangles intersect with a zero-sized result, matching
    /// how browsers report intersections for touching boxes.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left <= right && top <= bottom {
            Some(Self::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}
