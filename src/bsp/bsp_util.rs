// src/bsp/bsp_util.rs
// Integer geometry shared by the partition tree, the room carver and the corridor connector.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle in dungeon space. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// True if `other` lies entirely inside `self` (shared edges allowed).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrinks every side by `margin`. The result may have a non-positive size.
    pub fn shrink(&self, margin: i32) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2 * margin,
            self.height - 2 * margin,
        )
    }

    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0 || h <= 0 {
            0
        } else {
            i64::from(w) * i64::from(h)
        }
    }

    /// Cuts the rectangle in two at `offset` along `axis`.
    /// The first half is the top (horizontal) or left (vertical) one.
    pub fn split(&self, axis: SplitAxis, offset: i32) -> (Rect, Rect) {
        match axis {
            SplitAxis::Horizontal => (
                Rect::new(self.x, self.y, self.width, offset),
                Rect::new(self.x, self.y + offset, self.width, self.height - offset),
            ),
            SplitAxis::Vertical => (
                Rect::new(self.x, self.y, offset, self.height),
                Rect::new(self.x + offset, self.y, self.width - offset, self.height),
            ),
        }
    }
}

/// Direction of a partition cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitAxis {
    /// Divides the height; children are stacked top/bottom.
    Horizontal,
    /// Divides the width; children sit side by side.
    Vertical,
}

impl SplitAxis {
    /// The extent of `rect` this axis cuts through.
    pub fn extent(&self, rect: &Rect) -> i32 {
        match self {
            SplitAxis::Horizontal => rect.height,
            SplitAxis::Vertical => rect.width,
        }
    }
}

/// A room carved inside a leaf region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room(pub Rect);

impl Room {
    pub fn rect(&self) -> Rect {
        self.0
    }

    pub fn center(&self) -> Point {
        self.0.center()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    /// `(x1, y1, x2, y2)`, the shape renderers consume.
    pub fn coords(&self) -> (i32, i32, i32, i32) {
        (self.start.x, self.start.y, self.end.x, self.end.y)
    }
}

/// L-shaped corridor between two room centers: a horizontal leg at the
/// first center's row followed by a vertical leg at the second center's column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corridor {
    pub horizontal: Segment,
    pub vertical: Segment,
}

impl Corridor {
    pub fn between(from: Point, to: Point) -> Self {
        let elbow = Point::new(to.x, from.y);
        Corridor {
            horizontal: Segment::new(from, elbow),
            vertical: Segment::new(elbow, to),
        }
    }

    pub fn segments(&self) -> [Segment; 2] {
        [self.horizontal, self.vertical]
    }
}
