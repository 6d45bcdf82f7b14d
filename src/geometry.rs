use serde::{Deserialize, Serialize};

/// Tolerance used for edge and boundary comparisons in grid units.
pub const EPSILON: f64 = 1e-6;

/// Bounding box of a floor plan, in whole grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

/// Grid-unit coordinate. Door midpoints may be fractional.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Grid-unit extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both axes finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Axis-aligned rectangle in grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when the interiors overlap. Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() - EPSILON
            && other.x < self.right() - EPSILON
            && self.y < other.bottom() - EPSILON
            && other.y < self.bottom() - EPSILON
    }

    pub fn fits_within(&self, dimensions: Dimensions) -> bool {
        self.x >= -EPSILON
            && self.y >= -EPSILON
            && self.right() <= dimensions.width as f64 + EPSILON
            && self.bottom() <= dimensions.height as f64 + EPSILON
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Euclidean distance between the closest points of two rectangles.
    /// Zero when they touch or overlap.
    pub fn gap_distance(&self, other: &Rect) -> f64 {
        let dx = (other.x - self.right()).max(self.x - other.right()).max(0.0);
        let dy = (other.y - self.bottom()).max(self.y - other.bottom()).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Wall segment along which the two rectangles touch, allowing their
    /// facing edges to be up to `tolerance` apart.
    ///
    /// Corner contact and separated rectangles share no wall.
    pub fn shared_edge(&self, other: &Rect, tolerance: f64) -> Option<Segment> {
        let edge_x = if (self.right() - other.x).abs() <= tolerance {
            Some((self.right() + other.x) / 2.0)
        } else if (other.right() - self.x).abs() <= tolerance {
            Some((other.right() + self.x) / 2.0)
        } else {
            None
        };
        if let Some(x) = edge_x {
            let lo = self.y.max(other.y);
            let hi = self.bottom().min(other.bottom());
            if hi - lo > EPSILON {
                return Some(Segment::new(Position::new(x, lo), Position::new(x, hi)));
            }
        }

        let edge_y = if (self.bottom() - other.y).abs() <= tolerance {
            Some((self.bottom() + other.y) / 2.0)
        } else if (other.bottom() - self.y).abs() <= tolerance {
            Some((other.bottom() + self.y) / 2.0)
        } else {
            None
        };
        if let Some(y) = edge_y {
            let lo = self.x.max(other.x);
            let hi = self.right().min(other.right());
            if hi - lo > EPSILON {
                return Some(Segment::new(Position::new(lo, y), Position::new(hi, y)));
            }
        }

        None
    }

    /// Whether `point` lies on this rectangle's outline.
    pub fn on_boundary(&self, point: Position, tolerance: f64) -> bool {
        let within_x = point.x >= self.x - tolerance && point.x <= self.right() + tolerance;
        let within_y = point.y >= self.y - tolerance && point.y <= self.bottom() + tolerance;
        let on_vertical =
            (point.x - self.x).abs() <= tolerance || (point.x - self.right()).abs() <= tolerance;
        let on_horizontal =
            (point.y - self.y).abs() <= tolerance || (point.y - self.bottom()).abs() <= tolerance;
        (on_vertical && within_y) || (on_horizontal && within_x)
    }
}

/// Axis-aligned line segment between two grid points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Position,
    pub end: Position,
}

impl Segment {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_vertical(&self) -> bool {
        (self.start.x - self.end.x).abs() <= EPSILON
    }

    pub fn midpoint(&self) -> Position {
        Position::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// Euclidean distance from `point` to the closest point of the segment.
    pub fn distance_to(&self, point: Position) -> f64 {
        let x = point.x.clamp(self.start.x.min(self.end.x), self.start.x.max(self.end.x));
        let y = point.y.clamp(self.start.y.min(self.end.y), self.start.y.max(self.end.y));
        ((point.x - x).powi(2) + (point.y - y).powi(2)).sqrt()
    }
}
