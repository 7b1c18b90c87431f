//! Core geometric types for the routing engine

use serde::{Deserialize, Serialize};

/// A 2D point in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// True when both axes differ by less than `epsilon`
    pub fn near(&self, other: Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

/// Axis-aligned rectangle occupied by a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Grow the box by `margin` on every side
    pub fn inflate(&self, margin: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Check if this box touches or overlaps another (closed intervals)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }
}

/// One of the four sides of a node rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Face {
    North,
    South,
    East,
    West,
}

impl Face {
    /// East and West faces; ports on them spread vertically
    pub fn is_horizontal(self) -> bool {
        matches!(self, Face::East | Face::West)
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::North => Face::South,
            Face::South => Face::North,
            Face::East => Face::West,
            Face::West => Face::East,
        }
    }

    /// Whether `other` is the face directly across from this one
    pub fn is_opposite(self, other: Face) -> bool {
        self.opposite() == other
    }

    /// Unit vector pointing out of the rectangle through this face
    pub fn outward_normal(self) -> (f64, f64) {
        match self {
            Face::North => (0.0, -1.0),
            Face::South => (0.0, 1.0),
            Face::East => (1.0, 0.0),
            Face::West => (-1.0, 0.0),
        }
    }
}

/// Faces chosen for the two endpoints of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SidePair {
    pub source: Face,
    pub target: Face,
}

impl SidePair {
    pub fn new(source: Face, target: Face) -> Self {
        Self { source, target }
    }
}

/// Union extent of all nodes belonging to one slice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ClusterBounds {
    pub fn from_box(bounds: &BoundingBox) -> Self {
        Self {
            min_x: bounds.x,
            max_x: bounds.right(),
            min_y: bounds.y,
            max_y: bounds.bottom(),
        }
    }

    /// Extend to cover another node rectangle
    pub fn include(&mut self, bounds: &BoundingBox) {
        self.min_x = self.min_x.min(bounds.x);
        self.max_x = self.max_x.max(bounds.right());
        self.min_y = self.min_y.min(bounds.y);
        self.max_y = self.max_y.max(bounds.bottom());
    }

    /// Finite on every side and not inverted
    pub fn is_valid(&self) -> bool {
        [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }

    /// Closed-interval overlap of the horizontal extents
    pub fn overlaps_horizontally(&self, other: &ClusterBounds) -> bool {
        self.min_x <= other.max_x && other.min_x <= self.max_x
    }
}

/// How a route was synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Face-to-face route with stand-offs and a mid elbow
    Dynamic,
    /// Inter-slice route through a shared vertical lane
    Lane,
}

/// An orthogonal polyline from the source port to the target port
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub mode: RouteMode,
    pub points: Vec<Point>,
}

impl Route {
    pub fn new(mode: RouteMode, points: Vec<Point>) -> Self {
        Self { mode, points }
    }

    /// Flattened `[x0, y0, x1, y1, ...]` coordinate list for drawing
    pub fn flatten(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }
}
