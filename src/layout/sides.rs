//! Face selection between two rectangles

use super::types::{BoundingBox, Face, Point, SidePair};

/// Face of `bounds` that best faces the direction `(dx, dy)`.
///
/// The split between horizontal and vertical faces follows the rectangle's
/// diagonal: a direction goes East/West when `|dx| * height > |dy| * width`.
/// A wide, short box therefore leans North/South on diagonals. A zero vector
/// resolves to East.
pub fn dominant_face(bounds: &BoundingBox, dx: f64, dy: f64) -> Face {
    let horizontal =
        (dx == 0.0 && dy == 0.0) || dx.abs() * bounds.height > dy.abs() * bounds.width;
    if horizontal {
        if dx >= 0.0 {
            Face::East
        } else {
            Face::West
        }
    } else if dy > 0.0 {
        Face::South
    } else {
        Face::North
    }
}

/// Determine the face each rectangle should use to reach the other.
///
/// Each endpoint decides on its own shape, so the two faces are not forced to
/// be geometric opposites.
pub fn resolve_sides(source: &BoundingBox, target: &BoundingBox) -> SidePair {
    let from = source.center();
    let to = target.center();
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    SidePair::new(dominant_face(source, dx, dy), dominant_face(target, -dx, -dy))
}

/// Closest point on the chosen face of `bounds` toward an arbitrary point
pub fn nearest_boundary_point(bounds: &BoundingBox, toward: Point) -> Point {
    let center = bounds.center();
    let face = dominant_face(bounds, toward.x - center.x, toward.y - center.y);
    match face {
        Face::North => Point::new(toward.x.clamp(bounds.x, bounds.right()), bounds.y),
        Face::South => Point::new(toward.x.clamp(bounds.x, bounds.right()), bounds.bottom()),
        Face::East => Point::new(bounds.right(), toward.y.clamp(bounds.y, bounds.bottom())),
        Face::West => Point::new(bounds.x, toward.y.clamp(bounds.y, bounds.bottom())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sides_horizontal() {
        let a = BoundingBox::new(0.0, 0.0, 160.0, 80.0);
        let b = BoundingBox::new(400.0, 0.0, 160.0, 80.0);
        assert_eq!(resolve_sides(&a, &b), SidePair::new(Face::East, Face::West));
        assert_eq!(resolve_sides(&b, &a), SidePair::new(Face::West, Face::East));
    }

    #[test]
    fn test_resolve_sides_vertical() {
        let a = BoundingBox::new(0.0, 0.0, 160.0, 80.0);
        let b = BoundingBox::new(0.0, 300.0, 160.0, 80.0);
        assert_eq!(resolve_sides(&a, &b), SidePair::new(Face::South, Face::North));
        assert_eq!(resolve_sides(&b, &a), SidePair::new(Face::North, Face::South));
    }

    #[test]
    fn test_aspect_ratio_shifts_the_threshold() {
        // Same direction, different shapes: the split follows the box diagonal
        let narrow = BoundingBox::new(0.0, 0.0, 40.0, 80.0);
        assert_eq!(dominant_face(&narrow, 200.0, 150.0), Face::East);
        let flat = BoundingBox::new(0.0, 0.0, 160.0, 80.0);
        assert_eq!(dominant_face(&flat, 200.0, 150.0), Face::South);
        assert_eq!(dominant_face(&flat, 200.0, 90.0), Face::East);
    }

    #[test]
    fn test_faces_are_chosen_per_endpoint() {
        let tall = BoundingBox::new(0.0, 0.0, 40.0, 200.0);
        let flat = BoundingBox::new(200.0, 250.0, 200.0, 40.0);
        // center delta (280, 170)
        let sides = resolve_sides(&tall, &flat);
        assert_eq!(sides.source, Face::East);
        assert_eq!(sides.target, Face::North);
    }

    #[test]
    fn test_identical_centers_are_deterministic() {
        let a = BoundingBox::new(10.0, 10.0, 160.0, 80.0);
        assert_eq!(resolve_sides(&a, &a), SidePair::new(Face::East, Face::East));
    }

    #[test]
    fn test_nearest_boundary_point() {
        let b = BoundingBox::new(0.0, 0.0, 160.0, 80.0);
        assert_eq!(nearest_boundary_point(&b, Point::new(500.0, 50.0)), Point::new(160.0, 50.0));
        assert_eq!(nearest_boundary_point(&b, Point::new(-300.0, 500.0)), Point::new(0.0, 80.0));
        assert_eq!(nearest_boundary_point(&b, Point::new(100.0, 400.0)), Point::new(100.0, 80.0));
        assert_eq!(nearest_boundary_point(&b, Point::new(400.0, -900.0)), Point::new(160.0, 0.0));
    }
}
