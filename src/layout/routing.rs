//! Orthogonal route synthesis between allocated ports
//!
//! Two modes exist. Dynamic routes leave each port along the face normal for
//! a stand-off distance and join the two stand-off points with one or two
//! elbows. Lane routes serve links between slices that sit side by side: they
//! run through a vertical corridor just outside the target slice so that all
//! links entering a slice from one side share the same lane.

use std::collections::BTreeMap;

use log::trace;

use crate::model::Node;

use super::config::RoutingConfig;
use super::policy::{lane_approach, lane_sides, LaneApproach};
use super::ports::{port_point, PortAssignment, PortSlot};
use super::types::{BoundingBox, ClusterBounds, Face, Point, Route, RouteMode};

/// Everything needed to route a single link
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest<'a> {
    pub source: &'a Node,
    pub target: &'a Node,
    pub source_box: BoundingBox,
    pub target_box: BoundingBox,
    pub ports: PortAssignment,
}

/// Routes links using the current slice extents
pub struct Router<'a> {
    config: &'a RoutingConfig,
    clusters: &'a BTreeMap<String, ClusterBounds>,
}

impl<'a> Router<'a> {
    pub fn new(config: &'a RoutingConfig, clusters: &'a BTreeMap<String, ClusterBounds>) -> Self {
        Self { config, clusters }
    }

    /// Route a link: lane mode when it applies, dynamic mode otherwise.
    ///
    /// A previously computed route may be passed in, but it is never reused;
    /// the route is always rebuilt from the current geometry.
    pub fn route(&self, request: &RouteRequest<'_>, cached: Option<&Route>) -> Route {
        if cached.is_some() {
            trace!(
                "recomputing route {} -> {} despite cached copy",
                request.source.id,
                request.target.id
            );
        }
        match self.route_lane(request) {
            Some(route) => route,
            None => self.route_dynamic(request),
        }
    }

    /// Lane approach for a link, or `None` when lane mode does not apply
    pub fn lane_approach(
        &self,
        source: &Node,
        target: &Node,
        source_box: &BoundingBox,
    ) -> Option<LaneApproach> {
        lane_approach(source, target, source_box, self.clusters, self.config)
    }

    /// Route through the shared lane of the target slice
    pub fn route_lane(&self, request: &RouteRequest<'_>) -> Option<Route> {
        let approach = self.lane_approach(request.source, request.target, &request.source_box)?;
        let lane_x = approach.lane_x();
        let sides = lane_sides(request.source, approach);

        // Slots allocated for other faces do not apply here
        let ports = &request.ports;
        let source_slot = if ports.sides.source == sides.source {
            ports.source
        } else {
            PortSlot::SINGLE
        };
        let target_slot = if ports.sides.target == sides.target {
            ports.target
        } else {
            PortSlot::SINGLE
        };

        let start = port_point(&request.source_box, sides.source, source_slot);
        let end = port_point(&request.target_box, sides.target, target_slot);

        let mut points = vec![start];
        let run_y = if sides.source == Face::South {
            let stub_y = start.y + self.config.lane_stub;
            points.push(Point::new(start.x, stub_y));
            stub_y
        } else {
            start.y
        };
        let end = align_on_face(
            end,
            sides.target,
            &request.target_box,
            run_y,
            self.config.min_segment,
        );
        points.extend([
            Point::new(lane_x, run_y),
            Point::new(lane_x, end.y),
            end,
        ]);

        trace!(
            "lane route {} -> {} at x={}",
            request.source.id,
            request.target.id,
            lane_x
        );
        Some(Route::new(RouteMode::Lane, self.finish(points)))
    }

    /// Face-to-face route with stand-offs
    pub fn route_dynamic(&self, request: &RouteRequest<'_>) -> Route {
        let points = route_between_faces(
            &request.source_box,
            &request.target_box,
            &request.ports,
            self.config,
        );
        Route::new(RouteMode::Dynamic, self.finish(points))
    }

    fn finish(&self, points: Vec<Point>) -> Vec<Point> {
        let mut points = collapse_degenerate(&points, self.config.min_segment);
        apply_arrow_padding(&mut points, self.config.arrow_padding, self.config.min_segment);
        points
    }
}

fn step_out(point: Point, face: Face, distance: f64) -> Point {
    let (nx, ny) = face.outward_normal();
    Point::new(point.x + nx * distance, point.y + ny * distance)
}

/// Slide `port` along `face` onto `coord` when it is off by less than
/// `epsilon`.
///
/// An offset that small cannot be drawn as an orthogonal jog without a
/// degenerate segment, so the port absorbs it instead.
fn align_on_face(port: Point, face: Face, bounds: &BoundingBox, coord: f64, epsilon: f64) -> Point {
    if face.is_horizontal() {
        if (port.y - coord).abs() < epsilon {
            return Point::new(port.x, coord.clamp(bounds.y, bounds.bottom()));
        }
    } else if (port.x - coord).abs() < epsilon {
        return Point::new(coord.clamp(bounds.x, bounds.right()), port.y);
    }
    port
}

/// Raw vertex list from the source port to the target port.
///
/// Opposite faces get a Z through the midline between the two stand-off
/// points; the stand-off shrinks to half the gap when the ports are closer
/// than two stand-offs. Any other face pair gets a single dogleg elbow.
/// A target port within `min_segment` of the source stand-off's line is
/// slid onto that line.
pub fn route_between_faces(
    source_box: &BoundingBox,
    target_box: &BoundingBox,
    ports: &PortAssignment,
    config: &RoutingConfig,
) -> Vec<Point> {
    let source_face = ports.sides.source;
    let target_face = ports.sides.target;
    let start = port_point(source_box, source_face, ports.source);
    let end = port_point(target_box, target_face, ports.target);

    let opposite = source_face.is_opposite(target_face);
    let mut stand_off = config.stand_off;
    if opposite {
        let gap = if source_face.is_horizontal() {
            (end.x - start.x).abs()
        } else {
            (end.y - start.y).abs()
        };
        if gap < stand_off * 2.0 {
            stand_off = gap / 2.0;
        }
    }

    let out_source = step_out(start, source_face, stand_off);
    let along = if target_face.is_horizontal() {
        out_source.y
    } else {
        out_source.x
    };
    let end = align_on_face(end, target_face, target_box, along, config.min_segment);
    let out_target = step_out(end, target_face, stand_off);

    let mut points = vec![start, out_source];
    if opposite {
        if source_face.is_horizontal() {
            let mid_x = (out_source.x + out_target.x) / 2.0;
            points.push(Point::new(mid_x, out_source.y));
            points.push(Point::new(mid_x, out_target.y));
        } else {
            let mid_y = (out_source.y + out_target.y) / 2.0;
            points.push(Point::new(out_source.x, mid_y));
            points.push(Point::new(out_target.x, mid_y));
        }
    } else if source_face.is_horizontal() {
        points.push(Point::new(out_target.x, out_source.y));
    } else {
        points.push(Point::new(out_source.x, out_target.y));
    }
    points.push(out_target);
    points.push(end);
    points
}

/// Drop vertices within `epsilon` of the previously kept one on both axes.
///
/// The first and last vertices are always kept exactly; a route that
/// collapses entirely still keeps both of them. When a vertex is dropped,
/// the run that followed it is shifted onto the kept vertex so every
/// interior segment stays axis-aligned.
pub fn collapse_degenerate(points: &[Point], epsilon: f64) -> Vec<Point> {
    let Some(last_index) = points.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut shifted = points.to_vec();
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for i in 0..last_index {
        let point = shifted[i];
        let Some(&kept) = out.last() else {
            out.push(point);
            continue;
        };
        if !kept.near(point, epsilon) {
            out.push(point);
            continue;
        }

        // Follow the dropped vertex's outgoing run up to the next corner
        let mut j = i;
        if points[j].x == points[j + 1].x {
            while j + 1 < last_index && points[j].x == points[j + 1].x {
                j += 1;
                shifted[j].x = kept.x;
            }
        } else if points[j].y == points[j + 1].y {
            while j + 1 < last_index && points[j].y == points[j + 1].y {
                j += 1;
                shifted[j].y = kept.y;
            }
        }
    }

    let last = points[last_index];
    if out.len() > 1 && out.last().is_some_and(|prev| prev.near(last, epsilon)) {
        out.pop();
    }
    out.push(last);
    out
}
/// Pull the final vertex back along the last segment by `padding`.
///
/// Skipped when the last segment is too short to keep a visible remainder.
pub fn apply_arrow_padding(points: &mut [Point], padding: f64, min_segment: f64) {
    if padding <= 0.0 || points.len() < 2 {
        return;
    }
    let n = points.len();
    let (prev, tip) = (points[n - 2], points[n - 1]);
    let length = prev.distance_to(tip);
    if length <= padding + min_segment {
        return;
    }
    let scale = (length - padding) / length;
    points[n - 1] = Point::new(
        prev.x + (tip.x - prev.x) * scale,
        prev.y + (tip.y - prev.y) * scale,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::SidePair;
    use crate::model::NodeType;

    fn single(sides: SidePair) -> PortAssignment {
        PortAssignment {
            sides,
            source: PortSlot::SINGLE,
            target: PortSlot::SINGLE,
        }
    }

    fn is_orthogonal(points: &[Point]) -> bool {
        points
            .windows(2)
            .all(|w| w[0].x == w[1].x || w[0].y == w[1].y)
    }

    #[test]
    fn test_opposite_faces_make_a_z() {
        let a = BoundingBox::new(0.0, 0.0, 160.0, 80.0);
        let b = BoundingBox::new(400.0, 200.0, 160.0, 80.0);
        let ports = single(SidePair::new(Face::East, Face::West));
        let points = route_between_faces(&a, &b, &ports, &RoutingConfig::default());

        assert_eq!(
            points,
            vec![
                Point::new(160.0, 40.0),
                Point::new(180.0, 40.0),
                Point::new(280.0, 40.0),
                Point::new(280.0, 240.0),
                Point::new(380.0, 240.0),
                Point::new(400.0, 240.0),
            ]
        );
    }

    #[test]
    fn test_stand_off_shrinks_in_tight_gaps() {
        let a = BoundingBox::new(0.0, 0.0, 160.0, 80.0);
        let b = BoundingBox::new(0.0, 110.0, 160.0, 80.0);
        let ports = single(SidePair::new(Face::South, Face::North));
        let points = route_between_faces(&a, &b, &ports, &RoutingConfig::default());

        // gap of 30 < 40, so each stand-off is 15
        assert_eq!(points[1], Point::new(80.0, 95.0));
        assert_eq!(points[points.len() - 2], Point::new(80.0, 95.0));
    }

    #[test]
    fn test_dogleg_horizontal_departure() {
        let a = BoundingBox::new(0.0, 0.0, 160.0, 80.0);
        let b = BoundingBox::new(400.0, 300.0, 160.0, 80.0);
        let ports = single(SidePair::new(Face::East, Face::North));
        let points = route_between_faces(&a, &b, &ports, &RoutingConfig::default());

        assert_eq!(
            points,
            vec![
                Point::new(160.0, 40.0),
                Point::new(180.0, 40.0),
                Point::new(480.0, 40.0),
                Point::new(480.0, 280.0),
                Point::new(480.0, 300.0),
            ]
        );
        assert!(is_orthogonal(&points));
    }

    #[test]
    fn test_dogleg_vertical_departure() {
        let a = BoundingBox::new(0.0, 0.0, 160.0, 80.0);
        let b = BoundingBox::new(400.0, 300.0, 160.0, 80.0);
        let ports = single(SidePair::new(Face::South, Face::West));
        let points = route_between_faces(&a, &b, &ports, &RoutingConfig::default());

        assert_eq!(points[2], Point::new(80.0, 340.0));
        assert!(is_orthogonal(&points));
    }

    #[test]
    fn test_collapse_degenerate() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.2, 0.3),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        assert_eq!(
            collapse_degenerate(&points, 0.5),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)]
        );
    }

    #[test]
    fn test_collapse_keeps_exact_endpoints() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(10.2, 10.1),
        ];
        let collapsed = collapse_degenerate(&points, 0.5);
        assert_eq!(collapsed.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(collapsed.last(), Some(&Point::new(10.2, 10.1)));
        assert_eq!(collapsed.len(), 3);
    }

    #[test]
    fn test_collapse_fully_degenerate_route_keeps_two_points() {
        let points = vec![Point::new(5.0, 5.0), Point::new(5.1, 5.0), Point::new(5.0, 5.2)];
        assert_eq!(
            collapse_degenerate(&points, 0.5),
            vec![Point::new(5.0, 5.0), Point::new(5.0, 5.2)]
        );
        assert!(collapse_degenerate(&[], 0.5).is_empty());
    }

    #[test]
    fn test_near_aligned_ports_route_straight() {
        let a = BoundingBox::new(40.0, 40.0, 160.0, 80.0);
        let b = BoundingBox::new(600.0, 40.3, 160.0, 80.0);
        let ports = single(SidePair::new(Face::East, Face::West));
        let raw = route_between_faces(&a, &b, &ports, &RoutingConfig::default());
        let points = collapse_degenerate(&raw, 0.5);

        assert_eq!(
            points,
            vec![
                Point::new(200.0, 80.0),
                Point::new(220.0, 80.0),
                Point::new(400.0, 80.0),
                Point::new(580.0, 80.0),
                Point::new(600.0, 80.0),
            ]
        );
        // The target port slid along its face but stays on it
        assert!(points[4].y >= b.y && points[4].y <= b.bottom());
    }

    #[test]
    fn test_collapse_shifts_the_following_run() {
        // Stand-off points 0.6 apart put the mid elbow 0.3 from the first one
        let a = BoundingBox::new(40.0, 40.0, 160.0, 80.0);
        let b = BoundingBox::new(240.6, 100.0, 160.0, 80.0);
        let ports = single(SidePair::new(Face::East, Face::West));
        let raw = route_between_faces(&a, &b, &ports, &RoutingConfig::default());
        let points = collapse_degenerate(&raw, 0.5);

        assert_eq!(points.len(), 5);
        assert_eq!(points[1], Point::new(220.0, 80.0));
        assert_eq!(points[2], Point::new(220.0, 140.0));
        assert_eq!(points.last(), raw.last());
        assert!(is_orthogonal(&points));
        assert!(points.windows(2).all(|w| !w[0].near(w[1], 0.5)));
    }

    #[test]
    fn test_collapse_shift_follows_collinear_run() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 0.3),
            Point::new(80.0, 0.3),
            Point::new(90.0, 0.3),
            Point::new(90.0, 40.0),
        ];
        assert_eq!(
            collapse_degenerate(&points, 0.5),
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(80.0, 0.0),
                Point::new(90.0, 0.0),
                Point::new(90.0, 40.0),
            ]
        );
    }

    #[test]
    fn test_arrow_padding_shortens_last_segment() {
        let mut points = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        apply_arrow_padding(&mut points, 8.0, 0.5);
        assert_eq!(points[1], Point::new(92.0, 0.0));
    }

    #[test]
    fn test_arrow_padding_skipped_for_short_segment() {
        let mut points = vec![Point::new(0.0, 0.0), Point::new(0.0, 6.0)];
        apply_arrow_padding(&mut points, 8.0, 0.5);
        assert_eq!(points[1], Point::new(0.0, 6.0));

        let mut untouched = vec![Point::new(0.0, 0.0), Point::new(0.0, 60.0)];
        apply_arrow_padding(&mut untouched, 0.0, 0.5);
        assert_eq!(untouched[1], Point::new(0.0, 60.0));
    }

    fn clusters() -> BTreeMap<String, ClusterBounds> {
        let mut map = BTreeMap::new();
        map.insert(
            "left".to_string(),
            ClusterBounds {
                min_x: 0.0,
                max_x: 400.0,
                min_y: 0.0,
                max_y: 400.0,
            },
        );
        map.insert(
            "right".to_string(),
            ClusterBounds {
                min_x: 800.0,
                max_x: 1200.0,
                min_y: 0.0,
                max_y: 400.0,
            },
        );
        map
    }

    #[test]
    fn test_event_source_drops_south_before_lane() {
        let config = RoutingConfig::default();
        let clusters = clusters();
        let router = Router::new(&config, &clusters);

        let event = Node::new("e", 100.0, 100.0)
            .in_slice("left")
            .with_type(NodeType::DomainEvent);
        let target = Node::new("t", 900.0, 300.0).in_slice("right");
        let request = RouteRequest {
            source: &event,
            target: &target,
            source_box: BoundingBox::new(100.0, 100.0, 160.0, 80.0),
            target_box: BoundingBox::new(900.0, 300.0, 160.0, 80.0),
            ports: single(SidePair::new(Face::East, Face::West)),
        };
        let route = router.route(&request, None);

        assert_eq!(route.mode, RouteMode::Lane);
        assert_eq!(
            route.points,
            vec![
                Point::new(180.0, 180.0),
                Point::new(180.0, 200.0),
                Point::new(740.0, 200.0),
                Point::new(740.0, 340.0),
                Point::new(900.0, 340.0),
            ]
        );
    }

    #[test]
    fn test_lane_uses_allocated_south_slot() {
        let config = RoutingConfig::default();
        let clusters = clusters();
        let router = Router::new(&config, &clusters);

        let event = Node::new("e", 100.0, 100.0)
            .in_slice("left")
            .with_type(NodeType::DomainEvent);
        let target = Node::new("t", 900.0, 300.0).in_slice("right");
        let source_box = BoundingBox::new(100.0, 100.0, 160.0, 80.0);
        let request = RouteRequest {
            source: &event,
            target: &target,
            source_box,
            target_box: BoundingBox::new(900.0, 300.0, 160.0, 80.0),
            ports: PortAssignment {
                sides: SidePair::new(Face::South, Face::West),
                source: PortSlot::new(1, 2),
                target: PortSlot::SINGLE,
            },
        };
        let route = router.route(&request, None);

        let start = port_point(&source_box, Face::South, PortSlot::new(1, 2));
        assert_eq!(route.points[0], start);
        assert_eq!(route.points[1], Point::new(start.x, 200.0));
        assert!(is_orthogonal(&route.points));
    }

    #[test]
    fn test_lane_end_absorbs_tiny_offset() {
        let config = RoutingConfig::default();
        let clusters = clusters();
        let router = Router::new(&config, &clusters);

        let source = Node::new("s", 100.0, 100.0).in_slice("left");
        let target = Node::new("t", 900.0, 100.2).in_slice("right");
        let request = RouteRequest {
            source: &source,
            target: &target,
            source_box: BoundingBox::new(100.0, 100.0, 160.0, 80.0),
            target_box: BoundingBox::new(900.0, 100.2, 160.0, 80.0),
            ports: single(SidePair::new(Face::East, Face::West)),
        };
        let route = router.route(&request, None);

        assert_eq!(route.mode, RouteMode::Lane);
        assert_eq!(
            route.points,
            vec![
                Point::new(260.0, 140.0),
                Point::new(740.0, 140.0),
                Point::new(900.0, 140.0),
            ]
        );
    }

    #[test]
    fn test_cached_route_is_not_reused() {
        let config = RoutingConfig::default();
        let clusters = BTreeMap::new();
        let router = Router::new(&config, &clusters);

        let a = Node::new("a", 0.0, 0.0);
        let b = Node::new("b", 400.0, 0.0);
        let request = RouteRequest {
            source: &a,
            target: &b,
            source_box: BoundingBox::new(0.0, 0.0, 160.0, 80.0),
            target_box: BoundingBox::new(400.0, 0.0, 160.0, 80.0),
            ports: single(SidePair::new(Face::East, Face::West)),
        };
        let stale = Route::new(
            RouteMode::Dynamic,
            vec![Point::new(-1.0, -1.0), Point::new(-2.0, -2.0)],
        );
        let fresh = router.route(&request, None);
        assert_eq!(router.route(&request, Some(&stale)), fresh);
    }
}
