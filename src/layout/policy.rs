//! Face override policies, evaluated before the aspect-ratio heuristic

use std::collections::BTreeMap;

use crate::model::Node;

use super::config::RoutingConfig;
use super::sides::resolve_sides;
use super::types::{BoundingBox, ClusterBounds, Face, SidePair};

/// Both nodes belong to slices, and the slices differ.
///
/// A node without a slice never counts as crossing a slice boundary.
pub fn crosses_slices(source: &Node, target: &Node) -> bool {
    matches!(
        (&source.slice_id, &target.slice_id),
        (Some(a), Some(b)) if a != b
    )
}

/// Side of the target slice a lane route approaches from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaneApproach {
    /// Source lies left of the target slice; lane runs along its left edge
    Forward { lane_x: f64 },
    /// Source lies right of the target slice; lane runs along its right edge
    Feedback { lane_x: f64 },
}

impl LaneApproach {
    pub fn lane_x(self) -> f64 {
        match self {
            LaneApproach::Forward { lane_x } | LaneApproach::Feedback { lane_x } => lane_x,
        }
    }
}

/// Lane approach for a link, or `None` when lane mode does not apply.
///
/// Requires both nodes to sit in different slices with valid bounds, the
/// two slices' horizontal extents to be disjoint (touching counts as
/// overlapping), and the source center to lie strictly outside the target
/// slice horizontally.
pub fn lane_approach(
    source: &Node,
    target: &Node,
    source_box: &BoundingBox,
    clusters: &BTreeMap<String, ClusterBounds>,
    config: &RoutingConfig,
) -> Option<LaneApproach> {
    if !crosses_slices(source, target) {
        return None;
    }
    let valid_bounds = |slice_id: &str| clusters.get(slice_id).filter(|b| b.is_valid());
    let source_slice = valid_bounds(source.slice_id.as_deref()?)?;
    let target_slice = valid_bounds(target.slice_id.as_deref()?)?;
    if source_slice.overlaps_horizontally(target_slice) {
        return None;
    }

    let center_x = source_box.center().x;
    if center_x < target_slice.min_x {
        Some(LaneApproach::Forward {
            lane_x: target_slice.min_x - config.lane_offset,
        })
    } else if center_x > target_slice.max_x {
        Some(LaneApproach::Feedback {
            lane_x: target_slice.max_x + config.lane_offset,
        })
    } else {
        None
    }
}

/// Faces a lane route leaves and enters through.
///
/// Event sources drop out of their bottom face; everything else leaves
/// sideways toward the lane.
pub fn lane_sides(source: &Node, approach: LaneApproach) -> SidePair {
    let (depart, arrive) = match approach {
        LaneApproach::Forward { .. } => (Face::East, Face::West),
        LaneApproach::Feedback { .. } => (Face::West, Face::East),
    };
    if departs_south(source) {
        SidePair::new(Face::South, arrive)
    } else {
        SidePair::new(depart, arrive)
    }
}

/// Inter-slice links always leave and enter horizontally, toward each other
pub fn inter_slice_sides(
    source: &Node,
    target: &Node,
    source_box: &BoundingBox,
    target_box: &BoundingBox,
) -> Option<SidePair> {
    if !crosses_slices(source, target) {
        return None;
    }
    if target_box.center().x >= source_box.center().x {
        Some(SidePair::new(Face::East, Face::West))
    } else {
        Some(SidePair::new(Face::West, Face::East))
    }
}

/// Event nodes drop out of their bottom face when routed through a lane
pub fn departs_south(node: &Node) -> bool {
    node.is_event_origin()
}

/// Faces for a link: lane faces when a lane applies, then the inter-slice
/// override, then the geometric resolver
pub fn link_sides(
    source: &Node,
    target: &Node,
    source_box: &BoundingBox,
    target_box: &BoundingBox,
    lane: Option<LaneApproach>,
) -> SidePair {
    if let Some(approach) = lane {
        return lane_sides(source, approach);
    }
    inter_slice_sides(source, target, source_box, target_box)
        .unwrap_or_else(|| resolve_sides(source_box, target_box))
}
