//! Port slot allocation along node faces
//!
//! Every routing pass recomputes the allocation from scratch: links are
//! grouped per (node, face), each group is ordered by where the far endpoint
//! sits so that neighbouring ports do not cross, and each link end receives
//! its ordinal slot within the group.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::model::Link;

use super::config::RoutingConfig;
use super::policy::{lane_approach, link_sides};
use super::rect::{anchor_center, node_box};
use super::types::{BoundingBox, ClusterBounds, Face, Point, SidePair};
use super::NodeLookup;

/// Position of one link end among all link ends sharing a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortSlot {
    pub index: usize,
    pub total: usize,
}

impl PortSlot {
    /// The only port on its face
    pub const SINGLE: PortSlot = PortSlot { index: 0, total: 1 };

    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// Distance from the start of a face of `length` to this port.
    ///
    /// Ports are spread evenly with a margin at both ends, so no port sits on
    /// a corner.
    pub fn offset(self, length: f64) -> f64 {
        if self.total <= 1 {
            length / 2.0
        } else {
            length / (self.total + 1) as f64 * (self.index + 1) as f64
        }
    }
}

/// Faces and slots resolved for both ends of one link
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortAssignment {
    pub sides: SidePair,
    pub source: PortSlot,
    pub target: PortSlot,
}

/// Which end of a link occupies a face slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkEnd {
    Source,
    Target,
}

/// Result of one allocation pass over the full link set
#[derive(Debug, Clone, Default)]
pub struct PortAllocation {
    faces: BTreeMap<(String, Face), Vec<String>>,
    assignments: HashMap<String, PortAssignment>,
}

impl PortAllocation {
    /// Slots for a link, if it was allocated
    pub fn assignment(&self, link_id: &str) -> Option<&PortAssignment> {
        self.assignments.get(link_id)
    }

    /// Link ids using `face` of `node_id`, in slot order.
    ///
    /// A self-loop whose two ends share a face appears twice.
    pub fn face_links(&self, node_id: &str, face: Face) -> &[String] {
        self.faces
            .get(&(node_id.to_string(), face))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of allocated links
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

struct FaceEntry<'a> {
    link_id: &'a str,
    end: LinkEnd,
    sort_key: f64,
}

/// Coordinate of the far endpoint along the face's spreading axis
fn sort_key(face: Face, far_end: Point) -> f64 {
    if face.is_horizontal() {
        far_end.y
    } else {
        far_end.x
    }
}

/// Allocate face slots for every link whose endpoints both exist.
///
/// Faces come from the same policies the router applies, so lane links are
/// grouped on the faces their lane route actually uses. Repeated link ids
/// after the first occurrence are ignored, as are links with a dangling
/// endpoint.
pub fn allocate_ports<'a>(
    nodes: &NodeLookup<'a>,
    links: impl IntoIterator<Item = &'a Link>,
    clusters: &BTreeMap<String, ClusterBounds>,
    config: &RoutingConfig,
) -> PortAllocation {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut resolved: Vec<(&str, SidePair)> = Vec::new();
    let mut groups: HashMap<(&str, Face), Vec<FaceEntry<'a>>> = HashMap::new();

    for link in links {
        if !seen.insert(link.id.as_str()) {
            continue;
        }
        let (Some(source), Some(target)) = (
            nodes.get(link.source.as_str()),
            nodes.get(link.target.as_str()),
        ) else {
            continue;
        };

        let source_box = node_box(source, config);
        let target_box = node_box(target, config);
        let lane = lane_approach(source, target, &source_box, clusters, config);
        let sides = link_sides(source, target, &source_box, &target_box, lane);

        groups
            .entry((link.source.as_str(), sides.source))
            .or_default()
            .push(FaceEntry {
                link_id: &link.id,
                end: LinkEnd::Source,
                sort_key: sort_key(sides.source, anchor_center(target, config)),
            });
        groups
            .entry((link.target.as_str(), sides.target))
            .or_default()
            .push(FaceEntry {
                link_id: &link.id,
                end: LinkEnd::Target,
                sort_key: sort_key(sides.target, anchor_center(source, config)),
            });
        resolved.push((link.id.as_str(), sides));
    }

    let mut slots: HashMap<(&str, LinkEnd), PortSlot> = HashMap::new();
    let mut faces = BTreeMap::new();

    for ((node_id, face), mut entries) in groups {
        entries.sort_by(|a, b| {
            a.sort_key
                .total_cmp(&b.sort_key)
                .then_with(|| a.link_id.cmp(b.link_id))
                .then_with(|| a.end.cmp(&b.end))
        });
        let total = entries.len();
        for (index, entry) in entries.iter().enumerate() {
            slots.insert((entry.link_id, entry.end), PortSlot::new(index, total));
        }
        faces.insert(
            (node_id.to_string(), face),
            entries.iter().map(|e| e.link_id.to_string()).collect(),
        );
    }

    let assignments = resolved
        .into_iter()
        .map(|(link_id, sides)| {
            let slot = |end: LinkEnd| {
                slots
                    .get(&(link_id, end))
                    .copied()
                    .unwrap_or(PortSlot::SINGLE)
            };
            (
                link_id.to_string(),
                PortAssignment {
                    sides,
                    source: slot(LinkEnd::Source),
                    target: slot(LinkEnd::Target),
                },
            )
        })
        .collect();

    PortAllocation { faces, assignments }
}

/// Point on `face` of `bounds` where the port for `slot` sits
pub fn port_point(bounds: &BoundingBox, face: Face, slot: PortSlot) -> Point {
    match face {
        Face::North => Point::new(bounds.x + slot.offset(bounds.width), bounds.y),
        Face::South => Point::new(bounds.x + slot.offset(bounds.width), bounds.bottom()),
        Face::East => Point::new(bounds.right(), bounds.y + slot.offset(bounds.height)),
        Face::West => Point::new(bounds.x, bounds.y + slot.offset(bounds.height)),
    }
}
