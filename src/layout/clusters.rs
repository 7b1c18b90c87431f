//! Slice extents used by lane routing

use std::collections::BTreeMap;

use crate::model::{Node, Slice};

use super::config::RoutingConfig;
use super::rect::node_box;
use super::types::ClusterBounds;

/// Union extent of each slice's member nodes.
///
/// A slice that carries explicit bounds keeps them; slices with no members
/// and no explicit bounds are absent from the map.
pub fn cluster_bounds(
    nodes: &[Node],
    slices: &[Slice],
    config: &RoutingConfig,
) -> BTreeMap<String, ClusterBounds> {
    let mut bounds: BTreeMap<String, ClusterBounds> = BTreeMap::new();

    for node in nodes {
        let Some(slice_id) = &node.slice_id else {
            continue;
        };
        let b = node_box(node, config);
        bounds
            .entry(slice_id.clone())
            .and_modify(|c| c.include(&b))
            .or_insert_with(|| ClusterBounds::from_box(&b));
    }

    for slice in slices {
        if let Some(explicit) = slice.bounds {
            bounds.insert(slice.id.clone(), explicit);
        }
    }

    bounds
}
