//! Viewport virtualization over node rectangles
//!
//! The index is bulk-loaded from a node snapshot and answers "which nodes
//! touch this area" queries. It is rebuilt wholesale whenever the node set
//! changes; there is no incremental insert or delete.

pub mod config;
pub mod debounce;
pub mod virtualizer;

pub use config::ViewportConfig;
pub use debounce::ViewportDebouncer;
pub use virtualizer::Virtualizer;

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

use crate::layout::{node_box, BoundingBox, RoutingConfig};
use crate::model::Node;

type IndexEntry = GeomWithData<Rectangle<[f64; 2]>, String>;

/// R-tree of node bounding boxes keyed by node id
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
}

impl SpatialIndex {
    /// Bulk-load the rectangles of all nodes
    pub fn build(nodes: &[Node], config: &RoutingConfig) -> Self {
        let entries: Vec<IndexEntry> = nodes
            .iter()
            .map(|node| {
                let b = node_box(node, config);
                GeomWithData::new(
                    Rectangle::from_corners([b.x, b.y], [b.right(), b.bottom()]),
                    node.id.clone(),
                )
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Ids of nodes whose box touches `area`, sorted and deduplicated
    pub fn intersecting(&self, area: &BoundingBox) -> Vec<String> {
        let envelope = AABB::from_corners([area.x, area.y], [area.right(), area.bottom()]);
        let mut ids: Vec<String> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data.clone())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Ids of nodes visible in `viewport` grown by `buffer` on every side.
    ///
    /// A negative buffer counts as zero; the viewport is never shrunk.
    pub fn query(&self, viewport: &BoundingBox, buffer: f64) -> Vec<String> {
        self.intersecting(&viewport.inflate(buffer.max(0.0)))
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
