//! Visible-set bookkeeping for the rendering layer

use std::collections::HashSet;
use std::time::Instant;

use log::debug;

use crate::layout::{BoundingBox, RoutingConfig};
use crate::model::{Link, Node};

use super::config::ViewportConfig;
use super::debounce::ViewportDebouncer;
use super::SpatialIndex;

/// Keeps the spatial index and the current visible node set in step with
/// node changes and viewport movement.
///
/// The caller supplies a revision number with each node snapshot; the index
/// is only rebuilt when that number changes.
#[derive(Debug, Clone)]
pub struct Virtualizer {
    index: SpatialIndex,
    revision: Option<u64>,
    buffer: f64,
    debouncer: ViewportDebouncer,
    viewport: Option<BoundingBox>,
    visible: HashSet<String>,
}

impl Virtualizer {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            index: SpatialIndex::default(),
            revision: None,
            buffer: config.buffer,
            debouncer: ViewportDebouncer::new(config.debounce()),
            viewport: None,
            visible: HashSet::new(),
        }
    }

    /// Rebuild the index if `revision` differs from the last one seen.
    ///
    /// Returns whether a rebuild happened. After a rebuild the visible set is
    /// recomputed for the last applied viewport.
    pub fn sync_nodes(&mut self, nodes: &[Node], revision: u64, config: &RoutingConfig) -> bool {
        if self.revision == Some(revision) {
            return false;
        }
        self.index = SpatialIndex::build(nodes, config);
        self.revision = Some(revision);
        debug!(
            "rebuilt spatial index with {} nodes (revision {})",
            self.index.len(),
            revision
        );
        if let Some(viewport) = self.viewport {
            self.apply(viewport);
        }
        true
    }

    /// Queue a viewport change from continuous panning or zooming
    pub fn schedule(&mut self, viewport: BoundingBox, now: Instant) {
        self.debouncer.request(viewport, now);
    }

    /// Apply a queued viewport once its delay has elapsed.
    ///
    /// Returns whether the visible set was refreshed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(viewport) => {
                self.apply(viewport);
                true
            }
            None => false,
        }
    }

    /// Apply a viewport right away, cancelling anything queued
    pub fn refresh_now(&mut self, viewport: BoundingBox) -> &HashSet<String> {
        let viewport = self.debouncer.request_immediate(viewport);
        self.apply(viewport);
        &self.visible
    }

    fn apply(&mut self, viewport: BoundingBox) {
        self.viewport = Some(viewport);
        self.visible = self.index.query(&viewport, self.buffer).into_iter().collect();
    }

    pub fn visible(&self) -> &HashSet<String> {
        &self.visible
    }

    pub fn is_node_visible(&self, node_id: &str) -> bool {
        self.visible.contains(node_id)
    }

    /// A link is drawn when either of its endpoints is visible
    pub fn is_link_visible(&self, link: &Link) -> bool {
        self.is_node_visible(&link.source) || self.is_node_visible(&link.target)
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }
}
