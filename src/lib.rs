//! Weavr Layout - link geometry for event-model diagrams
//!
//! This library decides which face of each node a link leaves and enters,
//! spreads links sharing a face over evenly spaced ports, synthesizes an
//! orthogonal route between those ports, and tracks which nodes intersect the
//! viewport. Inputs and outputs are plain geometric data; drawing is left to
//! the caller.
//!
//! # Example
//!
//! ```rust
//! use weavr_layout::{route_diagram, Diagram, Link, Node, RoutingConfig};
//!
//! let diagram = Diagram::new(
//!     vec![Node::new("a", 40.0, 40.0), Node::new("b", 600.0, 40.0)],
//!     vec![Link::new("ab", "a", "b")],
//! );
//! let report = route_diagram(&diagram, &RoutingConfig::default());
//!
//! let coords = report.routes[0].coordinates();
//! assert_eq!(coords[..2], [200.0, 80.0]);
//! assert_eq!(coords[coords.len() - 2..], [600.0, 80.0]);
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod spatial;

pub use error::LoadError;
pub use layout::{
    nearest_boundary_point, resolve_sides, route_diagram, route_links, BoundingBox, Face,
    LinkIssue, Point, Route, RouteMode, RoutedLink, RoutingConfig, RoutingReport,
};
pub use model::{Diagram, Link, Node, NodeType, Slice};
pub use spatial::{SpatialIndex, ViewportConfig, ViewportDebouncer, Virtualizer};

use std::path::Path;

use serde::Deserialize;

/// Configuration for the complete engine
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Routing geometry
    pub routing: RoutingConfig,
    /// Viewport virtualization
    pub viewport: ViewportConfig,
}

impl EngineConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the routing configuration
    pub fn with_routing(mut self, config: RoutingConfig) -> Self {
        self.routing = config;
        self
    }

    /// Set the viewport configuration
    pub fn with_viewport(mut self, config: ViewportConfig) -> Self {
        self.viewport = config;
        self
    }

    /// Load configuration from a TOML string; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

/// Ids of the nodes of `diagram` visible in `viewport`, using the configured buffer
pub fn visible_nodes(diagram: &Diagram, viewport: &BoundingBox, config: &EngineConfig) -> Vec<String> {
    SpatialIndex::build(&diagram.nodes, &config.routing).query(viewport, config.viewport.buffer)
}
