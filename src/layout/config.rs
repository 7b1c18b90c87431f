//! Configuration for the routing engine

use serde::Deserialize;

/// Geometry constants used by the rect model and the router
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Width shared by every node
    pub node_width: f64,

    /// Lower bound for computed node heights
    pub min_node_height: f64,

    /// Straight run a route makes away from a face before turning
    pub stand_off: f64,

    /// Distance between a target slice's bounds and its lane
    pub lane_offset: f64,

    /// Drop below an event node before a lane route turns sideways
    pub lane_stub: f64,

    /// Amount the last segment is shortened to make room for an arrowhead
    pub arrow_padding: f64,

    /// Consecutive vertices closer than this on both axes are merged
    pub min_segment: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            node_width: 160.0,
            min_node_height: 80.0,
            stand_off: 20.0,
            lane_offset: 60.0,
            lane_stub: 20.0,
            arrow_padding: 0.0,
            min_segment: 0.5,
        }
    }
}

impl RoutingConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared node width
    pub fn with_node_width(mut self, width: f64) -> Self {
        self.node_width = width;
        self
    }

    /// Set the minimum node height
    pub fn with_min_node_height(mut self, height: f64) -> Self {
        self.min_node_height = height;
        self
    }

    /// Set the stand-off length
    pub fn with_stand_off(mut self, stand_off: f64) -> Self {
        self.stand_off = stand_off;
        self
    }

    /// Set the lane offset
    pub fn with_lane_offset(mut self, offset: f64) -> Self {
        self.lane_offset = offset;
        self
    }

    /// Set the arrow padding (0 disables it)
    pub fn with_arrow_padding(mut self, padding: f64) -> Self {
        self.arrow_padding = padding;
        self
    }
}
