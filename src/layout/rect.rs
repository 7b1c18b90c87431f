//! Node rectangles derived from raw node attributes

use crate::model::{finite_or_zero, Node};

use super::config::RoutingConfig;
use super::types::{BoundingBox, Point};

/// Height of a node: its measured height, never below the configured minimum
pub fn node_height(node: &Node, config: &RoutingConfig) -> f64 {
    node.computed_height
        .filter(|h| h.is_finite())
        .map_or(config.min_node_height, |h| h.max(config.min_node_height))
}

/// Bounding box of a node at its live position
pub fn node_box(node: &Node, config: &RoutingConfig) -> BoundingBox {
    BoundingBox::new(
        finite_or_zero(node.x),
        finite_or_zero(node.y),
        config.node_width,
        node_height(node, config),
    )
}

/// Center used to order ports: the pinned position wins over the live one
pub fn anchor_center(node: &Node, config: &RoutingConfig) -> Point {
    let x = node.pinned_x.filter(|v| v.is_finite()).unwrap_or(node.x);
    let y = node.pinned_y.filter(|v| v.is_finite()).unwrap_or(node.y);
    Point::new(
        finite_or_zero(x) + config.node_width / 2.0,
        finite_or_zero(y) + node_height(node, config) / 2.0,
    )
}
