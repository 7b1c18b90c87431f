//! Routing engine for link geometry
//!
//! One routing pass takes a snapshot of nodes, links and slices and produces
//! an orthogonal route per link:
//! node rectangles -> face policies and side resolution -> port allocation ->
//! lane or dynamic routing. Nothing is retained between passes.

pub mod clusters;
pub mod config;
pub mod error;
pub mod policy;
pub mod ports;
pub mod rect;
pub mod routing;
pub mod sides;
pub mod types;

pub use clusters::cluster_bounds;
pub use config::RoutingConfig;
pub use error::LinkIssue;
pub use ports::{allocate_ports, port_point, PortAllocation, PortAssignment, PortSlot};
pub use rect::node_box;
pub use routing::{Router, RouteRequest};
pub use sides::{nearest_boundary_point, resolve_sides};
pub use types::*;

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::Serialize;

use crate::model::{Diagram, Link, Node, Slice};

/// Nodes keyed by id
pub type NodeLookup<'a> = HashMap<&'a str, &'a Node>;

/// Index nodes by id; the first node with a given id wins
pub fn index_nodes(nodes: &[Node]) -> NodeLookup<'_> {
    let mut lookup = HashMap::with_capacity(nodes.len());
    for node in nodes {
        if lookup.contains_key(node.id.as_str()) {
            debug!("ignoring duplicate node id '{}'", node.id);
            continue;
        }
        lookup.insert(node.id.as_str(), node);
    }
    lookup
}

/// A link with its computed route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedLink {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub ports: PortAssignment,
    pub route: Route,
}

impl RoutedLink {
    /// Flattened `[x0, y0, x1, y1, ...]` coordinates for drawing
    pub fn coordinates(&self) -> Vec<f64> {
        self.route.flatten()
    }
}

/// Output of one routing pass
#[derive(Debug, Clone, Default)]
pub struct RoutingReport {
    /// Routed links in input order
    pub routes: Vec<RoutedLink>,
    /// Links that were skipped, with the reason
    pub issues: Vec<LinkIssue>,
}

impl RoutingReport {
    /// Look up the route of a link by id
    pub fn route(&self, link_id: &str) -> Option<&RoutedLink> {
        self.routes.iter().find(|r| r.id == link_id)
    }
}

/// Route every link of a diagram
pub fn route_diagram(diagram: &Diagram, config: &RoutingConfig) -> RoutingReport {
    route_links(&diagram.nodes, &diagram.links, &diagram.slices, config)
}

/// Route links over the given node and slice snapshot
pub fn route_links(
    nodes: &[Node],
    links: &[Link],
    slices: &[Slice],
    config: &RoutingConfig,
) -> RoutingReport {
    let lookup = index_nodes(nodes);
    let (valid, issues) = validate_links(&lookup, links);
    let clusters = cluster_bounds(nodes, slices, config);
    let allocation = allocate_ports(&lookup, valid.iter().copied(), &clusters, config);
    let router = Router::new(config, &clusters);

    let routes = valid
        .iter()
        .filter_map(|link| {
            let source = *lookup.get(link.source.as_str())?;
            let target = *lookup.get(link.target.as_str())?;
            let ports = *allocation.assignment(&link.id)?;
            let request = RouteRequest {
                source,
                target,
                source_box: node_box(source, config),
                target_box: node_box(target, config),
                ports,
            };
            let route = router.route(&request, None);
            Some(RoutedLink {
                id: link.id.clone(),
                source: link.source.clone(),
                target: link.target.clone(),
                label: link.label.clone(),
                ports,
                route,
            })
        })
        .collect();

    RoutingReport { routes, issues }
}

/// Split links into routable ones and issues, keeping input order
fn validate_links<'a>(
    lookup: &NodeLookup<'_>,
    links: &'a [Link],
) -> (Vec<&'a Link>, Vec<LinkIssue>) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut valid = Vec::with_capacity(links.len());
    let mut issues = Vec::new();

    for link in links {
        let issue = if !seen.insert(link.id.as_str()) {
            Some(LinkIssue::duplicate(&link.id))
        } else if !lookup.contains_key(link.source.as_str()) {
            Some(LinkIssue::missing_source(&link.id, &link.source))
        } else if !lookup.contains_key(link.target.as_str()) {
            Some(LinkIssue::missing_target(&link.id, &link.target))
        } else {
            None
        };

        match issue {
            Some(issue) => {
                debug!("{}", issue);
                issues.push(issue);
            }
            None => valid.push(link),
        }
    }

    (valid, issues)
}
