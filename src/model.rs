//! Diagram input model: nodes, links and slices
//!
//! The surrounding editor owns these values and hands them to the engine on
//! every recompute. Numeric fields are deserialized leniently: a malformed
//! coordinate becomes `0.0` instead of poisoning the geometry with NaN.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::LoadError;
use crate::layout::ClusterBounds;

/// Event-modeling element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Screen,
    Command,
    #[serde(alias = "EVENT")]
    DomainEvent,
    IntegrationEvent,
    #[serde(alias = "READMODEL")]
    ReadModel,
    Automation,
    #[serde(other)]
    Unknown,
}

impl NodeType {
    /// Events are drawn leaving downward when they feed another slice
    pub fn is_event_origin(self) -> bool {
        matches!(self, NodeType::DomainEvent | NodeType::IntegrationEvent)
    }
}

/// A box in the diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default, deserialize_with = "coordinate")]
    pub x: f64,
    #[serde(default, deserialize_with = "coordinate")]
    pub y: f64,
    /// Height measured by the renderer from the node's content
    #[serde(default, deserialize_with = "optional_number")]
    pub computed_height: Option<f64>,
    #[serde(default)]
    pub slice_id: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<NodeType>,
    /// Position the node is pinned to while being dragged
    #[serde(default, deserialize_with = "optional_number")]
    pub pinned_x: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub pinned_y: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            computed_height: None,
            slice_id: None,
            node_type: None,
            pinned_x: None,
            pinned_y: None,
            title: None,
        }
    }

    /// Place the node in a slice
    pub fn in_slice(mut self, slice_id: impl Into<String>) -> Self {
        self.slice_id = Some(slice_id.into());
        self
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.computed_height = Some(height);
        self
    }

    pub fn pinned_at(mut self, x: f64, y: f64) -> Self {
        self.pinned_x = Some(x);
        self.pinned_y = Some(y);
        self
    }

    pub fn is_event_origin(&self) -> bool {
        self.node_type.is_some_and(NodeType::is_event_origin)
    }
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl Link {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// A named spatial grouping of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Explicit extent; derived from member nodes when absent
    #[serde(default)]
    pub bounds: Option<ClusterBounds>,
}

/// A full snapshot of the editor's diagram
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub slices: Vec<Slice>,
}

impl Diagram {
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self {
            nodes,
            links,
            slices: Vec::new(),
        }
    }

    pub fn with_slices(mut self, slices: Vec<Slice>) -> Self {
        self.slices = slices;
        self
    }

    /// Load a diagram from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a diagram from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

/// Replace NaN and infinities with zero
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value).unwrap_or(0.0))
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value))
}
