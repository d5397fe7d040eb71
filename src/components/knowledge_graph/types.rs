use serde::Deserialize;

use super::error::GraphLoadError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Page,
	Tag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
	Parent,
	Tag,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default, rename = "workflowStatus")]
	pub workflow_status: Option<String>,
}

/// Edges refer to nodes by id; an id missing from the node set is tolerated.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	#[serde(rename = "type")]
	pub kind: EdgeKind,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn from_json(payload: &str) -> Result<Self, GraphLoadError> {
		Ok(serde_json::from_str(payload)?)
	}
}

/// What a confirmed click on a node asks the host to open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationIntent {
	Page { id: String },
	Tag { label: String },
}

impl NavigationIntent {
	pub fn for_node(node: &GraphNode) -> Self {
		match node.kind {
			NodeKind::Page => Self::Page {
				id: node.id.clone(),
			},
			NodeKind::Tag => Self::Tag {
				label: node.label.clone(),
			},
		}
	}
}
