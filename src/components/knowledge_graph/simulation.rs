//! Force-directed layout: centering, pairwise repulsion and edge springs, integrated once per frame.
//!
//! Repulsion is computed over every pair of nodes. That is fine for wiki-sized graphs (a few
//! hundred nodes); a spatial index would be needed well beyond that.

use std::f64::consts::TAU;

use serde::Deserialize;

use super::types::{GraphEdge, GraphNode, NodeKind};

pub const PAGE_RADIUS: f64 = 8.0;
pub const TAG_RADIUS: f64 = 5.0;
const SEED_RADIUS: f64 = 100.0;
const MIN_DISTANCE: f64 = 1.0;

/// Tuning constants of the layout. Chosen for visual stability, not physical accuracy.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
	pub repulsion: f64,
	pub attraction: f64,
	pub center_force: f64,
	pub damping: f64,
	pub alpha: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			repulsion: 1500.0,
			attraction: 0.005,
			center_force: 0.01,
			damping: 0.6,
			alpha: 0.3,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	pub node: GraphNode,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
}

impl SimNode {
	pub fn new(node: GraphNode, x: f64, y: f64) -> Self {
		let radius = match node.kind {
			NodeKind::Page => PAGE_RADIUS,
			NodeKind::Tag => TAG_RADIUS,
		};
		Self {
			node,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			radius,
		}
	}
}

/// An edge plus the node indices it resolved to at load time; `None` when an endpoint is missing.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLink {
	pub edge: GraphEdge,
	pub ends: Option<(usize, usize)>,
}

/// Places nodes evenly on a circle around `(cx, cy)` so that no two start at the same point.
pub fn seed_positions(nodes: &[GraphNode], cx: f64, cy: f64) -> Vec<SimNode> {
	let count = nodes.len().max(1) as f64;
	nodes
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let angle = i as f64 * TAU / count;
			SimNode::new(
				node.clone(),
				cx + SEED_RADIUS * angle.cos(),
				cy + SEED_RADIUS * angle.sin(),
			)
		})
		.collect()
}

/// Unit vector from `b` to `a` and their distance, floored at [`MIN_DISTANCE`].
fn separation(a: &SimNode, b: &SimNode, i: usize, j: usize) -> (f64, f64, f64) {
	let (dx, dy) = (a.x - b.x, a.y - b.y);
	let len = (dx * dx + dy * dy).sqrt();
	if len > 0.0 {
		return (dx / len, dy / len, len.max(MIN_DISTANCE));
	}
	// Coincident nodes: pick a stable direction from the pair's indices.
	let angle = (i as f64 * 0.618_034 + j as f64 * 0.414_214) * TAU;
	(angle.cos(), angle.sin(), MIN_DISTANCE)
}

/// Advances the layout by one frame. `pinned` is the node held by a drag, which the
/// simulation neither moves nor accelerates.
pub fn step(
	nodes: &mut [SimNode],
	links: &[EdgeLink],
	center: (f64, f64),
	pinned: Option<usize>,
	config: &SimulationConfig,
) {
	let (cx, cy) = center;
	for node in nodes.iter_mut() {
		node.vx += (cx - node.x) * config.center_force;
		node.vy += (cy - node.y) * config.center_force;
	}

	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			let (ux, uy, dist) = separation(&nodes[i], &nodes[j], i, j);
			let force = config.repulsion / (dist * dist);
			nodes[i].vx += ux * force;
			nodes[i].vy += uy * force;
			nodes[j].vx -= ux * force;
			nodes[j].vy -= uy * force;
		}
	}

	for link in links {
		let Some((s, t)) = link.ends else {
			continue;
		};
		if s == t || s >= nodes.len() || t >= nodes.len() {
			continue;
		}
		let (ux, uy, dist) = separation(&nodes[t], &nodes[s], t, s);
		let force = dist * config.attraction;
		nodes[s].vx += ux * force;
		nodes[s].vy += uy * force;
		nodes[t].vx -= ux * force;
		nodes[t].vy -= uy * force;
	}

	for (i, node) in nodes.iter_mut().enumerate() {
		if pinned == Some(i) {
			node.vx = 0.0;
			node.vy = 0.0;
			continue;
		}
		node.vx *= config.damping;
		node.vy *= config.damping;
		node.x += node.vx * config.alpha;
		node.y += node.vy * config.alpha;
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::knowledge_graph::types::EdgeKind;

	fn node(id: &str, kind: NodeKind) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			kind,
			color: None,
			workflow_status: None,
		}
	}

	fn distance(a: &SimNode, b: &SimNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn radius_follows_kind() {
		assert_eq!(SimNode::new(node("p", NodeKind::Page), 0.0, 0.0).radius, PAGE_RADIUS);
		assert_eq!(SimNode::new(node("t", NodeKind::Tag), 0.0, 0.0).radius, TAG_RADIUS);
	}

	#[test]
	fn seeding_spreads_nodes_on_a_circle() {
		let nodes: Vec<_> = (0..6).map(|i| node(&i.to_string(), NodeKind::Page)).collect();
		let sim = seed_positions(&nodes, 400.0, 300.0);
		for n in &sim {
			let r = ((n.x - 400.0).powi(2) + (n.y - 300.0).powi(2)).sqrt();
			assert!((r - SEED_RADIUS).abs() < 1e-9);
		}
		for i in 0..sim.len() {
			for j in (i + 1)..sim.len() {
				assert!(distance(&sim[i], &sim[j]) > 1.0);
			}
		}
	}

	#[test]
	fn lone_node_drifts_toward_center() {
		let center = (400.0, 300.0);
		let mut nodes = seed_positions(&[node("page-1", NodeKind::Page)], center.0, center.1);
		let config = SimulationConfig::default();
		let mut last = f64::INFINITY;
		for _ in 0..1000 {
			step(&mut nodes, &[], center, None, &config);
			let d = ((nodes[0].x - center.0).powi(2) + (nodes[0].y - center.1).powi(2)).sqrt();
			assert!(d <= last + 1e-12, "distance grew from {last} to {d}");
			last = d;
		}
		assert!(last < 5.0);
	}

	#[test]
	fn unlinked_nodes_push_apart() {
		let mut nodes = vec![
			SimNode::new(node("a", NodeKind::Page), 0.0, 0.0),
			SimNode::new(node("b", NodeKind::Page), 10.0, 0.0),
		];
		let config = SimulationConfig {
			center_force: 0.0,
			..Default::default()
		};
		step(&mut nodes, &[], (5.0, 0.0), None, &config);
		assert!(nodes[0].x < 0.0);
		assert!(nodes[1].x > 10.0);
	}

	#[test]
	fn coincident_nodes_separate() {
		let mut nodes = vec![
			SimNode::new(node("a", NodeKind::Page), 50.0, 50.0),
			SimNode::new(node("b", NodeKind::Page), 50.0, 50.0),
		];
		step(&mut nodes, &[], (50.0, 50.0), None, &SimulationConfig::default());
		assert!(distance(&nodes[0], &nodes[1]) > 1.0);
		assert!(nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
	}

	#[test]
	fn edge_pulls_endpoints_together() {
		let config = SimulationConfig {
			repulsion: 0.0,
			center_force: 0.0,
			..Default::default()
		};
		let mut nodes = vec![
			SimNode::new(node("a", NodeKind::Page), 0.0, 0.0),
			SimNode::new(node("b", NodeKind::Tag), 300.0, 0.0),
		];
		let links = [EdgeLink {
			edge: GraphEdge {
				source: "a".into(),
				target: "b".into(),
				kind: EdgeKind::Tag,
			},
			ends: Some((0, 1)),
		}];
		step(&mut nodes, &links, (0.0, 0.0), None, &config);
		assert!(nodes[0].x > 0.0);
		assert!(nodes[1].x < 300.0);
	}

	#[test]
	fn dangling_edge_adds_no_force() {
		let seeded = seed_positions(
			&[node("a", NodeKind::Page), node("b", NodeKind::Tag)],
			200.0,
			200.0,
		);
		let dangling = [EdgeLink {
			edge: GraphEdge {
				source: "a".into(),
				target: "missing".into(),
				kind: EdgeKind::Parent,
			},
			ends: None,
		}];
		let config = SimulationConfig::default();

		let mut with_edge = seeded.clone();
		let mut without_edge = seeded;
		for _ in 0..20 {
			step(&mut with_edge, &dangling, (200.0, 200.0), None, &config);
			step(&mut without_edge, &[], (200.0, 200.0), None, &config);
		}
		assert_eq!(with_edge, without_edge);
	}

	#[test]
	fn pinned_node_is_left_alone() {
		let mut nodes = seed_positions(
			&[node("a", NodeKind::Page), node("b", NodeKind::Page)],
			0.0,
			0.0,
		);
		nodes[1].vx = 25.0;
		let (px, py) = (nodes[1].x, nodes[1].y);
		step(&mut nodes, &[], (0.0, 0.0), Some(1), &SimulationConfig::default());
		assert_eq!((nodes[1].x, nodes[1].y), (px, py));
		assert_eq!((nodes[1].vx, nodes[1].vy), (0.0, 0.0));
	}

	#[test]
	fn empty_graph_steps() {
		let mut nodes: Vec<SimNode> = Vec::new();
		step(&mut nodes, &[], (0.0, 0.0), None, &SimulationConfig::default());
		assert!(nodes.is_empty());
	}

	#[test]
	fn config_overrides_a_subset() {
		let config: SimulationConfig = serde_json::from_str(r#"{"repulsion": 900.0}"#).unwrap();
		assert_eq!(config.repulsion, 900.0);
		assert_eq!(config.alpha, SimulationConfig::default().alpha);
	}

	proptest! {
		#[test]
		fn positions_stay_finite(
			points in proptest::collection::vec((-50.0..50.0f64, -50.0..50.0f64), 0..40),
			links in proptest::collection::vec((0..40usize, 0..45usize), 0..60),
			steps in 1..60usize,
		) {
			let mut nodes: Vec<SimNode> = points
				.iter()
				.enumerate()
				.map(|(i, &(x, y))| SimNode::new(node(&i.to_string(), NodeKind::Page), x.round(), y.round()))
				.collect();
			let count = nodes.len();
			let links: Vec<EdgeLink> = links
				.into_iter()
				.map(|(s, t)| EdgeLink {
					edge: GraphEdge { source: s.to_string(), target: t.to_string(), kind: EdgeKind::Parent },
					ends: (s < count && t < count).then_some((s, t)),
				})
				.collect();
			let config = SimulationConfig::default();
			for _ in 0..steps {
				step(&mut nodes, &links, (0.0, 0.0), None, &config);
			}
			for n in &nodes {
				prop_assert!(n.x.is_finite() && n.y.is_finite());
				prop_assert!(n.vx.is_finite() && n.vy.is_finite());
			}
		}
	}
}
