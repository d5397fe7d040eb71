use std::collections::HashMap;

use log::{debug, info};

use super::camera::Camera;
use super::interaction::{CursorHint, Gesture, Interaction};
use super::picking::hit_test;
use super::simulation::{self, EdgeLink, SimNode, SimulationConfig};
use super::types::{GraphData, NavigationIntent};

/// Everything the frame loop and the pointer handlers share. Lives on the UI thread only;
/// all mutation goes through the methods below.
pub struct KnowledgeGraphState {
	nodes: Vec<SimNode>,
	links: Vec<EdgeLink>,
	camera: Camera,
	interaction: Interaction,
	config: SimulationConfig,
	pub width: f64,
	pub height: f64,
}

impl KnowledgeGraphState {
	pub fn new(config: SimulationConfig, width: f64, height: f64) -> Self {
		Self {
			nodes: Vec::new(),
			links: Vec::new(),
			camera: Camera::default(),
			interaction: Interaction::Idle,
			config,
			width,
			height,
		}
	}

	/// Replaces the whole snapshot. Positions are reseeded and the view is reset.
	pub fn load(&mut self, data: &GraphData) {
		let (cx, cy) = self.center();
		self.nodes = simulation::seed_positions(&data.nodes, cx, cy);

		let mut index: HashMap<&str, usize> = HashMap::with_capacity(data.nodes.len());
		for (i, node) in data.nodes.iter().enumerate() {
			index.entry(node.id.as_str()).or_insert(i);
		}
		self.links = data
			.edges
			.iter()
			.map(|edge| EdgeLink {
				edge: edge.clone(),
				ends: index
					.get(edge.source.as_str())
					.zip(index.get(edge.target.as_str()))
					.map(|(&s, &t)| (s, t)),
			})
			.collect();

		let dangling = self.links.iter().filter(|l| l.ends.is_none()).count();
		if dangling > 0 {
			debug!("{dangling} edge(s) reference nodes outside this graph");
		}
		info!(
			"Knowledge graph loaded: {} nodes, {} edges",
			self.nodes.len(),
			self.links.len()
		);

		self.camera.reset();
		self.interaction.cancel();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	pub fn tick(&mut self) {
		let center = self.center();
		let pinned = self.interaction.dragged_node();
		simulation::step(&mut self.nodes, &self.links, center, pinned, &self.config);
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[EdgeLink] {
		&self.links
	}

	pub fn camera(&self) -> Camera {
		self.camera
	}

	pub fn interaction(&self) -> Interaction {
		self.interaction
	}

	pub fn highlighted(&self) -> Option<usize> {
		self.interaction.highlighted_node()
	}

	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (wx, wy) = self.camera.screen_to_world(sx, sy);
		hit_test(&self.nodes, wx, wy)
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let hit = self.node_at(sx, sy);
		self.interaction = Interaction::press(sx, sy, hit);
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> CursorHint {
		match self.interaction.track(sx, sy) {
			Gesture::Hover => self.interaction = Interaction::hover(self.node_at(sx, sy)),
			Gesture::Hold => {}
			Gesture::DragNode { node, sx, sy } => self.update_drag(node, sx, sy),
			Gesture::Pan { dx, dy } => self.camera.pan(dx, dy),
		}
		self.interaction.cursor()
	}

	/// Finishes the gesture; a press that never became a drag on a node yields its intent.
	pub fn pointer_up(&mut self) -> Option<NavigationIntent> {
		let node = self.nodes.get(self.interaction.release()?)?;
		let intent = NavigationIntent::for_node(&node.node);
		debug!("Knowledge graph click: {intent:?}");
		Some(intent)
	}

	pub fn pointer_leave(&mut self) {
		self.interaction.cancel();
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.camera.wheel(sx, sy, delta_y);
	}

	pub fn zoom_in(&mut self) {
		self.camera.zoom_in();
	}

	pub fn zoom_out(&mut self) {
		self.camera.zoom_out();
	}

	pub fn reset_view(&mut self) {
		self.camera.reset();
	}

	fn update_drag(&mut self, node: usize, sx: f64, sy: f64) {
		let (wx, wy) = self.camera.screen_to_world(sx, sy);
		if let Some(n) = self.nodes.get_mut(node) {
			n.x = wx;
			n.y = wy;
			n.vx = 0.0;
			n.vy = 0.0;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::types::{EdgeKind, GraphEdge, GraphNode, NodeKind};

	fn node(id: &str, label: &str, kind: NodeKind) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: label.into(),
			kind,
			color: None,
			workflow_status: None,
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				node("page-1", "Home", NodeKind::Page),
				node("page-2", "Guides", NodeKind::Page),
				node("tag-1", "howto", NodeKind::Tag),
			],
			edges: vec![
				GraphEdge {
					source: "page-2".into(),
					target: "page-1".into(),
					kind: EdgeKind::Parent,
				},
				GraphEdge {
					source: "page-2".into(),
					target: "tag-1".into(),
					kind: EdgeKind::Tag,
				},
				GraphEdge {
					source: "page-9".into(),
					target: "tag-1".into(),
					kind: EdgeKind::Tag,
				},
			],
		}
	}

	fn loaded() -> KnowledgeGraphState {
		let mut state = KnowledgeGraphState::new(SimulationConfig::default(), 800.0, 600.0);
		state.load(&sample());
		state
	}

	fn screen_pos(state: &KnowledgeGraphState, idx: usize) -> (f64, f64) {
		let n = &state.nodes()[idx];
		state.camera().world_to_screen(n.x, n.y)
	}

	#[test]
	fn load_resolves_edges_by_id() {
		let state = loaded();
		assert_eq!(state.nodes().len(), 3);
		let ends: Vec<_> = state.links().iter().map(|l| l.ends).collect();
		assert_eq!(ends, vec![Some((1, 0)), Some((1, 2)), None]);
	}

	#[test]
	fn load_resets_camera_and_gesture() {
		let mut state = loaded();
		state.wheel(10.0, 10.0, -1.0);
		state.pointer_down(0.0, 0.0);
		state.load(&sample());
		assert_eq!(state.camera(), Camera::default());
		assert_eq!(state.interaction(), Interaction::Idle);
	}

	#[test]
	fn tap_on_page_navigates_to_page() {
		let mut state = loaded();
		let (sx, sy) = screen_pos(&state, 0);
		state.pointer_down(sx, sy);
		state.pointer_move(sx + 3.0, sy - 4.0);
		state.tick();
		assert_eq!(
			state.pointer_up(),
			Some(NavigationIntent::Page {
				id: "page-1".into()
			})
		);
	}

	#[test]
	fn tap_on_tag_navigates_to_tag_listing() {
		let mut state = loaded();
		let (sx, sy) = screen_pos(&state, 2);
		state.pointer_down(sx, sy);
		assert_eq!(
			state.pointer_up(),
			Some(NavigationIntent::Tag {
				label: "howto".into()
			})
		);
	}

	#[test]
	fn drag_never_navigates() {
		let mut state = loaded();
		let (sx, sy) = screen_pos(&state, 0);
		state.pointer_down(sx, sy);
		state.pointer_move(sx + 40.0, sy);
		// Released back on the starting spot.
		state.pointer_move(sx, sy);
		assert_eq!(state.pointer_up(), None);
	}

	#[test]
	fn dragged_node_tracks_pointer_exactly() {
		let mut state = loaded();
		state.wheel(400.0, 300.0, -1.0);
		let (sx, sy) = screen_pos(&state, 1);
		state.pointer_down(sx, sy);
		for frame in 1..=10 {
			let (px, py) = (sx + 7.0 * frame as f64, sy - 3.0 * frame as f64);
			assert_eq!(state.pointer_move(px, py), CursorHint::Pointer);
			state.tick();
			let n = &state.nodes()[1];
			assert_eq!((n.x, n.y), state.camera().screen_to_world(px, py));
			assert_eq!((n.vx, n.vy), (0.0, 0.0));
		}
		assert_eq!(state.pointer_up(), None);
	}

	#[test]
	fn background_drag_pans_camera() {
		let mut state = loaded();
		state.pointer_down(5.0, 5.0);
		state.pointer_move(25.0, 15.0);
		state.pointer_move(30.0, 15.0);
		let cam = state.camera();
		assert_eq!((cam.x, cam.y), (25.0, 10.0));
		assert_eq!(state.pointer_up(), None);
	}

	#[test]
	fn leave_drops_gesture_and_hover() {
		let mut state = loaded();
		let (sx, sy) = screen_pos(&state, 0);
		assert_eq!(state.pointer_move(sx, sy), CursorHint::Pointer);
		assert_eq!(state.highlighted(), Some(0));
		state.pointer_down(sx, sy);
		state.pointer_leave();
		assert_eq!(state.highlighted(), None);
		assert_eq!(state.pointer_up(), None);
	}

	#[test]
	fn hover_clears_off_node() {
		let mut state = loaded();
		assert_eq!(state.pointer_move(-500.0, -500.0), CursorHint::Grab);
		assert_eq!(state.interaction(), Interaction::Idle);
	}

	#[test]
	fn buttons_and_reset_drive_camera() {
		let mut state = loaded();
		state.pointer_down(0.0, 0.0);
		state.pointer_move(50.0, 0.0);
		state.pointer_up();
		state.zoom_in();
		assert!((state.camera().zoom - 1.3).abs() < 1e-12);
		assert_eq!(state.camera().x, 50.0);
		state.zoom_out();
		state.reset_view();
		assert_eq!(state.camera(), Camera::default());
	}

	#[test]
	fn empty_graph_is_inert() {
		let mut state = KnowledgeGraphState::new(SimulationConfig::default(), 0.0, 0.0);
		state.load(&GraphData::default());
		state.tick();
		state.pointer_down(0.0, 0.0);
		assert_eq!(state.pointer_up(), None);
	}
}
