use super::simulation::SimNode;

/// Extra world-space slack around each disc so small nodes stay easy to grab.
pub const HIT_PADDING: f64 = 4.0;

/// Topmost node whose padded disc contains `(wx, wy)`. Later nodes are drawn on top, so the
/// search runs back to front.
pub fn hit_test(nodes: &[SimNode], wx: f64, wy: f64) -> Option<usize> {
	nodes.iter().enumerate().rev().find_map(|(idx, node)| {
		let (dx, dy) = (node.x - wx, node.y - wy);
		let reach = node.radius + HIT_PADDING;
		(dx * dx + dy * dy <= reach * reach).then_some(idx)
	})
}
