//! Pointer gesture state machine.
//!
//! A press stays armed until the pointer travels [`DRAG_THRESHOLD`] pixels on either axis. Only
//! then does it become a node drag or a camera pan; a release while still armed is a click.

use std::mem;

/// Screen-space travel (per axis) that turns a press into a drag.
pub const DRAG_THRESHOLD: f64 = 6.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Interaction {
	#[default]
	Idle,
	Hovering {
		node: usize,
	},
	ArmedPress {
		start: (f64, f64),
		node: Option<usize>,
	},
	DraggingNode {
		node: usize,
	},
	PanningCamera {
		last: (f64, f64),
	},
}

/// What a pointer move asks the owner of the graph state to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
	/// Not pressed; the owner should hit-test and call [`Interaction::hover`].
	Hover,
	/// Pressed, but still inside the threshold.
	Hold,
	DragNode { node: usize, sx: f64, sy: f64 },
	Pan { dx: f64, dy: f64 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorHint {
	Pointer,
	#[default]
	Grab,
}

impl CursorHint {
	pub fn as_css(self) -> &'static str {
		match self {
			Self::Pointer => "pointer",
			Self::Grab => "grab",
		}
	}
}

impl Interaction {
	pub fn press(sx: f64, sy: f64, hit: Option<usize>) -> Self {
		Self::ArmedPress {
			start: (sx, sy),
			node: hit,
		}
	}

	pub fn hover(hit: Option<usize>) -> Self {
		match hit {
			Some(node) => Self::Hovering { node },
			None => Self::Idle,
		}
	}

	pub fn track(&mut self, sx: f64, sy: f64) -> Gesture {
		match *self {
			Self::Idle | Self::Hovering { .. } => Gesture::Hover,
			Self::ArmedPress { start, node } => {
				let (dx, dy) = (sx - start.0, sy - start.1);
				if dx.abs() < DRAG_THRESHOLD && dy.abs() < DRAG_THRESHOLD {
					return Gesture::Hold;
				}
				match node {
					Some(node) => {
						*self = Self::DraggingNode { node };
						Gesture::DragNode { node, sx, sy }
					}
					None => {
						// Pan from the press point so the grabbed spot stays under the pointer.
						*self = Self::PanningCamera { last: (sx, sy) };
						Gesture::Pan { dx, dy }
					}
				}
			}
			Self::DraggingNode { node } => Gesture::DragNode { node, sx, sy },
			Self::PanningCamera { last } => {
				*self = Self::PanningCamera { last: (sx, sy) };
				Gesture::Pan {
					dx: sx - last.0,
					dy: sy - last.1,
				}
			}
		}
	}

	/// Ends the gesture and returns the clicked node, if the press never became a drag.
	pub fn release(&mut self) -> Option<usize> {
		match mem::take(self) {
			Self::ArmedPress { node, .. } => node,
			_ => None,
		}
	}

	/// Drops any gesture without reporting a click.
	pub fn cancel(&mut self) {
		*self = Self::Idle;
	}

	pub fn dragged_node(&self) -> Option<usize> {
		match *self {
			Self::DraggingNode { node } => Some(node),
			_ => None,
		}
	}

	/// Node to draw highlighted: the hovered one, or the one under an active press.
	pub fn highlighted_node(&self) -> Option<usize> {
		match *self {
			Self::Hovering { node } | Self::DraggingNode { node } => Some(node),
			Self::ArmedPress { node, .. } => node,
			Self::Idle | Self::PanningCamera { .. } => None,
		}
	}

	pub fn cursor(&self) -> CursorHint {
		match self.highlighted_node() {
			Some(_) => CursorHint::Pointer,
			None => CursorHint::Grab,
		}
	}
}
