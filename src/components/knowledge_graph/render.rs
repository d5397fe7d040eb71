use std::borrow::Cow;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::camera::Camera;
use super::state::KnowledgeGraphState;
use super::types::{EdgeKind, GraphNode, NodeKind};

const PAGE_COLOR: &str = "#3b82f6";
const TAG_COLOR: &str = "#10b981";
const HIGHLIGHT_COLOR: &str = "#f97316";
const HIGHLIGHT_OUTLINE: &str = "#ffffff";
const HIGHLIGHT_GROWTH: f64 = 2.0;
const LABEL_COLOR: &str = "#cbd5e1";
const LABEL_FONT: &str = "11px sans-serif";
const LABEL_GAP: f64 = 4.0;
const MAX_LABEL_CHARS: usize = 20;
// Screen-space slack so labels partly inside the viewport still draw.
const LABEL_CULL_MARGIN: f64 = 120.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke<'a> {
	pub color: &'a str,
	pub width: f64,
}

/// Minimal set of drawing primitives the renderer needs; world-space after [`apply_camera`].
///
/// [`apply_camera`]: DrawSurface::apply_camera
pub trait DrawSurface {
	fn begin_frame(&mut self, width: f64, height: f64, pixel_ratio: f64);
	fn apply_camera(&mut self, camera: &Camera);
	fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke<'_>);
	fn disc(&mut self, center: (f64, f64), radius: f64, fill: &str, outline: Option<Stroke<'_>>);
	fn label(&mut self, text: &str, x: f64, y: f64);
	fn end_frame(&mut self);
}

pub fn edge_stroke(kind: EdgeKind) -> Stroke<'static> {
	match kind {
		EdgeKind::Parent => Stroke {
			color: "rgba(148, 163, 184, 0.7)",
			width: 1.5,
		},
		EdgeKind::Tag => Stroke {
			color: "rgba(148, 163, 184, 0.3)",
			width: 0.75,
		},
	}
}

fn workflow_color(status: &str) -> Option<&'static str> {
	match status {
		"draft" => Some("#94a3b8"),
		"in_review" | "pending" => Some("#eab308"),
		"approved" | "published" => Some("#22c55e"),
		"rejected" => Some("#ef4444"),
		_ => None,
	}
}

/// Explicit color first, then workflow status (pages only), then the kind default.
pub fn node_fill(node: &GraphNode) -> &str {
	if let Some(color) = node.color.as_deref() {
		return color;
	}
	match node.kind {
		NodeKind::Page => node
			.workflow_status
			.as_deref()
			.and_then(workflow_color)
			.unwrap_or(PAGE_COLOR),
		NodeKind::Tag => TAG_COLOR,
	}
}

pub fn label_text(node: &GraphNode) -> String {
	let label: Cow<'_, str> = if node.label.chars().count() > MAX_LABEL_CHARS {
		let head: String = node.label.chars().take(MAX_LABEL_CHARS).collect();
		Cow::Owned(format!("{head}…"))
	} else {
		Cow::Borrowed(node.label.as_str())
	};
	match node.kind {
		NodeKind::Tag => format!("#{label}"),
		NodeKind::Page => label.into_owned(),
	}
}

pub fn render(state: &KnowledgeGraphState, surface: &mut impl DrawSurface, pixel_ratio: f64) {
	surface.begin_frame(state.width, state.height, pixel_ratio);
	surface.apply_camera(&state.camera());

	let nodes = state.nodes();
	for link in state.links() {
		let Some((s, t)) = link.ends else {
			continue;
		};
		let (Some(a), Some(b)) = (nodes.get(s), nodes.get(t)) else {
			continue;
		};
		surface.line((a.x, a.y), (b.x, b.y), edge_stroke(link.edge.kind));
	}

	let highlighted = state.highlighted();
	for (idx, n) in nodes.iter().enumerate() {
		if highlighted == Some(idx) {
			surface.disc(
				(n.x, n.y),
				n.radius + HIGHLIGHT_GROWTH,
				HIGHLIGHT_COLOR,
				Some(Stroke {
					color: HIGHLIGHT_OUTLINE,
					width: 2.0,
				}),
			);
		} else {
			surface.disc((n.x, n.y), n.radius, node_fill(&n.node), None);
		}
	}

	let camera = state.camera();
	for n in nodes {
		let (x, y) = (n.x, n.y + n.radius + LABEL_GAP);
		let (sx, sy) = camera.world_to_screen(x, y);
		if sx < -LABEL_CULL_MARGIN
			|| sy < -LABEL_CULL_MARGIN
			|| sx > state.width + LABEL_CULL_MARGIN
			|| sy > state.height + LABEL_CULL_MARGIN
		{
			continue;
		}
		surface.label(&label_text(&n.node), x, y);
	}

	surface.end_frame();
}

/// [`DrawSurface`] over a 2D canvas context.
pub struct CanvasSurface<'a> {
	ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
	pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
		Self { ctx }
	}
}

impl DrawSurface for CanvasSurface<'_> {
	fn begin_frame(&mut self, width: f64, height: f64, pixel_ratio: f64) {
		let ctx = self.ctx;
		let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
		ctx.clear_rect(0.0, 0.0, width * pixel_ratio, height * pixel_ratio);
		ctx.save();
		let _ = ctx.scale(pixel_ratio, pixel_ratio);
	}

	fn apply_camera(&mut self, camera: &Camera) {
		let _ = self.ctx.translate(camera.x, camera.y);
		let _ = self.ctx.scale(camera.zoom, camera.zoom);
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke<'_>) {
		let ctx = self.ctx;
		ctx.set_stroke_style_str(stroke.color);
		ctx.set_line_width(stroke.width);
		ctx.begin_path();
		ctx.move_to(from.0, from.1);
		ctx.line_to(to.0, to.1);
		ctx.stroke();
	}

	fn disc(&mut self, center: (f64, f64), radius: f64, fill: &str, outline: Option<Stroke<'_>>) {
		let ctx = self.ctx;
		ctx.begin_path();
		let _ = ctx.arc(center.0, center.1, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		if let Some(stroke) = outline {
			ctx.set_stroke_style_str(stroke.color);
			ctx.set_line_width(stroke.width);
			ctx.stroke();
		}
	}

	fn label(&mut self, text: &str, x: f64, y: f64) {
		let ctx = self.ctx;
		ctx.set_fill_style_str(LABEL_COLOR);
		ctx.set_font(LABEL_FONT);
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		let _ = ctx.fill_text(text, x, y);
	}

	fn end_frame(&mut self) {
		self.ctx.restore();
	}
}
