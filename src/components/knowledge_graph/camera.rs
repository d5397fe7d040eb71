//! Pan/zoom transform between screen space (CSS pixels) and world space (simulation units).

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;
pub const BUTTON_ZOOM_STEP: f64 = 1.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub x: f64,
	pub y: f64,
	pub zoom: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			zoom: 1.0,
		}
	}
}

impl Camera {
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.zoom + self.x, wy * self.zoom + self.y)
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.zoom, (sy - self.y) / self.zoom)
	}

	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.x += dx;
		self.y += dy;
	}

	/// Scales by `factor` while keeping the world point under `(sx, sy)` fixed on screen.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let (wx, wy) = self.screen_to_world(sx, sy);
		self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		self.x = sx - wx * self.zoom;
		self.y = sy - wy * self.zoom;
	}

	/// Wheel scrolling down zooms out, anything else zooms in.
	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			WHEEL_ZOOM_OUT
		} else {
			WHEEL_ZOOM_IN
		};
		self.zoom_at(sx, sy, factor);
	}

	// Buttons leave the pan untouched.
	pub fn zoom_in(&mut self) {
		self.zoom = (self.zoom * BUTTON_ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
	}

	pub fn zoom_out(&mut self) {
		self.zoom = (self.zoom / BUTTON_ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}
}
