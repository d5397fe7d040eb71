use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent};

use super::interaction::CursorHint;
use super::render::{self, CanvasSurface};
use super::simulation::SimulationConfig;
use super::state::KnowledgeGraphState;
use super::types::{GraphData, NavigationIntent};

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// CSS size of the element hosting the canvas.
fn viewport_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or(FALLBACK_SIZE)
}

fn fit_backing_store(canvas: &HtmlCanvasElement, width: f64, height: f64, pixel_ratio: f64) {
	let (bw, bh) = (
		(width * pixel_ratio).round() as u32,
		(height * pixel_ratio).round() as u32,
	);
	if canvas.width() != bw {
		canvas.set_width(bw);
	}
	if canvas.height() != bh {
		canvas.set_height(bh);
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Owns the animation-frame callback. The callback reschedules itself through a [`Weak`]
/// handle, so dropping the loop frees the callback and everything it captured.
struct FrameLoop<C> {
	slot: Rc<RefCell<Option<C>>>,
}

impl<C> FrameLoop<C> {
	fn new() -> Self {
		Self {
			slot: Rc::new(RefCell::new(None)),
		}
	}

	fn handle(&self) -> Weak<RefCell<Option<C>>> {
		Rc::downgrade(&self.slot)
	}

	fn is_installed(&self) -> bool {
		self.slot.borrow().is_some()
	}

	fn install(&self, callback: C) {
		*self.slot.borrow_mut() = Some(callback);
	}

	fn with_callback<R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
		self.slot.borrow().as_ref().map(f)
	}
}

/// Runs `f` on the callback behind `handle`, unless its loop has been dropped.
fn with_scheduled<C, R>(handle: &Weak<RefCell<Option<C>>>, f: impl FnOnce(&C) -> R) -> Option<R> {
	let slot = handle.upgrade()?;
	let callback = slot.borrow();
	callback.as_ref().map(f)
}

/// Interactive force-directed view of the wiki's pages and tags.
///
/// Fills its parent element. A click on a node is reported through `on_navigate`; the host
/// decides where that leads.
#[component]
pub fn KnowledgeGraphCanvas<F>(
	#[prop(into)] data: Signal<GraphData>,
	on_navigate: F,
	#[prop(optional)] config: Option<SimulationConfig>,
) -> impl IntoView
where
	F: Fn(NavigationIntent) + 'static,
{
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(KnowledgeGraphState::new(
		config.unwrap_or_default(),
		FALLBACK_SIZE.0,
		FALLBACK_SIZE.1,
	)));
	let frame_loop: FrameLoop<Closure<dyn FnMut()>> = FrameLoop::new();
	let running = Arc::new(AtomicBool::new(true));
	let frame_id = Arc::new(AtomicI32::new(0));
	let cursor = RwSignal::new(CursorHint::Grab);

	let state_load = state.clone();
	Effect::new(move |_| {
		let data = data.get();
		let mut s = state_load.borrow_mut();
		if let Some(canvas) = canvas_ref.get_untracked() {
			let canvas: HtmlCanvasElement = canvas.into();
			let (w, h) = viewport_size(&canvas);
			s.resize(w, h);
		}
		s.load(&data);
	});

	let (state_init, running_init, frame_init) = (state.clone(), running.clone(), frame_id.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if frame_loop.is_installed() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(ctx) = context_2d(&canvas) else {
			warn!("Knowledge graph: 2d canvas context unavailable");
			return;
		};

		let (state_anim, reschedule, running_anim, frame_anim) = (
			state_init.clone(),
			frame_loop.handle(),
			running_init.clone(),
			frame_init.clone(),
		);
		frame_loop.install(Closure::new(move || {
			if !running_anim.load(Ordering::Relaxed) {
				return;
			}
			let Some(window) = web_sys::window() else {
				return;
			};
			let pixel_ratio = window.device_pixel_ratio();
			let (w, h) = viewport_size(&canvas);
			fit_backing_store(&canvas, w, h, pixel_ratio);
			{
				let mut s = state_anim.borrow_mut();
				s.resize(w, h);
				s.tick();
				render::render(&s, &mut CanvasSurface::new(&ctx), pixel_ratio);
			}
			let requested = with_scheduled(&reschedule, |cb| {
				window.request_animation_frame(cb.as_ref().unchecked_ref())
			});
			if let Some(Ok(id)) = requested {
				frame_anim.store(id, Ordering::Relaxed);
			}
		}));
		let Some(window) = web_sys::window() else {
			return;
		};
		let requested =
			frame_loop.with_callback(|cb| window.request_animation_frame(cb.as_ref().unchecked_ref()));
		if let Some(Ok(id)) = requested {
			frame_init.store(id, Ordering::Relaxed);
		}
	});

	on_cleanup(move || {
		running.store(false, Ordering::Relaxed);
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(frame_id.load(Ordering::Relaxed));
		}
	});

	let state_pd = state.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			state_pd.borrow_mut().pointer_down(x, y);
		}
	};

	let state_pm = state.clone();
	let on_pointermove = move |ev: PointerEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			let hint = state_pm.borrow_mut().pointer_move(x, y);
			cursor.set(hint);
		}
	};

	let state_pu = state.clone();
	let on_pointerup = move |_: PointerEvent| {
		let intent = state_pu.borrow_mut().pointer_up();
		cursor.set(state_pu.borrow().interaction().cursor());
		if let Some(intent) = intent {
			on_navigate(intent);
		}
	};

	let state_pl = state.clone();
	let on_pointerleave = move |_: PointerEvent| {
		state_pl.borrow_mut().pointer_leave();
		cursor.set(CursorHint::Grab);
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			state_wh.borrow_mut().wheel(x, y, ev.delta_y());
		}
	};

	let (state_zi, state_zo, state_rv) = (state.clone(), state.clone(), state);

	view! {
		<div class="knowledge-graph-canvas" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerup=on_pointerup
				on:pointerleave=on_pointerleave
				on:wheel=on_wheel
				style=move || {
					format!(
						"display: block; width: 100%; height: 100%; touch-action: none; cursor: {};",
						cursor.get().as_css(),
					)
				}
			/>
			<div class="knowledge-graph-controls">
				<button title="Zoom in" on:click=move |_| state_zi.borrow_mut().zoom_in()>"+"</button>
				<button title="Zoom out" on:click=move |_| state_zo.borrow_mut().zoom_out()>"−"</button>
				<button title="Reset view" on:click=move |_| state_rv.borrow_mut().reset_view()>"Reset"</button>
			</div>
		</div>
	}
}
