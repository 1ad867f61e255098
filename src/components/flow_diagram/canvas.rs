use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::filter::FlowFilter;
use super::model::Diagram;
use super::render;
use super::state::{CanvasConfig, DiagramState, ZOOM_STEP};
use super::theme::Theme;
use super::types::DEFAULT_HEIGHT;

/// Longest step fed to the edge clocks, so a backgrounded tab doesn't jump.
const MAX_FRAME_SECS: f64 = 0.1;

type SharedState = Rc<RefCell<Option<DiagramState>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Undo steps for everything the canvas hands to the browser. They run in
/// registration order when the owning reactive scope is disposed, so a
/// remounted diagram leaves no listener or frame callback behind.
#[derive(Clone, Default)]
struct Teardown(Rc<RefCell<Vec<Box<dyn FnOnce()>>>>);

impl Teardown {
	fn register() -> Self {
		let teardown = Self::default();
		let registered = SendWrapper::new(teardown.clone());
		on_cleanup(move || registered.run());
		teardown
	}

	fn push(&self, undo: impl FnOnce() + 'static) {
		self.0.borrow_mut().push(Box::new(undo));
	}

	fn run(&self) {
		let steps = std::mem::take(&mut *self.0.borrow_mut());
		for undo in steps {
			undo();
		}
	}
}

fn local_coords(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn fit_canvas_to_parent(canvas: &HtmlCanvasElement) -> (f64, f64) {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.unwrap_or((800.0, 520.0));
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	(w, h)
}

/// Pannable, zoomable canvas hosting one diagram, with grid, minimap and
/// zoom controls. The active flow is read fresh on every frame.
#[component]
pub fn DiagramCanvas(
	diagram: Diagram,
	#[prop(into)] active_flow: Signal<String>,
	#[prop(into, default = DEFAULT_HEIGHT.into())] height: String,
	#[prop(optional)] theme: Theme,
	#[prop(optional)] config: CanvasConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let teardown = Teardown::register();
	let state_init = state.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window; diagram canvas stays blank");
			return;
		};
		let (w, h) = fit_canvas_to_parent(&canvas);
		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("2d canvas context unavailable");
				return;
			}
		};

		info!(
			"mounting diagram canvas ({} nodes, {} edges) at {w}x{h}",
			diagram.nodes().len(),
			diagram.edges().len()
		);
		if diagram.is_empty() {
			warn!("diagram has no nodes; nothing to fit");
		}
		*state_init.borrow_mut() = Some(DiagramState::new(
			diagram.clone(),
			theme.clone(),
			config.clone(),
			w,
			h,
		));

		let state_settle = state_init.clone();
		set_timeout(
			move || {
				if let Some(ref mut s) = *state_settle.borrow_mut() {
					s.on_layout_settled();
				}
			},
			config.settle_delay,
		);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize_cb: SharedClosure = Rc::new(RefCell::new(Some(Closure::new(move || {
			let (nw, nh) = fit_canvas_to_parent(&canvas_resize);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}))));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		teardown.push(move || {
			if let (Some(cb), Some(win)) = (resize_cb.borrow_mut().take(), web_sys::window()) {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		});

		let animate: SharedClosure = Rc::new(RefCell::new(None));
		let pending_frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let (state_anim, animate_inner, pending_inner) =
			(state_init.clone(), animate.clone(), pending_frame.clone());
		let mut last_ms = js_sys::Date::now();
		let mut filter = FlowFilter::default();
		*animate.borrow_mut() = Some(Closure::new(move || {
			pending_inner.set(None);
			let now_ms = js_sys::Date::now();
			let dt = ((now_ms - last_ms) / 1000.0).clamp(0.0, MAX_FRAME_SECS);
			last_ms = now_ms;

			if active_flow.try_with_untracked(|flow| filter.select(flow)) == Some(true) {
				debug!("canvas filter now {:?}", filter.active());
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt, &filter);
				let frame = s.frame(&filter);
				render::render(s, &frame, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				pending_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			pending_frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
		// The loop closure holds a handle to itself; cancelling the queued
		// frame first keeps the browser from calling it once it is dropped.
		teardown.push(move || {
			if let (Some(id), Some(win)) = (pending_frame.take(), web_sys::window()) {
				let _ = win.cancel_animation_frame(id);
			}
			animate.borrow_mut().take();
			debug!("diagram canvas detached");
		});
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_moved(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let (state_in, state_out, state_fit) = (state.clone(), state.clone(), state);
	let zoom_in = move |_| {
		if let Some(ref mut s) = *state_in.borrow_mut() {
			s.zoom_by(ZOOM_STEP);
		}
	};
	let zoom_out = move |_| {
		if let Some(ref mut s) = *state_out.borrow_mut() {
			s.zoom_by(1.0 / ZOOM_STEP);
		}
	};
	let fit_view = move |_| {
		if let Some(ref mut s) = *state_fit.borrow_mut() {
			s.fit_view();
		}
	};

	view! {
		<div class="flow-diagram-canvas" style=format!("position: relative; height: {height};")>
			<canvas
				node_ref=canvas_ref
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="flow-diagram-controls">
				<button title="Zoom in" on:click=zoom_in>"+"</button>
				<button title="Zoom out" on:click=zoom_out>"−"</button>
				<button title="Fit view" on:click=fit_view>"⤢"</button>
			</div>
		</div>
	}
}
