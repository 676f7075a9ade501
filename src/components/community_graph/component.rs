//! Leptos component wrapping the community graph canvas.
//!
//! Creates the canvas, wires pointer and wheel events into the interaction
//! controller, and drives the animation loop via `requestAnimationFrame`:
//! one simulation tick, then one render, every frame. Clicking a node emits
//! the community id through `on_navigate`; the routing mechanism is the
//! host's concern.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::adapter::CommunityGraph;
use super::icon::NodeIcon;
use super::render;
use super::scale::ScaleConfig;
use super::state::GraphState;
use super::theme::Theme;

/// Bundles the simulation state with visual configuration.
struct GraphContext {
	state: GraphState,
	scale: ScaleConfig,
	theme: Theme,
	icon: Option<NodeIcon>,
}

/// Renders an interactive community map on a canvas element.
///
/// Pass adapted graph data via the reactive `data` signal; every change
/// replaces the simulation state wholesale and restarts convergence. The
/// component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and track window resizes.
#[component]
pub fn CommunityGraphCanvas(
	#[prop(into)] data: Signal<CommunityGraph>,
	#[prop(into)] on_navigate: Callback<String>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = None)] icon_src: Option<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let hovered = RwSignal::new(Option::<(String, String)>::None);
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let mut state = GraphState::new(w, h);
		state.set_data(data.get_untracked());
		*context_init.borrow_mut() = Some(GraphContext {
			state,
			scale: ScaleConfig::default(),
			theme: Theme::default(),
			icon: icon_src.as_deref().and_then(NodeIcon::load),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		let last_frame = Rc::new(Cell::new(js_sys::Date::now()));
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			// Clamp dt so a backgrounded tab does not fast-forward physics.
			let dt = ((now - last_frame.get()) / 1000.0).clamp(0.0, 0.1);
			last_frame.set(now);

			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(dt);
				render::render(&c.state, &ctx, &c.scale, &c.theme, c.icon.as_ref());
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// New payloads replace the simulation state wholesale.
	let context_data = context.clone();
	Effect::new(move |_| {
		let graph = data.get();
		if let Some(ref mut c) = *context_data.borrow_mut() {
			c.state.set_data(graph);
		}
	});

	let event_position = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = event_position(&ev);
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let actions = c.state.pointer_down(x, y, &c.scale);
			for action in actions {
				c.state.apply(action);
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = event_position(&ev);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			let actions = c.state.pointer_move(x, y, &c.scale);
			for action in actions {
				c.state.apply(action);
			}
			hovered.set(c.state.hovered_detail());
		}
	};

	let (context_mu, navigate) = (context.clone(), on_navigate);
	let on_mouseup = move |_: MouseEvent| {
		let mut target = None;
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			let actions = c.state.pointer_up();
			for action in actions {
				target = c.state.apply(action).or(target);
			}
		}
		// Run the callback outside the borrow; it may tear this view down.
		if let Some(id) = target {
			navigate.run(id);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			let actions = c.state.pointer_leave();
			for action in actions {
				c.state.apply(action);
			}
			hovered.set(None);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let (x, y) = event_position(&ev);
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.zoom_at(x, y, factor);
		}
	};

	view! {
		<div style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="community-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style:display="block"
				style:cursor=move || if hovered.get().is_some() { "pointer" } else { "grab" }
			/>
			{move || {
				hovered.get().map(|(name, description)| {
					view! {
						<div class="community-tooltip">
							<h3>{name}</h3>
							<p>{description}</p>
						</div>
					}
				})
			}}
		</div>
	}
}
