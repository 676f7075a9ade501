//! Per-view simulation state: the adapted graph, layout engine, highlight
//! tracker, gesture controller and pan/zoom transform.
//!
//! Created once when the canvas mounts, then mutated each frame by the
//! animation loop. `tick` advances the physics one step and the renderer
//! reads the same node array synchronously afterwards, so the strict
//! tick-then-render alternation on one thread needs no locking.

use super::adapter::CommunityGraph;
use super::highlight::HighlightTracker;
use super::interaction::{Action, InteractionController};
use super::layout::{bounding_box, LayoutEngine, LayoutParams};
use super::scale::{ScaleConfig, ScaledValues};

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Copy, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Lower zoom clamp.
pub const MIN_ZOOM: f64 = 0.1;
/// Upper zoom clamp.
pub const MAX_ZOOM: f64 = 10.0;

/// Auto-fit never zooms in past this, so tiny graphs stay readable.
const FIT_MAX_ZOOM: f64 = 2.0;
/// Screen-pixel padding kept inside the viewport when fitting.
const FIT_PADDING: f64 = 40.0;
/// Seconds for the fit transition.
const FIT_DURATION: f64 = 0.6;

#[derive(Clone, Copy, Debug)]
struct FitAnimation {
	from: ViewTransform,
	to: ViewTransform,
	t: f64,
}

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Everything one graph view owns. No cross-instance shared state.
pub struct GraphState {
	pub graph: CommunityGraph,
	pub engine: LayoutEngine,
	pub highlight: HighlightTracker,
	pub controller: InteractionController,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	/// Monotonic clock driving flow particle animation.
	pub flow_time: f64,
	fit: Option<FitAnimation>,
	fitted: bool,
}

impl GraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: CommunityGraph::default(),
			engine: LayoutEngine::new(LayoutParams::default()),
			highlight: HighlightTracker::default(),
			controller: InteractionController::default(),
			// World origin at the canvas center; layout seeds around (0, 0).
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
			flow_time: 0.0,
			fit: None,
			fitted: false,
		}
	}

	/// Replace the graph wholesale with a freshly adapted payload and restart
	/// convergence. There are no partial updates.
	pub fn set_data(&mut self, graph: CommunityGraph) {
		self.graph = graph;
		self.highlight = HighlightTracker::default();
		self.engine.reconfigure(&mut self.graph);
		self.fit = None;
		self.fitted = false;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// One frame: advance the simulation if it still has energy, animate
	/// highlight fades and any pending viewport fit.
	pub fn tick(&mut self, dt: f64) {
		let was_settled = self.engine.settled();
		self.engine.tick(&mut self.graph);
		if !was_settled && self.engine.settled() && !self.fitted {
			self.fitted = true;
			self.begin_fit();
		}

		self.flow_time += dt;
		self.highlight.tick(dt);

		if let Some(mut fit) = self.fit.take() {
			fit.t += dt / FIT_DURATION;
			let t = smooth_step(fit.t.min(1.0));
			self.transform = ViewTransform {
				x: fit.from.x + (fit.to.x - fit.from.x) * t,
				y: fit.from.y + (fit.to.y - fit.from.y) * t,
				k: fit.from.k + (fit.to.k - fit.from.k) * t,
			};
			if fit.t < 1.0 {
				self.fit = Some(fit);
			}
		}
	}

	/// Animate the viewport to the node bounding box with inward padding.
	fn begin_fit(&mut self) {
		let Some((x0, y0, x1, y1)) = bounding_box(&self.graph.nodes) else {
			return;
		};
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = ((self.width - 2.0 * FIT_PADDING) / bw)
			.min((self.height - 2.0 * FIT_PADDING) / bh)
			.clamp(MIN_ZOOM, FIT_MAX_ZOOM);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		self.fit = Some(FitAnimation {
			from: self.transform,
			to: ViewTransform {
				x: self.width / 2.0 - k * cx,
				y: self.height / 2.0 - k * cy,
				k,
			},
			t: 0.0,
		});
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position, if any. Later nodes draw on top,
	/// so the last match wins.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		for (idx, node) in self.graph.nodes.iter().enumerate() {
			if !node.placed() {
				continue;
			}
			let (dx, dy) = (node.x - gx, node.y - gy);
			let hit = scale.hit_radius(node.radius());
			if dx * dx + dy * dy < hit * hit {
				found = Some(idx);
			}
		}
		found
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64, config: &ScaleConfig) -> Vec<Action> {
		let hit = self.node_at_position(sx, sy, config);
		self.controller.pointer_down(hit, sx, sy)
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64, config: &ScaleConfig) -> Vec<Action> {
		let hit = self.node_at_position(sx, sy, config);
		self.controller.pointer_move(hit, sx, sy)
	}

	pub fn pointer_up(&mut self) -> Vec<Action> {
		self.controller.pointer_up()
	}

	pub fn pointer_leave(&mut self) -> Vec<Action> {
		self.controller.pointer_leave()
	}

	/// Apply one controller action. Returns the community id to navigate to
	/// when the action is a click; routing itself is the host's concern.
	pub fn apply(&mut self, action: Action) -> Option<String> {
		match action {
			Action::SetHover(hover) => {
				self.highlight.set_hover(hover, &self.graph.links);
			}
			Action::BeginDrag(idx) => {
				if let Some(node) = self.graph.nodes.get_mut(idx) {
					node.fx = Some(node.x);
					node.fy = Some(node.y);
				}
			}
			Action::DragBy { node: idx, dx, dy } => {
				let k = self.transform.k;
				if let Some(node) = self.graph.nodes.get_mut(idx) {
					// Keep position in lockstep with the pin so the node
					// follows the pointer even while the engine is settled.
					let fx = node.fx.unwrap_or(node.x) + dx / k;
					let fy = node.fy.unwrap_or(node.y) + dy / k;
					node.fx = Some(fx);
					node.fy = Some(fy);
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
			}
			Action::ReleaseNode(idx) => {
				if let Some(node) = self.graph.nodes.get_mut(idx) {
					node.fx = None;
					node.fy = None;
				}
				self.engine.reheat();
			}
			Action::PanBy { dx, dy } => {
				self.fit = None;
				self.transform.x += dx;
				self.transform.y += dy;
			}
			Action::Navigate(idx) => {
				return self.graph.nodes.get(idx).map(|n| n.id.clone());
			}
		}
		None
	}

	/// Wheel zoom anchored at the cursor position.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.fit = None;
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Name and description of the hovered community, for the detail overlay.
	pub fn hovered_detail(&self) -> Option<(String, String)> {
		let idx = self.highlight.hovered()?;
		let node = self.graph.nodes.get(idx)?;
		Some((node.name.clone(), node.description.clone()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::community_graph::adapter::adapt;
	use crate::components::community_graph::types::{EdgeListPayload, RawEdge};

	fn state_with_two_nodes() -> GraphState {
		let edge = RawEdge {
			source_id: "A".into(),
			target_id: "B".into(),
			source_name: "Alpha".into(),
			source_description: "first".into(),
			target_name: "Beta".into(),
			target_description: "second".into(),
			source_subscribers: 10,
			target_subscribers: 10,
			common_subscribers: 5,
			..Default::default()
		};
		let mut state = GraphState::new(800.0, 600.0);
		state.set_data(adapt(&EdgeListPayload::Flat(vec![edge])));
		state
	}

	#[test]
	fn drag_release_restores_simulation_control_and_reheats() {
		let mut state = state_with_two_nodes();
		// Burn the engine down to settled.
		for _ in 0..500 {
			state.tick(1.0 / 60.0);
		}
		assert!(state.engine.settled());

		state.apply(Action::BeginDrag(0));
		assert!(state.graph.nodes[0].fx.is_some());
		state.apply(Action::DragBy {
			node: 0,
			dx: 10.0,
			dy: 0.0,
		});
		assert!(state.graph.nodes[0].fx.is_some());

		state.apply(Action::ReleaseNode(0));
		assert!(state.graph.nodes[0].fx.is_none());
		assert!(state.graph.nodes[0].fy.is_none());
		assert!(!state.engine.settled(), "release must reheat the simulation");
	}

	#[test]
	fn dragging_moves_the_pin_in_world_units() {
		let mut state = state_with_two_nodes();
		state.transform.k = 2.0;
		let start_x = state.graph.nodes[0].x;
		state.apply(Action::BeginDrag(0));
		state.apply(Action::DragBy {
			node: 0,
			dx: 20.0,
			dy: 0.0,
		});
		// 20 screen px at zoom 2 is 10 world units.
		assert!((state.graph.nodes[0].x - (start_x + 10.0)).abs() < 1e-9);
		assert_eq!(state.graph.nodes[0].fx, Some(state.graph.nodes[0].x));
	}

	#[test]
	fn navigate_action_yields_the_community_id() {
		let mut state = state_with_two_nodes();
		assert_eq!(state.apply(Action::Navigate(1)).as_deref(), Some("B"));
		assert_eq!(state.apply(Action::Navigate(99)), None);
		assert_eq!(state.apply(Action::SetHover(Some(0))), None);
	}

	#[test]
	fn click_gesture_end_to_end_navigates_exactly_once() {
		let mut state = state_with_two_nodes();
		let config = ScaleConfig::default();
		for _ in 0..10 {
			state.tick(1.0 / 60.0);
		}
		let node = &state.graph.nodes[1];
		let sx = node.x * state.transform.k + state.transform.x;
		let sy = node.y * state.transform.k + state.transform.y;

		let mut navigations = Vec::new();
		for action in state.pointer_down(sx, sy, &config) {
			navigations.extend(state.apply(action));
		}
		for action in state.pointer_up() {
			navigations.extend(state.apply(action));
		}
		assert_eq!(navigations, vec!["B".to_string()]);

		// Same gesture with movement in between: no navigation.
		let mut navigations = Vec::new();
		for action in state.pointer_down(sx, sy, &config) {
			navigations.extend(state.apply(action));
		}
		for action in state.pointer_move(sx + 5.0, sy, &config) {
			navigations.extend(state.apply(action));
		}
		for action in state.pointer_up() {
			navigations.extend(state.apply(action));
		}
		assert!(navigations.is_empty());
	}

	#[test]
	fn settling_triggers_a_single_auto_fit() {
		let mut state = state_with_two_nodes();
		// Spread nodes far apart so fitting must zoom out.
		for _ in 0..2000 {
			state.tick(1.0 / 60.0);
		}
		assert!(state.engine.settled());
		let fitted = state.transform;
		assert!(
			(fitted.x - 400.0).abs() > 1e-9 || (fitted.k - 1.0).abs() > 1e-9,
			"transform should have moved to frame the graph"
		);

		// Reheat via drag release; settling again must not refit.
		state.apply(Action::BeginDrag(0));
		state.apply(Action::ReleaseNode(0));
		for _ in 0..2000 {
			state.tick(1.0 / 60.0);
		}
		assert_eq!(state.transform.x, fitted.x);
		assert_eq!(state.transform.y, fitted.y);
		assert_eq!(state.transform.k, fitted.k);
	}

	#[test]
	fn hovered_detail_exposes_name_and_description() {
		let mut state = state_with_two_nodes();
		assert!(state.hovered_detail().is_none());
		state.apply(Action::SetHover(Some(0)));
		assert_eq!(
			state.hovered_detail(),
			Some(("Alpha".to_string(), "first".to_string()))
		);
	}

	#[test]
	fn wheel_zoom_stays_clamped_and_anchored() {
		let mut state = state_with_two_nodes();
		for _ in 0..100 {
			state.zoom_at(400.0, 300.0, 1.5);
		}
		assert!(state.transform.k <= MAX_ZOOM);
		for _ in 0..100 {
			state.zoom_at(400.0, 300.0, 0.5);
		}
		assert!(state.transform.k >= MIN_ZOOM);
	}
}
