//! Iterative force simulation driving node positions.
//!
//! One tick per animation frame: energy (alpha) decays toward zero while link
//! attraction, many-body repulsion, collision separation and optional
//! centering adjust node velocities, which are then damped and integrated.
//! Pinned nodes (`fx`/`fy` set) hold their position and ignore forces; all
//! other nodes keep responding while a drag is in progress.
//!
//! The engine never owns the graph. It holds tunables and energy state and is
//! handed `&mut CommunityGraph` each tick, so swapping in a fresh graph is
//! just `reconfigure` plus the next tick.

use std::f64::consts::PI;

use super::adapter::{CommunityGraph, CommunityNode};

/// Force tunables. Each force is independently adjustable; zero disables it.
#[derive(Clone, Debug)]
pub struct LayoutParams {
	/// Base many-body repulsion multiplier. Effective per-node strength is
	/// `-charge_strength * size / (1 + connections)`, so hubs do not repel
	/// disproportionately.
	pub charge_strength: f64,
	/// Below this separation the inverse-square falloff is clamped.
	pub charge_distance_min: f64,
	/// Beyond this separation repulsion is skipped entirely.
	pub charge_distance_max: f64,
	/// Collision resolution strength, deliberately below 1 so overlaps relax
	/// over a few ticks instead of jittering.
	pub collide_strength: f64,
	/// Collision radius as a multiple of the drawn radius.
	pub collide_radius_factor: f64,
	/// Centering pull toward the origin. Off by default: combined with strong
	/// repulsion it oscillates, and the view auto-fits instead.
	pub center_strength: f64,
	/// Energy assigned by [`LayoutEngine::reheat`].
	pub alpha_start: f64,
	/// Energy floor below which the simulation is considered settled.
	pub alpha_min: f64,
	/// Per-tick fraction of remaining energy removed.
	pub alpha_decay: f64,
	/// Per-tick velocity retention factor.
	pub velocity_damping: f64,
	/// Hard tick budget per heat-up; settles even if alpha has not reached
	/// the floor.
	pub cooldown_ticks: u32,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			charge_strength: 100.0,
			charge_distance_min: 1.0,
			charge_distance_max: 2000.0,
			collide_strength: 0.2,
			collide_radius_factor: 1.1,
			center_strength: 0.0,
			alpha_start: 1.0,
			alpha_min: 0.001,
			// Reaches alpha_min in ~300 ticks, the classic cooldown schedule.
			alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
			velocity_damping: 0.6,
			cooldown_ticks: 300,
		}
	}
}

/// Owns simulation energy and applies the force passes.
pub struct LayoutEngine {
	pub params: LayoutParams,
	alpha: f64,
	ticks: u32,
}

impl LayoutEngine {
	pub fn new(params: LayoutParams) -> Self {
		Self {
			alpha: params.alpha_start,
			ticks: 0,
			params,
		}
	}

	/// Current simulation energy.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether the layout has converged (or exhausted its tick budget).
	pub fn settled(&self) -> bool {
		self.alpha < self.params.alpha_min || self.ticks >= self.params.cooldown_ticks
	}

	/// Restore full energy so the simulation resumes converging. Called when
	/// the node/link set is replaced and when a dragged node is released.
	pub fn reheat(&mut self) {
		self.alpha = self.params.alpha_start;
		self.ticks = 0;
	}

	/// Seed any unplaced node on a circle around the origin and reheat.
	/// Invoked explicitly by the host whenever the adapter produces a new
	/// graph; there is no implicit re-run on data change.
	pub fn reconfigure(&mut self, graph: &mut CommunityGraph) {
		let count = graph.nodes.len().max(1) as f64;
		let radius = 100.0 + 10.0 * count;
		for (i, node) in graph.nodes.iter_mut().enumerate() {
			if !node.placed() {
				let angle = i as f64 * 2.0 * PI / count;
				node.x = radius * angle.cos();
				node.y = radius * angle.sin();
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
		self.reheat();
	}

	/// Advance one simulation step. Returns false without touching the graph
	/// once settled.
	pub fn tick(&mut self, graph: &mut CommunityGraph) -> bool {
		if self.settled() || graph.nodes.is_empty() {
			return false;
		}
		self.ticks += 1;
		self.alpha -= self.alpha * self.params.alpha_decay;

		self.apply_links(graph);
		self.apply_charge(graph);
		self.apply_collide(graph);
		self.apply_center(graph);

		for node in &mut graph.nodes {
			match (node.fx, node.fy) {
				(Some(fx), Some(fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				_ => {
					node.vx *= self.params.velocity_damping;
					node.vy *= self.params.velocity_damping;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}
		true
	}

	/// One relaxation iteration pulling each link toward its rest distance.
	/// Degree-based bias keeps hubs steadier than their leaves.
	fn apply_links(&self, graph: &mut CommunityGraph) {
		let alpha = self.alpha;
		for (li, link) in graph.links.iter().enumerate() {
			if link.source == link.target {
				continue;
			}
			let (s, t) = (&graph.nodes[link.source], &graph.nodes[link.target]);
			let (deg_s, deg_t) = (s.connections.max(1) as f64, t.connections.max(1) as f64);

			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 && dy == 0.0 {
				dx = jiggle(li as f64);
				dy = jiggle(li as f64 + 0.5);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let strength = 1.0 / deg_s.min(deg_t);
			let push = (len - link.distance) / len * alpha * strength;
			let bias = deg_s / (deg_s + deg_t);

			let (sx, sy) = (dx * push * (1.0 - bias), dy * push * (1.0 - bias));
			let (tx, ty) = (dx * push * bias, dy * push * bias);
			graph.nodes[link.target].vx -= tx;
			graph.nodes[link.target].vy -= ty;
			graph.nodes[link.source].vx += sx;
			graph.nodes[link.source].vy += sy;
		}
	}

	/// Pairwise inverse-square repulsion with per-node strength scaled by
	/// size over degree. O(n^2); community graphs are small enough that a
	/// quadtree would be overkill.
	fn apply_charge(&self, graph: &mut CommunityGraph) {
		let alpha = self.alpha;
		let min2 = self.params.charge_distance_min * self.params.charge_distance_min;
		let max2 = self.params.charge_distance_max * self.params.charge_distance_max;

		let strengths: Vec<f64> = graph
			.nodes
			.iter()
			.map(|n| -self.params.charge_strength * n.size / (1.0 + n.connections as f64))
			.collect();

		for i in 0..graph.nodes.len() {
			for j in 0..graph.nodes.len() {
				if i == j {
					continue;
				}
				let mut dx = graph.nodes[j].x - graph.nodes[i].x;
				let mut dy = graph.nodes[j].y - graph.nodes[i].y;
				let mut d2 = dx * dx + dy * dy;
				if d2 >= max2 {
					continue;
				}
				if d2 == 0.0 {
					dx = jiggle(i as f64 + j as f64 * 1.3);
					dy = jiggle(i as f64 * 1.7 + j as f64);
					d2 = dx * dx + dy * dy;
				}
				if d2 < min2 {
					d2 = (min2 * d2).sqrt().max(min2);
				}
				let w = strengths[j] * alpha / d2;
				graph.nodes[i].vx += dx * w;
				graph.nodes[i].vy += dy * w;
			}
		}
	}

	/// Separates overlapping node circles, damped rather than resolved
	/// instantly to avoid jitter.
	fn apply_collide(&self, graph: &mut CommunityGraph) {
		let strength = self.params.collide_strength;
		if strength <= 0.0 {
			return;
		}
		for i in 0..graph.nodes.len() {
			for j in (i + 1)..graph.nodes.len() {
				let ri = collide_radius(&graph.nodes[i], self.params.collide_radius_factor);
				let rj = collide_radius(&graph.nodes[j], self.params.collide_radius_factor);
				let r = ri + rj;

				let mut dx = (graph.nodes[i].x + graph.nodes[i].vx)
					- (graph.nodes[j].x + graph.nodes[j].vx);
				let mut dy = (graph.nodes[i].y + graph.nodes[i].vy)
					- (graph.nodes[j].y + graph.nodes[j].vy);
				let mut d2 = dx * dx + dy * dy;
				if d2 >= r * r {
					continue;
				}
				if d2 == 0.0 {
					dx = jiggle(i as f64 + j as f64 * 2.1);
					dy = jiggle(i as f64 * 2.3 + j as f64);
					d2 = dx * dx + dy * dy;
				}
				let len = d2.sqrt();
				let push = (r - len) / len * strength;
				let share = (rj * rj) / (ri * ri + rj * rj);

				graph.nodes[i].vx += dx * push * share;
				graph.nodes[i].vy += dy * push * share;
				graph.nodes[j].vx -= dx * push * (1.0 - share);
				graph.nodes[j].vy -= dy * push * (1.0 - share);
			}
		}
	}

	/// Rigid translation of the whole layout toward the origin.
	fn apply_center(&self, graph: &mut CommunityGraph) {
		let strength = self.params.center_strength;
		if strength <= 0.0 {
			return;
		}
		let n = graph.nodes.len() as f64;
		let (mut cx, mut cy) = (0.0, 0.0);
		for node in &graph.nodes {
			cx += node.x;
			cy += node.y;
		}
		cx = cx / n * strength;
		cy = cy / n * strength;
		for node in &mut graph.nodes {
			node.x -= cx;
			node.y -= cy;
		}
	}
}

fn collide_radius(node: &CommunityNode, factor: f64) -> f64 {
	node.radius() * factor
}

/// Tiny deterministic displacement to break exact-overlap symmetry.
fn jiggle(seed: f64) -> f64 {
	let x = (seed * 12.9898 + 78.233).sin() * 43758.5453;
	(x - x.floor() - 0.5) * 1e-6
}

/// Axis-aligned bounds of all placed nodes including their radii, used for
/// auto-fitting the viewport once the layout settles.
pub fn bounding_box(nodes: &[CommunityNode]) -> Option<(f64, f64, f64, f64)> {
	let mut bounds: Option<(f64, f64, f64, f64)> = None;
	for node in nodes.iter().filter(|n| n.placed()) {
		let r = node.radius();
		let (x0, y0, x1, y1) = (node.x - r, node.y - r, node.x + r, node.y + r);
		bounds = Some(match bounds {
			None => (x0, y0, x1, y1),
			Some((bx0, by0, bx1, by1)) => (bx0.min(x0), by0.min(y0), bx1.max(x1), by1.max(y1)),
		});
	}
	bounds
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::community_graph::adapter::{adapt, BASE_DISTANCE};
	use crate::components::community_graph::types::{EdgeListPayload, RawEdge};

	fn two_node_graph() -> CommunityGraph {
		let edge = RawEdge {
			source_id: "a".into(),
			target_id: "b".into(),
			source_subscribers: 10,
			target_subscribers: 10,
			common_subscribers: 5,
			..Default::default()
		};
		adapt(&EdgeListPayload::Flat(vec![edge]))
	}

	#[test]
	fn reconfigure_places_all_nodes() {
		let mut graph = two_node_graph();
		let mut engine = LayoutEngine::new(LayoutParams::default());
		assert!(graph.nodes.iter().all(|n| !n.placed()));
		engine.reconfigure(&mut graph);
		assert!(graph.nodes.iter().all(|n| n.placed()));
		assert!(!engine.settled());
	}

	#[test]
	fn link_force_pulls_distant_nodes_together() {
		let mut graph = two_node_graph();
		let mut engine = LayoutEngine::new(LayoutParams {
			charge_strength: 0.0,
			collide_strength: 0.0,
			..LayoutParams::default()
		});
		engine.reconfigure(&mut graph);
		graph.nodes[0].x = -BASE_DISTANCE;
		graph.nodes[0].y = 0.0;
		graph.nodes[1].x = BASE_DISTANCE;
		graph.nodes[1].y = 0.0;

		let rest = graph.links[0].distance;
		let before = (graph.nodes[1].x - graph.nodes[0].x).abs();
		for _ in 0..200 {
			engine.tick(&mut graph);
		}
		let after = (graph.nodes[1].x - graph.nodes[0].x).abs();
		assert!(after < before, "separation should shrink toward rest distance");
		assert!(
			(after - rest).abs() < (before - rest).abs(),
			"separation should end closer to the rest distance"
		);
	}

	#[test]
	fn repulsion_separates_coincident_nodes() {
		let mut graph = two_node_graph();
		let mut engine = LayoutEngine::new(LayoutParams::default());
		engine.reconfigure(&mut graph);
		graph.nodes[0].x = 0.0;
		graph.nodes[0].y = 0.0;
		graph.nodes[1].x = 0.0;
		graph.nodes[1].y = 0.0;

		for _ in 0..20 {
			engine.tick(&mut graph);
		}
		let dx = graph.nodes[1].x - graph.nodes[0].x;
		let dy = graph.nodes[1].y - graph.nodes[0].y;
		assert!((dx * dx + dy * dy).sqrt() > 1.0);
		assert!(graph.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
	}

	#[test]
	fn pinned_node_ignores_forces() {
		let mut graph = two_node_graph();
		let mut engine = LayoutEngine::new(LayoutParams::default());
		engine.reconfigure(&mut graph);
		graph.nodes[0].fx = Some(42.0);
		graph.nodes[0].fy = Some(-7.0);
		let (free_x, free_y) = (graph.nodes[1].x, graph.nodes[1].y);

		for _ in 0..30 {
			engine.tick(&mut graph);
		}
		assert_eq!(graph.nodes[0].x, 42.0);
		assert_eq!(graph.nodes[0].y, -7.0);
		assert_eq!(graph.nodes[0].vx, 0.0);
		// The free node keeps responding normally.
		assert!(graph.nodes[1].x != free_x || graph.nodes[1].y != free_y);
	}

	#[test]
	fn settles_within_cooldown_budget_and_reheats() {
		let mut graph = two_node_graph();
		let mut engine = LayoutEngine::new(LayoutParams {
			cooldown_ticks: 10,
			..LayoutParams::default()
		});
		engine.reconfigure(&mut graph);
		for _ in 0..20 {
			engine.tick(&mut graph);
		}
		assert!(engine.settled());
		assert!(!engine.tick(&mut graph), "settled engine must not advance");

		engine.reheat();
		assert!(!engine.settled());
		assert_eq!(engine.alpha(), engine.params.alpha_start);
		assert!(engine.tick(&mut graph));
	}

	#[test]
	fn bounding_box_covers_node_extents() {
		let mut graph = two_node_graph();
		let mut engine = LayoutEngine::new(LayoutParams::default());
		engine.reconfigure(&mut graph);
		graph.nodes[0].x = -50.0;
		graph.nodes[0].y = 0.0;
		graph.nodes[1].x = 50.0;
		graph.nodes[1].y = 10.0;

		let (x0, y0, x1, y1) = bounding_box(&graph.nodes).unwrap();
		assert!(x0 < -50.0 && x1 > 50.0);
		assert!(y0 < 0.0 && y1 > 10.0);
		assert!(bounding_box(&[]).is_none());
	}
}
