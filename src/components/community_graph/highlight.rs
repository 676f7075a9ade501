//! Hover highlight state: the hovered node plus the derived sets of
//! highlighted nodes and links.
//!
//! The discrete sets carry the invariant (no hover: both empty; hover: the
//! hovered node, every neighbor across an incident link, and exactly the
//! incident links). On top of that, per-node intensities animate with
//! exponential smoothing so dimming fades instead of cutting, with a short
//! hold time to stop flashing when the pointer skirts a hover zone.

use std::collections::{HashMap, HashSet};

use super::adapter::CommunityLink;

/// Minimum time (seconds) a highlight is held before fade-out may begin.
const MIN_HOLD_TIME: f64 = 0.12;

/// Tracks the hovered node and everything lit up because of it.
#[derive(Clone, Debug, Default)]
pub struct HighlightTracker {
	hovered: Option<usize>,
	nodes: HashSet<usize>,
	links: HashSet<usize>,
	node_intensity: HashMap<usize, f64>,
	ring_intensity: HashMap<usize, f64>,
	hold_timer: HashMap<usize, f64>,
	cached_max: f64,
}

impl HighlightTracker {
	/// Update the hovered node and recompute both sets in one scan of the
	/// link list.
	pub fn set_hover(&mut self, node: Option<usize>, links: &[CommunityLink]) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.nodes.clear();
		self.links.clear();

		if let Some(idx) = node {
			self.nodes.insert(idx);
			for (li, link) in links.iter().enumerate() {
				if link.source == idx {
					self.links.insert(li);
					self.nodes.insert(link.target);
				} else if link.target == idx {
					self.links.insert(li);
					self.nodes.insert(link.source);
				}
			}
			for &idx in &self.nodes {
				self.hold_timer.insert(idx, MIN_HOLD_TIME);
			}
		}
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn highlighted_nodes(&self) -> &HashSet<usize> {
		&self.nodes
	}

	pub fn highlighted_links(&self) -> &HashSet<usize> {
		&self.links
	}

	/// A node is dimmed when a highlight is active and it is not part of it.
	/// Dimmed elements render at reduced opacity rather than disappearing.
	pub fn is_node_dimmed(&self, idx: usize) -> bool {
		!self.nodes.is_empty() && !self.nodes.contains(&idx)
	}

	pub fn is_link_dimmed(&self, idx: usize) -> bool {
		!self.nodes.is_empty() && !self.links.contains(&idx)
	}

	pub fn is_link_highlighted(&self, idx: usize) -> bool {
		self.links.contains(&idx)
	}

	/// Animate intensities toward their targets.
	///
	/// Exponential smoothing (`value += (target - value) * (1 - e^(-speed*dt))`)
	/// eases out naturally; fade-out waits for the hold timer.
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0;
		const FADE_OUT_SPEED: f64 = 4.0;

		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.nodes {
			let intensity = self.node_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}
		if let Some(idx) = self.hovered {
			let intensity = self.ring_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}

		let target = &self.nodes;
		self.hold_timer.retain(|idx, timer| {
			if target.contains(idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		let mut new_max: f64 = 0.0;
		let hold = &self.hold_timer;
		self.node_intensity.retain(|idx, intensity| {
			if target.contains(idx) {
				new_max = new_max.max(*intensity);
				true
			} else {
				if hold.get(idx).copied().unwrap_or(0.0) <= 0.0 {
					*intensity *= fade_out;
				}
				new_max = new_max.max(*intensity);
				*intensity > 0.005
			}
		});

		let hovered = self.hovered;
		self.ring_intensity.retain(|idx, intensity| {
			if hovered == Some(*idx) {
				true
			} else {
				if hold.get(idx).copied().unwrap_or(0.0) <= 0.0 {
					*intensity *= fade_out;
				}
				*intensity > 0.005
			}
		});

		self.cached_max = new_max;
	}

	/// Smoothed highlight intensity for a node.
	pub fn node_intensity(&self, idx: usize) -> f64 {
		self.node_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Smoothed hover ring intensity.
	pub fn ring_intensity(&self, idx: usize) -> f64 {
		self.ring_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Link intensity as the geometric mean of its endpoints, smoother than
	/// min during transitions.
	pub fn link_intensity(&self, source: usize, target: usize) -> f64 {
		(self.node_intensity(source) * self.node_intensity(target)).sqrt()
	}

	/// Maximum node intensity this tick; drives dimming of everything else.
	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}
}
