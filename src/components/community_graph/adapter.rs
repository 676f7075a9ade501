//! Converts raw backend payloads into the node/link model the simulation runs
//! on.
//!
//! The adapter is a pure transform: endpoints repeated across edge records are
//! merged into one node each (first-seen name and description win), node sizes
//! are a clamped linear blend of subscriber and connection counts, and link
//! rest distances shrink as subscriber overlap grows. Links hold node indices
//! rather than references, so the graph owns its nodes in a flat `Vec`.

use std::collections::HashMap;

use super::types::{EdgeListPayload, RawEdge, RawGraph};

/// Smallest node size (diameter in world units).
pub const MIN_SIZE: f64 = 10.0;
/// Largest node size.
pub const MAX_SIZE: f64 = 40.0;
/// Size contribution per incident link.
pub const CONNECTION_GAIN: f64 = 5.0;
/// Size contribution per subscriber.
pub const SUBSCRIBER_GAIN: f64 = 0.05;
/// Rest distance for a link with zero subscriber overlap.
pub const BASE_DISTANCE: f64 = 1000.0;
/// How strongly overlap shortens a link.
pub const OVERLAP_ALPHA: f64 = 10.0;

/// One community in the graph.
///
/// Position and velocity are owned here and mutated by the layout engine each
/// tick. `fx`/`fy`, when set, pin the node during simulation (an in-progress
/// drag); clearing them returns the node to simulation control.
#[derive(Clone, Debug)]
pub struct CommunityNode {
	pub id: String,
	pub name: String,
	pub description: String,
	/// Number of distinct links incident to this node.
	pub connections: usize,
	/// Subscriber count reported by the backend.
	pub subscribers: f64,
	/// Display size in `[MIN_SIZE, MAX_SIZE]`.
	pub size: f64,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl CommunityNode {
	fn new(id: String, name: String, description: String, subscribers: f64) -> Self {
		Self {
			id,
			name,
			description,
			connections: 0,
			subscribers,
			size: MIN_SIZE,
			x: f64::NAN,
			y: f64::NAN,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}

	/// Drawn radius in world units.
	pub fn radius(&self) -> f64 {
		self.size / 2.0 + 4.0
	}

	/// Whether the layout engine has assigned this node a position yet.
	pub fn placed(&self) -> bool {
		!self.x.is_nan() && !self.y.is_nan()
	}
}

/// A weighted edge between two communities, referencing nodes by index.
#[derive(Clone, Debug)]
pub struct CommunityLink {
	pub source: usize,
	pub target: usize,
	/// Shared subscriber count.
	pub weight: f64,
	/// Desired separation, in `(0, BASE_DISTANCE]`.
	pub distance: f64,
}

/// The adapted graph: flat node storage plus index-based links.
///
/// Replaced wholesale whenever a new payload arrives; the layout engine and
/// highlight tracker never outlive the node indices they hold.
#[derive(Clone, Debug, Default)]
pub struct CommunityGraph {
	pub nodes: Vec<CommunityNode>,
	pub links: Vec<CommunityLink>,
}

impl CommunityGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Size as a monotone blend of subscriber and connection counts, clamped so
/// hubs stay visually distinguishable without unbounded growth.
fn scale_size(subscribers: f64, connections: usize) -> f64 {
	(MIN_SIZE + CONNECTION_GAIN * connections as f64 + SUBSCRIBER_GAIN * subscribers)
		.clamp(MIN_SIZE, MAX_SIZE)
}

/// Rest distance from subscriber overlap: more overlap, shorter link.
fn link_distance(common: f64, subscribers_a: f64, subscribers_b: f64) -> f64 {
	let total = subscribers_a + subscribers_b;
	let overlap_ratio = if total > 0.0 { common / total } else { 0.0 };
	BASE_DISTANCE / (1.0 + OVERLAP_ALPHA * overlap_ratio)
}

/// Adapts either backend shape into a [`CommunityGraph`].
///
/// Pure: safe to call repeatedly with fresh payloads, never mutates previous
/// output. Records with an unresolvable endpoint (empty id) are skipped;
/// every other malformed field has already been defaulted during parsing.
pub fn adapt(payload: &EdgeListPayload) -> CommunityGraph {
	match payload {
		EdgeListPayload::Flat(edges) => adapt_flat(edges),
		EdgeListPayload::Split(graph) => adapt_split(graph),
	}
}

fn adapt_flat(edges: &[RawEdge]) -> CommunityGraph {
	let mut nodes: Vec<CommunityNode> = Vec::new();
	let mut index: HashMap<String, usize> = HashMap::new();

	let mut intern = |nodes: &mut Vec<CommunityNode>,
					  id: &str,
					  name: &str,
					  description: &str,
					  subscribers: f64| {
		match index.get(id) {
			Some(&idx) => {
				// First-seen metadata wins; only keep the larger subscriber
				// count in case records disagree.
				let node = &mut nodes[idx];
				node.subscribers = node.subscribers.max(subscribers);
				idx
			}
			None => {
				let idx = nodes.len();
				nodes.push(CommunityNode::new(
					id.to_string(),
					name.to_string(),
					description.to_string(),
					subscribers,
				));
				index.insert(id.to_string(), idx);
				idx
			}
		}
	};

	let mut links = Vec::new();
	for edge in edges {
		if edge.source_id.is_empty() || edge.target_id.is_empty() {
			continue;
		}
		let source = intern(
			&mut nodes,
			&edge.source_id,
			&edge.source_name,
			&edge.source_description,
			edge.source_subscribers as f64,
		);
		let target = intern(
			&mut nodes,
			&edge.target_id,
			&edge.target_name,
			&edge.target_description,
			edge.target_subscribers as f64,
		);
		nodes[source].connections += 1;
		nodes[target].connections += 1;
		links.push(CommunityLink {
			source,
			target,
			weight: edge.common_subscribers as f64,
			distance: link_distance(
				edge.common_subscribers as f64,
				edge.source_subscribers as f64,
				edge.target_subscribers as f64,
			),
		});
	}

	for node in &mut nodes {
		node.size = scale_size(node.subscribers, node.connections);
	}

	CommunityGraph { nodes, links }
}

fn adapt_split(graph: &RawGraph) -> CommunityGraph {
	let mut nodes: Vec<CommunityNode> = Vec::new();
	let mut index: HashMap<String, usize> = HashMap::new();

	for raw in &graph.nodes {
		if raw.id.is_empty() || index.contains_key(&raw.id) {
			continue;
		}
		index.insert(raw.id.clone(), nodes.len());
		nodes.push(CommunityNode::new(
			raw.id.clone(),
			raw.name.clone(),
			String::new(),
			raw.size as f64,
		));
	}

	let mut links = Vec::new();
	for raw in &graph.links {
		let (Some(&source), Some(&target)) = (index.get(&raw.id1), index.get(&raw.id2)) else {
			continue;
		};
		nodes[source].connections += 1;
		nodes[target].connections += 1;
		links.push(CommunityLink {
			source,
			target,
			weight: raw.common_subscribers as f64,
			distance: link_distance(
				raw.common_subscribers as f64,
				nodes[source].subscribers,
				nodes[target].subscribers,
			),
		});
	}

	for node in &mut nodes {
		node.size = scale_size(node.subscribers, node.connections);
	}

	CommunityGraph { nodes, links }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::community_graph::types::{RawLink, RawNode};

	fn edge(a: &str, b: &str, subs_a: u64, subs_b: u64, common: u64) -> RawEdge {
		RawEdge {
			source_id: a.to_string(),
			target_id: b.to_string(),
			source_name: format!("name-{a}"),
			source_description: format!("desc-{a}"),
			target_name: format!("name-{b}"),
			target_description: format!("desc-{b}"),
			source_subscribers: subs_a,
			target_subscribers: subs_b,
			common_subscribers: common,
		}
	}

	#[test]
	fn merges_repeated_endpoints_into_unique_nodes() {
		let edges = vec![
			edge("a", "b", 10, 20, 2),
			edge("a", "c", 10, 30, 1),
			edge("b", "c", 20, 30, 4),
		];
		let graph = adapt(&EdgeListPayload::Flat(edges));

		assert_eq!(graph.nodes.len(), 3);
		let mut ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		ids.sort();
		ids.dedup();
		assert_eq!(ids.len(), 3, "node ids must be unique");
		assert_eq!(graph.links.len(), 3);
		for link in &graph.links {
			assert!(link.source < graph.nodes.len());
			assert!(link.target < graph.nodes.len());
		}
		for node in &graph.nodes {
			assert_eq!(node.connections, 2);
		}
	}

	#[test]
	fn first_seen_metadata_wins() {
		let mut second = edge("a", "b", 10, 20, 1);
		second.source_name = "renamed".to_string();
		let graph = adapt(&EdgeListPayload::Flat(vec![edge("a", "c", 10, 5, 0), second]));
		let a = graph.nodes.iter().find(|n| n.id == "a").unwrap();
		assert_eq!(a.name, "name-a");
		assert_eq!(a.connections, 2);
	}

	#[test]
	fn size_is_monotone_and_clamped() {
		let lo = scale_size(0.0, 0);
		let mid = scale_size(100.0, 2);
		let hi = scale_size(1_000_000.0, 50);
		assert_eq!(lo, MIN_SIZE);
		assert!(mid > lo);
		assert!(hi >= mid);
		assert_eq!(hi, MAX_SIZE);

		let mut prev = 0.0;
		for connections in 0..10 {
			let size = scale_size(0.0, connections);
			assert!(size >= prev);
			assert!((MIN_SIZE..=MAX_SIZE).contains(&size));
			prev = size;
		}
	}

	#[test]
	fn distance_is_positive_and_decreases_with_overlap() {
		let mut prev = f64::INFINITY;
		for common in [0u64, 1, 5, 10, 20] {
			let d = link_distance(common as f64, 20.0, 20.0);
			assert!(d > 0.0);
			assert!(d <= BASE_DISTANCE);
			assert!(d < prev || common == 0, "distance must strictly decrease");
			prev = d;
		}
		// Zero denominator falls back to a neutral ratio, not a crash.
		assert_eq!(link_distance(5.0, 0.0, 0.0), BASE_DISTANCE);
	}

	#[test]
	fn worked_example_single_edge() {
		let graph = adapt(&EdgeListPayload::Flat(vec![edge("A", "B", 10, 10, 5)]));

		assert_eq!(graph.nodes.len(), 2);
		assert!(graph.nodes.iter().all(|n| n.connections == 1));
		assert_eq!(graph.links.len(), 1);
		let link = &graph.links[0];
		assert_eq!(link.weight, 5.0);
		// overlap_ratio = 5 / 20 = 0.25
		let expected = BASE_DISTANCE / (1.0 + OVERLAP_ALPHA * 0.25);
		assert!((link.distance - expected).abs() < 1e-9);
	}

	#[test]
	fn unresolvable_endpoints_are_skipped_not_fatal() {
		let mut broken = edge("", "b", 1, 1, 1);
		broken.source_id = String::new();
		let graph = adapt(&EdgeListPayload::Flat(vec![broken, edge("a", "b", 5, 5, 1)]));
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
	}

	#[test]
	fn split_shape_uses_node_sizes_for_overlap() {
		let payload = EdgeListPayload::Split(RawGraph {
			nodes: vec![
				RawNode {
					id: "a".into(),
					name: "A".into(),
					size: 10,
				},
				RawNode {
					id: "b".into(),
					name: "B".into(),
					size: 10,
				},
			],
			links: vec![
				RawLink {
					id1: "a".into(),
					id2: "b".into(),
					common_subscribers: 5,
				},
				// Dangling link endpoint: dropped, not an error.
				RawLink {
					id1: "a".into(),
					id2: "ghost".into(),
					common_subscribers: 1,
				},
			],
		});
		let graph = adapt(&payload);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.links.len(), 1);
		let expected = BASE_DISTANCE / (1.0 + OVERLAP_ALPHA * 0.25);
		assert!((graph.links[0].distance - expected).abs() < 1e-9);
	}

	#[test]
	fn adapt_is_pure_across_calls() {
		let payload = EdgeListPayload::Flat(vec![edge("a", "b", 10, 10, 5)]);
		let first = adapt(&payload);
		let second = adapt(&payload);
		assert_eq!(first.nodes.len(), second.nodes.len());
		assert_eq!(first.links[0].distance, second.links[0].distance);
	}
}
