//! community-graph: interactive force-directed map of communities.
//!
//! This crate provides a WASM-based graph visualization component that
//! renders communities linked by shared subscribers, with physics-based
//! layout, pan/zoom, hover detail, and click-through navigation to a
//! community's page.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gloo_net::http::Request;
use leptos::prelude::*;
use leptos_meta::*;
use log::{info, warn, Level};

pub mod components;

pub use components::community_graph::{
	adapt, Action, CommunityGraph, CommunityGraphCanvas, CommunityLink, CommunityNode,
	EdgeListPayload, GraphState, HighlightTracker, InteractionController, LayoutEngine,
	LayoutParams, Theme,
};

/// Endpoint serving the community edge list.
const GRAPH_DATA_URL: &str = "/graph-data";
/// Optional node icon; a load failure silently falls back to circles.
const NODE_ICON_URL: &str = "/assets/community-icon.png";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("community-graph: logging initialized");
}

/// Fetch and adapt the edge list. Any network or parse failure yields an
/// empty graph; the view shows a neutral state rather than crashing.
async fn fetch_graph_data() -> CommunityGraph {
	let body = match Request::get(GRAPH_DATA_URL).send().await {
		Ok(response) => match response.text().await {
			Ok(body) => body,
			Err(e) => {
				warn!("community-graph: failed to read graph data: {e}");
				return CommunityGraph::default();
			}
		},
		Err(e) => {
			warn!("community-graph: failed to fetch graph data: {e}");
			return CommunityGraph::default();
		}
	};

	match serde_json::from_str::<EdgeListPayload>(&body) {
		Ok(payload) => {
			let graph = adapt(&payload);
			info!(
				"community-graph: loaded {} communities, {} links",
				graph.nodes.len(),
				graph.links.len()
			);
			graph
		}
		Err(e) => {
			warn!("community-graph: failed to parse graph data: {e}");
			CommunityGraph::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// The cleanup hook only accepts Send + Sync closures, so the teardown
	// flag must satisfy those bounds while still behaving like a flag.
	#[test]
	fn teardown_flag_is_shareable_across_the_cleanup_boundary() {
		fn assert_cleanup_compatible<T: Send + Sync + 'static>(_: &T) {}

		let disposed = Arc::new(AtomicBool::new(false));
		let for_cleanup = disposed.clone();
		assert_cleanup_compatible(&for_cleanup);

		assert!(!disposed.load(Ordering::Relaxed));
		for_cleanup.store(true, Ordering::Relaxed);
		assert!(disposed.load(Ordering::Relaxed), "late responses must see the flag");
	}
}

/// Main application component: fetches the edge list and renders the map.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (graph, set_graph) = signal(CommunityGraph::default());

	// The fetch may outlive this view; drop late responses instead of
	// writing to a torn-down state. Atomic because on_cleanup requires a
	// Send + Sync closure even on single-threaded wasm.
	let disposed = Arc::new(AtomicBool::new(false));
	{
		let disposed = disposed.clone();
		on_cleanup(move || disposed.store(true, Ordering::Relaxed));
	}
	{
		let disposed = disposed.clone();
		wasm_bindgen_futures::spawn_local(async move {
			let graph = fetch_graph_data().await;
			if disposed.load(Ordering::Relaxed) {
				return;
			}
			set_graph.set(graph);
		});
	}

	let navigate = Callback::new(|id: String| {
		if let Some(window) = web_sys::window() {
			let _ = window.location().set_href(&format!("/community/{id}"));
		}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Community Map" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<CommunityGraphCanvas
				data=graph
				on_navigate=navigate
				fullscreen=true
				icon_src=Some(NODE_ICON_URL.to_string())
			/>
			<div class="graph-overlay">
				<h1>"Community Map"</h1>
				<p class="subtitle">
					"Hover a community for details. Click to open it. Drag nodes to reposition."
				</p>
			</div>
		</div>
	}
}
