//! Force-directed community map component.
//!
//! Renders a network of communities on an HTML canvas: each node is a
//! community, each weighted link a shared-subscriber relationship. Features:
//! - Physics-based layout (repulsion, per-link rest distance, collision)
//! - Pan, zoom, and node dragging with simulation reheat on release
//! - Hover highlighting with dimmed context and flow particles
//! - Click-to-navigate via a host-supplied callback
//!
//! # Example
//!
//! ```ignore
//! use community_graph::{adapt, CommunityGraphCanvas, EdgeListPayload};
//!
//! let payload: EdgeListPayload = serde_json::from_str(body)?;
//! let graph = adapt(&payload);
//!
//! view! {
//!     <CommunityGraphCanvas
//!         data=Signal::derive(move || graph.clone())
//!         on_navigate=Callback::new(|id: String| log::info!("go to {id}"))
//!         fullscreen=true
//!     />
//! }
//! ```

mod adapter;
mod component;
mod highlight;
mod icon;
mod interaction;
mod layout;
mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;

pub use adapter::{adapt, CommunityGraph, CommunityLink, CommunityNode};
pub use component::CommunityGraphCanvas;
pub use highlight::HighlightTracker;
pub use interaction::{Action, InteractionController};
pub use layout::{LayoutEngine, LayoutParams};
pub use state::GraphState;
pub use theme::Theme;
pub use types::{EdgeListPayload, RawEdge, RawGraph, RawLink, RawNode};
