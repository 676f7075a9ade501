//! Zoom-dependent scaling for graph visuals.
//!
//! Node radii come from the data (community size), but strokes, labels, hit
//! areas and flow particles need explicit zoom behavior so they stay usable
//! at any zoom level. Two coordinate spaces matter:
//!
//! - **World-space**: graph coordinates, scaled by the view transform.
//! - **Screen-space**: canvas pixels, constant regardless of zoom.

/// How a visual property scales with zoom level `k`.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "World variant completes the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a base value at zoom `k`, ready to use after
	/// the canvas transform has been applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Node label and hit-test scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// How the hit radius derives from the node's drawn radius.
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Zoom floor for label scaling, so labels stop growing when zoomed far
	/// out.
	pub label_min_k: f64,
}

/// Link stroke scaling.
#[derive(Clone, Debug)]
pub struct LinkScaleConfig {
	/// Stroke width in screen pixels.
	pub line_width: f64,
}

/// Hover ring scaling.
#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	/// Stroke width in screen pixels.
	pub width: f64,
	/// Offset from the node edge in screen pixels.
	pub offset: f64,
}

/// Directional flow particle scaling.
#[derive(Clone, Debug)]
pub struct FlowScaleConfig {
	/// Particle radius in screen pixels.
	pub particle_size: f64,
	/// Travel speed along the link, world units per second.
	pub speed: f64,
	/// Spacing between particles in world units.
	pub spacing: f64,
}

/// Complete scale configuration.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub link: LinkScaleConfig,
	pub ring: RingScaleConfig,
	pub flow: FlowScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 10.0,
					max_screen: f64::INFINITY,
				},
				label_size: 12.0,
				label_min_k: 0.5,
			},
			link: LinkScaleConfig { line_width: 1.0 },
			ring: RingScaleConfig {
				width: 1.5,
				offset: 2.0,
			},
			flow: FlowScaleConfig {
				particle_size: 2.0,
				speed: 60.0,
				spacing: 40.0,
			},
		}
	}
}

/// Pre-computed world-space values for one zoom level; build once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	/// Label font shorthand (e.g. "12px sans-serif").
	pub label_font: String,
	pub link_width: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
	pub flow_size: f64,
	hit_behavior: ScaleBehavior,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		Self {
			k,
			label_font: format!("{label_font_size}px sans-serif"),
			link_width: config.link.line_width / k,
			ring_width: config.ring.width / k,
			ring_offset: config.ring.offset / k,
			flow_size: config.flow.particle_size / k,
			hit_behavior: config.node.hit_behavior.clone(),
		}
	}

	/// World-space hit radius for a node with the given drawn radius.
	pub fn hit_radius(&self, node_radius: f64) -> f64 {
		self.hit_behavior.apply(node_radius, self.k)
	}
}
