//! Canvas rendering for the community graph.
//!
//! Draw order per frame keeps overlapping geometry honest: background, then
//! links, then flow particles, then nodes, then labels, so a node is never
//! hidden behind its own link. Rendering only reads the simulation state; it
//! runs synchronously after each tick on the same thread.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::adapter::CommunityNode;
use super::icon::NodeIcon;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::GraphState;
use super::theme::Theme;

/// Smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	icon: Option<&NodeIcon>,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_links(state, ctx, config, &scale, theme);
	draw_nodes(state, ctx, &scale, theme, icon);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	if theme.background.use_gradient {
		let Ok(gradient) = ctx.create_radial_gradient(
			state.width / 2.0,
			state.height / 2.0,
			0.0,
			state.width / 2.0,
			state.height / 2.0,
			state.width.max(state.height) * 0.8,
		) else {
			ctx.set_fill_style_str(&theme.background.color.to_css());
			ctx.fill_rect(0.0, 0.0, state.width, state.height);
			return;
		};
		let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
		let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&theme.background.color.to_css());
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &GraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let Ok(gradient) = ctx.create_radial_gradient(
		state.width / 2.0,
		state.height / 2.0,
		state.width.min(state.height) * 0.3,
		state.width / 2.0,
		state.height / 2.0,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", theme.background.vignette),
	);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let color = &theme.link.color;

	for (li, link) in state.graph.links.iter().enumerate() {
		let (Some(s), Some(t)) = (
			state.graph.nodes.get(link.source),
			state.graph.nodes.get(link.target),
		) else {
			continue;
		};
		if !s.placed() || !t.placed() {
			continue;
		}
		let (dx, dy) = (t.x - s.x, t.y - s.y);
		let dist = (dx * dx + dy * dy).sqrt();
		// Coincident endpoints have no direction to draw along.
		if dist < 0.001 {
			continue;
		}

		let link_t = smooth_step(state.highlight.link_intensity(link.source, link.target));
		let (alpha_mult, width_mult) = if link_t > 0.01 {
			(1.0 + 0.6 * link_t, 1.0 + 0.5 * link_t)
		} else if max_t > 0.01 {
			(1.0 - (1.0 - theme.link.dim_alpha) * max_t, 1.0)
		} else {
			(1.0, 1.0)
		};

		ctx.set_stroke_style_str(
			&color.with_alpha((color.a * alpha_mult).min(1.0)).to_css(),
		);
		ctx.set_line_width(scale.link_width * width_mult);
		ctx.begin_path();
		ctx.move_to(s.x, s.y);
		ctx.line_to(t.x, t.y);
		ctx.stroke();

		if state.highlight.is_link_highlighted(li) && link_t > 0.01 {
			draw_flow_particles(state, ctx, config, scale, theme, s, t, dist, link_t);
		}
	}
}

/// Animated particles traveling source to target, communicating direction on
/// the hovered node's links.
#[allow(clippy::too_many_arguments)]
fn draw_flow_particles(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
	source: &CommunityNode,
	target: &CommunityNode,
	dist: f64,
	link_t: f64,
) {
	let count = ((dist / config.flow.spacing).ceil() as usize).clamp(1, 24);
	let phase = state.flow_time * config.flow.speed / dist;
	let color = &theme.flow.color;
	ctx.set_fill_style_str(&color.with_alpha(color.a * link_t).to_css());

	for i in 0..count {
		let t = (phase + i as f64 / count as f64).fract();
		let x = source.x + (target.x - source.x) * t;
		let y = source.y + (target.y - source.y) * t;
		ctx.begin_path();
		let _ = ctx.arc(x, y, scale.flow_size, 0.0, 2.0 * PI);
		ctx.fill();
	}
}

fn draw_nodes(
	state: &GraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	icon: Option<&NodeIcon>,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let has_highlight = max_t > 0.01;
	let dim_alpha = 1.0 - (1.0 - theme.node.dim_alpha) * max_t;

	// Pass 1: nodes outside the highlight, dimmed while a hover is active.
	for (idx, node) in state.graph.nodes.iter().enumerate() {
		if !node.placed() {
			continue;
		}
		let node_t = state.highlight.node_intensity(idx);
		if node_t > 0.001 {
			continue;
		}
		let alpha = if has_highlight { dim_alpha } else { 1.0 };
		draw_node(ctx, node, scale, theme, icon, alpha, 1.0, 0.0);
	}

	// Pass 2: highlighted nodes on top, slightly grown, with the hover ring.
	for (idx, node) in state.graph.nodes.iter().enumerate() {
		if !node.placed() {
			continue;
		}
		let node_t = state.highlight.node_intensity(idx);
		if node_t <= 0.001 {
			continue;
		}
		let eased = smooth_step(node_t);
		let hover_t = smooth_step(state.highlight.ring_intensity(idx));

		let alpha = dim_alpha + (1.0 - dim_alpha) * eased;
		let radius_mult = 1.0 + (0.1 + 0.1 * hover_t) * eased;
		draw_node(ctx, node, scale, theme, icon, alpha, radius_mult, hover_t);

		if hover_t > 0.01 {
			let radius = node.radius() * radius_mult;
			let ring = &theme.node.ring_color;
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, radius + scale.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&ring.with_alpha(0.8 * hover_t).to_css());
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();

			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, radius + scale.ring_offset * 2.5, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&ring.with_alpha(0.3 * hover_t).to_css());
			ctx.set_line_width(scale.ring_width * 0.5);
			ctx.stroke();
		}
	}
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &CommunityNode,
	scale: &ScaledValues,
	theme: &Theme,
	icon: Option<&NodeIcon>,
	alpha: f64,
	radius_mult: f64,
	hover_t: f64,
) {
	let radius = node.radius() * radius_mult;
	let (x, y) = (node.x, node.y);

	ctx.set_global_alpha(alpha);

	if let Some(image) = icon.and_then(NodeIcon::ready) {
		// Icon resolved: clip it into the node circle.
		ctx.save();
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.clip();
		let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
			image,
			x - radius,
			y - radius,
			radius * 2.0,
			radius * 2.0,
		);
		ctx.restore();

		if hover_t > 0.0 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(
				&theme.node.hover_fill.with_alpha(hover_t).to_css(),
			);
			ctx.set_line_width(scale.ring_width * 1.5);
			ctx.stroke();
		}
	} else {
		// Fallback: solid circle, blended toward the hover accent.
		let base = theme.node.fill.lerp(theme.node.hover_fill, hover_t);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		if theme.node.use_gradient {
			if let Ok(gradient) =
				ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
			{
				let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
				let _ = gradient.add_color_stop(0.7, &base.to_css());
				let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			} else {
				ctx.set_fill_style_str(&base.to_css());
			}
		} else {
			ctx.set_fill_style_str(&base.to_css());
		}
		ctx.fill();
	}

	if !node.name.is_empty() {
		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&scale.label_font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("bottom");
		let _ = ctx.fill_text(&node.name, x, y - radius - 3.0);
	}

	ctx.set_global_alpha(1.0);
}
