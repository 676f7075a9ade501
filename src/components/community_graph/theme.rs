//! Visual styling for the community graph.

/// RGBA color representation.
#[derive(Clone, Copy, Debug)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white).
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black).
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors.
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Background style.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Secondary color for the radial gradient.
	pub color_secondary: Color,
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none).
	pub vignette: f64,
}

/// Link stroke style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	pub color: Color,
	/// Opacity multiplier for links outside an active highlight.
	pub dim_alpha: f64,
}

/// Node fill and label style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	/// Fill for the hovered node.
	pub hover_fill: Color,
	pub label_color: Color,
	/// Whether node circles get an inner gradient.
	pub use_gradient: bool,
	/// Opacity for nodes outside an active highlight.
	pub dim_alpha: f64,
	/// Hover ring color.
	pub ring_color: Color,
}

/// Directional flow particle style.
#[derive(Clone, Debug)]
pub struct FlowStyle {
	pub color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub link: LinkStyle,
	pub node: NodeStyle,
	pub flow: FlowStyle,
}

impl Theme {
	/// Light theme matching the community pages (default).
	pub fn paper() -> Self {
		Self {
			name: "paper",
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 250),
				color_secondary: Color::rgb(255, 255, 255),
				use_gradient: true,
				vignette: 0.0,
			},
			link: LinkStyle {
				color: Color::rgba(187, 187, 187, 0.5),
				dim_alpha: 0.1,
			},
			node: NodeStyle {
				fill: Color::rgb(31, 120, 180),
				hover_fill: Color::rgb(255, 143, 0),
				label_color: Color::rgb(51, 51, 51),
				use_gradient: true,
				dim_alpha: 0.1,
				ring_color: Color::rgb(255, 143, 0),
			},
			flow: FlowStyle {
				color: Color::rgba(255, 143, 0, 0.9),
			},
		}
	}

	/// Dark variant for embedding on dark pages.
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				color_secondary: Color::rgb(25, 28, 38),
				use_gradient: true,
				vignette: 0.2,
			},
			link: LinkStyle {
				color: Color::rgba(100, 120, 150, 0.45),
				dim_alpha: 0.1,
			},
			node: NodeStyle {
				fill: Color::rgb(94, 129, 172),
				hover_fill: Color::rgb(235, 160, 60),
				label_color: Color::rgb(220, 225, 232),
				use_gradient: true,
				dim_alpha: 0.1,
				ring_color: Color::rgb(255, 255, 255),
			},
			flow: FlowStyle {
				color: Color::rgba(235, 160, 60, 0.9),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::paper()
	}
}
