//! Colors and visual style for the starfield.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha in `[0, 1]`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, different alpha.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// `#rrggbb` when opaque, `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Complete visual style of the starfield.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Overlay painted over the previous frame. Its alpha controls trail length.
	pub trail_fade: Color,
	/// Fill color for cruising stars.
	pub star: Color,
	/// Stroke color for warp streaks. Alpha is replaced per star by depth.
	pub streak: Color,
	/// Streak length as a fraction of the star's distance from the view center.
	pub streak_length: f64,
	/// Extra streak stretch per unit of warp speed.
	pub streak_stretch: f64,
	/// Screen-space margin (pixels) kept around the viewport when culling streaks.
	pub streak_margin: f64,
}

impl Theme {
	/// The theme used by the hero screen.
	pub fn void() -> Self {
		Self {
			trail_fade: Color::rgba(0, 0, 0, 0.4),
			star: Color::rgb(255, 255, 255),
			streak: Color::rgb(200, 200, 255),
			streak_length: 0.1,
			streak_stretch: 0.05,
			streak_margin: 100.0,
		}
	}

	/// Same theme with a different trail-fade alpha.
	pub fn with_trail_alpha(self, alpha: f64) -> Self {
		Self {
			trail_fade: self.trail_fade.with_alpha(alpha),
			..self
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::void()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_colors_render_as_hex() {
		assert_eq!(Color::rgb(255, 255, 255).to_css(), "#ffffff");
		assert_eq!(Color::rgb(200, 200, 255).to_css(), "#c8c8ff");
	}

	#[test]
	fn translucent_colors_render_as_rgba() {
		assert_eq!(Color::rgba(0, 0, 0, 0.4).to_css(), "rgba(0, 0, 0, 0.4)");
		assert_eq!(
			Color::rgb(200, 200, 255).with_alpha(0.5).to_css(),
			"rgba(200, 200, 255, 0.5)"
		);
	}

	#[test]
	fn trail_alpha_override_keeps_other_fields() {
		let theme = Theme::void().with_trail_alpha(0.25);
		assert_eq!(theme.trail_fade, Color::rgba(0, 0, 0, 0.25));
		assert_eq!(theme.streak, Color::rgb(200, 200, 255));
	}
}
