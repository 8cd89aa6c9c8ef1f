//! Immediate-mode drawing of the starfield.
//!
//! Each frame:
//! 1. A translucent overlay fades the previous frame, leaving motion trails
//! 2. Every visible star is drawn as a dot (cruising) or a streak pointing at
//!    the view center (warping)
//!
//! Drawing goes through [`Surface`], implemented for the browser's
//! `CanvasRenderingContext2d`, so frames can also be captured off-screen.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::Starfield;
use super::theme::Theme;

/// The three primitives a starfield frame needs.
pub trait Surface {
	/// Fill an axis-aligned rectangle with a CSS color.
	fn fill_rect(&mut self, color: &str, x: f64, y: f64, width: f64, height: f64);
	/// Stroke a single line segment.
	fn stroke_line(&mut self, color: &str, width: f64, from: (f64, f64), to: (f64, f64));
	/// Fill a full circle.
	fn fill_circle(&mut self, color: &str, x: f64, y: f64, radius: f64);
}

impl Surface for CanvasRenderingContext2d {
	fn fill_rect(&mut self, color: &str, x: f64, y: f64, width: f64, height: f64) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
	}

	fn stroke_line(&mut self, color: &str, width: f64, from: (f64, f64), to: (f64, f64)) {
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn fill_circle(&mut self, color: &str, x: f64, y: f64, radius: f64) {
		self.set_fill_style_str(color);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.fill();
	}
}

/// What a frame ended up drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
	/// Stars that produced a draw call.
	pub drawn: usize,
	/// Stars skipped for lying outside the visible area.
	pub culled: usize,
}

/// Renders the current state of `field` onto `surface`.
pub fn render<S: Surface>(field: &Starfield, surface: &mut S, theme: &Theme) -> FrameStats {
	let viewport = field.viewport();
	surface.fill_rect(
		&theme.trail_fade.to_css(),
		0.0,
		0.0,
		viewport.width,
		viewport.height,
	);

	if field.is_streaking() {
		draw_streaks(field, surface, theme)
	} else {
		draw_points(field, surface, theme)
	}
}

fn draw_points<S: Surface>(field: &Starfield, surface: &mut S, theme: &Theme) -> FrameStats {
	let viewport = field.viewport();
	let color = theme.star.to_css();
	let mut stats = FrameStats::default();

	for p in field.particles() {
		let s = viewport.project(p.x, p.y, p.z);
		if !viewport.contains(s.x, s.y, 0.0) {
			stats.culled += 1;
			continue;
		}
		surface.fill_circle(&color, s.x, s.y, p.size * s.scale * 0.5);
		stats.drawn += 1;
	}
	stats
}

fn draw_streaks<S: Surface>(field: &Starfield, surface: &mut S, theme: &Theme) -> FrameStats {
	let viewport = field.viewport();
	let (cx, cy) = viewport.center();
	let max_depth = field.max_depth();
	let stretch = 1.0 + field.state().warp_speed * theme.streak_stretch;
	let mut stats = FrameStats::default();

	for p in field.particles() {
		let s = viewport.project(p.x, p.y, p.z);
		if !viewport.contains(s.x, s.y, theme.streak_margin) {
			stats.culled += 1;
			continue;
		}

		let (dx, dy) = (s.x - cx, s.y - cy);
		let dist = (dx * dx + dy * dy).sqrt();
		let tail = if dist > f64::EPSILON {
			let len = dist * theme.streak_length * stretch;
			(s.x - dx / dist * len, s.y - dy / dist * len)
		} else {
			(s.x, s.y)
		};

		let alpha = (1.0 - p.z / max_depth).max(0.0);
		surface.stroke_line(
			&theme.streak.with_alpha(alpha).to_css(),
			p.size * s.scale * 0.5,
			(s.x, s.y),
			tail,
		);
		stats.drawn += 1;
	}
	stats
}
