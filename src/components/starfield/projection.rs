//! Viewport geometry and perspective projection.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: `(x, y, z)` with the view axis along `z`. Stars live on
//!   planes perpendicular to it and move toward the viewer by decreasing `z`.
//! - **Screen-space**: canvas pixels, origin top-left.
//!
//! A star at depth `z` is scaled by `fov / z`, so halving the depth doubles its
//! distance from the center and its drawn size.

use super::error::StarfieldError;

/// Size of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Pixels.
	pub width: f64,
	/// Pixels.
	pub height: f64,
}

impl Viewport {
	/// Rejects zero, negative or non-finite sizes.
	pub fn new(width: f64, height: f64) -> Result<Self, StarfieldError> {
		if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
			Ok(Self { width, height })
		} else {
			Err(StarfieldError::InvalidViewport { width, height })
		}
	}

	/// Screen point the view axis passes through.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Focal length of the perspective transform.
	pub fn field_of_view(&self) -> f64 {
		self.height
	}

	/// Whether a screen point lies inside the viewport grown by `margin` on every side.
	pub fn contains(&self, sx: f64, sy: f64, margin: f64) -> bool {
		sx > -margin && sx < self.width + margin && sy > -margin && sy < self.height + margin
	}

	/// Project a world point to the screen.
	pub fn project(&self, x: f64, y: f64, z: f64) -> Projected {
		let scale = self.field_of_view() / z;
		let (cx, cy) = self.center();
		Projected {
			x: x * scale + cx,
			y: y * scale + cy,
			scale,
		}
	}
}

/// A star's position on screen plus the perspective scale used to size it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	/// Screen-space x.
	pub x: f64,
	/// Screen-space y.
	pub y: f64,
	/// `fov / z`, used for drawn size.
	pub scale: f64,
}
