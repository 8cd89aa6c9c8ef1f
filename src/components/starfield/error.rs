//! Error types for starfield construction and configuration.

/// Reasons a configuration is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The JSON itself is malformed or has wrongly typed fields.
	#[error("failed to parse starfield config: {0}")]
	Parse(#[from] serde_json::Error),

	/// `poolSize` is zero.
	#[error("poolSize must be greater than zero")]
	EmptyPool,

	/// A numeric option is NaN or infinite.
	#[error("{field} must be a finite number")]
	NotFinite {
		/// camelCase option name.
		field: &'static str,
	},

	/// A numeric option lies outside its allowed range.
	#[error("{field} = {value} is out of range, expected {expected}")]
	OutOfRange {
		/// camelCase option name.
		field: &'static str,
		/// Rejected value.
		value: f64,
		/// Human-readable allowed range.
		expected: &'static str,
	},
}

/// Errors raised while setting up a starfield.
///
/// Ticking and rendering never fail; everything that can go wrong happens
/// before the first frame.
#[derive(Debug, thiserror::Error)]
pub enum StarfieldError {
	/// The canvas could not provide a 2d context.
	#[error("2d drawing surface unavailable: {0}")]
	SurfaceUnavailable(String),

	/// Width or height is zero, negative or non-finite.
	#[error("viewport must have positive finite size, got {width}x{height}")]
	InvalidViewport {
		/// Requested width.
		width: f64,
		/// Requested height.
		height: f64,
	},

	/// The supplied config failed validation.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
