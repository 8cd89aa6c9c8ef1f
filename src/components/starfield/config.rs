//! Tuning options for the starfield simulation.

use serde::Deserialize;

use super::error::ConfigError;

/// Construction-time options. Every field has a default, so any subset may be
/// given as camelCase JSON (e.g. `{"poolSize": 500, "warpCap": 60}`).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StarfieldConfig {
	/// Number of stars in the pool.
	pub pool_size: usize,
	/// Depth decrement applied every tick regardless of charging.
	pub base_speed: f64,
	/// Warp speed gained per tick while charging.
	pub warp_accel: f64,
	/// Multiplicative warp decay per tick while idle.
	pub warp_decay: f64,
	/// Upper bound for warp speed.
	pub warp_cap: f64,
	/// Warp speed above which idle frames still render streaks.
	pub streak_threshold: f64,
	/// Spawn plane size as a multiple of the viewport.
	pub spread: f64,
	/// Far plane. `None` uses the viewport width.
	pub max_depth: Option<f64>,
	/// Per-star speed variance multiplier while charging.
	pub charging_boost: f64,
	/// Per-star speed variance multiplier while idle.
	pub idle_boost: f64,
	/// Alpha of the overlay painted before every frame.
	pub trail_alpha: f64,
}

impl Default for StarfieldConfig {
	fn default() -> Self {
		Self {
			pool_size: 2000,
			base_speed: 2.0,
			warp_accel: 2.0,
			warp_decay: 0.9,
			warp_cap: 100.0,
			streak_threshold: 5.0,
			spread: 3.0,
			max_depth: None,
			charging_boost: 10.0,
			idle_boost: 0.5,
			trail_alpha: 0.4,
		}
	}
}

impl StarfieldConfig {
	/// Parse a config from JSON and validate it.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Check every option against its allowed range.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.pool_size == 0 {
			return Err(ConfigError::EmptyPool);
		}

		let finite = [
			("baseSpeed", self.base_speed),
			("warpAccel", self.warp_accel),
			("warpDecay", self.warp_decay),
			("warpCap", self.warp_cap),
			("streakThreshold", self.streak_threshold),
			("spread", self.spread),
			("maxDepth", self.max_depth.unwrap_or(f64::MAX)),
			("chargingBoost", self.charging_boost),
			("idleBoost", self.idle_boost),
			("trailAlpha", self.trail_alpha),
		];
		if let Some((field, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
			return Err(ConfigError::NotFinite { field: *field });
		}

		check("baseSpeed", self.base_speed, self.base_speed >= 0.0, ">= 0")?;
		check("warpAccel", self.warp_accel, self.warp_accel > 0.0, "> 0")?;
		check(
			"warpDecay",
			self.warp_decay,
			self.warp_decay > 0.0 && self.warp_decay < 1.0,
			"in (0, 1)",
		)?;
		check("warpCap", self.warp_cap, self.warp_cap > 0.0, "> 0")?;
		check(
			"streakThreshold",
			self.streak_threshold,
			self.streak_threshold >= 0.0,
			">= 0",
		)?;
		check("spread", self.spread, self.spread > 0.0, "> 0")?;
		if let Some(depth) = self.max_depth {
			check("maxDepth", depth, depth > DEPTH_EPSILON, "> 1")?;
		}
		check(
			"chargingBoost",
			self.charging_boost,
			self.charging_boost >= 0.0,
			">= 0",
		)?;
		check("idleBoost", self.idle_boost, self.idle_boost >= 0.0, ">= 0")?;
		check(
			"trailAlpha",
			self.trail_alpha,
			(0.0..=1.0).contains(&self.trail_alpha),
			"in [0, 1]",
		)?;
		Ok(())
	}
}

/// Near plane. Stars at or in front of it are recycled.
pub const DEPTH_EPSILON: f64 = 1.0;

fn check(
	field: &'static str,
	value: f64,
	ok: bool,
	expected: &'static str,
) -> Result<(), ConfigError> {
	if ok {
		Ok(())
	} else {
		Err(ConfigError::OutOfRange {
			field,
			value,
			expected,
		})
	}
}
