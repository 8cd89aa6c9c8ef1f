//! Starfield simulation state and per-tick physics.
//!
//! The shared warp speed lives in a small `Copy` value, [`SimulationState`],
//! whose [`advance`](SimulationState::advance) is a pure function of its
//! inputs. [`Starfield`] owns that state together with the particle pool and
//! applies one physics step per animation frame. Drawing lives in `render`
//! and only ever reads from here.

use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::config::{DEPTH_EPSILON, StarfieldConfig};
use super::error::StarfieldError;
use super::particles::{Particle, SpawnBounds, sample_depth};
use super::projection::Viewport;

/// Warp speed below which an idle drive snaps to rest.
const REST_THRESHOLD: f64 = 0.1;

/// Logical mode, chosen directly by the activation input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
	/// Input released. Stars drift as dots unless warp is still coasting.
	Cruising,
	/// Input held.
	Warping,
}

/// Inertia parameters for the warp drive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpParams {
	/// Added per charging tick.
	pub accel: f64,
	/// Multiplier per idle tick.
	pub decay: f64,
	/// Upper bound.
	pub cap: f64,
}

impl From<&StarfieldConfig> for WarpParams {
	fn from(config: &StarfieldConfig) -> Self {
		Self {
			accel: config.warp_accel,
			decay: config.warp_decay,
			cap: config.warp_cap,
		}
	}
}

/// State shared by every star in a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationState {
	/// Extra depth velocity from charging, in `[0, cap]`.
	pub warp_speed: f64,
	/// Activation input seen by the most recent tick.
	pub is_charging: bool,
}

impl SimulationState {
	/// Next warp state.
	///
	/// Charging ramps linearly up to the cap. Idle decays geometrically and
	/// snaps to exactly zero once below the rest threshold, so it never
	/// oscillates or goes negative.
	pub fn advance(self, is_charging: bool, params: &WarpParams) -> Self {
		let warp_speed = if is_charging {
			(self.warp_speed + params.accel).min(params.cap)
		} else if self.warp_speed > REST_THRESHOLD {
			self.warp_speed * params.decay
		} else {
			0.0
		};
		Self {
			warp_speed,
			is_charging,
		}
	}

	/// Mode for the input seen by the last tick.
	pub fn mode(&self) -> Mode {
		if self.is_charging {
			Mode::Warping
		} else {
			Mode::Cruising
		}
	}

	/// Streaks are drawn while charging and while still coasting above `threshold`.
	pub fn is_streaking(&self, threshold: f64) -> bool {
		self.is_charging || self.warp_speed > threshold
	}
}

/// A fixed-size pool of stars flying toward the viewer.
///
/// Created once when the view mounts. The pool size is fixed for the
/// lifetime of the value: ticks, resizes and big bangs only move stars.
pub struct Starfield {
	particles: Vec<Particle>,
	state: SimulationState,
	warp: WarpParams,
	viewport: Viewport,
	config: StarfieldConfig,
	rng: SmallRng,
}

impl Starfield {
	/// Build a pool of `config.pool_size` random stars seeded from system entropy.
	pub fn new(config: StarfieldConfig, viewport: Viewport) -> Result<Self, StarfieldError> {
		Self::with_rng(config, viewport, SmallRng::from_entropy())
	}

	/// Build a pool with a caller-supplied random source.
	pub fn with_rng(
		config: StarfieldConfig,
		viewport: Viewport,
		mut rng: SmallRng,
	) -> Result<Self, StarfieldError> {
		config.validate()?;
		let max_depth = max_depth(&config, &viewport);
		let bounds = SpawnBounds::new(viewport.width, viewport.height, config.spread);
		let particles = (0..config.pool_size)
			.map(|_| Particle::spawn(&mut rng, &bounds, max_depth))
			.collect();

		info!(
			"azathoth: starfield created with {} stars ({}x{})",
			config.pool_size, viewport.width, viewport.height
		);
		Ok(Self::assemble(config, viewport, particles, rng))
	}

	/// Build a pool from explicit stars. The pool size becomes `particles.len()`.
	pub fn from_particles(
		mut config: StarfieldConfig,
		viewport: Viewport,
		particles: Vec<Particle>,
		rng: SmallRng,
	) -> Result<Self, StarfieldError> {
		config.pool_size = particles.len();
		config.validate()?;
		Ok(Self::assemble(config, viewport, particles, rng))
	}

	fn assemble(
		config: StarfieldConfig,
		viewport: Viewport,
		particles: Vec<Particle>,
		rng: SmallRng,
	) -> Self {
		Self {
			particles,
			state: SimulationState::default(),
			warp: WarpParams::from(&config),
			viewport,
			config,
			rng,
		}
	}

	/// The star pool, in a stable order.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Warp state after the most recent tick.
	pub fn state(&self) -> SimulationState {
		self.state
	}

	/// Current drawing surface size.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Options the field was built with.
	pub fn config(&self) -> &StarfieldConfig {
		&self.config
	}

	/// Far plane that recycled stars return to.
	pub fn max_depth(&self) -> f64 {
		max_depth(&self.config, &self.viewport)
	}

	/// Lateral region recycled stars are placed in.
	pub fn spawn_bounds(&self) -> SpawnBounds {
		SpawnBounds::new(self.viewport.width, self.viewport.height, self.config.spread)
	}

	/// Mode chosen by the input seen on the last tick.
	pub fn mode(&self) -> Mode {
		self.state.mode()
	}

	/// Whether the next frame draws streaks instead of dots.
	pub fn is_streaking(&self) -> bool {
		self.state.is_streaking(self.config.streak_threshold)
	}

	/// Advance the simulation by one animation frame.
	///
	/// Steps are per frame rather than per second; `dt_hint` is only traced.
	pub fn advance(&mut self, is_charging: bool, dt_hint: f64) {
		self.state = self.state.advance(is_charging, &self.warp);
		trace!(
			"azathoth: tick dt={:.4} warp={:.2} charging={}",
			dt_hint, self.state.warp_speed, is_charging
		);

		let boost = if is_charging {
			self.config.charging_boost
		} else {
			self.config.idle_boost
		};
		let max_depth = self.max_depth();
		let bounds = self.spawn_bounds();
		let (base_speed, warp_speed) = (self.config.base_speed, self.state.warp_speed);

		for p in &mut self.particles {
			p.z -= p.depth_step(base_speed, warp_speed, boost);
			if p.z <= DEPTH_EPSILON {
				p.recycle(&mut self.rng, &bounds, max_depth);
			}
		}
	}

	/// Follow a viewport size change without growing or shrinking the pool.
	///
	/// If the far plane follows the viewport and moves closer, every depth is
	/// scaled by the same ratio so the field keeps its distribution inside the
	/// new `(0, max_depth]`. Returns `false` and keeps the old viewport if the
	/// new size is degenerate (e.g. a minimized window).
	pub fn resize(&mut self, width: f64, height: f64) -> bool {
		match Viewport::new(width, height) {
			Ok(viewport) => {
				let old_depth = self.max_depth();
				self.viewport = viewport;
				let new_depth = self.max_depth();
				if new_depth < old_depth {
					let ratio = new_depth / old_depth;
					for p in &mut self.particles {
						p.z = (p.z * ratio).min(new_depth);
					}
				}
				debug!("azathoth: starfield resized to {}x{}", width, height);
				true
			}
			Err(e) => {
				debug!("azathoth: ignoring resize: {}", e);
				false
			}
		}
	}

	/// Scatter every star to a fresh random depth.
	pub fn big_bang(&mut self) {
		let max_depth = self.max_depth();
		for p in &mut self.particles {
			p.z = sample_depth(&mut self.rng, max_depth);
		}
		debug!("azathoth: big bang over {} stars", self.particles.len());
	}
}

fn max_depth(config: &StarfieldConfig, viewport: &Viewport) -> f64 {
	config.max_depth.unwrap_or(viewport.width)
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use super::*;

	fn defaults() -> WarpParams {
		WarpParams::from(&StarfieldConfig::default())
	}

	fn seeded(config: StarfieldConfig, width: f64, height: f64) -> Starfield {
		Starfield::with_rng(
			config,
			Viewport::new(width, height).unwrap(),
			SmallRng::seed_from_u64(42),
		)
		.unwrap()
	}

	fn lone_star(max_depth: Option<f64>) -> Starfield {
		let config = StarfieldConfig {
			max_depth,
			..Default::default()
		};
		let star = Particle {
			x: 0.0,
			y: 0.0,
			z: 400.0,
			size: 1.0,
			speed_factor: 0.0,
		};
		Starfield::from_particles(
			config,
			Viewport::new(800.0, 600.0).unwrap(),
			vec![star],
			SmallRng::seed_from_u64(3),
		)
		.unwrap()
	}

	#[test]
	fn warp_reaches_cap_within_expected_ticks() {
		let params = defaults();
		let mut s = SimulationState::default();
		let expected = (params.cap / params.accel).ceil() as usize;
		for i in 1..=expected {
			let next = s.advance(true, &params);
			assert!(next.warp_speed >= s.warp_speed);
			s = next;
			if i < expected {
				assert!(s.warp_speed < params.cap);
			}
		}
		assert_eq!(s.warp_speed, params.cap);
		assert_eq!(s.advance(true, &params).warp_speed, params.cap);
	}

	#[test]
	fn warp_never_overshoots_uneven_cap() {
		let params = WarpParams {
			accel: 3.0,
			decay: 0.9,
			cap: 10.0,
		};
		let mut s = SimulationState::default();
		for _ in 0..10 {
			s = s.advance(true, &params);
			assert!(s.warp_speed <= 10.0);
		}
		assert_eq!(s.warp_speed, 10.0);
	}

	#[test]
	fn idle_warp_decays_strictly_to_exact_zero() {
		let params = defaults();
		let mut s = SimulationState {
			warp_speed: 100.0,
			is_charging: false,
		};
		let mut reached_zero = false;
		for _ in 0..200 {
			let next = s.advance(false, &params);
			assert!(next.warp_speed >= 0.0);
			if s.warp_speed > 0.0 {
				assert!(next.warp_speed < s.warp_speed);
			} else {
				assert_eq!(next.warp_speed, 0.0);
			}
			reached_zero |= next.warp_speed == 0.0;
			s = next;
		}
		assert!(reached_zero);
		assert_eq!(s.warp_speed, 0.0);
	}

	#[test]
	fn mode_follows_input_instantly() {
		let params = defaults();
		let s = SimulationState::default().advance(true, &params);
		assert_eq!(s.mode(), Mode::Warping);
		let s = s.advance(false, &params);
		assert_eq!(s.mode(), Mode::Cruising);
		assert!(s.warp_speed > 0.0);
	}

	#[test]
	fn streaks_persist_while_coasting() {
		let s = SimulationState {
			warp_speed: 20.0,
			is_charging: false,
		};
		assert!(s.is_streaking(5.0));
		assert!(!SimulationState::default().is_streaking(5.0));
	}

	#[test]
	fn single_charging_tick_moves_lone_star() {
		let mut field = lone_star(None);
		field.advance(true, 0.016);
		assert_eq!(field.state().warp_speed, 2.0);
		assert_relative_eq!(field.particles()[0].z, 396.0);
	}

	#[test]
	fn lone_star_recycles_to_far_plane() {
		let mut field = lone_star(Some(400.0));
		let mut recycled_on = None;
		for tick in 1..=100 {
			let before = field.particles()[0].z;
			field.advance(true, 0.016);
			let after = field.particles()[0].z;
			if after > before {
				let star = field.particles()[0];
				assert_eq!(after, 400.0);
				assert!(field.spawn_bounds().contains(star.x, star.y));
				recycled_on = Some(tick);
				break;
			}
			assert!(after > DEPTH_EPSILON);
		}
		// Cumulative step after n ticks is 2n + n(n + 1); it first passes 399 at n = 19.
		assert_eq!(recycled_on, Some(19));
	}

	#[test]
	fn depth_stays_positive_under_any_input() {
		let mut field = seeded(StarfieldConfig::default(), 1280.0, 720.0);
		for tick in 0..600 {
			let charging = (tick / 90) % 2 == 0;
			field.advance(charging, 0.016);
			let max_depth = field.max_depth();
			for p in field.particles() {
				assert!(p.z > 0.0 && p.z <= max_depth);
			}
			let warp = field.state().warp_speed;
			assert!((0.0..=100.0).contains(&warp));
		}
	}

	#[test]
	fn recycled_stars_land_inside_spawn_bounds() {
		let mut field = seeded(
			StarfieldConfig {
				pool_size: 300,
				..Default::default()
			},
			640.0,
			480.0,
		);
		for _ in 0..200 {
			let before: Vec<f64> = field.particles().iter().map(|p| p.z).collect();
			field.advance(true, 0.016);
			let bounds = field.spawn_bounds();
			for (p, z) in field.particles().iter().zip(before) {
				if p.z > z {
					assert_eq!(p.z, field.max_depth());
					assert!(bounds.contains(p.x, p.y));
				}
			}
		}
	}

	#[test]
	fn pool_size_never_changes() {
		let mut field = seeded(StarfieldConfig::default(), 800.0, 600.0);
		assert_eq!(field.particles().len(), 2000);
		for i in 0..100 {
			field.advance(i % 3 == 0, 0.016);
		}
		field.resize(1920.0, 1080.0);
		field.big_bang();
		field.advance(true, 0.016);
		assert_eq!(field.particles().len(), 2000);
	}

	#[test]
	fn resize_updates_projection_without_reinitializing() {
		let mut field = seeded(
			StarfieldConfig {
				pool_size: 50,
				..Default::default()
			},
			800.0,
			600.0,
		);
		let before = field.particles().to_vec();
		assert!(field.resize(1024.0, 768.0));
		assert_eq!(field.particles(), &before[..]);
		assert_eq!(field.viewport().center(), (512.0, 384.0));
		assert_eq!(field.max_depth(), 1024.0);
	}

	#[test]
	fn shrinking_keeps_depths_inside_the_far_plane() {
		let mut field = seeded(StarfieldConfig::default(), 1920.0, 1080.0);
		let before = field.particles().to_vec();
		assert!(field.resize(800.0, 600.0));
		assert_eq!(field.max_depth(), 800.0);
		assert_eq!(field.particles().len(), before.len());

		for (a, b) in before.iter().zip(field.particles()) {
			assert!(b.z > 0.0 && b.z <= 800.0);
			assert_relative_eq!(b.z, a.z * 800.0 / 1920.0, epsilon = 1e-9);
			assert_eq!((a.x, a.y, a.size, a.speed_factor), (b.x, b.y, b.size, b.speed_factor));
		}

		for tick in 0..120 {
			field.advance(tick < 60, 0.016);
			for p in field.particles() {
				assert!(p.z > 0.0 && p.z <= 800.0);
			}
		}
	}

	#[test]
	fn configured_far_plane_is_unaffected_by_resize() {
		let mut field = seeded(
			StarfieldConfig {
				pool_size: 100,
				max_depth: Some(500.0),
				..Default::default()
			},
			1920.0,
			1080.0,
		);
		let before = field.particles().to_vec();
		assert!(field.resize(640.0, 480.0));
		assert_eq!(field.max_depth(), 500.0);
		assert_eq!(field.particles(), &before[..]);
	}

	#[test]
	fn degenerate_resize_is_ignored() {
		let mut field = seeded(
			StarfieldConfig {
				pool_size: 10,
				..Default::default()
			},
			800.0,
			600.0,
		);
		assert!(!field.resize(0.0, 0.0));
		assert_eq!(field.viewport(), Viewport::new(800.0, 600.0).unwrap());
	}

	#[test]
	fn big_bang_only_moves_depths() {
		let mut field = seeded(
			StarfieldConfig {
				pool_size: 200,
				..Default::default()
			},
			800.0,
			600.0,
		);
		for _ in 0..10 {
			field.advance(true, 0.016);
		}
		let warp = field.state().warp_speed;
		let before = field.particles().to_vec();
		field.big_bang();
		assert_eq!(field.state().warp_speed, warp);
		let mut moved = 0;
		for (a, b) in before.iter().zip(field.particles()) {
			assert_eq!((a.x, a.y, a.size, a.speed_factor), (b.x, b.y, b.size, b.speed_factor));
			assert!(b.z > 0.0 && b.z <= 800.0);
			moved += usize::from(a.z != b.z);
		}
		assert!(moved > 0);
	}

	#[test]
	fn invalid_config_is_rejected() {
		let result = Starfield::with_rng(
			StarfieldConfig {
				pool_size: 0,
				..Default::default()
			},
			Viewport::new(800.0, 600.0).unwrap(),
			SmallRng::seed_from_u64(0),
		);
		assert!(matches!(result, Err(StarfieldError::Config(_))));
	}
}
