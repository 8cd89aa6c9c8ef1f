//! Star particles and their spawn distribution.

use rand::Rng;

/// Smallest star weight.
pub const SIZE_MIN: f64 = 0.5;
/// Largest star weight.
pub const SIZE_MAX: f64 = 2.0;

/// A single star.
///
/// Stars are anonymous: the pool never reorders them, and a recycled star is
/// indistinguishable from a fresh one apart from its fixed `size` and
/// `speed_factor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
	/// Lateral world position.
	pub x: f64,
	/// Vertical world position.
	pub y: f64,
	/// Depth, always in `(0, max_depth]`.
	pub z: f64,
	/// Drawing weight in `[SIZE_MIN, SIZE_MAX]`.
	pub size: f64,
	/// Per-star velocity variance in `[0, 1)`.
	pub speed_factor: f64,
}

/// Rectangle on the spawn plane, centered on the view axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnBounds {
	/// Half extent along `x`.
	pub half_width: f64,
	/// Half extent along `y`.
	pub half_height: f64,
}

impl SpawnBounds {
	/// Spawn plane `spread` times larger than the viewport, so stars start
	/// off-screen and drift into view.
	pub fn new(view_width: f64, view_height: f64, spread: f64) -> Self {
		Self {
			half_width: spread * view_width / 2.0,
			half_height: spread * view_height / 2.0,
		}
	}

	/// Inclusive on every edge.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		x.abs() <= self.half_width && y.abs() <= self.half_height
	}

	/// Uniform lateral position inside the bounds.
	pub fn sample<R: Rng>(&self, rng: &mut R) -> (f64, f64) {
		let x = (rng.r#gen::<f64>() - 0.5) * 2.0 * self.half_width;
		let y = (rng.r#gen::<f64>() - 0.5) * 2.0 * self.half_height;
		(x, y)
	}
}

/// Uniform depth in `(0, max_depth]`.
pub fn sample_depth<R: Rng>(rng: &mut R, max_depth: f64) -> f64 {
	max_depth * (1.0 - rng.r#gen::<f64>())
}

impl Particle {
	/// Draw a fresh star with every attribute random.
	pub fn spawn<R: Rng>(rng: &mut R, bounds: &SpawnBounds, max_depth: f64) -> Self {
		let (x, y) = bounds.sample(rng);
		Self {
			x,
			y,
			z: sample_depth(rng, max_depth),
			size: rng.gen_range(SIZE_MIN..=SIZE_MAX),
			speed_factor: rng.r#gen::<f64>(),
		}
	}

	/// Send the star back to the far plane at a new lateral position.
	pub fn recycle<R: Rng>(&mut self, rng: &mut R, bounds: &SpawnBounds, max_depth: f64) {
		let (x, y) = bounds.sample(rng);
		self.x = x;
		self.y = y;
		self.z = max_depth;
	}

	/// Depth lost this tick.
	pub fn depth_step(&self, base_speed: f64, warp_speed: f64, boost: f64) -> f64 {
		base_speed + warp_speed + self.speed_factor * boost
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn spawned_attributes_stay_in_range() {
		let mut rng = SmallRng::seed_from_u64(7);
		let bounds = SpawnBounds::new(800.0, 600.0, 3.0);
		for _ in 0..5000 {
			let p = Particle::spawn(&mut rng, &bounds, 800.0);
			assert!(bounds.contains(p.x, p.y));
			assert!(p.z > 0.0 && p.z <= 800.0);
			assert!((SIZE_MIN..=SIZE_MAX).contains(&p.size));
			assert!((0.0..1.0).contains(&p.speed_factor));
		}
	}

	#[test]
	fn spawn_bounds_scale_with_spread() {
		let bounds = SpawnBounds::new(800.0, 600.0, 3.0);
		assert_eq!(bounds.half_width, 1200.0);
		assert_eq!(bounds.half_height, 900.0);
		assert!(bounds.contains(-1200.0, 900.0));
		assert!(!bounds.contains(1200.1, 0.0));
	}

	#[test]
	fn recycle_keeps_size_and_speed_factor() {
		let mut rng = SmallRng::seed_from_u64(1);
		let bounds = SpawnBounds::new(100.0, 100.0, 2.0);
		let mut p = Particle {
			x: 5.0,
			y: 5.0,
			z: 0.5,
			size: 1.25,
			speed_factor: 0.75,
		};
		p.recycle(&mut rng, &bounds, 300.0);
		assert_eq!(p.z, 300.0);
		assert_eq!(p.size, 1.25);
		assert_eq!(p.speed_factor, 0.75);
		assert!(bounds.contains(p.x, p.y));
	}

	#[test]
	fn depth_step_adds_variance() {
		let p = Particle {
			x: 0.0,
			y: 0.0,
			z: 10.0,
			size: 1.0,
			speed_factor: 0.5,
		};
		assert_eq!(p.depth_step(2.0, 4.0, 10.0), 11.0);
		assert_eq!(p.depth_step(2.0, 0.0, 0.5), 2.25);
	}
}
