//! The black-hole centerpiece: rotating text rings around an event horizon,
//! tilting after the pointer.
//!
//! While warping the stage shakes and the rings collapse inward. The rings
//! drift against the tilt so they read as a separate layer.

use leptos::ev;
use leptos::prelude::*;
use web_sys::MouseEvent;

/// Stage tilt at the window edge, in degrees.
const TILT_DEG: f64 = 10.0;
/// Ring offset at the window edge, in pixels.
const RING_PARALLAX_PX: f64 = 20.0;
const PERSPECTIVE_PX: f64 = 1200.0;

const RING_OUTER: &str = r##"<svg viewBox="0 0 1000 1000"><path id="ring-path-outer" d="M 500, 500 m -450, 0 a 450,450 0 1,1 900,0 a 450,450 0 1,1 -900,0" fill="none"/><text font-size="32" fill="white"><textPath href="#ring-path-outer" startOffset="0%">WARNING: SINGULARITY DETECTED. SPACE-TIME CONTINUUM COLLAPSING. VOID GOD AZATHOTH MANIFESTING. CONSUMING ALL CREATION.</textPath></text></svg>"##;
const RING_MID: &str = r##"<svg viewBox="0 0 1000 1000"><path id="ring-path-mid" d="M 500, 500 m -325, 0 a 325,325 0 1,1 650,0 a 325,325 0 1,1 -650,0" fill="none"/><text font-size="28" fill="#d0f"><textPath href="#ring-path-mid" startOffset="50%">&lt;&lt; TURN NULL &gt;&gt; &lt;&lt; IMAGINARY SPACE &gt;&gt; &lt;&lt; SOUL CONSUMPTION &gt;&gt; &lt;&lt; TRUE DRAGON RELEASE &gt;&gt;</textPath></text></svg>"##;
const RING_INNER: &str = r##"<svg viewBox="0 0 1000 1000"><circle cx="500" cy="500" r="225" fill="none" stroke="cyan" stroke-width="2" stroke-dasharray="10 10" opacity="0.5"/></svg>"##;

/// Pointer position relative to the window center, `-1..=1` on each axis
/// while the pointer is inside the window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gaze {
	/// Negative left of center.
	pub dx: f64,
	/// Negative above center.
	pub dy: f64,
}

impl Gaze {
	/// Gaze for a pointer at `(x, y)` in a `width`×`height` window.
	pub fn from_pointer(x: f64, y: f64, width: f64, height: f64) -> Self {
		let (cx, cy) = (width / 2.0, height / 2.0);
		if cx <= 0.0 || cy <= 0.0 {
			return Self::default();
		}
		Self {
			dx: (x - cx) / cx,
			dy: (y - cy) / cy,
		}
	}

	/// CSS transform turning the stage toward the pointer.
	pub fn stage_transform(self) -> String {
		format!(
			"perspective({}px) rotateY({}deg) rotateX({}deg)",
			PERSPECTIVE_PX,
			self.dx * TILT_DEG,
			-self.dy * TILT_DEG
		)
	}

	/// Ring margins `(left, top)` in pixels, opposite to the pointer.
	pub fn ring_offset(self) -> (f64, f64) {
		(-self.dx * RING_PARALLAX_PX, -self.dy * RING_PARALLAX_PX)
	}
}

/// Ring transform and opacity: collapsed and dimmed while warping.
pub fn ring_pose(warping: bool) -> (&'static str, &'static str) {
	if warping {
		("scale(0.5) rotate(180deg)", "0.5")
	} else {
		("scale(1)", "1")
	}
}

/// Stage holding the rings and the event horizon, with `children` at its core.
#[component]
pub fn SingularityCore(#[prop(into)] warping: Signal<bool>, children: Children) -> impl IntoView {
	let gaze = RwSignal::new(Gaze::default());

	let listener = window_event_listener(ev::mousemove, move |ev: MouseEvent| {
		let Some(window) = web_sys::window() else {
			return;
		};
		let size = window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.zip(window.inner_height().ok().and_then(|h| h.as_f64()));
		if let Some((w, h)) = size {
			gaze.set(Gaze::from_pointer(
				ev.client_x() as f64,
				ev.client_y() as f64,
				w,
				h,
			));
		}
	});
	on_cleanup(move || listener.remove());

	view! {
		<div
			class="singularity-stage"
			class:shaking=move || warping.get()
			style:transform=move || gaze.get().stage_transform()
		>
			<div
				class="rings-group"
				style:transform=move || ring_pose(warping.get()).0
				style:opacity=move || ring_pose(warping.get()).1
				style:margin-left=move || format!("{}px", gaze.get().ring_offset().0)
				style:margin-top=move || format!("{}px", gaze.get().ring_offset().1)
			>
				<div class="ring-outer" inner_html=RING_OUTER></div>
				<div class="ring-mid" inner_html=RING_MID></div>
				<div class="ring-inner" inner_html=RING_INNER></div>
			</div>

			<div class="black-hole-core">
				<div class="accretion-disk"></div>
				<div class="event-horizon"></div>
				{children()}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use approx::assert_relative_eq;

	use super::*;

	#[test]
	fn gaze_is_relative_to_window_center() {
		let g = Gaze::from_pointer(1200.0, 150.0, 1600.0, 1200.0);
		assert_relative_eq!(g.dx, 0.5);
		assert_relative_eq!(g.dy, -0.75);
		assert_eq!(Gaze::from_pointer(800.0, 600.0, 1600.0, 1200.0), Gaze::default());
	}

	#[test]
	fn empty_window_has_no_gaze() {
		assert_eq!(Gaze::from_pointer(10.0, 10.0, 0.0, 0.0), Gaze::default());
	}

	#[test]
	fn stage_tilts_toward_pointer() {
		let g = Gaze { dx: 0.5, dy: -0.25 };
		assert_eq!(
			g.stage_transform(),
			"perspective(1200px) rotateY(5deg) rotateX(2.5deg)"
		);
	}

	#[test]
	fn rings_drift_against_the_tilt() {
		let (left, top) = Gaze { dx: 0.5, dy: -0.25 }.ring_offset();
		assert_relative_eq!(left, -10.0);
		assert_relative_eq!(top, 5.0);
	}

	#[test]
	fn rings_collapse_while_warping() {
		assert_eq!(ring_pose(true), ("scale(0.5) rotate(180deg)", "0.5"));
		assert_eq!(ring_pose(false), ("scale(1)", "1"));
	}
}
