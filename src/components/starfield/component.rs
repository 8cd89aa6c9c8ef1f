//! Leptos component wrapping the starfield canvas.
//!
//! The component creates an HTML canvas element and runs an animation loop via
//! `requestAnimationFrame`, advancing the simulation and rendering it each
//! frame. The activation input arrives as a signal owned by the host view.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use leptos::prelude::*;
use log::{error, info, trace};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::config::StarfieldConfig;
use super::error::StarfieldError;
use super::projection::Viewport;
use super::render;
use super::state::Starfield;
use super::theme::Theme;

/// Nominal frame time handed to the simulation.
const FRAME_DT: f64 = 1.0 / 60.0;

/// Bundles the simulation with the surface it draws on.
struct StarfieldContext {
	field: Starfield,
	surface: CanvasRenderingContext2d,
	theme: Theme,
}

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Renders a warp-drive starfield on a canvas element.
///
/// Hold `charging` high to spin up the warp drive; each change of `big_bang`
/// (after its initial value) scatters the stars to fresh depths. By default the
/// canvas fills the window and follows window resizes without resetting the
/// stars; set `fullscreen = false` to size it to its parent or to explicit
/// `width`/`height`.
#[component]
pub fn StarfieldCanvas(
	#[prop(into)] charging: Signal<bool>,
	#[prop(into, optional)] big_bang: Option<Signal<u32>>,
	#[prop(optional)] config: Option<StarfieldConfig>,
	#[prop(default = true)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let config = config.unwrap_or_default();
	let context: Rc<RefCell<Option<StarfieldContext>>> = Rc::new(RefCell::new(None));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let stopped = Arc::new(AtomicBool::new(false));
	let (context_init, animate_init, resize_cb_init, stopped_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		stopped.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("azathoth: no window, starfield disabled");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let theme = Theme::void().with_trail_alpha(config.trail_alpha);
		match mount(&canvas, config.clone(), w, h, theme) {
			Ok(c) => *context_init.borrow_mut() = Some(c),
			Err(e) => {
				error!("azathoth: {}", e);
				return;
			}
		}

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					if c.field.resize(nw, nh) {
						canvas_resize.set_width(nw as u32);
						canvas_resize.set_height(nh as u32);
					}
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, resize_anim, stopped_anim) = (
			context_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			stopped_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if stopped_anim.load(Ordering::Relaxed) {
				teardown(&context_anim, &resize_anim);
				// The closure owns a handle to itself; drop it once it has returned.
				let animate_drop = animate_inner.clone();
				set_timeout(
					move || {
						animate_drop.borrow_mut().take();
					},
					Duration::ZERO,
				);
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let is_charging = charging.try_get_untracked().unwrap_or(false);
				c.field.advance(is_charging, FRAME_DT);
				let stats = render::render(&c.field, &mut c.surface, &c.theme);
				trace!(
					"azathoth: frame drew {} stars, culled {}",
					stats.drawn, stats.culled
				);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	if let Some(big_bang) = big_bang {
		let context_bang = context.clone();
		let initial = big_bang.get_untracked();
		Effect::new(move |_| {
			if big_bang.get() == initial {
				return;
			}
			if let Some(ref mut c) = *context_bang.borrow_mut() {
				c.field.big_bang();
			}
		});
	}

	// The next animation frame observes the flag and tears the loop down
	// instead of scheduling another frame.
	on_cleanup(move || stopped.store(true, Ordering::Relaxed));

	view! {
		<canvas
			node_ref=canvas_ref
			class="starfield-canvas"
			style=if fullscreen {
				"display: block; position: fixed; inset: 0;"
			} else {
				"display: block;"
			}
		/>
	}
}

fn mount(
	canvas: &HtmlCanvasElement,
	config: StarfieldConfig,
	width: f64,
	height: f64,
	theme: Theme,
) -> Result<StarfieldContext, StarfieldError> {
	let surface = surface(canvas)?;
	let field = Starfield::new(config, Viewport::new(width, height)?)?;
	info!("azathoth: starfield mounted");
	Ok(StarfieldContext {
		field,
		surface,
		theme,
	})
}

fn surface(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, StarfieldError> {
	canvas
		.get_context("2d")
		.map_err(|e| StarfieldError::SurfaceUnavailable(format!("{:?}", e)))?
		.ok_or_else(|| StarfieldError::SurfaceUnavailable("canvas has no 2d context".into()))?
		.dyn_into::<CanvasRenderingContext2d>()
		.map_err(|_| StarfieldError::SurfaceUnavailable("context is not a 2d context".into()))
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn teardown<C>(context: &Rc<RefCell<Option<C>>>, resize_cb: &SharedClosure) {
	if let Some(cb) = resize_cb.borrow_mut().take() {
		if let Some(window) = web_sys::window() {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	}
	if context.borrow_mut().take().is_some() {
		info!("azathoth: starfield unmounted");
	}
}
