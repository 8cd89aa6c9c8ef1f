//! azathoth: Warp-drive starfield hero screen.
//!
//! This crate provides a WASM hero screen built around a perspective starfield:
//! hold the mouse (or a touch) to charge the warp drive, release for a whiteout
//! flash and a spoken flavor line.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, KeyboardEvent, MouseEvent, TouchEvent, Window};

#[cfg(target_arch = "wasm32")]
use getrandom as _;

pub mod components;
pub mod voice;

pub use components::overlay::{FlavorLine, FlavorOverlay};
pub use components::singularity::SingularityCore;
pub use components::starfield::{StarfieldCanvas, StarfieldConfig};

use voice::VoiceLines;

/// How long the whiteout flash stays up after a warp is released.
const WHITEOUT: Duration = Duration::from_millis(300);

/// Page-level configuration: starfield tuning plus optional flavor lines.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
	/// Starfield options, given at the top level of the JSON object.
	#[serde(flatten)]
	pub starfield: StarfieldConfig,
	/// Replaces the built-in flavor lines.
	pub voice_lines: Option<Vec<String>>,
}

impl AppConfig {
	/// Parse and validate a page config.
	pub fn from_json(json: &str) -> Result<Self, components::starfield::ConfigError> {
		let config: Self = serde_json::from_str(json)?;
		config.starfield.validate()?;
		Ok(config)
	}
}

/// What a press or release of the activation input does to the warp drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
	/// Start charging.
	Charge,
	/// Stop charging and fire the release effects.
	Release,
	/// Repeated press or release; nothing changes.
	Ignore,
}

impl Activation {
	/// Decide from the current charging state and whether the input went down.
	pub fn of(charging: bool, pressed: bool) -> Self {
		match (charging, pressed) {
			(false, true) => Activation::Charge,
			(true, false) => Activation::Release,
			_ => Activation::Ignore,
		}
	}
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("azathoth: logging initialized");
}

/// Load configuration from a script element with id="starfield-config".
/// Expected format: JSON with any subset of the config options.
fn load_config() -> AppConfig {
	let Some(json_text) = config_text() else {
		info!("azathoth: no page config, using defaults");
		return AppConfig::default();
	};

	match AppConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"azathoth: loaded config with {} stars",
				config.starfield.pool_size
			);
			config
		}
		Err(e) => {
			warn!("azathoth: ignoring page config: {}", e);
			AppConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("starfield-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Composes the starfield, the warp hint and the release effects.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();
	let lines = match config.voice_lines {
		Some(lines) => VoiceLines::new(lines),
		None => VoiceLines::default(),
	};
	let lines = Rc::new(RefCell::new(lines));

	let charging = RwSignal::new(false);
	let big_bang = RwSignal::new(0u32);
	let whiteout = RwSignal::new(false);
	let muted = RwSignal::new(false);
	let caption = RwSignal::new(None::<FlavorLine>);

	let release = move || {
		charging.set(false);
		whiteout.set(true);
		set_timeout(move || whiteout.set(false), WHITEOUT);

		let mut lines = lines.borrow_mut();
		if let Some(line) = lines.next_line() {
			if !muted.get_untracked() {
				if let Err(e) = voice::speak(line) {
					warn!("azathoth: speech failed: {:?}", e);
				}
			}
			caption.set(Some(FlavorLine::now(line)));
		}
	};
	let input = move |pressed: bool| match Activation::of(charging.get_untracked(), pressed) {
		Activation::Charge => charging.set(true),
		Activation::Release => release(),
		Activation::Ignore => {}
	};
	let (on_mouseup, on_leave, on_touchstart, on_touchend) =
		(input.clone(), input.clone(), input.clone(), input.clone());

	let toggle_mute = move || {
		muted.update(|m| *m = !*m);
		debug!("azathoth: voice muted = {}", muted.get_untracked());
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="AZATHOTH" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div
			class="hero"
			tabindex="0"
			on:mousedown=move |_: MouseEvent| input(true)
			on:mouseup=move |_: MouseEvent| on_mouseup(false)
			on:mouseleave=move |_: MouseEvent| on_leave(false)
			// Suppress the emulated mouse events a tap would send afterwards.
			on:touchstart=move |ev: TouchEvent| {
				ev.prevent_default();
				on_touchstart(true);
			}
			on:touchend=move |ev: TouchEvent| {
				ev.prevent_default();
				on_touchend(false);
			}
			on:dblclick=move |_: MouseEvent| big_bang.update(|n| *n += 1)
			on:keydown=move |ev: KeyboardEvent| {
				if ev.key().eq_ignore_ascii_case("m") {
					toggle_mute();
				}
			}
		>
			<StarfieldCanvas charging=charging big_bang=big_bang config=config.starfield />

			<div class="ui-layer">
				<div class="sys-msg">"System: VOID_GOD_AZATHOTH // Connected"</div>
				<div class="warning-bar" class:active=move || charging.get()></div>
				<div class="sys-msg sys-msg-right">
					"Energy Density: " <span class="energy-val">"Infinite"</span>
				</div>
			</div>

			<SingularityCore warping=charging>
				<div class="core-text">
					<div class="title-sub">"GOD SKILL"</div>
					<div class="title-main">"AZATHOTH"</div>
					<div class="title-jp">"虚空之神"</div>
					<div
						class="click-hint"
						style:color=move || if charging.get() { "red" } else { "cyan" }
					>
						{move || if charging.get() { "WARPING..." } else { "HOLD CLICK TO WARP" }}
					</div>
					<button
						class="mute-toggle"
						on:mousedown=|ev: MouseEvent| ev.stop_propagation()
						on:touchstart=|ev: TouchEvent| ev.stop_propagation()
						on:touchend=|ev: TouchEvent| ev.stop_propagation()
						on:click=move |_: MouseEvent| toggle_mute()
					>
						{move || if muted.get() { "VOICE: OFF" } else { "VOICE: ON" }}
					</button>
				</div>
			</SingularityCore>

			<FlavorOverlay line=caption />
			<div class="whiteout" style:opacity=move || if whiteout.get() { "1" } else { "0" }></div>
		</div>
	}
}
