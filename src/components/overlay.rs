//! Typewriter caption for flavor lines.

use std::time::Duration;

use leptos::prelude::*;
use log::warn;

/// Time between two typed characters.
pub const TYPE_INTERVAL_MS: f64 = 50.0;

/// A line to caption, stamped with the time (ms since epoch) it started.
#[derive(Clone, Debug, PartialEq)]
pub struct FlavorLine {
	/// What is typed out.
	pub text: String,
	/// `Date.now()` when typing began.
	pub started_at: f64,
}

impl FlavorLine {
	/// Start captioning `text` at the current time.
	pub fn now(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			started_at: js_sys::Date::now(),
		}
	}

	/// Whether the caption is still up at `now`.
	pub fn is_showing(&self, now: f64) -> bool {
		now - self.started_at < visible_duration_ms(&self.text)
	}
}

/// The part of `text` typed after `elapsed_ms`, one character per interval.
pub fn typed_prefix(text: &str, elapsed_ms: f64) -> &str {
	let typed = (elapsed_ms.max(0.0) / TYPE_INTERVAL_MS).floor() as usize;
	match text.char_indices().nth(typed) {
		Some((end, _)) => &text[..end],
		None => text,
	}
}

/// How long a caption stays up before fading: longer lines linger longer.
pub fn visible_duration_ms(text: &str) -> f64 {
	let chars = text.chars().count() as f64;
	(chars * 100.0 + 2000.0).max(3000.0)
}

/// Shows the latest flavor line with a typewriter effect, then fades it out.
///
/// The typing clock only ticks while a caption is on screen.
#[component]
pub fn FlavorOverlay(#[prop(into)] line: Signal<Option<FlavorLine>>) -> impl IntoView {
	let now = RwSignal::new(js_sys::Date::now());
	let clock = StoredValue::new(None::<IntervalHandle>);
	let stop = move || {
		if let Some(handle) = clock.try_update_value(Option::take).flatten() {
			handle.clear();
		}
	};

	Effect::new(move |_| {
		if line.with(Option::is_none) {
			return;
		}
		now.set(js_sys::Date::now());
		if clock.with_value(Option::is_some) {
			return;
		}
		let tick = move || {
			let t = js_sys::Date::now();
			now.set(t);
			if !line.with_untracked(|l| l.as_ref().is_some_and(|l| l.is_showing(t))) {
				stop();
			}
		};
		match set_interval_with_handle(tick, Duration::from_millis(TYPE_INTERVAL_MS as u64)) {
			Ok(handle) => clock.set_value(Some(handle)),
			Err(e) => warn!("azathoth: caption clock unavailable: {:?}", e),
		}
	});
	on_cleanup(stop);

	let text = move || {
		line.get()
			.map(|l| typed_prefix(&l.text, now.get() - l.started_at).to_string())
			.unwrap_or_default()
	};
	let visible = move || line.get().is_some_and(|l| l.is_showing(now.get()));

	view! {
		<div class="flavor-overlay" style:opacity=move || if visible() { "1" } else { "0" }>
			<div class="flavor-text">
				{text}
				<span class="cursor">"_"</span>
			</div>
			<div class="flavor-rule"></div>
		</div>
	}
}
