//! Spoken flavor lines.
//!
//! Line selection and voice preference are plain functions over data; only
//! [`speak`] touches the browser's speech synthesis.

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::prelude::*;
use web_sys::{SpeechSynthesisUtterance, SpeechSynthesisVoice};

/// Lines used when the page config supplies none.
pub const DEFAULT_LINES: &[&str] = &[
	"Singularity detected. Space-time continuum collapsing.",
	"Turn null. Imaginary space.",
	"The void remembers you.",
	"All creation is consumed.",
	"虚空之神、顕現。",
];

/// Voice names preferred over any other voice, matched exactly or by substring.
const PREFERRED_EXACT: &str = "Google 日本語";
const PREFERRED_PARTS: &[&str] = &["Nanami", "Haruka", "Kyoko"];

/// A shuffled source of flavor lines that never repeats the previous pick.
pub struct VoiceLines {
	lines: Vec<String>,
	last: Option<usize>,
	rng: SmallRng,
}

impl VoiceLines {
	/// Lines picked with an entropy-seeded generator.
	pub fn new(lines: Vec<String>) -> Self {
		Self::with_rng(lines, SmallRng::from_entropy())
	}

	/// Lines picked with a caller-supplied generator.
	pub fn with_rng(lines: Vec<String>, rng: SmallRng) -> Self {
		Self {
			lines,
			last: None,
			rng,
		}
	}

	/// Number of lines.
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	/// Whether there is nothing to say.
	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// Pick the next line, or `None` if there are no lines at all.
	pub fn next_line(&mut self) -> Option<&str> {
		let idx = match (self.lines.len(), self.last) {
			(0, _) => return None,
			(1, _) | (_, None) => self.rng.gen_range(0..self.lines.len()),
			// Draw from the other n - 1 lines by skipping over the last pick.
			(n, Some(last)) => {
				let idx = self.rng.gen_range(0..n - 1);
				if idx >= last { idx + 1 } else { idx }
			}
		};
		self.last = Some(idx);
		Some(&self.lines[idx])
	}
}

impl Default for VoiceLines {
	fn default() -> Self {
		Self::new(DEFAULT_LINES.iter().map(|s| s.to_string()).collect())
	}
}

/// Which installed voice to speak with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceChoice {
	/// One of the preferred voices, at index.
	Preferred(usize),
	/// The first Japanese voice, at index. Spoken slightly higher.
	Japanese(usize),
	/// Whatever the browser picks.
	Default,
}

impl VoiceChoice {
	/// Utterance pitch for this voice.
	pub fn pitch(self) -> f32 {
		match self {
			VoiceChoice::Japanese(_) => 1.2,
			_ => 1.0,
		}
	}
}

/// Choose a voice from `(name, lang)` pairs.
pub fn choose_voice<S: AsRef<str>>(voices: &[(S, S)]) -> VoiceChoice {
	let preferred = voices.iter().position(|(name, _)| {
		let name = name.as_ref();
		name == PREFERRED_EXACT
			|| PREFERRED_PARTS.iter().any(|part| name.contains(part))
			|| name.to_lowercase().contains("female")
	});
	if let Some(idx) = preferred {
		return VoiceChoice::Preferred(idx);
	}
	voices
		.iter()
		.position(|(_, lang)| lang.as_ref() == "ja-JP")
		.map_or(VoiceChoice::Default, VoiceChoice::Japanese)
}

/// Speak `text`, interrupting anything still being spoken.
///
/// Browsers without speech synthesis are silently skipped.
pub fn speak(text: &str) -> Result<(), JsValue> {
	let Some(window) = web_sys::window() else {
		return Ok(());
	};
	let Ok(synth) = window.speech_synthesis() else {
		debug!("azathoth: speech synthesis unavailable");
		return Ok(());
	};
	synth.cancel();

	let utterance = SpeechSynthesisUtterance::new_with_text(text)?;
	utterance.set_volume(0.5);
	utterance.set_rate(1.0);

	let voices: Vec<SpeechSynthesisVoice> = synth
		.get_voices()
		.iter()
		.filter_map(|v| v.dyn_into().ok())
		.collect();
	let names: Vec<(String, String)> = voices.iter().map(|v| (v.name(), v.lang())).collect();
	let choice = choose_voice(&names);
	debug!("azathoth: speaking with {:?}", choice);

	utterance.set_pitch(choice.pitch());
	if let VoiceChoice::Preferred(idx) | VoiceChoice::Japanese(idx) = choice {
		utterance.set_voice(voices.get(idx));
	}
	synth.speak(&utterance);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lines(n: usize) -> VoiceLines {
		VoiceLines::with_rng(
			(0..n).map(|i| format!("line {i}")).collect(),
			SmallRng::seed_from_u64(11),
		)
	}

	#[test]
	fn empty_list_yields_nothing() {
		assert_eq!(lines(0).next_line(), None);
	}

	#[test]
	fn single_line_repeats() {
		let mut l = lines(1);
		for _ in 0..5 {
			assert_eq!(l.next_line(), Some("line 0"));
		}
	}

	#[test]
	fn never_picks_the_same_line_twice_in_a_row() {
		let mut l = lines(3);
		let mut prev = l.next_line().map(str::to_owned);
		let mut seen = std::collections::HashSet::new();
		for _ in 0..500 {
			let next = l.next_line().map(str::to_owned);
			assert_ne!(next, prev);
			seen.insert(next.clone());
			prev = next;
		}
		assert_eq!(seen.len(), 3);
	}

	#[test]
	fn default_lines_are_available() {
		assert_eq!(VoiceLines::default().len(), DEFAULT_LINES.len());
	}

	#[test]
	fn prefers_named_voices() {
		let voices = [
			("Samantha", "en-US"),
			("Otoya", "ja-JP"),
			("Microsoft Nanami Online", "ja-JP"),
		];
		assert_eq!(choose_voice(&voices), VoiceChoice::Preferred(2));
		assert_eq!(choose_voice(&[("Google 日本語", "ja-JP")]), VoiceChoice::Preferred(0));
		assert_eq!(choose_voice(&[("English Female", "en-GB")]), VoiceChoice::Preferred(0));
	}

	#[test]
	fn falls_back_to_japanese_then_default() {
		let voices = [("Samantha", "en-US"), ("Otoya", "ja-JP")];
		let choice = choose_voice(&voices);
		assert_eq!(choice, VoiceChoice::Japanese(1));
		assert_eq!(choice.pitch(), 1.2);

		let choice = choose_voice(&[("Samantha", "en-US")]);
		assert_eq!(choice, VoiceChoice::Default);
		assert_eq!(choice.pitch(), 1.0);
	}
}
