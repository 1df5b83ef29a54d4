//! Text helpers shared by the chain builder and the sentence generator.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Normalizes a raw word or word pair into chain tokens.
///
/// Steps, in order:
/// - trim surrounding whitespace
/// - lowercase
/// - drop every character outside `[a-zA-Z ]`
/// - trim again, so `"12 cat"` becomes `"cat"` and `"12 34"` becomes empty
pub fn normalize(raw: &str) -> String {
	let stripped: String = raw
		.trim()
		.to_lowercase()
		.chars()
		.filter(|c| c.is_ascii_alphabetic() || *c == ' ')
		.collect();
	stripped.trim().to_owned()
}

/// Returns `s` with its first character uppercased.
///
/// Examples:
/// - `"hello world"` → `"Hello world"`
/// - `""` → `""`
pub fn capitalize_first(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Renders the bare pronoun `"i"` as `"I"`, leaves any other word untouched.
pub fn capitalize_i(word: &str) -> String {
	if word == "i" {
		"I".to_owned()
	} else {
		word.to_owned()
	}
}

/// Returns true if `word` ends with at least one of `suffixes`.
pub fn ends_with_any<S: AsRef<str>>(word: &str, suffixes: &[S]) -> bool {
	suffixes.iter().any(|suffix| word.ends_with(suffix.as_ref()))
}

/// Picks a uniformly random element of `items`.
///
/// Returns `None` if `items` is empty.
pub fn pick_random<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
	items.choose(rng)
}
