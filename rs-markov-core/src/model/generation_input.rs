use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, MarkovResult};

/// Words ending with one of these never open a sentence (mostly past tense).
pub const START_NOISE_SUFFIXES: [&str; 3] = ["ed", "came", "been"];

/// Longest walk a single sentence may request.
pub const MAX_MIN_LENGTH: usize = 100;

/// Words that never close a sentence.
pub const END_NOISE_WORDS: [&str; 10] = ["for", "and", "nor", "or", "but", "the", "an", "a", "be", "i"];

/// Strategy used to extend a sentence after its seed.
///
/// # Variants
/// - `Positional`: take the entries following the seed entry in enumeration
///   order, whatever their keys. Neighbouring entries usually come from the
///   same source phrase, which keeps the output loosely coherent.
/// - `Graph`: follow the chain itself, the next key being the last two
///   emitted words. Stops early on a key the chain does not know.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WalkMode {
	#[default]
	Positional,
	Graph,
}

impl FromStr for WalkMode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"positional" => Ok(WalkMode::Positional),
			"graph" => Ok(WalkMode::Graph),
			other => Err(format!("Unknown walk mode '{other}', expected 'positional' or 'graph'")),
		}
	}
}

impl fmt::Display for WalkMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			WalkMode::Positional => f.write_str("positional"),
			WalkMode::Graph => f.write_str("graph"),
		}
	}
}

/// Heuristic filters applied at sentence boundaries.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NoiseWords {
	/// A seed successor ending with one of these is redrawn.
	pub start_suffixes: Vec<String>,
	/// A closing word equal to one of these is redrawn.
	pub end_words: Vec<String>,
}

impl Default for NoiseWords {
	fn default() -> Self {
		Self {
			start_suffixes: START_NOISE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
			end_words: END_NOISE_WORDS.iter().map(|s| s.to_string()).collect(),
		}
	}
}

impl NoiseWords {
	pub fn is_end_noise(&self, word: &str) -> bool {
		self.end_words.iter().any(|w| w == word)
	}
}

/// Input parameters for generating one sentence.
///
/// # Invariants
/// - `1 <= min_length <= MAX_MIN_LENGTH`, also when deserialized
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "RawGenerationInput")]
pub struct GenerationInput {
	/// Number of words appended by the walk after the seed.
	min_length: usize,

	/// How the walk picks the entries after the seed.
	pub walk: WalkMode,

	/// Boundary filters.
	pub noise: NoiseWords,
}

/// Unchecked shape of a serialized `GenerationInput`.
#[derive(Deserialize)]
struct RawGenerationInput {
	min_length: usize,
	#[serde(default)]
	walk: WalkMode,
	#[serde(default)]
	noise: NoiseWords,
}

impl TryFrom<RawGenerationInput> for GenerationInput {
	type Error = MarkovError;

	fn try_from(raw: RawGenerationInput) -> Result<Self, Self::Error> {
		let mut input = Self::new(raw.min_length)?.with_walk(raw.walk);
		input.noise = raw.noise;
		Ok(input)
	}
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self { min_length: 10, walk: WalkMode::default(), noise: NoiseWords::default() }
	}
}

impl GenerationInput {
	/// Creates an input with the given walk length and default filters.
	///
	/// # Errors
	/// Returns an error if `min_length` is 0 or above `MAX_MIN_LENGTH`.
	pub fn new(min_length: usize) -> MarkovResult<Self> {
		let mut input = Self::default();
		input.set_min_length(min_length)?;
		Ok(input)
	}

	/// Draws the walk length used by title front-ends: `10 + floor(3 * random())`.
	pub fn random_min_length<R: Rng + ?Sized>(rng: &mut R) -> usize {
		10 + rng.random_range(0..3)
	}

	/// Returns the current walk length.
	pub fn min_length(&self) -> usize {
		self.min_length
	}

	/// Sets the walk length.
	///
	/// # Errors
	/// Returns an error if `min_length` is 0 or above `MAX_MIN_LENGTH`.
	pub fn set_min_length(&mut self, min_length: usize) -> MarkovResult<()> {
		if !(1..=MAX_MIN_LENGTH).contains(&min_length) {
			return Err(MarkovError::InvalidMinLength(min_length));
		}
		self.min_length = min_length;
		Ok(())
	}

	/// Builder-style variant of `walk`.
	pub fn with_walk(mut self, walk: WalkMode) -> Self {
		self.walk = walk;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn zero_min_length_is_rejected() {
		assert!(matches!(GenerationInput::new(0), Err(MarkovError::InvalidMinLength(0))));
		let mut input = GenerationInput::new(3).unwrap();
		assert!(input.set_min_length(0).is_err());
		assert_eq!(input.min_length(), 3);
	}

	#[test]
	fn oversized_min_length_is_rejected() {
		assert!(GenerationInput::new(MAX_MIN_LENGTH).is_ok());
		assert!(matches!(
			GenerationInput::new(MAX_MIN_LENGTH + 1),
			Err(MarkovError::InvalidMinLength(n)) if n == MAX_MIN_LENGTH + 1
		));
		assert!(GenerationInput::new(usize::MAX).is_err());
	}

	#[test]
	fn deserialization_validates_min_length() {
		let input: GenerationInput = serde_json::from_str(r#"{"min_length": 5, "walk": "graph"}"#).unwrap();
		assert_eq!(input.min_length(), 5);
		assert_eq!(input.walk, WalkMode::Graph);
		assert_eq!(input.noise, NoiseWords::default());

		assert!(serde_json::from_str::<GenerationInput>(r#"{"min_length": 0}"#).is_err());
		assert!(serde_json::from_str::<GenerationInput>(r#"{"min_length": 1000000}"#).is_err());
	}

	#[test]
	fn serialized_input_round_trips() {
		let input = GenerationInput::new(12).unwrap().with_walk(WalkMode::Graph);
		let json = serde_json::to_string(&input).unwrap();
		assert_eq!(serde_json::from_str::<GenerationInput>(&json).unwrap(), input);
	}

	#[test]
	fn random_min_length_is_between_ten_and_twelve() {
		let mut rng = StdRng::seed_from_u64(11);
		let mut seen = [false; 3];
		for _ in 0..200 {
			let n = GenerationInput::random_min_length(&mut rng);
			assert!((10..=12).contains(&n));
			seen[n - 10] = true;
		}
		assert!(seen.iter().all(|s| *s));
	}

	#[test]
	fn walk_mode_parses_case_insensitively() {
		assert_eq!("Graph".parse::<WalkMode>(), Ok(WalkMode::Graph));
		assert_eq!("positional".parse::<WalkMode>(), Ok(WalkMode::Positional));
		assert!("random".parse::<WalkMode>().is_err());
		assert_eq!(WalkMode::Graph.to_string(), "graph");
	}

	#[test]
	fn default_noise_words() {
		let noise = NoiseWords::default();
		assert!(noise.is_end_noise("the"));
		assert!(noise.is_end_noise("i"));
		assert!(!noise.is_end_noise("mat"));
		assert_eq!(noise.start_suffixes, vec!["ed", "came", "been"]);
	}
}
