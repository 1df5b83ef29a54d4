use std::fmt;

use log::{debug, trace, warn};
use rand::Rng;

use super::chain::Chain;
use super::generation_input::{GenerationInput, WalkMode};
use crate::error::{MarkovError, MarkovResult};
use crate::text::{capitalize_first, capitalize_i, ends_with_any};

/// A generated sentence before finishing.
///
/// The first unit is the seed (`"key successor"`), the following ones are
/// single words. `walk_truncated` is set when the walk ran out of entries
/// before reaching the requested length.
#[derive(Clone, Debug, PartialEq)]
pub struct Sentence {
	units: Vec<String>,
	walk_truncated: bool,
}

impl Sentence {
	pub fn units(&self) -> &[String] {
		&self.units
	}

	pub fn walk_truncated(&self) -> bool {
		self.walk_truncated
	}

	/// Joins the units, capitalizes the first character and appends a period.
	pub fn finish(&self) -> String {
		format!("{}.", capitalize_first(&self.units.join(" ")))
	}
}

impl fmt::Display for Sentence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.finish())
	}
}

/// Generates sentences by randomly walking a built chain.
///
/// # Responsibilities
/// - Pick a seed whose successor does not look like a bad sentence start
/// - Extend it by `min_length` words (positional or graph walk)
/// - Close it with a word that is not an end noise word
///
/// The chain is only read. One generator can produce any number of
/// sentences; the randomness source is passed per call.
#[derive(Debug)]
pub struct SentenceGenerator<'c> {
	chain: &'c Chain,
	input: GenerationInput,
}

impl<'c> SentenceGenerator<'c> {
	/// Creates a generator over `chain`.
	///
	/// # Errors
	/// - `EmptyChain` if the chain has no entries
	/// - `NoSeedCandidate` if every successor ends with a start noise suffix
	/// - `NoEndingCandidate` if every successor is an end noise word
	///
	/// The last two checks keep the rejection loops from spinning forever.
	pub fn new(chain: &'c Chain, input: GenerationInput) -> MarkovResult<Self> {
		if chain.is_empty() {
			return Err(MarkovError::EmptyChain);
		}

		let mut words = chain.entries().flat_map(|entry| entry.successors().iter());
		if !words.any(|word| !ends_with_any(word, &input.noise.start_suffixes)) {
			return Err(MarkovError::NoSeedCandidate);
		}

		let mut words = chain.entries().flat_map(|entry| entry.successors().iter());
		if !words.any(|word| !input.noise.is_end_noise(word)) {
			return Err(MarkovError::NoEndingCandidate);
		}

		Ok(Self { chain, input })
	}

	pub fn input(&self) -> &GenerationInput {
		&self.input
	}

	/// Generates a finished sentence.
	pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> MarkovResult<String> {
		Ok(self.compose(rng)?.finish())
	}

	/// Generates a sentence and returns its units.
	///
	/// Either a complete sentence is returned or an error, never a partial one.
	pub fn compose<R: Rng + ?Sized>(&self, rng: &mut R) -> MarkovResult<Sentence> {
		let (position, key, successor) = self.seed(rng)?;

		let seed_key: Vec<String> = key.split(' ').map(capitalize_i).collect();
		let mut units = vec![format!("{} {}", seed_key.join(" "), capitalize_i(&successor))];

		let walk_truncated = match self.input.walk {
			WalkMode::Positional => self.walk_positional(position, &mut units, rng),
			WalkMode::Graph => self.walk_graph(&key, &successor, &mut units, rng),
		};

		units.push(self.ending(rng)?);

		Ok(Sentence { units, walk_truncated })
	}

	/// Draws random entries until the drawn successor does not end with a
	/// start noise suffix.
	///
	/// Returns the entry position, its key and the drawn successor.
	fn seed<R: Rng + ?Sized>(&self, rng: &mut R) -> MarkovResult<(usize, String, String)> {
		let mut draws = 0usize;
		loop {
			draws += 1;
			let (position, entry) = self.chain.random_entry(rng).ok_or(MarkovError::EmptyChain)?;
			let Some(successor) = entry.successors().pick(rng) else {
				continue;
			};

			if ends_with_any(successor, &self.input.noise.start_suffixes) {
				trace!("Seed successor {:?} rejected", successor);
				continue;
			}

			debug!("Seed {:?} -> {:?} found after {} draw(s)", entry.key(), successor, draws);
			return Ok((position, entry.key().to_owned(), successor.to_owned()));
		}
	}

	/// Appends one successor of each entry following the seed position.
	///
	/// Returns true if the enumeration ended before `min_length` words.
	fn walk_positional<R: Rng + ?Sized>(&self, position: usize, units: &mut Vec<String>, rng: &mut R) -> bool {
		for x in 1..=self.input.min_length() {
			let next = self.chain.entry_at(position + x).and_then(|entry| entry.successors().pick(rng));
			match next {
				Some(word) => units.push(capitalize_i(word)),
				None => {
					warn!(
						"Positional walk overflow: entry {} of {}, stopped after {} word(s)",
						position + x,
						self.chain.len(),
						x - 1
					);
					return true;
				}
			}
		}
		false
	}

	/// Appends successors following the chain from the seed pair.
	///
	/// Returns true if an unknown pair ended the walk before `min_length` words.
	fn walk_graph<R: Rng + ?Sized>(&self, key: &str, successor: &str, units: &mut Vec<String>, rng: &mut R) -> bool {
		let mut previous = key.rsplit(' ').next().unwrap_or_default().to_owned();
		let mut current = successor.to_owned();

		for x in 1..=self.input.min_length() {
			let pair = format!("{previous} {current}");
			let Some(word) = self.chain.get(&pair).and_then(|successors| successors.pick(rng)) else {
				debug!("Graph walk dead end on {:?} after {} word(s)", pair, x - 1);
				return true;
			};
			units.push(capitalize_i(word));
			previous = std::mem::replace(&mut current, word.to_owned());
		}
		false
	}

	/// Draws random entries until the drawn successor is not an end noise word.
	fn ending<R: Rng + ?Sized>(&self, rng: &mut R) -> MarkovResult<String> {
		loop {
			let (_, entry) = self.chain.random_entry(rng).ok_or(MarkovError::EmptyChain)?;
			match entry.successors().pick(rng) {
				Some(word) if !self.input.noise.is_end_noise(word) => return Ok(word.to_owned()),
				_ => continue,
			}
		}
	}
}

/// Generates one title from `chain` with default filters and the positional
/// walk, using the thread-local random generator.
///
/// # Errors
/// - `InvalidMinLength` if `min_length` is 0 or above `MAX_MIN_LENGTH`
/// - `EmptyChain` if the chain has no entries
pub fn generate(chain: &Chain, min_length: usize) -> MarkovResult<String> {
	let input = GenerationInput::new(min_length)?;
	SentenceGenerator::new(chain, input)?.generate(&mut rand::rng())
}
