use std::collections::HashMap;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::successors::SuccessorSet;
use crate::error::MarkovResult;
use crate::text::normalize;

/// One chain entry: a word pair and every word seen right after it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChainEntry {
	/// Two normalized tokens joined by a space, e.g. `"the cat"`.
	key: String,
	/// Words observed after `key` anywhere in the corpus.
	successors: SuccessorSet,
}

impl ChainEntry {
	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn successors(&self) -> &SuccessorSet {
		&self.successors
	}
}

/// Second-order Markov chain over words.
///
/// The `Chain` maps a pair of consecutive tokens to the set of tokens that
/// followed that pair in the corpus. Entries are enumerated in the order
/// their key was first seen, which the positional walk of the generator
/// relies on.
///
/// # Responsibilities
/// - Build the chain from raw phrases (tokenize, normalize, accumulate)
/// - Look entries up by key or by enumeration position
/// - Round-trip through any serde format
///
/// # Invariants
/// - Keys are unique and `index[key]` is the position of `key` in `entries`
/// - No entry has an empty successor set
/// - Keys and successors are non-empty normalized strings
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(from = "Vec<ChainEntry>", into = "Vec<ChainEntry>")]
pub struct Chain {
	entries: Vec<ChainEntry>,
	/// Key to position in `entries`, never serialized.
	index: HashMap<String, usize>,
}

impl Chain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a chain from a sequence of phrases.
	///
	/// Never fails: malformed phrases only contribute fewer entries, and an
	/// empty phrase list yields an empty chain. The build is deterministic,
	/// identical input order gives an identical chain.
	pub fn build<I, S>(phrases: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut chain = Self::new();
		let mut count = 0usize;
		for phrase in phrases {
			chain.add_phrase(phrase.as_ref());
			count += 1;
		}
		debug!("Chain built from {} phrase(s): {} entries", count, chain.len());
		chain
	}

	/// Adds one phrase to the chain.
	///
	/// Breaks the phrase into overlapping word triples and records the third
	/// word as a successor of the first two.
	///
	/// # Notes
	/// - Double spaces are collapsed, then the phrase is split on single spaces.
	/// - Phrases shorter than three words are ignored.
	/// - A triple is dropped when its successor is empty, before or after
	///   normalization, or when its normalized key is empty.
	pub fn add_phrase(&mut self, phrase: &str) {
		let collapsed = phrase.replace("  ", " ");
		let words: Vec<&str> = collapsed.split(' ').collect();
		if words.len() < 3 {
			// Phrase too short, no triples to compute
			return;
		}

		for triple in words.windows(3) {
			let raw_pair = format!("{} {}", triple[0], triple[1]);
			let raw_value = triple[2];
			// The raw pair always holds the joining space
			if raw_pair.is_empty() || raw_value.is_empty() {
				trace!("Dropping triple {:?} -> {:?}: empty word", raw_pair, raw_value);
				continue;
			}

			let key = normalize(&raw_pair);
			let value = normalize(raw_value);
			if key.is_empty() || value.is_empty() {
				trace!("Dropping triple {:?} -> {:?}: nothing left after normalization", raw_pair, raw_value);
				continue;
			}

			self.insert(&key, &value);
		}
	}

	/// Records `value` as a successor of `key`, creating the entry if needed.
	fn insert(&mut self, key: &str, value: &str) {
		match self.index.get(key) {
			Some(&position) => {
				self.entries[position].successors.insert(value);
			}
			None => {
				self.index.insert(key.to_owned(), self.entries.len());
				self.entries.push(ChainEntry {
					key: key.to_owned(),
					successors: SuccessorSet::with_word(value),
				});
			}
		}
	}

	/// Number of entries (distinct keys).
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Total number of successors over all entries.
	pub fn successor_count(&self) -> usize {
		self.entries.iter().map(|entry| entry.successors.len()).sum()
	}

	/// Returns the successors of `key`, if the key exists.
	pub fn get(&self, key: &str) -> Option<&SuccessorSet> {
		self.index.get(key).map(|&position| &self.entries[position].successors)
	}

	/// Returns the entry at `position` in enumeration order.
	pub fn entry_at(&self, position: usize) -> Option<&ChainEntry> {
		self.entries.get(position)
	}

	/// Returns a uniformly random entry along with its position.
	///
	/// Returns `None` if the chain is empty.
	pub fn random_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, &ChainEntry)> {
		if self.entries.is_empty() {
			return None;
		}
		let position = rng.random_range(0..self.entries.len());
		Some((position, &self.entries[position]))
	}

	/// Iterates over entries in enumeration order.
	pub fn entries(&self) -> impl Iterator<Item = &ChainEntry> {
		self.entries.iter()
	}

	/// Encodes the chain in the compact `postcard` format used by caches.
	pub fn to_bytes(&self) -> MarkovResult<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Decodes a chain produced by [`Chain::to_bytes`].
	pub fn from_bytes(bytes: &[u8]) -> MarkovResult<Self> {
		Ok(postcard::from_bytes(bytes)?)
	}
}

/// Two chains are equal when they hold the same keys, each with the same
/// successor set. Enumeration and insertion order are ignored.
impl PartialEq for Chain {
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len()
			&& self.entries.iter().all(|entry| {
				other
					.get(&entry.key)
					.is_some_and(|successors| successors.same_members(&entry.successors))
			})
	}
}

impl From<Vec<ChainEntry>> for Chain {
	/// Rebuilds the key index from a decoded payload.
	///
	/// Keys and successors are normalized again; empty ones are skipped and
	/// repeated keys are merged, so a hand-edited payload still honors the
	/// chain invariants.
	fn from(entries: Vec<ChainEntry>) -> Self {
		let mut chain = Self::new();
		for entry in entries {
			let key = normalize(&entry.key);
			if key.is_empty() {
				trace!("Dropping decoded entry with empty key {:?}", entry.key);
				continue;
			}
			for value in entry.successors.iter() {
				let value = normalize(value);
				if !value.is_empty() {
					chain.insert(&key, &value);
				}
			}
		}
		chain
	}
}

impl From<Chain> for Vec<ChainEntry> {
	fn from(chain: Chain) -> Self {
		chain.entries
	}
}
