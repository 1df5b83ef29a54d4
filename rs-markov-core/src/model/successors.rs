use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::text::pick_random;

/// Set of words observed to follow one word pair.
///
/// A `SuccessorSet` is the value side of a chain entry. Words are kept in the
/// order they were first observed; a word seen several times is stored once.
///
/// ## Responsibilities:
/// - Accumulate successors during the chain build (set semantics)
/// - Draw a successor uniformly, ignoring how often it was observed
///
/// ## Invariants
/// - No duplicates
/// - Every word is a non-empty normalized token
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SuccessorSet {
	words: Vec<String>,
}

impl SuccessorSet {
	/// Creates a set holding a single word.
	pub fn with_word(word: &str) -> Self {
		Self { words: vec![word.to_owned()] }
	}

	/// Records `word` as a successor.
	///
	/// Returns `false` if the word was already present (nothing changes).
	/// Successor sets stay small, a linear scan is enough.
	pub fn insert(&mut self, word: &str) -> bool {
		if self.contains(word) {
			return false;
		}
		self.words.push(word.to_owned());
		true
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.iter().any(|w| w == word)
	}

	pub fn len(&self) -> usize {
		self.words.len()
	}

	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.words.iter().map(String::as_str)
	}

	/// Draws a successor uniformly at random.
	///
	/// Every distinct word has probability `1 / len`, whatever its
	/// observation count. Returns `None` if the set is empty.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		pick_random(&self.words, rng).map(String::as_str)
	}

	/// Set equality, ignoring insertion order.
	pub fn same_members(&self, other: &Self) -> bool {
		self.len() == other.len() && self.iter().all(|w| other.contains(w))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn insert_suppresses_duplicates() {
		let mut set = SuccessorSet::with_word("mat");
		assert!(set.insert("rug"));
		assert!(!set.insert("mat"));
		assert_eq!(set.len(), 2);
		assert_eq!(set.iter().collect::<Vec<_>>(), vec!["mat", "rug"]);
	}

	#[test]
	fn pick_is_uniform_over_distinct_words() {
		let mut set = SuccessorSet::with_word("a");
		set.insert("b");
		// Repeated observations do not add weight
		for _ in 0..10 {
			set.insert("a");
		}

		let mut rng = StdRng::seed_from_u64(42);
		let mut a_count = 0;
		let draws = 4000;
		for _ in 0..draws {
			if set.pick(&mut rng) == Some("a") {
				a_count += 1;
			}
		}
		let ratio = a_count as f64 / draws as f64;
		assert!((0.45..0.55).contains(&ratio), "ratio was {ratio}");
	}

	#[test]
	fn pick_on_empty_set_is_none() {
		let mut rng = StdRng::seed_from_u64(1);
		assert!(SuccessorSet::default().pick(&mut rng).is_none());
	}

	#[test]
	fn same_members_ignores_order() {
		let mut left = SuccessorSet::with_word("x");
		left.insert("y");
		let mut right = SuccessorSet::with_word("y");
		right.insert("x");
		assert!(left.same_members(&right));
		assert_ne!(left, right);

		right.insert("z");
		assert!(!left.same_members(&right));
	}
}
