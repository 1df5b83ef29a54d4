use std::sync::Arc;

use log::{info, warn};

use super::chain::Chain;
use crate::cache::{ChainCache, DEFAULT_CACHE_KEY};
use crate::error::{MarkovError, MarkovResult};
use crate::source::PhraseSource;

/// Cache-aware access to the chain of one corpus.
///
/// This struct manages:
/// - `cache`: the backend the built chain is handed to
/// - `key`: the cache key of the chain
/// - `current`: the chain in use, shared read-only with generators
///
/// The chain is only built when neither `current` nor the cache holds it.
#[derive(Debug)]
pub struct ChainStore<C: ChainCache> {
	cache: C,
	key: String,
	current: Option<Arc<Chain>>,
}

impl<C: ChainCache> ChainStore<C> {
	/// Creates a store using `DEFAULT_CACHE_KEY`.
	pub fn new(cache: C) -> Self {
		Self::with_key(cache, DEFAULT_CACHE_KEY)
	}

	pub fn with_key(cache: C, key: &str) -> Self {
		Self { cache, key: key.to_owned(), current: None }
	}

	pub fn cache(&self) -> &C {
		&self.cache
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the chain without building it.
	///
	/// Looks at the chain in use first, then at the cache. An undecodable
	/// cache entry is reported and treated as absent so that the next build
	/// overwrites it.
	pub fn load(&mut self) -> MarkovResult<Option<Arc<Chain>>> {
		if let Some(chain) = &self.current {
			return Ok(Some(Arc::clone(chain)));
		}

		match self.cache.get(&self.key) {
			Ok(Some(chain)) => {
				info!("Loaded chain '{}' from {} cache: {} entries", self.key, self.cache.name(), chain.len());
				let chain = Arc::new(chain);
				self.current = Some(Arc::clone(&chain));
				Ok(Some(chain))
			}
			Ok(None) => Ok(None),
			Err(MarkovError::Codec(e)) => {
				warn!("Ignoring unreadable cached chain '{}': {}", self.key, e);
				Ok(None)
			}
			Err(e) => Err(e),
		}
	}

	/// Builds a chain from `phrases` and hands it to the cache.
	///
	/// An empty chain is returned but neither cached nor kept, so the next
	/// call builds again.
	pub fn build_and_store<S: AsRef<str>>(&mut self, phrases: &[S]) -> MarkovResult<Arc<Chain>> {
		let chain = Chain::build(phrases);

		if chain.is_empty() {
			if !phrases.is_empty() {
				warn!("{}", MarkovError::EmptyCorpus { phrases: phrases.len() });
			}
			return Ok(Arc::new(chain));
		}

		info!(
			"Built chain '{}' from {} phrase(s): {} entries, {} successors",
			self.key,
			phrases.len(),
			chain.len(),
			chain.successor_count()
		);
		self.cache.set(&self.key, &chain)?;

		let chain = Arc::new(chain);
		self.current = Some(Arc::clone(&chain));
		Ok(chain)
	}

	/// Returns the cached chain, or fetches the corpus from `source` and
	/// builds it on a miss.
	pub fn load_or_build<P: PhraseSource + ?Sized>(&mut self, source: &P) -> MarkovResult<Arc<Chain>> {
		if let Some(chain) = self.load()? {
			return Ok(chain);
		}
		let phrases = source.phrases()?;
		self.build_and_store(&phrases)
	}

	/// Forgets the chain in use and clears the cache.
	pub fn clear(&mut self) -> MarkovResult<()> {
		self.current = None;
		self.cache.clear()?;
		info!("Cleared {} cache", self.cache.name());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::cache::{FileCache, MemoryCache};
	use crate::source::StaticPhrases;

	/// Counts how many times the corpus was fetched.
	struct CountingSource {
		phrases: Vec<String>,
		calls: Cell<usize>,
	}

	impl CountingSource {
		fn new(phrases: &[&str]) -> Self {
			Self { phrases: phrases.iter().map(|s| s.to_string()).collect(), calls: Cell::new(0) }
		}
	}

	impl PhraseSource for CountingSource {
		fn phrases(&self) -> MarkovResult<Vec<String>> {
			self.calls.set(self.calls.get() + 1);
			Ok(self.phrases.clone())
		}
	}

	#[test]
	fn builds_once_then_reuses() {
		let source = CountingSource::new(&["the cat sat on the mat"]);
		let mut store = ChainStore::new(MemoryCache::new());

		let first = store.load_or_build(&source).unwrap();
		let second = store.load_or_build(&source).unwrap();

		assert_eq!(source.calls.get(), 1);
		assert!(Arc::ptr_eq(&first, &second));
		assert!(store.cache().get(DEFAULT_CACHE_KEY).unwrap().is_some());
	}

	#[test]
	fn clear_forces_a_rebuild() {
		let source = CountingSource::new(&["the cat sat on the mat"]);
		let mut store = ChainStore::new(MemoryCache::new());

		store.load_or_build(&source).unwrap();
		store.clear().unwrap();
		assert!(store.load().unwrap().is_none());

		store.load_or_build(&source).unwrap();
		assert_eq!(source.calls.get(), 2);
	}

	#[test]
	fn restores_from_a_warm_cache() {
		let dir = tempfile::tempdir().unwrap();
		let source = CountingSource::new(&["the cat sat on the mat", "the cat sat on the rug"]);

		let built = ChainStore::new(FileCache::new(dir.path())).load_or_build(&source).unwrap();
		let restored = ChainStore::new(FileCache::new(dir.path())).load_or_build(&source).unwrap();

		assert_eq!(source.calls.get(), 1);
		assert_eq!(*built, *restored);
	}

	#[test]
	fn empty_corpus_is_not_cached() {
		let source: StaticPhrases = ["too short", "12 34 56"].into_iter().collect();
		let mut store = ChainStore::new(MemoryCache::new());

		let chain = store.load_or_build(&source).unwrap();
		assert!(chain.is_empty());
		assert!(store.cache().is_empty());
		assert!(store.load().unwrap().is_none());
	}

	#[test]
	fn unreadable_cache_entry_is_a_miss() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("markov_chain.bin"), [0xff, 0xff, 0xff]).unwrap();
		let source = CountingSource::new(&["the cat sat on the mat"]);

		let mut store = ChainStore::new(FileCache::new(dir.path()));
		let chain = store.load_or_build(&source).unwrap();

		assert_eq!(chain.len(), 4);
		assert_eq!(source.calls.get(), 1);
	}
}
