//! Chain caches.
//!
//! Building a chain means fetching the whole corpus, so a built chain is
//! handed to a cache and reused until the cache is cleared. Any storage
//! backend implements `ChainCache`.
//! Current implementations: `MemoryCache`, `FileCache`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::MarkovResult;
use crate::io::{build_entry_path, list_files};
use crate::model::chain::Chain;

/// Key under which the chain is stored by default.
pub const DEFAULT_CACHE_KEY: &str = "markov_chain";

/// Extension of the files written by `FileCache`.
const CACHE_EXTENSION: &str = "bin";

/// Pluggable key-value store for built chains.
///
/// `get` returns `Ok(None)` when nothing is stored under the key.
pub trait ChainCache {
	/// Returns the chain stored under `key`, if any.
	fn get(&self, key: &str) -> MarkovResult<Option<Chain>>;

	/// Stores `chain` under `key`, replacing any previous value.
	fn set(&mut self, key: &str, chain: &Chain) -> MarkovResult<()>;

	/// Removes every stored chain.
	fn clear(&mut self) -> MarkovResult<()>;

	/// Human-readable name of this backend (for logs and reports).
	fn name(&self) -> &str;
}

impl<C: ChainCache + ?Sized> ChainCache for Box<C> {
	fn get(&self, key: &str) -> MarkovResult<Option<Chain>> {
		(**self).get(key)
	}

	fn set(&mut self, key: &str, chain: &Chain) -> MarkovResult<()> {
		(**self).set(key, chain)
	}

	fn clear(&mut self) -> MarkovResult<()> {
		(**self).clear()
	}

	fn name(&self) -> &str {
		(**self).name()
	}
}

/// In-process cache holding encoded chains.
///
/// Chains are stored serialized, so every `get` goes through the same
/// round-trip as a persistent backend.
#[derive(Debug, Default)]
pub struct MemoryCache {
	entries: HashMap<String, Vec<u8>>,
}

impl MemoryCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl ChainCache for MemoryCache {
	fn get(&self, key: &str) -> MarkovResult<Option<Chain>> {
		self.entries.get(key).map(|bytes| Chain::from_bytes(bytes)).transpose()
	}

	fn set(&mut self, key: &str, chain: &Chain) -> MarkovResult<()> {
		self.entries.insert(key.to_owned(), chain.to_bytes()?);
		Ok(())
	}

	fn clear(&mut self) -> MarkovResult<()> {
		self.entries.clear();
		Ok(())
	}

	fn name(&self) -> &str {
		"memory"
	}
}

/// Directory-backed cache: one `<key>.bin` postcard file per key.
///
/// The directory is created on the first `set`.
#[derive(Debug, Clone)]
pub struct FileCache {
	dir: PathBuf,
}

impl FileCache {
	pub fn new<P: AsRef<Path>>(dir: P) -> Self {
		Self { dir: dir.as_ref().to_path_buf() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}
}

impl ChainCache for FileCache {
	fn get(&self, key: &str) -> MarkovResult<Option<Chain>> {
		let path = build_entry_path(&self.dir, key, CACHE_EXTENSION)?;
		if !path.exists() {
			return Ok(None);
		}
		let bytes = fs::read(&path)?;
		debug!("Read cached chain {} ({} bytes)", path.display(), bytes.len());
		Ok(Some(Chain::from_bytes(&bytes)?))
	}

	fn set(&mut self, key: &str, chain: &Chain) -> MarkovResult<()> {
		let path = build_entry_path(&self.dir, key, CACHE_EXTENSION)?;
		fs::create_dir_all(&self.dir)?;
		let bytes = chain.to_bytes()?;
		fs::write(&path, &bytes)?;
		debug!("Wrote cached chain {} ({} bytes)", path.display(), bytes.len());
		Ok(())
	}

	fn clear(&mut self) -> MarkovResult<()> {
		for path in list_files(&self.dir, CACHE_EXTENSION)? {
			fs::remove_file(&path)?;
			debug!("Removed cached chain {}", path.display());
		}
		Ok(())
	}

	fn name(&self) -> &str {
		"file"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_chain() -> Chain {
		Chain::build(["the cat sat on the mat", "the cat sat on the rug"])
	}

	#[test]
	fn memory_cache_get_set_clear() {
		let mut cache = MemoryCache::new();
		assert!(cache.get(DEFAULT_CACHE_KEY).unwrap().is_none());

		cache.set(DEFAULT_CACHE_KEY, &sample_chain()).unwrap();
		assert_eq!(cache.get(DEFAULT_CACHE_KEY).unwrap(), Some(sample_chain()));
		assert_eq!(cache.len(), 1);

		cache.clear().unwrap();
		assert!(cache.is_empty());
		assert!(cache.get(DEFAULT_CACHE_KEY).unwrap().is_none());
	}

	#[test]
	fn file_cache_persists_between_instances() {
		let dir = tempfile::tempdir().unwrap();
		let cache_dir = dir.path().join("cache");

		let mut writer = FileCache::new(&cache_dir);
		writer.set(DEFAULT_CACHE_KEY, &sample_chain()).unwrap();
		assert!(cache_dir.join("markov_chain.bin").is_file());

		let reader = FileCache::new(&cache_dir);
		assert_eq!(reader.get(DEFAULT_CACHE_KEY).unwrap(), Some(sample_chain()));
		assert!(reader.get("other").unwrap().is_none());
	}

	#[test]
	fn file_cache_clear_only_removes_chain_files() {
		let dir = tempfile::tempdir().unwrap();
		let mut cache = FileCache::new(dir.path());
		cache.set("one", &sample_chain()).unwrap();
		cache.set("two", &sample_chain()).unwrap();
		fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

		cache.clear().unwrap();

		assert!(cache.get("one").unwrap().is_none());
		assert!(cache.get("two").unwrap().is_none());
		assert!(dir.path().join("notes.txt").is_file());
	}

	#[test]
	fn file_cache_clear_on_missing_dir_is_ok() {
		let dir = tempfile::tempdir().unwrap();
		let mut cache = FileCache::new(dir.path().join("never-created"));
		assert!(cache.clear().is_ok());
	}

	#[test]
	fn boxed_cache_delegates() {
		let mut cache: Box<dyn ChainCache> = Box::new(MemoryCache::new());
		cache.set("k", &sample_chain()).unwrap();
		assert_eq!(cache.name(), "memory");
		assert!(cache.get("k").unwrap().is_some());
	}
}
