use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use rs_markov_core::cache::{ChainCache, FileCache, MemoryCache};
use rs_markov_core::model::generation_input::WalkMode;
use rs_markov_core::source::FilePhraseSource;

use crate::search::SearchClient;
use crate::Corpus;

/// Title generation server settings.
///
/// Every flag can also be given through its environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "rs-markov-server", version, about = "Serves Markov chain generated titles over HTTP")]
pub struct ServerConfig {
	/// Address to bind.
	#[arg(long, env = "MARKOV_BIND", default_value = "127.0.0.1")]
	pub bind: String,

	/// Port to listen on.
	#[arg(long, env = "MARKOV_PORT", default_value_t = 5000)]
	pub port: u16,

	/// Search endpoint returning the phrases (`hits.hits[]._source.sentence`).
	#[arg(long, env = "MARKOV_SEARCH_URL", default_value = "http://127.0.0.1:9200/markov/_search")]
	pub search_url: String,

	/// Maximum number of phrases requested from the search endpoint.
	#[arg(long, env = "MARKOV_SEARCH_SIZE", default_value_t = 2000)]
	pub search_size: usize,

	/// Search request timeout, in seconds.
	#[arg(long, env = "MARKOV_SEARCH_TIMEOUT", default_value_t = 10)]
	pub search_timeout: u64,

	/// Read phrases from this file (one per line) instead of the search endpoint.
	#[arg(long, env = "MARKOV_PHRASES_FILE")]
	pub phrases_file: Option<PathBuf>,

	/// Cache built chains in this directory. In memory when unset.
	#[arg(long, env = "MARKOV_CACHE_DIR")]
	pub cache_dir: Option<PathBuf>,

	/// Default walk mode: positional or graph.
	#[arg(long, env = "MARKOV_WALK", default_value_t = WalkMode::Positional)]
	pub walk: WalkMode,
}

impl ServerConfig {
	/// Creates the chain cache selected by `cache_dir`.
	pub fn cache(&self) -> Box<dyn ChainCache + Send> {
		match &self.cache_dir {
			Some(dir) => Box::new(FileCache::new(dir)),
			None => Box::new(MemoryCache::new()),
		}
	}

	/// Creates the phrase source: the file when given, the search endpoint otherwise.
	pub fn corpus(&self) -> reqwest::Result<Corpus> {
		match &self.phrases_file {
			Some(path) => Ok(Corpus::File(FilePhraseSource::new(path))),
			None => Ok(Corpus::Search(SearchClient::new(
				&self.search_url,
				self.search_size,
				Duration::from_secs(self.search_timeout),
			)?)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_the_title_front_end() {
		let config = ServerConfig::try_parse_from(["rs-markov-server"]).unwrap();
		assert_eq!(config.port, 5000);
		assert_eq!(config.search_size, 2000);
		assert_eq!(config.walk, WalkMode::Positional);
		assert!(config.cache_dir.is_none());
		assert_eq!(config.cache().name(), "memory");
	}

	#[test]
	fn flags_override_defaults() {
		let config = ServerConfig::try_parse_from([
			"rs-markov-server",
			"--walk",
			"graph",
			"--cache-dir",
			"/tmp/markov",
			"--phrases-file",
			"titles.txt",
		])
		.unwrap();
		assert_eq!(config.walk, WalkMode::Graph);
		assert_eq!(config.cache().name(), "file");
		assert!(matches!(config.corpus().unwrap(), Corpus::File(_)));
	}

	#[test]
	fn unknown_walk_is_rejected() {
		assert!(ServerConfig::try_parse_from(["rs-markov-server", "--walk", "sideways"]).is_err());
	}
}
