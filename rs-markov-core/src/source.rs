//! Phrase sources feeding the chain builder.
//!
//! The builder only needs a fully materialized list of phrases; where they
//! come from (a file, a search service, a test fixture) is up to the source.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::MarkovResult;
use crate::io::read_lines;

/// Supplies the corpus used to build a chain.
pub trait PhraseSource {
	/// Returns every phrase of the corpus.
	fn phrases(&self) -> MarkovResult<Vec<String>>;
}

/// Text file with one phrase per line. Blank lines are skipped.
#[derive(Debug, Clone)]
pub struct FilePhraseSource {
	path: PathBuf,
}

impl FilePhraseSource {
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self { path: path.as_ref().to_path_buf() }
	}
}

impl PhraseSource for FilePhraseSource {
	fn phrases(&self) -> MarkovResult<Vec<String>> {
		let phrases = read_lines(&self.path)?;
		info!("Read {} phrase(s) from {}", phrases.len(), self.path.display());
		Ok(phrases)
	}
}

/// Phrases already held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticPhrases(pub Vec<String>);

impl<S: Into<String>> FromIterator<S> for StaticPhrases {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

impl PhraseSource for StaticPhrases {
	fn phrases(&self) -> MarkovResult<Vec<String>> {
		Ok(self.0.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::MarkovError;

	#[test]
	fn file_source_reads_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("titles.txt");
		std::fs::write(&path, "the cat sat on the mat\n\nthe cat sat on the rug\n").unwrap();

		let phrases = FilePhraseSource::new(&path).phrases().unwrap();
		assert_eq!(phrases, vec!["the cat sat on the mat", "the cat sat on the rug"]);
	}

	#[test]
	fn missing_file_is_an_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let source = FilePhraseSource::new(dir.path().join("missing.txt"));
		assert!(matches!(source.phrases(), Err(MarkovError::Io(_))));
	}

	#[test]
	fn static_phrases_collect() {
		let source: StaticPhrases = ["a b c", "d e f"].into_iter().collect();
		assert_eq!(source.phrases().unwrap().len(), 2);
	}
}
