//! Error types for chain building, caching and generation.

use thiserror::Error;

use crate::model::generation_input::MAX_MIN_LENGTH;

/// Result type alias for chain operations.
pub type MarkovResult<T> = Result<T, MarkovError>;

/// Errors that can occur while building, caching or walking a chain.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// Generation was attempted against a chain with zero entries.
	#[error("cannot generate from an empty chain")]
	EmptyChain,

	/// Every triple of a non-empty corpus was rejected during the build.
	#[error("corpus of {phrases} phrase(s) produced no chain entries")]
	EmptyCorpus { phrases: usize },

	/// The walk length must be between one word and `MAX_MIN_LENGTH`.
	#[error("invalid minimum length: {0} (must be between 1 and {max})", max = MAX_MIN_LENGTH)]
	InvalidMinLength(usize),

	/// No successor in the chain is allowed to open a sentence.
	#[error("no successor in the chain can start a sentence")]
	NoSeedCandidate,

	/// No successor in the chain is allowed to close a sentence.
	#[error("no successor in the chain can end a sentence")]
	NoEndingCandidate,

	/// I/O error (phrase files, cache files).
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),

	/// Chain (de)serialization error.
	#[error("chain codec error: {0}")]
	Codec(#[from] postcard::Error),
}
