//! Word-pair Markov chain title generation library.
//!
//! This crate provides a second-order Markov chain over words including:
//! - Chain construction from raw phrases (word pair -> successor set)
//! - Sentence generation with start/end noise filtering
//! - Pluggable chain caches and phrase sources
//! - Internal utilities for I/O and path handling
//!
//! The chain is built once, then only read while generating.

/// Chain model, sentence generation and chain caching orchestration.
pub mod model;

/// Shared text helpers: normalization, capitalization, random picks.
pub mod text;

/// Chain cache interface and its memory / file implementations.
pub mod cache;

/// Phrase source interface and simple implementations.
pub mod source;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{MarkovError, MarkovResult};
pub use model::chain::Chain;
pub use model::generator::{generate, Sentence, SentenceGenerator};
