//! Phrase fetching from a search endpoint.
//!
//! The corpus is stored as documents with a `sentence` field. One
//! `match_all` query returns up to `size` of them.

use std::time::Duration;

use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// `{"query":{"bool":{"must":[{"match_all":{}}]}},"from":0,"size":N}`
#[derive(Serialize, Debug)]
struct SearchQuery {
	query: QueryClause,
	from: usize,
	size: usize,
}

#[derive(Serialize, Debug)]
struct QueryClause {
	#[serde(rename = "bool")]
	boolean: BoolClause,
}

#[derive(Serialize, Debug)]
struct BoolClause {
	must: Vec<MustClause>,
}

#[derive(Serialize, Debug)]
struct MustClause {
	match_all: MatchAll,
}

#[derive(Serialize, Debug)]
struct MatchAll {}

impl SearchQuery {
	fn match_all(size: usize) -> Self {
		Self {
			query: QueryClause { boolean: BoolClause { must: vec![MustClause { match_all: MatchAll {} }] } },
			from: 0,
			size,
		}
	}
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
	hits: Hits,
}

#[derive(Deserialize, Debug)]
struct Hits {
	hits: Vec<Hit>,
}

#[derive(Deserialize, Debug)]
struct Hit {
	#[serde(rename = "_source")]
	source: HitSource,
}

#[derive(Deserialize, Debug)]
struct HitSource {
	sentence: Option<String>,
}

impl SearchResponse {
	/// Documents without a `sentence` field are skipped.
	fn into_phrases(self) -> Vec<String> {
		self.hits.hits.into_iter().filter_map(|hit| hit.source.sentence).collect()
	}
}

/// Asynchronous client for the phrase index.
#[derive(Debug, Clone)]
pub struct SearchClient {
	client: Client,
	url: String,
	size: usize,
}

impl SearchClient {
	/// Creates a client with a request timeout.
	pub fn new(url: &str, size: usize, timeout: Duration) -> reqwest::Result<Self> {
		let client = Client::builder().timeout(timeout).build()?;
		Ok(Self { client, url: url.to_owned(), size })
	}

	/// Runs the `match_all` query and returns the phrases.
	pub async fn phrases(&self) -> reqwest::Result<Vec<String>> {
		let response: SearchResponse = self
			.client
			.post(&self.url)
			.json(&SearchQuery::match_all(self.size))
			.send()
			.await?
			.error_for_status()?
			.json()
			.await?;

		let phrases = response.into_phrases();
		info!("Fetched {} phrase(s) from {}", phrases.len(), self.url);
		Ok(phrases)
	}
}
