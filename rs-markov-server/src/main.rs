use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{delete, get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{error, info};
use serde::{Deserialize, Serialize};

use rs_markov_core::cache::ChainCache;
use rs_markov_core::model::chain_store::ChainStore;
use rs_markov_core::model::generation_input::{GenerationInput, WalkMode};
use rs_markov_core::model::generator::SentenceGenerator;
use rs_markov_core::source::{FilePhraseSource, PhraseSource};
use rs_markov_core::{Chain, MarkovError};

mod config;
mod search;

use config::ServerConfig;
use search::SearchClient;

/// Where the corpus comes from when the chain has to be built.
#[derive(Debug)]
pub enum Corpus {
	Search(SearchClient),
	File(FilePhraseSource),
}

impl Corpus {
	async fn phrases(&self) -> Result<Vec<String>, String> {
		match self {
			Corpus::Search(client) => client.phrases().await.map_err(|e| format!("Phrase search failed: {e}")),
			Corpus::File(source) => source.phrases().map_err(|e| format!("Phrase file failed: {e}")),
		}
	}
}

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	min_length: Option<usize>,
	walk: Option<String>, // positional or graph, server default when absent
}

impl GenerateParams {
	/// Builds the generation input, drawing the walk length like the title
	/// front-end does when none is given.
	fn generation_input(&self, default_walk: WalkMode) -> Result<GenerationInput, String> {
		let min_length = self
			.min_length
			.unwrap_or_else(|| GenerationInput::random_min_length(&mut rand::rng()));
		let walk = match &self.walk {
			None => default_walk,
			Some(s) => s.parse::<WalkMode>()?,
		};
		GenerationInput::new(min_length)
			.map(|input| input.with_walk(walk))
			.map_err(|e| e.to_string())
	}
}

/// Body of `/v1/chain`.
#[derive(Serialize, Deserialize, Debug)]
struct ChainInfo {
	loaded: bool,
	entries: usize,
	successors: usize,
	cache: String,
	key: String,
}

struct SharedData {
	store: ChainStore<Box<dyn ChainCache + Send>>,
}

struct AppState {
	data: Mutex<SharedData>,
	corpus: Corpus,
	walk: WalkMode,
}

impl AppState {
	fn new(cache: Box<dyn ChainCache + Send>, corpus: Corpus, walk: WalkMode) -> Self {
		Self { data: Mutex::new(SharedData { store: ChainStore::new(cache) }), corpus, walk }
	}

	/// Returns the chain in use, building it from the corpus on a cache miss.
	///
	/// The lock is released while the corpus is fetched.
	async fn chain(&self) -> Result<Arc<Chain>, HttpResponse> {
		{
			let mut shared_data = self.lock()?;
			match shared_data.store.load() {
				Ok(Some(chain)) => return Ok(chain),
				Ok(None) => (),
				Err(e) => return Err(markov_error_response(&e)),
			}
		}

		let phrases = match self.corpus.phrases().await {
			Ok(phrases) => phrases,
			Err(e) => {
				error!("{e}");
				return Err(HttpResponse::BadGateway().body(e));
			}
		};

		let mut shared_data = self.lock()?;
		shared_data.store.build_and_store(&phrases).map_err(|e| markov_error_response(&e))
	}

	fn lock(&self) -> Result<std::sync::MutexGuard<'_, SharedData>, HttpResponse> {
		self.data
			.lock()
			.map_err(|_| HttpResponse::InternalServerError().body("Chain lock failed"))
	}
}

/// Maps a core error to a response: unusable chains are 503, bad input 400.
fn markov_error_response(e: &MarkovError) -> HttpResponse {
	match e {
		MarkovError::EmptyChain | MarkovError::NoSeedCandidate | MarkovError::NoEndingCandidate => {
			HttpResponse::ServiceUnavailable().body(e.to_string())
		}
		MarkovError::InvalidMinLength(_) => HttpResponse::BadRequest().body(e.to_string()),
		_ => {
			error!("{e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates a title from the chain, building it first if needed.
/// Returns the title as the response body.
#[get("/v1/generate")]
async fn get_generated(state: web::Data<AppState>, query: web::Query<GenerateParams>) -> impl Responder {
	let input = match query.generation_input(state.walk) {
		Ok(input) => input,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let chain = match state.chain().await {
		Ok(chain) => chain,
		Err(response) => return response,
	};

	match SentenceGenerator::new(&chain, input).and_then(|generator| generator.generate(&mut rand::rng())) {
		Ok(title) => HttpResponse::Ok().body(title),
		Err(e) => markov_error_response(&e),
	}
}

/// HTTP DELETE endpoint `/v1/cache`
///
/// Drops the cached chain; the next generation rebuilds it.
#[delete("/v1/cache")]
async fn delete_cache(state: web::Data<AppState>) -> impl Responder {
	let mut shared_data = match state.lock() {
		Ok(guard) => guard,
		Err(response) => return response,
	};

	match shared_data.store.clear() {
		Ok(()) => HttpResponse::Ok().body("Cache cleared."),
		Err(e) => markov_error_response(&e),
	}
}

/// HTTP GET endpoint `/v1/chain`
///
/// Reports the chain in use without building it.
#[get("/v1/chain")]
async fn get_chain(state: web::Data<AppState>) -> impl Responder {
	let mut shared_data = match state.lock() {
		Ok(guard) => guard,
		Err(response) => return response,
	};

	let chain = match shared_data.store.load() {
		Ok(chain) => chain,
		Err(e) => return markov_error_response(&e),
	};

	HttpResponse::Ok().json(ChainInfo {
		loaded: chain.is_some(),
		entries: chain.as_ref().map_or(0, |c| c.len()),
		successors: chain.as_ref().map_or(0, |c| c.successor_count()),
		cache: shared_data.store.cache().name().to_owned(),
		key: shared_data.store.key().to_owned(),
	})
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated).service(delete_cache).service(get_chain);
}

/// Main entry point for the server.
///
/// Reads the configuration, wraps the chain store in a `Mutex` and starts an
/// Actix-web HTTP server. The chain is built on the first request.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let config = ServerConfig::parse();
	let corpus = config.corpus().map_err(std::io::Error::other)?;
	let state = web::Data::new(AppState::new(config.cache(), corpus, config.walk));

	info!("Listening on {}:{} ({} walk)", config.bind, config.port, config.walk);

	HttpServer::new(move || {
		App::new()
			.wrap(Logger::default())
			.wrap(Cors::permissive())
			.app_data(state.clone())
			.configure(routes)
	})
		.bind((config.bind.as_str(), config.port))?
		.run()
		.await
}
