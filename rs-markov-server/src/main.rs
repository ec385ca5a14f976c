use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};

use rs_markov_core::archive::GenerationLog;
use rs_markov_core::config::GenerationConfig;
use rs_markov_core::corpus::DirectoryCorpus;
use rs_markov_core::error::Error;
use rs_markov_core::orchestrator::Orchestrator;

const DATA_DIR: &str = "./data";
const LOG_PATH: &str = "./generated/generated_messages.log";

/// Query parameters of the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	/// Comma-separated source names
	sources: Option<String>,
	/// Comma-separated names to mention, defaults to the sources
	mentions: Option<String>,
	key_length: Option<usize>,
	keep_urls: Option<bool>,
	max_words: Option<usize>,
	max_tries: Option<usize>,
	max_chars: Option<usize>,
	overlap_ratio: Option<f64>,
	overlap_total_cap: Option<usize>,
}

/// Body returned by `/v1/generate`
#[derive(Serialize)]
struct GenerateResponse {
	id: u64,
	text: String,
	original: bool,
	attempts: usize,
	sources: Vec<String>,
}

struct SharedData {
	provider: DirectoryCorpus,
	log: GenerationLog,
}

impl GenerateParams {
	fn config(&self) -> GenerationConfig {
		let mut config = GenerationConfig::default();
		if let Some(key_length) = self.key_length {
			config.key_length = key_length;
		}
		if let Some(keep_urls) = self.keep_urls {
			config.keep_urls = keep_urls;
		}
		if let Some(max_words) = self.max_words {
			config.max_words = max_words;
		}
		if let Some(max_tries) = self.max_tries {
			config.max_tries = max_tries;
		}
		if let Some(max_chars) = self.max_chars {
			config.max_chars = max_chars;
		}
		if let Some(overlap_ratio) = self.overlap_ratio {
			config.overlap_ratio = overlap_ratio;
		}
		if let Some(overlap_total_cap) = self.overlap_total_cap {
			config.overlap_total_cap = overlap_total_cap;
		}
		config
	}

	fn sources(&self) -> Vec<String> {
		split_names(self.sources.as_deref())
	}

	fn mentions(&self) -> Vec<String> {
		match self.mentions.as_deref() {
			Some(mentions) => split_names(Some(mentions)),
			None => self.sources(),
		}
	}
}

fn split_names(names: Option<&str>) -> Vec<String> {
	names
		.unwrap_or_default()
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect()
}

fn error_response(e: &Error) -> HttpResponse {
	match e {
		Error::UnknownSource { .. } => HttpResponse::NotFound().body(e.to_string()),
		_ if e.is_caller_error() => HttpResponse::BadRequest().body(e.to_string()),
		_ => {
			error!("{e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Builds a chain from the requested sources, generates one message and
/// appends it to the generation log.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Shared state lock failed"),
	};

	let orchestrator = match Orchestrator::new(shared_data.provider.clone(), query.config()) {
		Ok(o) => o,
		Err(e) => return error_response(&e),
	};

	let generation = match orchestrator.generate(&query.sources(), &query.mentions(), &mut rand::rng()) {
		Ok(g) => g,
		Err(e) => return error_response(&e),
	};

	let record = match shared_data.log.append(&generation.text, &generation.sources) {
		Ok(r) => r,
		Err(e) => return error_response(&e),
	};
	info!("Generated #{} (original: {})", record.id, generation.original);

	HttpResponse::Ok().json(GenerateResponse {
		id: record.id,
		text: generation.text,
		original: generation.original,
		attempts: generation.attempts,
		sources: generation.sources,
	})
}

/// HTTP GET endpoint `/v1/sources`, one available source per line
#[get("/v1/sources")]
async fn get_sources(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Shared state lock failed"),
	};
	match shared_data.provider.list_sources() {
		Ok(sources) => HttpResponse::Ok().body(sources.join("\n")),
		Err(e) => error_response(&e),
	}
}

/// Main entry point for the server.
///
/// Serves sources from `./data` and logs generations to
/// `./generated/generated_messages.log`.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Each request builds its own chain; the mutex only serializes log writes.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let provider = DirectoryCorpus::new(DATA_DIR).map_err(std::io::Error::other)?;
	let shared_data = SharedData { provider, log: GenerationLog::new(LOG_PATH) };
	let shared_data = web::Data::new(Mutex::new(shared_data));

	info!("Listening on 127.0.0.1:5000");
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]))
			.app_data(shared_data.clone())
			.service(get_generated)
			.service(get_sources)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
