//! Wires corpus fetching, chain building and generation into one call.

use std::path::PathBuf;

use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;

use crate::config::GenerationConfig;
use crate::corpus::{is_source_name, Corpus, CorpusProvider, TokenSequence};
use crate::error::{Error, Result};
use crate::filter::PostFilter;
use crate::io;
use crate::model::chain::{clamp_key_length, Chain, ChainSnapshot};
use crate::model::generator::Generator;
use crate::model::originality::OriginalityCheck;

/// Finished generation, ready to be delivered or persisted.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Generation {
	/// Generated text (or the failure sentinel)
	pub text: String,
	/// Same text as tokens
	#[serde(skip)]
	pub words: TokenSequence,
	/// Whether the text passed the originality test
	pub original: bool,
	/// Attempts spent
	pub attempts: usize,
	/// Sources the chain was built from
	pub sources: Vec<String>,
}

/// Generation pipeline over a corpus provider.
#[derive(Debug)]
pub struct Orchestrator<P> {
	provider: P,
	config: GenerationConfig,
	filter: PostFilter,
	snapshot_dir: Option<PathBuf>,
}

impl<P: CorpusProvider> Orchestrator<P> {
	/// Validates `config` and compiles its post-processing filter.
	///
	/// # Errors
	/// `Error::InvalidParameter` or `Error::Pattern`.
	pub fn new(provider: P, config: GenerationConfig) -> Result<Self> {
		config.validate()?;
		let filter = PostFilter::from_config(&config)?;
		Ok(Self { provider, config, filter, snapshot_dir: None })
	}

	/// Caches per-source chains as `postcard` snapshots in `dir`.
	pub fn with_snapshots<D: Into<PathBuf>>(mut self, dir: D) -> Self {
		self.snapshot_dir = Some(dir.into());
		self
	}

	/// Active configuration.
	pub fn config(&self) -> &GenerationConfig {
		&self.config
	}

	/// Underlying corpus provider.
	pub fn provider(&self) -> &P {
		&self.provider
	}

	/// Generates one message from `sources`, mentioning `recipients` at the end.
	///
	/// The per-source chains are merged in source order and the lowercase
	/// rejoined corpus is computed once for the originality test.
	///
	/// # Errors
	/// `Error::MissingSources` on an empty source list, or any provider or
	/// snapshot error.
	pub fn generate<S, T, R>(&self, sources: &[S], recipients: &[T], rng: &mut R) -> Result<Generation>
	where
		S: AsRef<str>,
		T: AsRef<str>,
		R: Rng + ?Sized,
	{
		if sources.is_empty() {
			return Err(Error::MissingSources);
		}
		let sources: Vec<String> = sources.iter().map(|s| s.as_ref().to_owned()).collect();
		let key_length = clamp_key_length(self.config.key_length);
		info!("Generating from {} with key length {key_length}", sources.join(", "));

		let mut corpus = Corpus::default();
		let mut chain = Chain::new();
		for source in &sources {
			let sequences = self.provider.fetch(source)?;
			debug!("Source '{source}': {} sequences", sequences.len());
			chain.merge(&self.chain_for(source, &sequences, key_length)?);
			corpus.extend(sequences);
		}

		let corpus_lower = corpus.rejoined_lower();
		let check = OriginalityCheck::new(&corpus_lower, self.config.originality_rules());
		let generator = Generator::new(&chain, key_length, &self.filter, check);
		let outcome = generator.generate(recipients, self.config.max_words, self.config.max_tries, rng);

		if !outcome.original {
			warn!("No original message after {} attempts", outcome.attempts);
		}

		Ok(Generation {
			text: outcome.text(),
			words: outcome.words,
			original: outcome.original,
			attempts: outcome.attempts,
			sources,
		})
	}

	/// Chain of a single source, from its snapshot when one is current.
	fn chain_for(&self, source: &str, sequences: &[TokenSequence], key_length: usize) -> Result<Chain> {
		let Some(dir) = &self.snapshot_dir else {
			return Chain::build_parallel(sequences, key_length);
		};
		if !is_source_name(source) {
			warn!("Source '{source}' is not a valid snapshot name, building without cache");
			return Chain::build_parallel(sequences, key_length);
		}

		let path = io::snapshot_path(dir, source, key_length);
		if let Some(snapshot) = ChainSnapshot::load(&path)? {
			if snapshot.matches(sequences, key_length) {
				debug!("Using chain snapshot {}", path.display());
				return Ok(snapshot.into_chain());
			}
			debug!("Chain snapshot {} is stale", path.display());
		}

		let chain = Chain::build_parallel(sequences, key_length)?;
		io::ensure_parent(&path).map_err(|e| Error::io(&path, e))?;
		let snapshot = ChainSnapshot::new(chain, sequences, key_length);
		snapshot.save(&path)?;
		Ok(snapshot.into_chain())
	}
}
