use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_markov_core::archive::GenerationLog;
use rs_markov_core::config::GenerationConfig;
use rs_markov_core::corpus::DirectoryCorpus;
use rs_markov_core::model::chain::clamp_key_length;
use rs_markov_core::orchestrator::Orchestrator;

/// Generate a random message from the texts of one or more sources
#[derive(Parser, Debug)]
#[command(name = "rs-markov", version, about)]
struct Cli {
	/// Sources to learn from (`<data-dir>/<source>.txt`, one text per line)
	#[arg(required = true, value_name = "SOURCE")]
	sources: Vec<String>,

	/// Directory holding the source files
	#[arg(short, long, default_value = "./data")]
	data_dir: PathBuf,

	/// JSON file with generation parameters (flags below take precedence)
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Number of words per chain key, max of 10
	#[arg(short, long)]
	key_length: Option<usize>,

	/// Keep urls in the generated message
	#[arg(long)]
	keep_urls: bool,

	/// Maximum number of words, mentions included
	#[arg(long)]
	max_words: Option<usize>,

	/// Maximum number of attempts at an original message
	#[arg(long)]
	max_tries: Option<usize>,

	/// Maximum message length in characters
	#[arg(long)]
	max_chars: Option<usize>,

	/// Share of the message's words allowed to be copied in a row (0.0 to 1.0)
	#[arg(long)]
	overlap_ratio: Option<f64>,

	/// Hard cap on consecutive words copied from the sources
	#[arg(long)]
	overlap_total_cap: Option<usize>,

	/// Names mentioned at the end of the message (defaults to the sources)
	#[arg(short, long = "mention", value_name = "NAME")]
	mentions: Vec<String>,

	/// Do not mention anyone
	#[arg(long, conflicts_with = "mentions")]
	no_mentions: bool,

	/// Seed for reproducible output
	#[arg(long)]
	seed: Option<u64>,

	/// Generation log file
	#[arg(long, default_value = "./generated/generated_messages.log")]
	log: PathBuf,

	/// Do not append the message to the generation log
	#[arg(long)]
	no_save: bool,

	/// Cache built chains next to the source files
	#[arg(long)]
	snapshots: bool,

	/// More logging (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

impl Cli {
	/// Configuration file values overridden by explicit flags.
	fn generation_config(&self) -> anyhow::Result<GenerationConfig> {
		let mut config = match &self.config {
			Some(path) => {
				let raw = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
				serde_json::from_str(&raw).with_context(|| format!("Parsing {}", path.display()))?
			}
			None => GenerationConfig::default(),
		};

		if let Some(key_length) = self.key_length {
			config.key_length = key_length;
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
		config.keep_urls |= self.keep_urls;
		Ok(config)
	}

	fn recipients(&self) -> Vec<String> {
		if self.no_mentions {
			Vec::new()
		} else if self.mentions.is_empty() {
			self.sources.clone()
		} else {
			self.mentions.clone()
		}
	}

	fn log_level(&self) -> &'static str {
		match self.verbose {
			0 => "warn",
			1 => "info",
			_ => "debug",
		}
	}
}

/// Title line shown above the message, with the key length actually used.
fn banner(sources: &[String], key_length: usize) -> String {
	let title = format!(" Message from {} --> key_len: {} ", sources.join(" and "), clamp_key_length(key_length));
	format!("{title:=^80}")
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level())).init();

	let config = cli.generation_config()?;
	let provider = DirectoryCorpus::new(&cli.data_dir)?;
	let snapshot_dir = provider.dir().to_path_buf();
	let mut orchestrator = Orchestrator::new(provider, config)?;
	if cli.snapshots {
		orchestrator = orchestrator.with_snapshots(snapshot_dir);
	}

	let mut rng = match cli.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	let generation = orchestrator.generate(&cli.sources, &cli.recipients(), &mut rng)?;

	println!("\n{}\n", banner(&generation.sources, orchestrator.config().key_length));
	println!("{}", generation.text);
	if !generation.original {
		warn!("No original message after {} attempts", generation.attempts);
	}

	if !cli.no_save {
		let record = GenerationLog::new(&cli.log).append(&generation.text, &generation.sources)?;
		info!("Saved as #{} in {}", record.id, cli.log.display());
	}

	Ok(())
}
