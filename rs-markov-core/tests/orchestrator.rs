//! End-to-end generation through the orchestrator

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_markov_core::config::GenerationConfig;
use rs_markov_core::corpus::{tokenize, TokenSequence};
use rs_markov_core::error::Error;
use rs_markov_core::model::generator::UNABLE_TO_GENERATE;
use rs_markov_core::orchestrator::Orchestrator;

const NO_MENTIONS: [&str; 0] = [];

fn provider() -> HashMap<String, Vec<TokenSequence>> {
	let mut sources = HashMap::new();
	sources.insert(
		"alice".to_owned(),
		vec![tokenize("I love sunny days at the beach"), tokenize("sunny mornings make me happy")],
	);
	sources.insert(
		"bob".to_owned(),
		vec![tokenize("I love rainy days in the city"), tokenize("rainy nights make me sleepy")],
	);
	sources.insert("copycat".to_owned(), vec![tokenize("a b c d")]);
	sources
}

#[test]
fn test_requires_sources() {
	let orchestrator = Orchestrator::new(provider(), GenerationConfig::default()).unwrap();
	let none: [&str; 0] = [];
	let result = orchestrator.generate(&none, &none, &mut StdRng::seed_from_u64(0));
	assert!(matches!(result, Err(Error::MissingSources)));
}

#[test]
fn test_unknown_source() {
	let orchestrator = Orchestrator::new(provider(), GenerationConfig::default()).unwrap();
	let result = orchestrator.generate(&["nobody"], &NO_MENTIONS, &mut StdRng::seed_from_u64(0));
	assert!(matches!(result, Err(Error::UnknownSource { name }) if name == "nobody"));
}

#[test]
fn test_invalid_config_is_refused() {
	let config = GenerationConfig { max_tries: 0, ..Default::default() };
	assert!(matches!(
		Orchestrator::new(provider(), config),
		Err(Error::InvalidParameter { parameter: "max_tries", .. })
	));
}

#[test]
fn test_failure_sentinel_after_max_tries() {
	let config = GenerationConfig { max_tries: 4, ..Default::default() };
	let orchestrator = Orchestrator::new(provider(), config).unwrap();
	let generation = orchestrator.generate(&["copycat"], &NO_MENTIONS, &mut StdRng::seed_from_u64(2)).unwrap();

	assert!(!generation.original);
	assert_eq!(generation.attempts, 4);
	assert_eq!(generation.text, UNABLE_TO_GENERATE);
	assert_eq!(generation.sources, vec!["copycat".to_owned()]);
}

#[test]
fn test_generation_is_reproducible() {
	let config = GenerationConfig { max_tries: 50, ..Default::default() };
	let orchestrator = Orchestrator::new(provider(), config).unwrap();

	let first = orchestrator.generate(&["alice", "bob"], &["alice", "bob"], &mut StdRng::seed_from_u64(21)).unwrap();
	let second = orchestrator.generate(&["alice", "bob"], &["alice", "bob"], &mut StdRng::seed_from_u64(21)).unwrap();

	assert_eq!(first, second);
	assert_eq!(first.sources, vec!["alice".to_owned(), "bob".to_owned()]);
	if first.original {
		assert!(first.text.ends_with("@alice @bob"));
		assert!(first.text.chars().count() <= 140);
		assert!(first.words.len() <= 25);
	}
}

#[test]
fn test_snapshots_are_written_and_reused() {
	let dir = tempfile::tempdir().unwrap();
	let config = GenerationConfig { key_length: 2, max_tries: 50, ..Default::default() };
	let orchestrator = Orchestrator::new(provider(), config).unwrap().with_snapshots(dir.path());

	let first = orchestrator.generate(&["alice", "bob"], &NO_MENTIONS, &mut StdRng::seed_from_u64(8)).unwrap();
	assert!(dir.path().join("alice.k2.bin").is_file());
	assert!(dir.path().join("bob.k2.bin").is_file());

	let second = orchestrator.generate(&["alice", "bob"], &NO_MENTIONS, &mut StdRng::seed_from_u64(8)).unwrap();
	assert_eq!(first, second);
}

#[test]
fn test_key_length_above_maximum_is_clamped() {
	let config = GenerationConfig { key_length: 30, ..Default::default() };
	let orchestrator = Orchestrator::new(provider(), config).unwrap();
	// Sources are shorter than 11 tokens: nothing to learn, no attempt made
	let generation = orchestrator.generate(&["alice"], &NO_MENTIONS, &mut StdRng::seed_from_u64(0)).unwrap();
	assert!(!generation.original);
	assert_eq!(generation.attempts, 0);
}

#[test]
fn test_sources_and_mentions_take_different_types() {
	let config = GenerationConfig { max_tries: 50, ..Default::default() };
	let orchestrator = Orchestrator::new(provider(), config).unwrap();
	let sources: Vec<String> = vec!["alice".to_owned(), "bob".to_owned()];

	let generation = orchestrator.generate(&sources, &["carol"], &mut StdRng::seed_from_u64(4)).unwrap();
	assert_eq!(generation.sources, sources);
	if generation.original {
		assert!(generation.text.ends_with("@carol"));
	}
}

#[test]
fn test_snapshot_names_stay_inside_directory() {
	let root = tempfile::tempdir().unwrap();
	let snapshots = root.path().join("snapshots");
	let mut sources = provider();
	let escaping = sources.remove("alice").unwrap();
	sources.insert("../escaped".to_owned(), escaping);

	let config = GenerationConfig { max_tries: 50, ..Default::default() };
	let orchestrator = Orchestrator::new(sources, config).unwrap().with_snapshots(&snapshots);
	let generation = orchestrator.generate(&["../escaped", "bob"], &NO_MENTIONS, &mut StdRng::seed_from_u64(6)).unwrap();

	assert_eq!(generation.sources.len(), 2);
	assert!(!root.path().join("escaped.k1.bin").exists());
	assert!(snapshots.join("bob.k1.bin").is_file());
	assert_eq!(std::fs::read_dir(&snapshots).unwrap().count(), 1);
}
