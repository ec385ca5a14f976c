use std::collections::HashMap;
use std::path::Path;
use std::thread;

use serde::{Deserialize, Serialize};

use crate::corpus::TokenSequence;
use crate::error::{Error, Result};

/// Reserved name of the begin-key list, used when the chain is displayed
/// or exported as a flat mapping.
pub const BEGIN: &str = "__BEGIN__";

/// Reserved successor token marking the natural end of a sequence.
pub const END: &str = "__END__";

/// Longest key accepted. Larger requests are clamped: past this point the
/// chain is almost deterministic per source text.
pub const MAX_KEY_LENGTH: usize = 10;

/// Clamps a requested key length to `MAX_KEY_LENGTH`.
pub fn clamp_key_length(key_length: usize) -> usize {
	key_length.min(MAX_KEY_LENGTH)
}

/// Joins a window of tokens into a chain key.
pub fn join_key<S: AsRef<str>>(tokens: &[S]) -> String {
	tokens.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

/// Word-level Markov chain.
///
/// Maps a key (`key_length` space-joined tokens) to the list of tokens
/// observed right after it. Duplicates are kept: a successor seen twice is
/// twice as likely to be picked. Keys that open a source sequence are also
/// recorded in `begin`.
///
/// # Invariants
/// - Every entry of `links` has at least one successor
/// - Successor order is insertion order
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Chain {
	/// Keys allowed to start a generated sequence, one per source sequence
	begin: Vec<String>,

	/// Key -> observed successors
	links: HashMap<String, Vec<String>>,
}

impl Chain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a chain from `corpus`, extending `existing` if given.
	///
	/// Sequences shorter than `key_length + 1` contribute nothing.
	/// `key_length` above `MAX_KEY_LENGTH` is clamped.
	pub fn build(corpus: &[TokenSequence], key_length: usize, existing: Option<Chain>) -> Chain {
		let mut chain = existing.unwrap_or_default();
		chain.add_corpus(corpus, key_length);
		chain
	}

	/// Same result as `build` with no existing chain, but the corpus is split
	/// into chunks built on separate threads and merged back in chunk order.
	///
	/// # Errors
	/// Returns `Error::Worker` if a worker thread panics.
	pub fn build_parallel(corpus: &[TokenSequence], key_length: usize) -> Result<Chain> {
		if corpus.is_empty() {
			return Ok(Chain::new());
		}
		let chunks = num_cpus::get() * 8;
		let chunk_size = corpus.len().div_ceil(chunks);

		thread::scope(|scope| -> Result<Chain> {
			let handles: Vec<_> = corpus
				.chunks(chunk_size)
				.map(|chunk| scope.spawn(move || Chain::build(chunk, key_length, None)))
				.collect();

			let mut chain = Chain::new();
			for handle in handles {
				let partial = handle.join().map_err(|_| Error::Worker)?;
				chain.merge(&partial);
			}
			Ok(chain)
		})
	}

	/// Adds every sequence of `corpus` to the chain.
	pub fn add_corpus(&mut self, corpus: &[TokenSequence], key_length: usize) {
		let key_length = clamp_key_length(key_length);
		if key_length == 0 {
			return;
		}
		for sequence in corpus {
			self.add_sequence(sequence, key_length);
		}
	}

	/// Records the transitions of one token sequence.
	///
	/// Only the key at the first valid index is marked as a begin key.
	fn add_sequence(&mut self, sequence: &[String], key_length: usize) {
		for (offset, window) in sequence.windows(key_length + 1).enumerate() {
			let (key_tokens, next) = window.split_at(key_length);
			let key = join_key(key_tokens);

			if offset == 0 {
				self.begin.push(key.clone());
			}
			self.links.entry(key).or_default().extend(next.iter().cloned());
		}
	}

	/// Merges another chain into this one.
	///
	/// Begin keys and successor lists of `other` are appended after ours, so
	/// merging the chains of two corpora equals building their concatenation.
	pub fn merge(&mut self, other: &Chain) {
		self.begin.extend(other.begin.iter().cloned());
		for (key, successors) in &other.links {
			self.links.entry(key.clone()).or_default().extend(successors.iter().cloned());
		}
	}

	/// Keys allowed to start a sequence.
	pub fn begin_keys(&self) -> &[String] {
		&self.begin
	}

	/// Successors of `key`, `None` if the key was never seen.
	pub fn successors(&self, key: &str) -> Option<&[String]> {
		self.links.get(key).map(Vec::as_slice)
	}

	/// Number of distinct keys (begin list excluded).
	pub fn len(&self) -> usize {
		self.links.len()
	}

	/// True when nothing was learned.
	pub fn is_empty(&self) -> bool {
		self.begin.is_empty() && self.links.is_empty()
	}

	/// Flat view of the chain with the begin list stored under `BEGIN`.
	pub fn to_map(&self) -> HashMap<String, Vec<String>> {
		let mut map = self.links.clone();
		if !self.begin.is_empty() {
			map.insert(BEGIN.to_owned(), self.begin.clone());
		}
		map
	}
}

/// A chain persisted to disk along with what it was built from.
///
/// The snapshot is reused only while the key length and the corpus
/// fingerprint (sequence and token counts) still match.
#[derive(Serialize, Deserialize, Debug)]
pub struct ChainSnapshot {
	key_length: usize,
	sequences: usize,
	tokens: usize,
	chain: Chain,
}

impl ChainSnapshot {
	/// Wraps a chain built from `corpus`.
	pub fn new(chain: Chain, corpus: &[TokenSequence], key_length: usize) -> Self {
		Self {
			key_length: clamp_key_length(key_length),
			sequences: corpus.len(),
			tokens: corpus.iter().map(Vec::len).sum(),
			chain,
		}
	}

	/// Whether this snapshot was built from a corpus shaped like `corpus`.
	pub fn matches(&self, corpus: &[TokenSequence], key_length: usize) -> bool {
		self.key_length == clamp_key_length(key_length)
			&& self.sequences == corpus.len()
			&& self.tokens == corpus.iter().map(Vec::len).sum::<usize>()
	}

	/// Loads a snapshot, `Ok(None)` if the file does not exist.
	///
	/// # Errors
	/// Fails on unreadable files or undecodable content.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
		let path = path.as_ref();
		if !path.exists() {
			return Ok(None);
		}
		let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
		Ok(Some(postcard::from_bytes(&bytes)?))
	}

	/// Writes the snapshot with `postcard`.
	///
	/// # Errors
	/// Fails on encoding or write errors.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let bytes = postcard::to_stdvec(self)?;
		std::fs::write(path, bytes).map_err(|e| Error::io(path, e))
	}

	/// Consumes the snapshot and returns the chain.
	pub fn into_chain(self) -> Chain {
		self.chain
	}
}
