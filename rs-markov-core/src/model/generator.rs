use log::{debug, warn};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::corpus::TokenSequence;
use crate::filter::PostFilter;
use crate::model::chain::{clamp_key_length, join_key, Chain, END};
use crate::model::originality::OriginalityCheck;

/// Text returned when no original candidate could be produced.
pub const UNABLE_TO_GENERATE: &str = "UNABLE TO GENERATE ORIGINAL MESSAGE";

/// Terminal punctuation appended to a sequence cut by the word budget.
const TERMINAL_PUNCTUATION: [char; 3] = ['.', '?', '!'];

/// Result of a `Generator::generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
	/// Generated tokens, or the failure sentinel split into words
	pub words: TokenSequence,
	/// Whether the words passed the originality test
	pub original: bool,
	/// Number of full attempts performed
	pub attempts: usize,
}

impl Outcome {
	fn unable(attempts: usize) -> Self {
		Self {
			words: UNABLE_TO_GENERATE.split(' ').map(str::to_owned).collect(),
			original: false,
			attempts,
		}
	}

	/// Words joined with a single space.
	pub fn text(&self) -> String {
		self.words.join(" ")
	}
}

/// Random walk over a `Chain`, with post-processing and originality retries.
///
/// # Responsibilities
/// - Start each attempt from a random begin key
/// - Extend the sequence until `END` or the word budget is reached
/// - Clean the result, append trailing mentions, and test its originality
/// - Retry with a fresh walk, at most `max_tries` times
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
	chain: &'a Chain,
	key_length: usize,
	filter: &'a PostFilter,
	check: OriginalityCheck<'a>,
}

impl<'a> Generator<'a> {
	/// Creates a generator. `key_length` must be the one the chain was built with.
	pub fn new(chain: &'a Chain, key_length: usize, filter: &'a PostFilter, check: OriginalityCheck<'a>) -> Self {
		Self { chain, key_length: clamp_key_length(key_length), filter, check }
	}

	/// Generates one sequence.
	///
	/// `trailing` names are appended as `@name` after filtering; they count
	/// against `max_words`. Every random choice is drawn from `rng`, so a
	/// seeded generator gives reproducible output.
	///
	/// Returns the sentinel outcome (`original == false`) once `max_tries`
	/// attempts were rejected, or right away if the chain has no begin key.
	pub fn generate<S, R>(&self, trailing: &[S], max_words: usize, max_tries: usize, rng: &mut R) -> Outcome
	where
		S: AsRef<str>,
		R: Rng + ?Sized,
	{
		if self.chain.begin_keys().is_empty() {
			warn!("Chain has no begin key, nothing to generate");
			return Outcome::unable(0);
		}

		let budget = max_words.saturating_sub(self.key_length + trailing.len());

		for attempt in 1..=max_tries {
			if let Some(words) = self.attempt(trailing, budget, rng) {
				debug!("Attempt {attempt} accepted");
				return Outcome { words, original: true, attempts: attempt };
			}
			debug!("Attempt {attempt} rejected");
		}

		Outcome::unable(max_tries)
	}

	/// One full walk. `None` when the candidate fails the originality test.
	fn attempt<S, R>(&self, trailing: &[S], budget: usize, rng: &mut R) -> Option<TokenSequence>
	where
		S: AsRef<str>,
		R: Rng + ?Sized,
	{
		let start = self.chain.begin_keys().choose(rng)?;
		let mut window: Vec<String> = start.split(' ').map(str::to_owned).collect();
		let mut sentence = window.clone();

		for _ in 0..budget {
			let key = join_key(&window);
			let Some(successors) = self.chain.successors(&key) else {
				warn!("Key '{key}' not found in chain, cutting the sequence short");
				break;
			};
			let Some(next) = successors.choose(rng) else {
				break;
			};

			if next == END {
				return self.finish(sentence, trailing);
			}

			sentence.push(next.clone());
			window.remove(0);
			window.push(next.clone());
		}

		punctuate(&mut sentence, rng);
		self.finish(sentence, trailing)
	}

	/// Filters, appends mentions, and runs the originality test.
	fn finish<S: AsRef<str>>(&self, sentence: TokenSequence, trailing: &[S]) -> Option<TokenSequence> {
		let mut words = self.filter.apply(sentence);
		words.extend(trailing.iter().map(|name| format!("@{}", name.as_ref())));
		self.check.passes(&words).then_some(words)
	}
}

/// Makes sure the last token ends with `.`, `?` or `!`, appending a random one otherwise.
fn punctuate<R: Rng + ?Sized>(sentence: &mut TokenSequence, rng: &mut R) {
	if let Some(last) = sentence.last_mut() {
		if !last.ends_with(TERMINAL_PUNCTUATION) {
			if let Some(mark) = TERMINAL_PUNCTUATION.choose(rng) {
				last.push(*mark);
			}
		}
	}
}
