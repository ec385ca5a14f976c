//! Post-processing applied to a candidate before the originality check.

use regex::Regex;

use crate::config::GenerationConfig;
use crate::error::Result;

/// Mention-like tokens: `@Some_User-Mention.1337`, `.@name`, `@name:`.
pub const MENTION_PATTERN: &str = r"^\.?@[\w\-.]+";

/// URL-like tokens.
pub const URL_PATTERN: &str = r"^(?i:https?://|www\.)\S+";

/// Removes stop words and pattern-matching tokens from a sequence.
#[derive(Debug, Clone)]
pub struct PostFilter {
	/// Lowercase stop words
	stop_words: Vec<String>,
	patterns: Vec<Regex>,
}

impl PostFilter {
	/// Compiles a filter from explicit stop words and patterns.
	///
	/// # Errors
	/// Returns `Error::Pattern` if a pattern does not compile.
	pub fn new<S: AsRef<str>, P: AsRef<str>>(stop_words: &[S], patterns: &[P]) -> Result<Self> {
		let patterns = patterns.iter().map(|p| Regex::new(p.as_ref())).collect::<std::result::Result<_, _>>()?;
		Ok(Self {
			stop_words: stop_words.iter().map(|w| w.as_ref().to_lowercase()).collect(),
			patterns,
		})
	}

	/// Filter described by a configuration: its stop words, the mention
	/// pattern, and the URL pattern unless `keep_urls` is set.
	///
	/// # Errors
	/// Returns `Error::Pattern` if a pattern does not compile.
	pub fn from_config(config: &GenerationConfig) -> Result<Self> {
		let mut patterns = vec![MENTION_PATTERN];
		if !config.keep_urls {
			patterns.push(URL_PATTERN);
		}
		Self::new(&config.stop_words, &patterns)
	}

	/// A filter that keeps everything.
	pub fn none() -> Self {
		Self { stop_words: Vec::new(), patterns: Vec::new() }
	}

	/// Whether `token` would be removed.
	pub fn rejects(&self, token: &str) -> bool {
		let lower = token.to_lowercase();
		self.stop_words.iter().any(|w| *w == lower) || self.patterns.iter().any(|p| p.is_match(token))
	}

	/// Drops every rejected token, keeping the order of the others.
	pub fn apply(&self, words: Vec<String>) -> Vec<String> {
		words.into_iter().filter(|w| !self.rejects(w)).collect()
	}
}
