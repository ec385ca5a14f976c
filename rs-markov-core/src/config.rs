use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::originality::OriginalityRules;

/// Generation parameters.
///
/// Every field has a default so a partial JSON document or query string
/// deserializes into a complete configuration.
///
/// # Invariants (checked by `validate`)
/// - `key_length >= 1` (values above 10 are clamped when the chain is built)
/// - `max_words >= 1`, `max_tries >= 1`
/// - `overlap_ratio` in `[0.0, 1.0]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
	/// Number of tokens per chain key.
	pub key_length: usize,

	/// Keep URL-like tokens in the generated text.
	pub keep_urls: bool,

	/// Maximum number of words, trailing mentions included.
	pub max_words: usize,

	/// Number of full generation attempts before giving up.
	pub max_tries: usize,

	/// Maximum length of the generated text, in characters.
	pub max_chars: usize,

	/// Share of the candidate's words allowed to be copied in a row.
	pub overlap_ratio: f64,

	/// Hard cap on consecutive copied words.
	pub overlap_total_cap: usize,

	/// Tokens removed from the output, compared case-insensitively.
	pub stop_words: Vec<String>,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			key_length: 1,
			keep_urls: false,
			max_words: 25,
			max_tries: 10,
			max_chars: 140,
			overlap_ratio: 0.5,
			overlap_total_cap: 15,
			stop_words: vec!["rt".to_owned()],
		}
	}
}

impl GenerationConfig {
	/// Checks every field against its allowed range.
	///
	/// # Errors
	/// Returns `Error::InvalidParameter` naming the first bad field.
	pub fn validate(&self) -> Result<()> {
		if self.key_length == 0 {
			return Err(invalid("key_length", self.key_length, "must be at least 1"));
		}
		if self.max_words == 0 {
			return Err(invalid("max_words", self.max_words, "must be at least 1"));
		}
		if self.max_tries == 0 {
			return Err(invalid("max_tries", self.max_tries, "must be at least 1"));
		}
		if !(0.0..=1.0).contains(&self.overlap_ratio) {
			return Err(invalid("overlap_ratio", self.overlap_ratio, "must be between 0.0 and 1.0"));
		}
		Ok(())
	}

	/// Originality thresholds carried by this configuration.
	pub fn originality_rules(&self) -> OriginalityRules {
		OriginalityRules {
			max_chars: self.max_chars,
			overlap_ratio: self.overlap_ratio,
			overlap_total_cap: self.overlap_total_cap,
		}
	}
}

fn invalid<T: ToString>(parameter: &'static str, value: T, reason: &'static str) -> Error {
	Error::InvalidParameter { parameter, value: value.to_string(), reason }
}
