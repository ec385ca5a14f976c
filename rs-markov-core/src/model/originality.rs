use serde::{Deserialize, Serialize};

/// Thresholds of the originality test.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct OriginalityRules {
	/// Maximum length of the joined candidate, in characters.
	pub max_chars: usize,
	/// Share of the candidate's words allowed to match the source in a row.
	pub overlap_ratio: f64,
	/// Absolute cap on consecutive matching words.
	pub overlap_total_cap: usize,
}

impl Default for OriginalityRules {
	fn default() -> Self {
		Self { max_chars: 140, overlap_ratio: 0.5, overlap_total_cap: 15 }
	}
}

impl OriginalityRules {
	/// Longest run of consecutive words that may match the corpus for a
	/// candidate of `word_count` words.
	///
	/// The ratio product is rounded half to even.
	pub fn overlap_max(&self, word_count: usize) -> usize {
		let by_ratio = (self.overlap_ratio * word_count as f64).round_ties_even() as usize;
		self.overlap_total_cap.min(by_ratio)
	}
}

/// Tells whether a candidate is short enough and not a near-copy of the corpus.
///
/// `corpus_text_lower` is the lowercase rejoined corpus. Every slice of
/// `overlap_max + 1` consecutive words (the last ones may be shorter) is
/// looked up in it as a plain substring; any hit rejects the candidate.
pub fn is_original<S: AsRef<str>>(words: &[S], corpus_text_lower: &str, rules: &OriginalityRules) -> bool {
	let words: Vec<&str> = words.iter().map(AsRef::as_ref).collect();
	if words.join(" ").chars().count() > rules.max_chars {
		return false;
	}

	let overlap_max = rules.overlap_max(words.len());
	let window_size = overlap_max + 1;
	let gram_count = words.len().saturating_sub(overlap_max).max(1);

	!(0..gram_count).any(|start| {
		let end = (start + window_size).min(words.len());
		let gram = words.get(start..end).unwrap_or_default().join(" ").to_lowercase();
		corpus_text_lower.contains(&gram)
	})
}

/// Originality test bound to one corpus text.
#[derive(Debug, Clone, Copy)]
pub struct OriginalityCheck<'a> {
	corpus_text_lower: &'a str,
	rules: OriginalityRules,
}

impl<'a> OriginalityCheck<'a> {
	/// Binds `rules` to the lowercase rejoined corpus.
	pub fn new(corpus_text_lower: &'a str, rules: OriginalityRules) -> Self {
		Self { corpus_text_lower, rules }
	}

	/// See `is_original`.
	pub fn passes<S: AsRef<str>>(&self, words: &[S]) -> bool {
		is_original(words, self.corpus_text_lower, &self.rules)
	}
}
