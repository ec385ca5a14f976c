//! Tokenized corpus and the providers that supply it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::io;
use crate::model::chain::END;

/// One source text (or one generated candidate) as an ordered list of tokens.
pub type TokenSequence = Vec<String>;

/// Extension of corpus files read by `DirectoryCorpus`.
pub const CORPUS_EXTENSION: &str = "txt";

/// Splits a line on whitespace and appends the `END` sentinel.
///
/// Blank lines produce an empty sequence (no sentinel).
pub fn tokenize(line: &str) -> TokenSequence {
	let mut tokens: TokenSequence = line.split_whitespace().map(str::to_owned).collect();
	if !tokens.is_empty() {
		tokens.push(END.to_owned());
	}
	tokens
}

/// The token sequences of one or more sources, in fetch order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
	sequences: Vec<TokenSequence>,
}

impl Corpus {
	/// Creates a corpus from already tokenized sequences.
	pub fn new(sequences: Vec<TokenSequence>) -> Self {
		Self { sequences }
	}

	/// Appends the sequences of another source.
	pub fn extend(&mut self, sequences: Vec<TokenSequence>) {
		self.sequences.extend(sequences);
	}

	/// All sequences.
	pub fn sequences(&self) -> &[TokenSequence] {
		&self.sequences
	}

	/// The corpus flattened into a single string: tokens joined by a space,
	/// sequences joined by a newline. `END` sentinels are left out.
	pub fn rejoined(&self) -> String {
		self.sequences
			.iter()
			.map(|sequence| {
				sequence
					.iter()
					.filter(|token| token.as_str() != END)
					.map(String::as_str)
					.collect::<Vec<_>>()
					.join(" ")
			})
			.collect::<Vec<_>>()
			.join("\n")
	}

	/// Lowercase copy of `rejoined`, the text searched by the originality filter.
	pub fn rejoined_lower(&self) -> String {
		self.rejoined().to_lowercase()
	}
}

/// Supplies the token sequences of a named source.
pub trait CorpusProvider {
	/// Returns every sequence known for `source`.
	///
	/// # Errors
	/// `Error::UnknownSource` if the source does not exist, or any loading error.
	fn fetch(&self, source: &str) -> Result<Vec<TokenSequence>>;
}

impl CorpusProvider for HashMap<String, Vec<TokenSequence>> {
	fn fetch(&self, source: &str) -> Result<Vec<TokenSequence>> {
		self.get(source).cloned().ok_or_else(|| Error::UnknownSource { name: source.to_owned() })
	}
}

/// Whether `source` can be used as a file stem inside a directory:
/// non-empty, no path separator, no leading dot.
pub fn is_source_name(source: &str) -> bool {
	!source.is_empty() && !source.contains(['/', '\\']) && !source.starts_with('.')
}

/// Reads sources from `<dir>/<source>.txt`, one text per line.
#[derive(Debug, Clone)]
pub struct DirectoryCorpus {
	dir: PathBuf,
}

impl DirectoryCorpus {
	/// Creates a provider rooted at `dir` (`"."` and `"./"` resolve to the
	/// current directory).
	///
	/// # Errors
	/// Fails if the path is not a directory.
	pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
		let dir = io::normalize_folder(dir.as_ref());
		if !dir.is_dir() {
			return Err(Error::io(
				&dir,
				std::io::Error::new(std::io::ErrorKind::NotFound, "expected a directory"),
			));
		}
		Ok(Self { dir })
	}

	/// Root directory.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Names of the available sources, sorted.
	///
	/// # Errors
	/// Fails if the directory cannot be read.
	pub fn list_sources(&self) -> Result<Vec<String>> {
		let mut names: Vec<String> = io::list_files(&self.dir, CORPUS_EXTENSION)
			.map_err(|e| Error::io(&self.dir, e))?
			.iter()
			.filter_map(|file| io::get_filename(file).ok())
			.collect();
		names.sort();
		Ok(names)
	}

	fn source_path(&self, source: &str) -> PathBuf {
		let mut path = self.dir.join(source);
		path.set_extension(CORPUS_EXTENSION);
		path
	}
}

impl CorpusProvider for DirectoryCorpus {
	fn fetch(&self, source: &str) -> Result<Vec<TokenSequence>> {
		if !is_source_name(source) {
			return Err(Error::UnknownSource { name: source.to_owned() });
		}
		let path = self.source_path(source);
		if !path.is_file() {
			return Err(Error::UnknownSource { name: source.to_owned() });
		}
		let lines = io::read_file(&path).map_err(|e| Error::io(&path, e))?;
		Ok(lines.iter().map(|line| tokenize(line)).filter(|tokens| !tokens.is_empty()).collect())
	}
}
