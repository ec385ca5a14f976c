//! Append-only log of generated messages.
//!
//! One record per line, fields joined by `DELIMITER`:
//! `id, text, source 1 .. source N, timestamp`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::{Error, Result};
use crate::io;

/// Field separator, chosen to never appear in generated text.
pub const DELIMITER: &str = "__(ಠ_ಠ)__";

/// Timestamp layout, e.g. `March 04, 2024 18:22:07`.
pub const TIMESTAMP_FORMAT: &str = "%B %d, %Y %H:%M:%S";

/// One persisted generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRecord {
	/// Auto-incremented identifier
	pub id: u64,
	/// Generated text
	pub text: String,
	/// Sources the text was generated from
	pub sources: Vec<String>,
	/// Local time of the write
	pub timestamp: String,
}

impl GenerationRecord {
	fn to_line(&self) -> String {
		let mut fields = vec![self.id.to_string(), self.text.clone()];
		fields.extend(self.sources.iter().cloned());
		fields.push(self.timestamp.clone());
		fields.join(DELIMITER)
	}

	fn parse(line: &str) -> Result<Self> {
		let malformed = || Error::MalformedLog { line: line.to_owned() };
		let fields: Vec<&str> = line.split(DELIMITER).collect();
		let [id, text, sources @ .., timestamp] = fields.as_slice() else {
			return Err(malformed());
		};
		Ok(Self {
			id: id.parse().map_err(|_| malformed())?,
			text: (*text).to_owned(),
			sources: sources.iter().map(|s| (*s).to_owned()).collect(),
			timestamp: (*timestamp).to_owned(),
		})
	}
}

/// Generation log stored in a single text file.
#[derive(Debug, Clone)]
pub struct GenerationLog {
	path: PathBuf,
}

impl GenerationLog {
	/// Log at `path`. Nothing is touched until the first append.
	pub fn new<P: Into<PathBuf>>(path: P) -> Self {
		Self { path: path.into() }
	}

	/// Path of the log file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads every record, oldest first. A missing file is an empty log.
	///
	/// # Errors
	/// Fails on unreadable files or malformed lines.
	pub fn records(&self) -> Result<Vec<GenerationRecord>> {
		if !self.path.exists() {
			return Ok(Vec::new());
		}
		io::read_file(&self.path)
			.map_err(|e| Error::io(&self.path, e))?
			.iter()
			.filter(|line| !line.is_empty())
			.map(|line| GenerationRecord::parse(line))
			.collect()
	}

	/// Identifier the next record will get: last id + 1, or 0.
	///
	/// Only the id field of the last non-empty line is read, so damaged
	/// older lines do not block new appends.
	///
	/// # Errors
	/// Fails if the log cannot be read or its last line has no numeric id.
	pub fn next_id(&self) -> Result<u64> {
		if !self.path.exists() {
			return Ok(0);
		}
		let lines = io::read_file(&self.path).map_err(|e| Error::io(&self.path, e))?;
		let Some(last) = lines.iter().rev().find(|line| !line.is_empty()) else {
			return Ok(0);
		};
		last.split(DELIMITER)
			.next()
			.and_then(|id| id.parse::<u64>().ok())
			.map(|id| id + 1)
			.ok_or_else(|| Error::MalformedLog { line: last.clone() })
	}

	/// Appends a record for `text` and returns it.
	///
	/// # Errors
	/// Fails if the log or its directory cannot be written.
	pub fn append<S: AsRef<str>>(&self, text: &str, sources: &[S]) -> Result<GenerationRecord> {
		let record = GenerationRecord {
			id: self.next_id()?,
			text: text.to_owned(),
			sources: sources.iter().map(|s| s.as_ref().to_owned()).collect(),
			timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
		};

		io::ensure_parent(&self.path).map_err(|e| Error::io(&self.path, e))?;
		let mut file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&self.path)
			.map_err(|e| Error::io(&self.path, e))?;
		writeln!(file, "{}", record.to_line()).map_err(|e| Error::io(&self.path, e))?;

		Ok(record)
	}
}
