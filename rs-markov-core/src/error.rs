//! Error type shared by the configuration, corpus and persistence layers.
//!
//! The generation core itself never fails: a missing chain key or a
//! rejected candidate is handled inside the generator. Only the layers
//! that touch the filesystem or validate caller input return errors.

use std::fmt;
use std::path::PathBuf;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failures surfaced by `rs-markov-core`.
#[derive(Debug)]
pub enum Error {
	/// Filesystem operation failed
	Io {
		/// Path involved in the operation
		path: PathBuf,
		/// Underlying I/O error
		source: std::io::Error,
	},

	/// A chain snapshot could not be encoded or decoded
	Snapshot(postcard::Error),

	/// A configuration value is out of range
	InvalidParameter {
		/// Name of the invalid parameter
		parameter: &'static str,
		/// Provided value
		value: String,
		/// Why the value was refused
		reason: &'static str,
	},

	/// Generation was requested without any source
	MissingSources,

	/// The corpus provider does not know this source
	UnknownSource {
		/// Requested source identity
		name: String,
	},

	/// A post-processing pattern failed to compile
	Pattern(regex::Error),

	/// A chain-building worker thread panicked
	Worker,

	/// A line of the generation log could not be parsed
	MalformedLog {
		/// Offending line
		line: String,
	},
}

impl Error {
	/// Wraps an I/O error with the path it happened on.
	pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}

	/// Whether the error was caused by the caller's input rather than the environment.
	pub fn is_caller_error(&self) -> bool {
		matches!(
			self,
			Self::InvalidParameter { .. } | Self::MissingSources | Self::UnknownSource { .. } | Self::Pattern(_)
		)
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Io { path, source } => write!(f, "I/O error on {}: {source}", path.display()),
			Self::Snapshot(e) => write!(f, "Chain snapshot error: {e}"),
			Self::InvalidParameter { parameter, value, reason } => {
				write!(f, "Invalid value '{value}' for {parameter}: {reason}")
			}
			Self::MissingSources => write!(f, "At least one source is required"),
			Self::UnknownSource { name } => write!(f, "Source '{name}' not found"),
			Self::Pattern(e) => write!(f, "Invalid filter pattern: {e}"),
			Self::Worker => write!(f, "Chain building thread panicked"),
			Self::MalformedLog { line } => write!(f, "Malformed generation log line: {line}"),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io { source, .. } => Some(source),
			Self::Snapshot(e) => Some(e),
			Self::Pattern(e) => Some(e),
			_ => None,
		}
	}
}

impl From<postcard::Error> for Error {
	fn from(e: postcard::Error) -> Self {
		Self::Snapshot(e)
	}
}

impl From<regex::Error> for Error {
	fn from(e: regex::Error) -> Self {
		Self::Pattern(e)
	}
}
