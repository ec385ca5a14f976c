//! Markov-chain message generation library.
//!
//! This crate provides:
//! - Word-level Markov chains built from tokenized texts
//! - Randomized generation under word and retry budgets
//! - An originality test rejecting near-copies of the source texts
//! - Corpus providers, a generation log, and an orchestrator wiring them
//!
//! The generation core is synchronous and never fails; errors only come
//! from configuration, corpus loading and persistence.

/// Markov chain, generator and originality test.
pub mod model;

/// Tokenized corpus and corpus providers.
pub mod corpus;

/// Generation parameters.
pub mod config;

/// Stop-word and pattern removal.
pub mod filter;

/// End-to-end generation pipeline.
pub mod orchestrator;

/// Append-only log of generated messages.
pub mod archive;

/// Error type.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;
