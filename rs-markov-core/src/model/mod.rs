//! Word-level Markov generation.
//!
//! - `Chain`: key -> successors transition table (`chain`)
//! - `Generator`: randomized walk with retries (`generator`)
//! - `is_original`: overlap test against the source text (`originality`)

/// Markov chain building, merging and snapshots.
///
/// Keys are `key_length` space-joined tokens; successors keep their
/// duplicates so frequency drives the random choice.
pub mod chain;

/// Randomized walk over a chain.
///
/// Retries whole walks until a candidate passes the originality test
/// or the try budget is spent.
pub mod generator;

/// Rejects candidates copying too many consecutive words from the corpus.
pub mod originality;
