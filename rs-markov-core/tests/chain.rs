//! Chain construction, clamping and merging

use std::collections::HashMap;

use rs_markov_core::corpus::{tokenize, TokenSequence};
use rs_markov_core::model::chain::{Chain, ChainSnapshot, BEGIN, END};

fn seq(s: &str) -> TokenSequence {
	s.split_whitespace().map(str::to_owned).collect()
}

fn strings(items: &[&str]) -> Vec<String> {
	items.iter().map(|s| (*s).to_owned()).collect()
}

/// Successors as sorted lists, so chains can be compared as multisets.
fn as_multisets(chain: &Chain) -> HashMap<String, Vec<String>> {
	chain
		.to_map()
		.into_iter()
		.map(|(key, mut values)| {
			values.sort();
			(key, values)
		})
		.collect()
}

#[test]
fn test_single_sequence_key_length_one() {
	let chain = Chain::build(&[seq("a b c d")], 1, None);

	let mut expected = HashMap::new();
	expected.insert(BEGIN.to_owned(), strings(&["a"]));
	expected.insert("a".to_owned(), strings(&["b"]));
	expected.insert("b".to_owned(), strings(&["c"]));
	expected.insert("c".to_owned(), strings(&["d"]));
	assert_eq!(chain.to_map(), expected);
}

#[test]
fn test_key_length_two_joins_with_space() {
	let chain = Chain::build(&[seq("a b c d")], 2, None);
	assert_eq!(chain.begin_keys(), strings(&["a b"]).as_slice());
	assert_eq!(chain.successors("a b"), Some(strings(&["c"]).as_slice()));
	assert_eq!(chain.successors("b c"), Some(strings(&["d"]).as_slice()));
	assert_eq!(chain.len(), 2);
}

#[test]
fn test_duplicates_are_kept_in_order() {
	let chain = Chain::build(&[seq("a b"), seq("a c"), seq("a b")], 1, None);
	assert_eq!(chain.successors("a"), Some(strings(&["b", "c", "b"]).as_slice()));
	assert_eq!(chain.begin_keys(), strings(&["a", "a", "a"]).as_slice());
}

#[test]
fn test_short_sequences_are_skipped() {
	let chain = Chain::build(&[seq("a b"), seq(""), seq("x")], 2, None);
	assert!(chain.is_empty());
	assert!(chain.begin_keys().is_empty());
	assert!(!chain.to_map().contains_key(BEGIN));
}

#[test]
fn test_empty_corpus_gives_empty_chain() {
	let chain = Chain::build(&[], 1, None);
	assert!(chain.is_empty());
}

#[test]
fn test_keys_are_case_sensitive() {
	let chain = Chain::build(&[seq("The cat"), seq("the dog")], 1, None);
	assert_eq!(chain.successors("The"), Some(strings(&["cat"]).as_slice()));
	assert_eq!(chain.successors("the"), Some(strings(&["dog"]).as_slice()));
}

#[test]
fn test_key_length_is_clamped() {
	let corpus: Vec<TokenSequence> = vec![
		seq("one two three four five six seven eight nine ten eleven twelve thirteen"),
		seq("a b c d e f g h i j k l m n o p"),
	];
	assert_eq!(Chain::build(&corpus, 15, None), Chain::build(&corpus, 10, None));
}

#[test]
fn test_merge_equals_concatenation() {
	let corpus_a = vec![tokenize("the cat sat on the mat"), tokenize("the dog sat")];
	let corpus_b = vec![tokenize("a cat ran on the road"), tokenize("the cat sat down")];

	let merged = Chain::build(&corpus_b, 2, Some(Chain::build(&corpus_a, 2, None)));
	let combined: Vec<TokenSequence> = corpus_a.iter().chain(&corpus_b).cloned().collect();
	let whole = Chain::build(&combined, 2, None);

	assert_eq!(as_multisets(&merged), as_multisets(&whole));
	// Appending preserves the insertion order as well
	assert_eq!(merged, whole);
}

#[test]
fn test_merge_method_appends() {
	let mut left = Chain::build(&[seq("a b")], 1, None);
	let right = Chain::build(&[seq("a c"), seq("x y")], 1, None);
	left.merge(&right);
	assert_eq!(left.successors("a"), Some(strings(&["b", "c"]).as_slice()));
	assert_eq!(left.begin_keys(), strings(&["a", "a", "x"]).as_slice());
}

#[test]
fn test_parallel_build_matches_sequential() {
	let corpus: Vec<TokenSequence> = (0..200)
		.map(|i| tokenize(&format!("word{} shared middle word{} tail", i % 7, i % 11)))
		.collect();
	let parallel = Chain::build_parallel(&corpus, 2).unwrap();
	assert_eq!(parallel, Chain::build(&corpus, 2, None));
}

// Only the first key of each sequence is a begin key, even when the same
// key appears at the start of another sequence's interior.
#[test]
fn test_only_first_key_is_a_begin_key() {
	let chain = Chain::build(&[seq("x a b c"), seq("a b d")], 2, None);
	assert_eq!(chain.begin_keys(), strings(&["x a", "a b"]).as_slice());
	assert_eq!(chain.successors("a b"), Some(strings(&["c", "d"]).as_slice()));
	assert!(!chain.begin_keys().contains(&"b c".to_owned()));
}

#[test]
fn test_end_sentinel_is_a_successor() {
	let chain = Chain::build(&[tokenize("hello world")], 1, None);
	assert_eq!(chain.successors("world"), Some(strings(&[END]).as_slice()));
}

#[test]
fn test_snapshot_roundtrip_and_staleness() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("alice.k1.bin");
	let corpus = vec![tokenize("hello there world"), tokenize("hello again")];
	let chain = Chain::build(&corpus, 1, None);

	assert!(ChainSnapshot::load(&path).unwrap().is_none());
	ChainSnapshot::new(chain.clone(), &corpus, 1).save(&path).unwrap();

	let snapshot = ChainSnapshot::load(&path).unwrap().unwrap();
	assert!(snapshot.matches(&corpus, 1));
	assert!(!snapshot.matches(&corpus, 2));
	assert!(!snapshot.matches(&corpus[..1], 1));
	assert_eq!(snapshot.into_chain(), chain);
}
