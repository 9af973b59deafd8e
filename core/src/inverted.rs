use crate::index::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Sparse term -> posting list mapping.
///
/// Posting lists are sorted by doc id and never contain the same id twice.
/// Terms that occur in no document have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<DocId>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn postings(&self, term: &str) -> Option<&[DocId]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// Total number of (term, doc) entries.
    pub fn num_postings(&self) -> usize {
        self.postings.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p.as_slice()))
    }
}

/// Build the inverted index, visiting documents in id order so every posting
/// list comes out ascending.
pub fn build_inverted_index<S: AsRef<str>>(docs: &[Vec<S>]) -> InvertedIndex {
    let mut postings: HashMap<String, Vec<DocId>> = HashMap::new();
    for (doc_idx, tokens) in docs.iter().enumerate() {
        let distinct: HashSet<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        for term in distinct {
            postings.entry(term.to_owned()).or_default().push(doc_idx as DocId);
        }
    }
    tracing::debug!(num_terms = postings.len(), num_docs = docs.len(), "built inverted index");
    InvertedIndex { postings }
}
