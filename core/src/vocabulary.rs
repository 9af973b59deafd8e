use crate::index::TermId;
use std::collections::{BTreeSet, HashMap};

/// Sorted union of every token across `docs`, without duplicates.
///
/// Ordering is byte-wise lexicographic (`str` ordering), so it is case-sensitive.
pub fn build_vocabulary<S: AsRef<str>>(docs: &[Vec<S>]) -> Vec<String> {
    let mut terms: BTreeSet<&str> = BTreeSet::new();
    for doc in docs {
        terms.extend(doc.iter().map(|t| t.as_ref()));
    }
    terms.into_iter().map(str::to_owned).collect()
}

/// Sorted vocabulary plus its term -> row lookup.
///
/// A term's position in the sorted sequence is its [`TermId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Vec<String>,
    lookup: HashMap<String, TermId>,
}

impl Vocabulary {
    pub fn build<S: AsRef<str>>(docs: &[Vec<S>]) -> Self {
        Self::from_sorted(build_vocabulary(docs))
    }

    /// Wrap an already sorted, deduplicated term list.
    pub fn from_sorted(terms: Vec<String>) -> Self {
        debug_assert!(terms.windows(2).all(|w| w[0] < w[1]), "vocabulary must be sorted and unique");
        let lookup = terms.iter().enumerate().map(|(i, t)| (t.clone(), i as TermId)).collect();
        Self { terms, lookup }
    }

    pub fn term_index(&self, term: &str) -> Option<TermId> {
        self.lookup.get(term).copied()
    }

    pub fn term(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
