use crate::index::{DocId, TermId};
use crate::vocabulary::Vocabulary;
use bit_vec::BitVec;
use std::collections::HashSet;

/// Dense binary term x document matrix, one bit row per vocabulary term.
///
/// Cell `(t, d)` is set iff term `t` occurs at least once in document `d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidenceMatrix {
    rows: Vec<BitVec>,
    num_docs: usize,
}

impl IncidenceMatrix {
    pub fn num_terms(&self) -> usize {
        self.rows.len()
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    /// `false` for any coordinate outside the matrix.
    pub fn get(&self, term: TermId, doc: DocId) -> bool {
        self.rows
            .get(term as usize)
            .and_then(|row| row.get(doc as usize))
            .unwrap_or(false)
    }

    pub fn row(&self, term: TermId) -> Option<&BitVec> {
        self.rows.get(term as usize)
    }

    /// Number of documents containing `term`.
    pub fn doc_freq(&self, term: TermId) -> usize {
        self.row(term).map(|r| r.iter().filter(|b| *b).count()).unwrap_or(0)
    }
}

/// Build the |vocabulary| x |docs| incidence matrix.
///
/// Tokens missing from `vocabulary` are skipped.
pub fn build_term_doc_matrix<S: AsRef<str>>(docs: &[Vec<S>], vocabulary: &Vocabulary) -> IncidenceMatrix {
    let num_docs = docs.len();
    let mut rows = vec![BitVec::from_elem(num_docs, false); vocabulary.len()];
    let mut skipped = 0usize;
    for (doc_idx, tokens) in docs.iter().enumerate() {
        let distinct: HashSet<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        for term in distinct {
            match vocabulary.term_index(term) {
                Some(tid) => rows[tid as usize].set(doc_idx, true),
                None => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "terms outside the vocabulary were left out of the incidence matrix");
    }
    tracing::debug!(num_terms = rows.len(), num_docs, "built incidence matrix");
    IncidenceMatrix { rows, num_docs }
}
