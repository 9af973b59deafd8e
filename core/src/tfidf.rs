//! TF-IDF vector space with cosine ranking.
//!
//! Term splitting follows the usual vectorizer convention: lowercase, then
//! take every run of two or more word characters (`(?u)\b\w\w+\b`). Weights are
//! raw term frequency times the smoothed IDF `ln((1 + N) / (1 + df)) + 1`, and
//! every document vector is L2-normalized, so cosine similarity is a plain dot
//! product.

use crate::error::{CoreError, Result};
use crate::index::{DocId, TermId};
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

lazy_static! {
    static ref TERM_RE: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
}

/// Sparse vector, entries sorted by term id.
pub type SparseVector = Vec<(TermId, f32)>;

/// Split text into vectorizer terms.
pub fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TERM_RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

#[inline]
pub fn smoothed_idf(num_docs: usize, df: usize) -> f32 {
    ((1.0 + num_docs as f32) / (1.0 + df as f32)).ln() + 1.0
}

/// A vectorizer fitted on one corpus together with that corpus' document vectors.
#[derive(Debug, Clone)]
pub struct TfIdfModel {
    dictionary: HashMap<String, TermId>,
    idf: Vec<f32>,
    doc_vectors: Vec<SparseVector>,
}

impl TfIdfModel {
    /// Fit on `corpus_texts`, one entry per document in doc id order.
    pub fn fit<S: AsRef<str>>(corpus_texts: &[S]) -> Result<Self> {
        if corpus_texts.is_empty() {
            return Err(CoreError::EmptyCorpus);
        }
        let analyzed: Vec<Vec<String>> = corpus_texts.iter().map(|t| analyze(t.as_ref())).collect();

        // Term ids follow sorted term order.
        let terms: BTreeSet<&str> = analyzed.iter().flatten().map(String::as_str).collect();
        if terms.is_empty() {
            return Err(CoreError::EmptyVocabulary);
        }
        let dictionary: HashMap<String, TermId> =
            terms.into_iter().enumerate().map(|(i, t)| (t.to_string(), i as TermId)).collect();

        let counts: Vec<HashMap<TermId, u32>> = analyzed
            .iter()
            .map(|tokens| term_counts(tokens.iter().map(String::as_str), &dictionary))
            .collect();

        let mut df = vec![0usize; dictionary.len()];
        for doc in &counts {
            for tid in doc.keys() {
                df[*tid as usize] += 1;
            }
        }
        let n = corpus_texts.len();
        let idf: Vec<f32> = df.iter().map(|&d| smoothed_idf(n, d)).collect();

        let doc_vectors = counts.into_iter().map(|c| weigh(c, &idf)).collect();
        tracing::debug!(num_docs = n, num_terms = dictionary.len(), "fitted tf-idf model");
        Ok(Self { dictionary, idf, doc_vectors })
    }

    pub fn num_docs(&self) -> usize {
        self.doc_vectors.len()
    }

    pub fn num_terms(&self) -> usize {
        self.dictionary.len()
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.dictionary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_id(term).map(|tid| self.idf[tid as usize])
    }

    pub fn doc_vector(&self, doc: DocId) -> Option<&SparseVector> {
        self.doc_vectors.get(doc as usize)
    }

    /// Vectorize a query against the fitted vocabulary. Unknown terms are ignored;
    /// a query with no known term gives the zero vector.
    pub fn transform(&self, query: &str) -> SparseVector {
        let tokens = analyze(query);
        weigh(term_counts(tokens.iter().map(String::as_str), &self.dictionary), &self.idf)
    }

    /// Cosine similarity between the query and every document, indexed by doc id.
    pub fn similarities(&self, query: &str) -> Vec<f32> {
        let q = self.transform(query);
        self.doc_vectors.iter().map(|d| dot(&q, d)).collect()
    }

    /// Top `top_k` documents by cosine similarity, best first. Equal scores keep
    /// ascending doc id order; documents with zero score are still returned.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<(DocId, f32)> {
        let mut scored: Vec<(DocId, f32)> = self
            .similarities(query)
            .into_iter()
            .enumerate()
            .map(|(i, s)| (i as DocId, s))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        scored.truncate(top_k);
        scored
    }
}

/// Fit a fresh model on `corpus_texts` and rank it against the raw query.
pub fn search_tfidf<S: AsRef<str>>(corpus_texts: &[S], raw_query: &str, top_k: usize) -> Result<Vec<(DocId, f32)>> {
    Ok(TfIdfModel::fit(corpus_texts)?.search(raw_query, top_k))
}

fn term_counts<'a>(tokens: impl Iterator<Item = &'a str>, dictionary: &HashMap<String, TermId>) -> HashMap<TermId, u32> {
    let mut counts: HashMap<TermId, u32> = HashMap::new();
    for token in tokens {
        if let Some(&tid) = dictionary.get(token) {
            *counts.entry(tid).or_insert(0) += 1;
        }
    }
    counts
}

fn weigh(counts: HashMap<TermId, u32>, idf: &[f32]) -> SparseVector {
    let mut vec: SparseVector = counts
        .into_iter()
        .map(|(tid, tf)| (tid, tf as f32 * idf[tid as usize]))
        .collect();
    vec.sort_by_key(|(tid, _)| *tid);
    let norm = vec.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in vec.iter_mut() {
            *w /= norm;
        }
    }
    vec
}

/// Dot product of two sparse vectors sorted by term id.
pub fn dot(a: &[(TermId, f32)], b: &[(TermId, f32)]) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0f32;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
