use crate::config::EngineConfig;
use crate::error::{CoreError, Result};
use crate::incidence::IncidenceMatrix;
use crate::index::{DocId, IndexBundle};
use crate::inverted::InvertedIndex;
use crate::tokenizer::Preprocessor;
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Documents whose incidence column has every query term's bit set, ascending.
///
/// Terms missing from the vocabulary are dropped. When no term is left the
/// result is empty, never "all documents".
pub fn search_term_doc_incidence<S: AsRef<str>>(
    query_terms: &[S],
    matrix: &IncidenceMatrix,
    vocabulary: &Vocabulary,
) -> Vec<DocId> {
    let mut rows = query_terms
        .iter()
        .filter_map(|t| vocabulary.term_index(t.as_ref()))
        .filter_map(|tid| matrix.row(tid));
    let Some(first) = rows.next() else {
        return Vec::new();
    };
    let mut acc = first.clone();
    for row in rows {
        acc.and(row);
    }
    acc.iter()
        .enumerate()
        .filter(|(_, hit)| *hit)
        .map(|(doc, _)| doc as DocId)
        .collect()
}

/// Intersection of the query terms' posting lists, ascending.
///
/// A term without postings empties the result; so does an empty query.
pub fn search_inverted_index<S: AsRef<str>>(query_terms: &[S], index: &InvertedIndex) -> Vec<DocId> {
    if query_terms.is_empty() {
        return Vec::new();
    }
    let mut lists: Vec<&[DocId]> = Vec::with_capacity(query_terms.len());
    for term in query_terms {
        match index.postings(term.as_ref()) {
            Some(p) => lists.push(p),
            None => return Vec::new(),
        }
    }
    // Shortest list first keeps the running intersection small.
    lists.sort_by_key(|p| p.len());
    let mut result: Vec<DocId> = lists[0].to_vec();
    for list in &lists[1..] {
        result = intersect_sorted(&result, list);
        if result.is_empty() {
            break;
        }
    }
    result
}

fn intersect_sorted(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Retrieval model a query is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchModel {
    /// Boolean AND over the term-document incidence matrix.
    Incidence,
    /// Boolean AND over posting lists.
    Inverted,
    /// Cosine ranking in the TF-IDF vector space.
    TfIdf,
}

impl SearchModel {
    pub const ALL: [SearchModel; 3] = [SearchModel::Incidence, SearchModel::Inverted, SearchModel::TfIdf];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchModel::Incidence => "incidence",
            SearchModel::Inverted => "inverted",
            SearchModel::TfIdf => "tfidf",
        }
    }

    pub fn is_ranked(&self) -> bool {
        matches!(self, SearchModel::TfIdf)
    }
}

impl fmt::Display for SearchModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchModel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incidence" | "term-doc" | "matrix" => Ok(SearchModel::Incidence),
            "inverted" | "inverted-index" | "index" => Ok(SearchModel::Inverted),
            "tfidf" | "tf-idf" | "cosine" => Ok(SearchModel::TfIdf),
            _ => Err(CoreError::UnknownModel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    /// Cosine score; boolean models leave it empty.
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub model: SearchModel,
    /// Preprocessed query terms (what the boolean models matched on).
    pub query_terms: Vec<String>,
    pub hits: Vec<SearchHit>,
}

/// Routes raw queries to one of the three engines over a shared [`IndexBundle`].
pub struct Searcher<'a, P: Preprocessor + ?Sized> {
    bundle: &'a IndexBundle,
    preprocessor: &'a P,
    config: &'a EngineConfig,
}

impl<'a, P: Preprocessor + ?Sized> Searcher<'a, P> {
    pub fn new(bundle: &'a IndexBundle, preprocessor: &'a P, config: &'a EngineConfig) -> Self {
        Self { bundle, preprocessor, config }
    }

    /// Run `raw_query` against `model`.
    ///
    /// Boolean models see the preprocessed terms; TF-IDF sees the raw string.
    /// `top_k` only applies to TF-IDF and is clamped to `[1, max_top_k]`.
    pub fn search(&self, model: SearchModel, raw_query: &str, top_k: Option<usize>) -> Result<SearchOutcome> {
        let terms = raw_query.split_whitespace().count();
        if terms > self.config.max_query_terms {
            return Err(CoreError::QueryTooLong { terms, max: self.config.max_query_terms });
        }
        let query_terms = self.preprocessor.preprocess(raw_query);
        let hits: Vec<SearchHit> = match model {
            SearchModel::Incidence => {
                search_term_doc_incidence(&query_terms, &self.bundle.matrix, &self.bundle.vocabulary)
                    .into_iter()
                    .map(|doc_id| SearchHit { doc_id, score: None })
                    .collect()
            }
            SearchModel::Inverted => search_inverted_index(&query_terms, &self.bundle.inverted)
                .into_iter()
                .map(|doc_id| SearchHit { doc_id, score: None })
                .collect(),
            SearchModel::TfIdf => {
                let k = self.config.clamp_top_k(top_k);
                self.bundle
                    .tfidf
                    .as_ref()
                    .ok_or(CoreError::EmptyVocabulary)?
                    .search(raw_query, k)
                    .into_iter()
                    .map(|(doc_id, score)| SearchHit { doc_id, score: Some(score) })
                    .collect()
            }
        };
        tracing::debug!(%model, num_terms = query_terms.len(), num_hits = hits.len(), "query answered");
        Ok(SearchOutcome { model, query_terms, hits })
    }
}
