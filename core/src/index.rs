use crate::error::{CoreError, Result};
use crate::incidence::{build_term_doc_matrix, IncidenceMatrix};
use crate::inverted::{build_inverted_index, InvertedIndex};
use crate::tfidf::TfIdfModel;
use crate::vocabulary::Vocabulary;
use serde::{Deserialize, Serialize};

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub num_docs: usize,
    pub num_terms: usize,
    /// (term, doc) pairs, i.e. set cells of the incidence matrix.
    pub num_postings: usize,
    pub num_tfidf_terms: usize,
}

/// Every index structure built from one corpus.
///
/// Immutable after [`build_indexes`]; share it behind an `Arc` for concurrent readers.
#[derive(Debug, Clone)]
pub struct IndexBundle {
    pub vocabulary: Vocabulary,
    pub matrix: IncidenceMatrix,
    pub inverted: InvertedIndex,
    /// Each document's tokens joined with single spaces, the TF-IDF input.
    pub joined_texts: Vec<String>,
    /// `None` when no document has a term the vectorizer keeps; boolean
    /// models still work on such a corpus.
    pub tfidf: Option<TfIdfModel>,
}

impl IndexBundle {
    pub fn num_docs(&self) -> usize {
        self.joined_texts.len()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_docs: self.num_docs(),
            num_terms: self.vocabulary.len(),
            num_postings: self.inverted.num_postings(),
            num_tfidf_terms: self.tfidf.as_ref().map_or(0, TfIdfModel::num_terms),
        }
    }
}

/// Build the vocabulary, incidence matrix, inverted index and TF-IDF space from
/// preprocessed documents. Document `i` gets doc id `i`.
///
/// Fails only for an empty corpus. A corpus without any term of two or more
/// characters gets boolean indexes and no TF-IDF space.
pub fn build_indexes<S: AsRef<str>>(docs: &[Vec<S>]) -> Result<IndexBundle> {
    if docs.is_empty() {
        return Err(CoreError::EmptyCorpus);
    }
    let vocabulary = Vocabulary::build(docs);
    let matrix = build_term_doc_matrix(docs, &vocabulary);
    let inverted = build_inverted_index(docs);
    let joined_texts: Vec<String> = docs
        .iter()
        .map(|tokens| tokens.iter().map(|t| t.as_ref()).collect::<Vec<_>>().join(" "))
        .collect();
    let tfidf = match TfIdfModel::fit(&joined_texts) {
        Ok(model) => Some(model),
        Err(CoreError::EmptyVocabulary) => {
            tracing::warn!("no term survives tf-idf analysis, ranked search disabled");
            None
        }
        Err(e) => return Err(e),
    };
    let bundle = IndexBundle { vocabulary, matrix, inverted, joined_texts, tfidf };
    let stats = bundle.stats();
    tracing::info!(num_docs = stats.num_docs, num_terms = stats.num_terms, num_postings = stats.num_postings, "indexes built");
    Ok(bundle)
}
