use std::path::PathBuf;

/// Errors raised by the retrieval core.
///
/// Out-of-vocabulary terms, empty queries and an oversized `top_k` are not
/// errors; they have defined results.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// The corpus holds no documents.
    #[error("precondition violated: corpus is empty")]
    EmptyCorpus,
    /// The corpus holds documents but not a single indexable term.
    #[error("precondition violated: empty vocabulary, documents contain no indexable terms")]
    EmptyVocabulary,
    #[error("query has {terms} terms, the limit is {max}")]
    QueryTooLong { terms: usize, max: usize },
    #[error("unknown search model `{0}` (expected incidence, inverted or tfidf)")]
    UnknownModel(String),
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
