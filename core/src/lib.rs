pub mod config;
pub mod corpus;
pub mod error;
pub mod incidence;
pub mod index;
pub mod inverted;
pub mod search;
pub mod tfidf;
pub mod tokenizer;
pub mod vocabulary;

pub use config::EngineConfig;
pub use corpus::{load_corpus, Corpus};
pub use error::{CoreError, Result};
pub use incidence::{build_term_doc_matrix, IncidenceMatrix};
pub use index::{build_indexes, DocId, IndexBundle, IndexStats, TermId};
pub use inverted::{build_inverted_index, InvertedIndex};
pub use search::{search_inverted_index, search_term_doc_incidence, SearchHit, SearchModel, SearchOutcome, Searcher};
pub use tfidf::{search_tfidf, TfIdfModel};
pub use tokenizer::{EnglishPreprocessor, Preprocessor};
pub use vocabulary::{build_vocabulary, Vocabulary};
