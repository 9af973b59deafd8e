use docsearch_core::{
    build_indexes, build_inverted_index, build_term_doc_matrix, build_vocabulary, search_inverted_index,
    search_term_doc_incidence, search_tfidf, CoreError, Corpus, EngineConfig, EnglishPreprocessor, SearchModel,
    Searcher, Vocabulary,
};
use std::collections::BTreeSet;

fn docs(raw: &[&str]) -> Vec<Vec<String>> {
    raw.iter().map(|d| d.split_whitespace().map(String::from).collect()).collect()
}

fn corpora() -> Vec<Vec<Vec<String>>> {
    vec![
        docs(&["cat dog", "dog bird", "fish"]),
        docs(&["a b c", "", "c c c", "b d", "a"]),
        docs(&["x", "x", "x"]),
        docs(&["Zeta alpha", "alpha Alpha beta", "beta gamma zeta zeta"]),
    ]
}

#[test]
fn scenario_boolean_models() {
    let d = docs(&["cat dog", "dog bird", "fish"]);
    let vocab = Vocabulary::build(&d);
    assert_eq!(vocab.terms(), &["bird", "cat", "dog", "fish"]);
    let matrix = build_term_doc_matrix(&d, &vocab);
    let index = build_inverted_index(&d);

    let cases: [(&[&str], Vec<u32>); 3] = [(&["dog"], vec![0, 1]), (&["cat", "dog"], vec![0]), (&["zebra"], vec![])];
    for (query, expected) in cases {
        assert_eq!(search_term_doc_incidence(query, &matrix, &vocab), expected, "incidence {query:?}");
        assert_eq!(search_inverted_index(query, &index), expected, "inverted {query:?}");
    }
}

#[test]
fn empty_query_returns_nothing() {
    let d = docs(&["cat dog", "dog bird", "fish"]);
    let vocab = Vocabulary::build(&d);
    let matrix = build_term_doc_matrix(&d, &vocab);
    let index = build_inverted_index(&d);
    let empty: [&str; 0] = [];
    assert!(search_term_doc_incidence(&empty, &matrix, &vocab).is_empty());
    assert!(search_inverted_index(&empty, &index).is_empty());
}

#[test]
fn out_of_vocabulary_terms_are_dropped_by_incidence_only() {
    let d = docs(&["cat dog", "dog bird", "fish"]);
    let vocab = Vocabulary::build(&d);
    let matrix = build_term_doc_matrix(&d, &vocab);
    let index = build_inverted_index(&d);
    // The matrix engine ignores the unknown row; the posting intersection does not.
    assert_eq!(search_term_doc_incidence(&["dog", "zebra"], &matrix, &vocab), vec![0, 1]);
    assert!(search_inverted_index(&["dog", "zebra"], &index).is_empty());
}

#[test]
fn vocabulary_is_exact_sorted_union() {
    for d in corpora() {
        let vocab = build_vocabulary(&d);
        let union: BTreeSet<String> = d.iter().flatten().cloned().collect();
        assert_eq!(vocab, union.into_iter().collect::<Vec<_>>());
        assert!(vocab.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn matrix_and_postings_agree() {
    for d in corpora() {
        let vocab = Vocabulary::build(&d);
        let matrix = build_term_doc_matrix(&d, &vocab);
        let index = build_inverted_index(&d);
        assert_eq!(matrix.num_terms(), vocab.len());
        assert_eq!(matrix.num_docs(), d.len());
        assert_eq!(index.num_terms(), vocab.len());
        for (tid, term) in vocab.iter().enumerate() {
            let postings = index.postings(term).unwrap();
            for (doc, tokens) in d.iter().enumerate() {
                let present = tokens.iter().any(|t| t == term);
                assert_eq!(matrix.get(tid as u32, doc as u32), present);
                assert_eq!(postings.contains(&(doc as u32)), present);
            }
        }
    }
}

#[test]
fn boolean_engines_agree_on_in_vocabulary_queries() {
    for d in corpora() {
        let vocab = Vocabulary::build(&d);
        let matrix = build_term_doc_matrix(&d, &vocab);
        let index = build_inverted_index(&d);
        let terms: Vec<&str> = vocab.iter().collect();
        for a in &terms {
            for b in &terms {
                let q = [*a, *b];
                assert_eq!(search_term_doc_incidence(&q, &matrix, &vocab), search_inverted_index(&q, &index));
            }
        }
    }
}

#[test]
fn rebuilding_is_idempotent() {
    for d in corpora() {
        assert_eq!(build_vocabulary(&d), build_vocabulary(&d));
        let vocab = Vocabulary::build(&d);
        assert_eq!(build_term_doc_matrix(&d, &vocab), build_term_doc_matrix(&d, &vocab));
        assert_eq!(build_inverted_index(&d), build_inverted_index(&d));
    }
}

#[test]
fn tfidf_scenario() {
    let hits = search_tfidf(&["cat dog", "dog bird", "fish"], "dog", 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits[0].1 >= hits[1].1);
    assert!(hits.iter().all(|(doc, score)| *doc != 2 && *score > 0.0));
}

#[test]
fn tfidf_scores_are_descending() {
    let corpus = ["alpha beta gamma", "beta beta", "gamma delta", "alpha alpha alpha", "epsilon"];
    let hits = search_tfidf(&corpus, "alpha beta", 10).unwrap();
    assert_eq!(hits.len(), corpus.len());
    assert!(hits.windows(2).all(|w| w[0].1 >= w[1].1));
    assert!(hits.iter().all(|(_, s)| (0.0..=1.0 + 1e-6).contains(s)));
}

#[test]
fn searcher_routes_models() {
    let corpus = Corpus::from_texts([
        "The cat chased the dog.",
        "A dog and a bird sat together.",
        "Fish swim in the sea.",
    ]);
    let pre = EnglishPreprocessor::new();
    let bundle = build_indexes(&corpus.preprocess(&pre)).unwrap();
    let config = EngineConfig::default();
    let searcher = Searcher::new(&bundle, &pre, &config);

    let incidence = searcher.search(SearchModel::Incidence, "dogs", None).unwrap();
    assert_eq!(incidence.query_terms, vec!["dog"]);
    let ids: Vec<u32> = incidence.hits.iter().map(|h| h.doc_id).collect();
    assert_eq!(ids, vec![0, 1]);
    assert!(incidence.hits.iter().all(|h| h.score.is_none()));

    let inverted = searcher.search(SearchModel::Inverted, "cat dog", None).unwrap();
    assert_eq!(inverted.hits.iter().map(|h| h.doc_id).collect::<Vec<_>>(), vec![0]);

    // The ranked model uses the raw query: "dogs" is not in its vocabulary, "dog" is.
    let ranked = searcher.search(SearchModel::TfIdf, "dog", Some(2)).unwrap();
    assert_eq!(ranked.hits.len(), 2);
    assert!(ranked.hits.iter().all(|h| h.score.unwrap() > 0.0));

    let everything = searcher.search(SearchModel::TfIdf, "dog", Some(1000)).unwrap();
    assert_eq!(everything.hits.len(), 3);
}

#[test]
fn searcher_rejects_oversized_queries() {
    let pre = |text: &str| text.split_whitespace().map(String::from).collect::<Vec<_>>();
    let bundle = build_indexes(&docs(&["cat dog", "dog bird"])).unwrap();
    let config = EngineConfig { max_query_terms: 3, ..EngineConfig::default() };
    let searcher = Searcher::new(&bundle, &pre, &config);
    let err = searcher.search(SearchModel::Inverted, "dog dog dog dog", None).unwrap_err();
    assert!(matches!(err, CoreError::QueryTooLong { terms: 4, max: 3 }));
    assert!(searcher.search(SearchModel::Inverted, "dog dog dog", None).is_ok());
}

#[test]
fn single_character_corpus_still_answers_boolean_queries() {
    let pre = |text: &str| text.split_whitespace().map(String::from).collect::<Vec<_>>();
    let bundle = build_indexes(&docs(&["a b", "c"])).unwrap();
    let config = EngineConfig::default();
    let searcher = Searcher::new(&bundle, &pre, &config);

    let inverted = searcher.search(SearchModel::Inverted, "c", None).unwrap();
    assert_eq!(inverted.hits.iter().map(|h| h.doc_id).collect::<Vec<_>>(), vec![1]);
    let incidence = searcher.search(SearchModel::Incidence, "a b", None).unwrap();
    assert_eq!(incidence.hits.iter().map(|h| h.doc_id).collect::<Vec<_>>(), vec![0]);
    assert!(matches!(searcher.search(SearchModel::TfIdf, "a", None), Err(CoreError::EmptyVocabulary)));
}
