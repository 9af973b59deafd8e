use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use docsearch_core::{Corpus, EngineConfig, EnglishPreprocessor};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_corpus(dir: &std::path::Path) {
    fs::write(dir.join("a_pets.txt"), "Cats and dogs live together.\nThe dog sleeps.").unwrap();
    fs::write(dir.join("b_birds.txt"), "A dog chased the birds away.").unwrap();
    fs::write(dir.join("c_fish.txt"), "Fish swim in the sea.").unwrap();
}

fn tiny_app() -> Router {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    docsearch_server::build_app(&dir.path().to_string_lossy(), EngineConfig::default(), EnglishPreprocessor::new())
        .unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn doc_ids(json: &Value) -> Vec<u64> {
    json["results"].as_array().unwrap().iter().map(|r| r["doc_id"].as_u64().unwrap()).collect()
}

#[tokio::test]
async fn boolean_models_return_matching_docs() {
    let app = tiny_app();
    for model in ["incidence", "inverted"] {
        let (status, json) = call(app.clone(), &format!("/search?q=dog&model={model}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc_ids(&json), vec![0, 1]);
        assert_eq!(json["query_terms"], serde_json::json!(["dog"]));
        let snippet = json["results"][1]["snippet"].as_str().unwrap();
        assert!(snippet.contains("<em>dog</em>"));
        assert!(json["results"][0].get("score").is_none());
    }
}

#[tokio::test]
async fn tfidf_returns_ranked_results() {
    let app = tiny_app();
    let (status, json) = call(app, "/search?q=fish&model=tfidf&k=2").await;
    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["name"], "c_fish.txt");
    assert!(results[0]["score"].as_f64().unwrap() > results[1]["score"].as_f64().unwrap());
}

#[tokio::test]
async fn bad_requests() {
    let app = tiny_app();
    let (status, _) = call(app.clone(), "/search?q=dog&model=bm25").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(app.clone(), "/search?q=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(app, "/doc/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_query_is_rejected() {
    let corpus = Corpus::from_texts(["cat dog", "dog bird"]);
    let config = EngineConfig { max_query_terms: 2, ..EngineConfig::default() };
    let app = docsearch_server::build_app_from_corpus(corpus, config, EnglishPreprocessor::new()).unwrap();
    let (status, json) = call(app, "/search?q=dog+dog+dog").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("limit is 2"));
}

#[tokio::test]
async fn stats_and_doc_endpoints() {
    let app = tiny_app();
    let (status, json) = call(app.clone(), "/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["num_docs"], 3);
    assert!(json["loaded_at"].as_str().is_some());

    let (status, json) = call(app, "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "c_fish.txt");
    assert_eq!(json["text"], "Fish swim in the sea.");
}

#[tokio::test]
async fn corpus_without_tfidf_terms_serves_boolean_queries() {
    let corpus = Corpus::from_texts(["b c", "c d"]);
    let app = docsearch_server::build_app_from_corpus(corpus, EngineConfig::default(), EnglishPreprocessor::new()).unwrap();
    let (status, json) = call(app.clone(), "/search?q=d&model=inverted").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc_ids(&json), vec![1]);
    let (status, _) = call(app, "/search?q=d&model=tfidf").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
