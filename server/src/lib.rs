use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use docsearch_core::{
    build_indexes, load_corpus, Corpus, CoreError, EngineConfig, EnglishPreprocessor, IndexBundle, IndexStats,
    SearchModel, Searcher,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod snippet;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub model: SearchModel,
    pub query_terms: Vec<String>,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub snippet: String,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: IndexStats,
    pub loaded_at: String,
}

/// Everything a request handler reads. Built once at startup, never mutated.
pub struct Shared {
    pub corpus: Corpus,
    pub bundle: IndexBundle,
    pub preprocessor: EnglishPreprocessor,
    pub config: EngineConfig,
    pub loaded_at: String,
}

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<Shared>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::QueryTooLong { .. } | CoreError::UnknownModel(_) | CoreError::EmptyVocabulary => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Load the corpus in `corpus_dir`, build every index and return the router.
pub fn build_app(corpus_dir: &str, config: EngineConfig, preprocessor: EnglishPreprocessor) -> Result<Router> {
    let corpus = load_corpus(corpus_dir).with_context(|| format!("loading corpus from {corpus_dir}"))?;
    build_app_from_corpus(corpus, config, preprocessor)
}

pub fn build_app_from_corpus(corpus: Corpus, config: EngineConfig, preprocessor: EnglishPreprocessor) -> Result<Router> {
    config.validate()?;
    let docs = corpus.preprocess(&preprocessor);
    let bundle = build_indexes(&docs).context("building indexes")?;
    let loaded_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    let shared = Shared { corpus, bundle, preprocessor, config, loaded_at };
    let app_state = AppState { shared: Arc::new(shared) };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/stats", get(stats_handler))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors_from_env())
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

/// CORS_ALLOW_ORIGIN holds a comma-separated origin list; unset or empty allows any origin.
fn cors_from_env() -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let origins: Vec<_> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let shared = &state.shared;
    Json(StatsResponse { stats: shared.bundle.stats(), loaded_at: shared.loaded_at.clone() })
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    if params.q.trim().is_empty() {
        return Err(ApiError::BadRequest("please enter a query".into()));
    }
    let model: SearchModel = match params.model.as_deref() {
        Some(name) => name.parse()?,
        None => SearchModel::Inverted,
    };
    let shared = &state.shared;
    let searcher = Searcher::new(&shared.bundle, &shared.preprocessor, &shared.config);
    let outcome = searcher.search(model, &params.q, params.k)?;

    // Processed terms first, then the words as typed, for locating and marking snippets.
    let mut snippet_terms = outcome.query_terms.clone();
    snippet_terms.extend(params.q.split_whitespace().map(str::to_string));

    let results: Vec<SearchHit> = outcome
        .hits
        .iter()
        .filter_map(|hit| {
            let idx = hit.doc_id as usize;
            let text = shared.corpus.texts.get(idx)?;
            Some(SearchHit {
                doc_id: hit.doc_id,
                name: shared.corpus.names.get(idx).cloned().unwrap_or_default(),
                score: hit.score,
                snippet: snippet::highlight_terms(&snippet::snippet(text, &snippet_terms), &snippet_terms),
            })
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::info!(%model, total_hits = results.len(), took_s = elapsed.as_secs_f64(), "search");
    Ok(Json(SearchResponse {
        query: params.q,
        model,
        query_terms: outcome.query_terms,
        took_s: elapsed.as_secs_f64(),
        total_hits: results.len(),
        results,
    }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<u32>) -> Result<Json<serde_json::Value>, ApiError> {
    let corpus = &state.shared.corpus;
    let idx = doc_id as usize;
    match (corpus.names.get(idx), corpus.texts.get(idx)) {
        (Some(name), Some(text)) => Ok(Json(serde_json::json!({
            "doc_id": doc_id,
            "name": name,
            "text": text,
        }))),
        _ => Err(ApiError::NotFound(format!("document {doc_id} not found"))),
    }
}
