use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tripdata_core::{DestinationRecord, DestinationType, SearchFilters};
use tripdata_indexer::{DestinationDataService, ScoredDestination, SearchPage, StorageStats};

const MAX_K: usize = 10;
const SNIPPET_BEFORE: usize = 60;
const SNIPPET_AFTER: usize = 160;

type ApiError = (StatusCode, Json<Value>);

#[derive(Deserialize)]
pub struct DestinationsParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct DestinationsResponse {
    pub query: String,
    pub took_s: f64,
    pub total: usize,
    pub results: Vec<DestinationRecord>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    /// Comma-separated destination types.
    #[serde(default, rename = "type")]
    pub kinds: Option<String>,
    /// Comma-separated tags, any of.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub max_budget: Option<u32>,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { MAX_K }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub score: u32,
    #[serde(rename = "type")]
    pub kind: DestinationType,
    pub rating: Option<f64>,
    pub snippet: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DestinationDataService>,
    pub admin_token: Option<String>,
}

pub fn build_app(service: Arc<DestinationDataService>, admin_token: Option<String>) -> Router {
    let state = AppState { service, admin_token };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/destinations", get(destinations_handler))
        .route("/destinations/batch", post(destinations_batch))
        .route("/search", get(search_handler))
        .route("/destination/:id", get(destination_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref()))
        .layer(TraceLayer::new_for_http())
}

/// Origins from a comma-separated list, or any origin when none parse.
fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let origins: Vec<_> = allow_origin
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn destinations_handler(
    State(state): State<AppState>,
    Query(params): Query<DestinationsParams>,
) -> Json<DestinationsResponse> {
    let start = Instant::now();
    let results = state.service.get_destination_data(&params.q).await;
    Json(DestinationsResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total: results.len(),
        results,
    })
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();
    let filters = SearchFilters {
        kinds: params.kinds.as_deref().map(parse_kinds).transpose()?.filter(|k| !k.is_empty()),
        tags: params.tags.as_deref().map(split_list).filter(|t| !t.is_empty()),
        min_rating: params.min_rating,
        max_budget: params.max_budget,
    };

    let SearchPage { total_hits, results: scored } = state.service.search_page(&params.q, &filters).await;
    let k = params.k.clamp(1, MAX_K);
    let pattern = terms_pattern(&params.q);
    let results = scored
        .into_iter()
        .take(k)
        .map(|ScoredDestination { destination, score }| SearchHit {
            snippet: pattern.as_ref().and_then(|p| snippet(&destination.description, p)),
            rating: destination.rating(),
            kind: destination.kind,
            id: destination.id,
            name: destination.name,
            score,
        })
        .collect();

    Ok(Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), total_hits, results }))
}

pub async fn destination_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DestinationRecord>, ApiError> {
    state
        .service
        .get_destination_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "not found"))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StorageStats> {
    Json(state.service.get_storage_stats().await)
}

// --- Admin endpoints ---
async fn destinations_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(records): Json<Vec<DestinationRecord>>,
) -> Result<Json<Value>, ApiError> {
    authorize(&state, &headers)?;
    match state.service.store_destinations(&records).await {
        Ok(stored) => Ok(Json(json!({ "stored": stored }))),
        Err(e) => {
            tracing::error!(error = %e, "batch store failed");
            Err(error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))
        }
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(error(StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set")),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, "invalid admin token"))
    }
}

fn error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn parse_kinds(raw: &str) -> Result<Vec<DestinationType>, ApiError> {
    split_list(raw)
        .iter()
        .map(|s| DestinationType::from_str(s).map_err(|e| error(StatusCode::BAD_REQUEST, &e.to_string())))
        .collect()
}

/// Case-insensitive alternation of the query's terms, longest first.
fn terms_pattern(query: &str) -> Option<Regex> {
    let mut terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = terms.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
    RegexBuilder::new(&alternation).case_insensitive(true).build().ok()
}

/// Window of `text` around the first term match with every match wrapped in
/// `<em>`. Without a match the window is the start of the text.
fn snippet(text: &str, pattern: &Regex) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let chars: Vec<char> = text.chars().collect();
    let window: String = match pattern.find(text) {
        Some(m) => {
            let at = text[..m.start()].chars().count();
            let start = at.saturating_sub(SNIPPET_BEFORE);
            let end = (at + SNIPPET_AFTER).min(chars.len());
            chars[start..end].iter().collect()
        }
        None => chars.iter().take(SNIPPET_AFTER).collect(),
    };
    Some(pattern.replace_all(&window, "<em>$0</em>").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_highlights_every_term() {
        let p = terms_pattern("jaipur FORT").unwrap();
        let s = snippet("The Amber Fort watches over Jaipur.", &p).unwrap();
        assert_eq!(s, "The Amber <em>Fort</em> watches over <em>Jaipur</em>.");
    }

    #[test]
    fn snippet_windows_long_text_around_first_match() {
        let text = format!("{}kerala{}", "x".repeat(300), "y".repeat(300));
        let p = terms_pattern("kerala").unwrap();
        let s = snippet(&text, &p).unwrap();
        assert!(s.starts_with(&"x".repeat(SNIPPET_BEFORE)));
        assert!(s.contains("<em>kerala</em>"));
        assert_eq!(s.chars().count(), SNIPPET_BEFORE + SNIPPET_AFTER + "<em></em>".len());
    }

    #[test]
    fn snippet_handles_multibyte_text() {
        let p = terms_pattern("मंदिर").unwrap();
        let s = snippet("प्राचीन मंदिर और घाट", &p).unwrap();
        assert!(s.contains("<em>मंदिर</em>"));
        assert!(terms_pattern("   ").is_none());
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let p = terms_pattern("c++ (old)").unwrap();
        assert_eq!(snippet("try c++ here", &p).unwrap(), "try <em>c++</em> here");
    }

    #[test]
    fn kinds_parse_or_reject() {
        assert_eq!(parse_kinds("beach, temple").unwrap(), vec![DestinationType::Beach, DestinationType::Temple]);
        assert_eq!(parse_kinds("castle").unwrap_err().0, StatusCode::BAD_REQUEST);
    }
}
