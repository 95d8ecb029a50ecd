use crate::metrics::Metrics;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue, Response as HttpResponse, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use bangs_redirect::{Outcome, Redirector, Resolution, Target, Template};
use serde::Deserialize;
use std::sync::Arc;

pub(crate) const BUNDLED_HOME_PAGE: &str = include_str!("../assets/index.html");

/// Everything a request needs. Built once at startup, never mutated.
pub(crate) struct AppState {
    pub redirector: Redirector,
    pub metrics: Metrics,
    pub home_page: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    q: Option<String>,
    fallback: Option<String>,
}

pub(crate) fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(search))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, StatusCode> {
    let fallback = params
        .fallback
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .and_then(|f| match Template::fallback(f) {
            Ok(template) => Some(template),
            Err(err) => {
                log::debug!("Ignoring fallback {f:?}: {err}");
                None
            }
        });
    let query = params.q.unwrap_or_default();

    let target = match state.redirector.resolve(&query, fallback.as_ref()) {
        Resolution::DefaultPage => return home_page(&state),
        Resolution::Redirect(target) => target,
    };

    let url = target.compose_with(|q| urlencoding::encode(q));
    let location = match HeaderValue::from_str(&url) {
        Ok(location) => {
            state.metrics.observe(target.outcome);
            location
        }
        Err(_) => {
            log::warn!("Template for {:?} is not header-safe: {url:?}", target.trigger);
            state.metrics.observe(Outcome::Corrupt);
            default_location(&state, &query)?
        }
    };

    HttpResponse::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .body(Body::empty())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Redirect target built from the startup-validated default template.
fn default_location(state: &AppState, query: &str) -> Result<HeaderValue, StatusCode> {
    let target = Target {
        template: state.redirector.default_template().as_bytes(),
        query,
        trigger: None,
        outcome: Outcome::Corrupt,
    };
    let url = target.compose_with(|q| urlencoding::encode(q));
    HeaderValue::from_str(&url).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn home_page(state: &AppState) -> Result<Response, StatusCode> {
    HttpResponse::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(state.home_page.clone()))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let index = state.redirector.index();
    let report = serde_json::json!({
        "status": if index.is_empty() { "degraded" } else { "ok" },
        "rows": index.rows(),
        "payload_bytes": index.payload_len(),
    });
    let bytes = serde_json::to_vec(&report).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    HttpResponse::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let text = state
        .metrics
        .render()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    HttpResponse::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(Body::from(text))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
