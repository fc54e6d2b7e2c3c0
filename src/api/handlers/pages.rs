use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

use crate::api::error::ResponseFormat;
use crate::render::{DocsContext, PageContext};
use crate::AppState;

pub async fn home(State(state): State<Arc<AppState>>, format: ResponseFormat) -> Response {
    render_page(&state, format, "index", "Home | RYU CDN", "home")
}

pub async fn about(State(state): State<Arc<AppState>>, format: ResponseFormat) -> Response {
    render_page(&state, format, "about", "About | RYU CDN", "about")
}

pub async fn contact(State(state): State<Arc<AppState>>, format: ResponseFormat) -> Response {
    render_page(&state, format, "contact", "Contact | RYU CDN", "contact")
}

pub async fn docs(
    State(state): State<Arc<AppState>>,
    format: ResponseFormat,
    headers: HeaderMap,
) -> Response {
    let ctx = DocsContext {
        title: "Docs | RYU CDN".to_string(),
        active_nav: "docs",
        api_base_url: request_base_url(&headers),
    };
    match state.templates.render("docs", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => state.errors.respond(format, &e.into()),
    }
}

fn render_page(
    state: &AppState,
    format: ResponseFormat,
    template: &str,
    title: &str,
    active_nav: &'static str,
) -> Response {
    let ctx = PageContext {
        title: title.to_string(),
        active_nav,
    };
    match state.templates.render(template, &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => state.errors.respond(format, &e.into()),
    }
}

/// Compose `{protocol}://{host}` from the request, trusting a proxy's
/// `X-Forwarded-Proto` when present.
pub(crate) fn request_base_url(headers: &HeaderMap) -> String {
    let protocol = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{protocol}://{host}")
}
