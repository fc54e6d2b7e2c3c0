use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use super::pages::request_base_url;
use crate::api::error::{AppError, ErrorBody, ResponseFormat, CREATOR};
use crate::files::{FileInfo, FileStats};
use crate::render::{ErrorContext, ResultContext};
use crate::AppState;

const FILE_NOT_FOUND: &str = "The requested file could not be found.";

/// Metadata page for a stored file.
/// Route: GET /result/:filename
pub async fn file_result(
    State(state): State<Arc<AppState>>,
    format: ResponseFormat,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Response {
    match render_file_result(&state, format, &headers, &filename).await {
        Ok(response) => response,
        // Provider failures are not translated here; the central responder
        // reports them with whatever status the error carries.
        Err(err) => state.errors.respond(format, &err),
    }
}

async fn render_file_result(
    state: &AppState,
    format: ResponseFormat,
    headers: &HeaderMap,
    filename: &str,
) -> Result<Response, AppError> {
    let exists = state.files.exists(filename).await?;

    if !exists {
        return file_not_found(state, format);
    }

    let stats = state.files.stats(filename).await?;
    let info = state
        .files
        .info(&request_base_url(headers), filename)
        .await?;

    let ctx = result_context(filename, info, stats);
    let html = state.templates.render("result", &ctx)?;
    Ok(Html(html).into_response())
}

fn file_not_found(state: &AppState, format: ResponseFormat) -> Result<Response, AppError> {
    match format {
        ResponseFormat::Json => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                status: 404,
                message: FILE_NOT_FOUND.to_string(),
                creator: CREATOR,
                error: None,
            }),
        )
            .into_response()),
        ResponseFormat::Html => {
            let ctx = ErrorContext {
                title: "404 - File Not Found | RYU CDN".to_string(),
                message: FILE_NOT_FOUND.to_string(),
                status_code: 404,
                stack: None,
            };
            let html = state.templates.render("error", &ctx)?;
            Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
        }
    }
}

/// Merge provider info and stats into the result view-model.
/// Absent fields fall back to the requested name, size 0, and the current
/// time.
fn result_context(requested: &str, info: FileInfo, stats: Option<FileStats>) -> ResultContext {
    let (file_size, upload_date) = match stats {
        Some(stats) => (stats.size, stats.modified_at),
        None => (0, Utc::now()),
    };

    ResultContext {
        title: "File Result | RYU CDN".to_string(),
        active_nav: "",
        file_url: info.url,
        filename: info.filename,
        original_filename: info
            .original_filename
            .unwrap_or_else(|| requested.to_string()),
        file_size,
        upload_date,
        mimetype: info.mimetype,
    }
}

/// Serve stored file content.
/// Route: GET /files/:filename
pub async fn download(
    State(state): State<Arc<AppState>>,
    format: ResponseFormat,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Response {
    match serve_file(&state, &headers, &filename).await {
        Ok(response) => response,
        Err(err) => state.errors.respond(format, &err),
    }
}

async fn serve_file(
    state: &AppState,
    headers: &HeaderMap,
    filename: &str,
) -> Result<Response, AppError> {
    let data = state.files.read(filename).await?;
    let info = state
        .files
        .info(&request_base_url(headers), filename)
        .await?;

    let mut response = (StatusCode::OK, data).into_response();
    let response_headers = response.headers_mut();

    response_headers.insert(
        header::CONTENT_TYPE,
        info.mimetype
            .parse()
            .unwrap_or(header::HeaderValue::from_static("application/octet-stream")),
    );

    if let Ok(value) = format!("inline; filename=\"{}\"", info.filename).parse() {
        response_headers.insert(header::CONTENT_DISPOSITION, value);
    }

    // Stored files are immutable; only metadata changes.
    response_headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("public, max-age=3600"),
    );

    Ok(response)
}
