use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::Environment;
use crate::files::FileProviderError;
use crate::render::{ErrorContext, RenderError, Templates};

/// Attribution field included in every JSON error body.
pub const CREATOR: &str = "RyuIzumi.";

// ============================================================================
// Response format selection
// ============================================================================

/// Whether a request expects a structured JSON body or a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    /// JSON for anything under the API prefix or explicitly asking for it;
    /// HTML for everything else, including ambiguous input.
    pub fn select(path: &str, accept: Option<&str>) -> Self {
        if path.starts_with("/api") || accept == Some("application/json") {
            ResponseFormat::Json
        } else {
            ResponseFormat::Html
        }
    }
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ResponseFormat {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        let accept = parts
            .headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok());
        Ok(ResponseFormat::select(parts.uri.path(), accept))
    }
}

// ============================================================================
// Application error
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Internal,
    Provider,
    Render,
}

/// Tagged error carried from the raise site to the error responder.
/// `detail` holds the source-chain diagnostic and is only ever exposed in
/// development mode.
#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: Option<StatusCode>,
    pub message: String,
    pub detail: Option<String>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            detail: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Resolved status: the annotated code, or 500 for unannotated errors.
    pub fn status_code(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<FileProviderError> for AppError {
    fn from(e: FileProviderError) -> Self {
        let status = match &e {
            FileProviderError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            FileProviderError::InvalidName(_) => Some(StatusCode::BAD_REQUEST),
            FileProviderError::Io(_) => None,
        };
        AppError {
            kind: ErrorKind::Provider,
            status,
            message: e.to_string(),
            detail: std::error::Error::source(&e).map(|s| s.to_string()),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError {
            kind: ErrorKind::Render,
            status: None,
            message: "Failed to render page".to_string(),
            detail: Some(e.to_string()),
        }
    }
}

// ============================================================================
// Error responder
// ============================================================================

/// JSON error body shape shared by the error and not-found responders.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
    pub creator: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Terminal translation of errors into responses. Constructed once with the
/// environment mode; writes exactly one response per call.
pub struct ErrorResponder {
    environment: Environment,
    templates: Arc<Templates>,
}

impl ErrorResponder {
    pub fn new(environment: Environment, templates: Arc<Templates>) -> Self {
        Self {
            environment,
            templates,
        }
    }

    /// Build the JSON body for an error.
    pub fn error_body(&self, err: &AppError) -> ErrorBody {
        let message = if err.message.is_empty() {
            "Internal Server Error".to_string()
        } else {
            err.message.clone()
        };
        ErrorBody {
            status: err.status_code().as_u16(),
            message,
            creator: CREATOR,
            error: self.detail_for(err),
        }
    }

    /// Build the error-page context for an error.
    pub fn error_context(&self, err: &AppError) -> ErrorContext {
        let status = err.status_code().as_u16();
        let message = if err.message.is_empty() {
            "Something went wrong".to_string()
        } else {
            err.message.clone()
        };
        ErrorContext {
            title: format!("{status} - Error | RYU CDN"),
            message,
            status_code: status,
            stack: self.detail_for(err),
        }
    }

    fn detail_for(&self, err: &AppError) -> Option<String> {
        if self.environment.is_development() {
            err.detail.clone()
        } else {
            None
        }
    }

    pub fn respond(&self, format: ResponseFormat, err: &AppError) -> Response {
        let status = err.status_code();
        tracing::error!(
            status = status.as_u16(),
            kind = ?err.kind,
            message = %err.message,
            "Request failed"
        );

        match format {
            ResponseFormat::Json => (status, Json(self.error_body(err))).into_response(),
            ResponseFormat::Html => match self.templates.render("error", &self.error_context(err))
            {
                Ok(html) => (status, Html(html)).into_response(),
                // The error page itself failed; nothing left to render with.
                Err(e) => {
                    tracing::error!(error = %e, "Failed to render error page");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
                }
            },
        }
    }

    pub fn not_found(&self, format: ResponseFormat) -> Response {
        match format {
            ResponseFormat::Json => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    status: 404,
                    message: "Route not found".to_string(),
                    creator: CREATOR,
                    error: None,
                }),
            )
                .into_response(),
            ResponseFormat::Html => {
                let ctx = ErrorContext {
                    title: "404 - Not Found | RYU CDN".to_string(),
                    message: "The page you are looking for does not exist.".to_string(),
                    status_code: 404,
                    stack: None,
                };
                match self.templates.render("error", &ctx) {
                    Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to render error page");
                        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                            .into_response()
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responder(environment: Environment) -> ErrorResponder {
        ErrorResponder::new(environment, Arc::new(Templates::new().unwrap()))
    }

    #[test]
    fn selects_json_for_api_prefix() {
        assert_eq!(
            ResponseFormat::select("/api/health", None),
            ResponseFormat::Json
        );
        assert_eq!(
            ResponseFormat::select("/api", Some("text/html")),
            ResponseFormat::Json
        );
    }

    #[test]
    fn selects_json_for_exact_accept_header() {
        assert_eq!(
            ResponseFormat::select("/about", Some("application/json")),
            ResponseFormat::Json
        );
        // Only an exact match counts
        assert_eq!(
            ResponseFormat::select("/about", Some("application/json, text/html")),
            ResponseFormat::Html
        );
    }

    #[test]
    fn defaults_to_html() {
        assert_eq!(ResponseFormat::select("/", None), ResponseFormat::Html);
        assert_eq!(
            ResponseFormat::select("/result/a.png", Some("*/*")),
            ResponseFormat::Html
        );
    }

    #[test]
    fn unannotated_error_is_500() {
        let err = AppError::internal("boom");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn annotated_status_is_honored() {
        let err = AppError::internal("teapot").with_status(StatusCode::IM_A_TEAPOT);
        assert_eq!(err.status_code().as_u16(), 418);

        let body = responder(Environment::Production).error_body(&err);
        assert_eq!(body.status, 418);
        assert_eq!(body.message, "teapot");
        assert_eq!(body.creator, "RyuIzumi.");
    }

    #[test]
    fn empty_message_falls_back_per_format() {
        let err = AppError::internal("");
        let responder = responder(Environment::Production);
        assert_eq!(responder.error_body(&err).message, "Internal Server Error");
        assert_eq!(
            responder.error_context(&err).message,
            "Something went wrong"
        );
    }

    #[test]
    fn detail_exposed_only_in_development() {
        let err = AppError::internal("boom").with_detail("at handler.rs:42");

        let dev = responder(Environment::Development);
        assert_eq!(
            dev.error_body(&err).error.as_deref(),
            Some("at handler.rs:42")
        );
        assert_eq!(
            dev.error_context(&err).stack.as_deref(),
            Some("at handler.rs:42")
        );

        let prod = responder(Environment::Production);
        assert!(prod.error_body(&err).error.is_none());
        assert!(prod.error_context(&err).stack.is_none());
    }

    #[test]
    fn provider_not_found_maps_to_404() {
        let err: AppError = FileProviderError::NotFound("a.png".to_string()).into();
        assert_eq!(err.kind, ErrorKind::Provider);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn provider_io_error_maps_to_500() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = FileProviderError::Io(io).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_context_title_is_status_qualified() {
        let err = AppError::internal("boom").with_status(StatusCode::BAD_GATEWAY);
        let ctx = responder(Environment::Production).error_context(&err);
        assert_eq!(ctx.title, "502 - Error | RYU CDN");
        assert_eq!(ctx.status_code, 502);
    }
}
