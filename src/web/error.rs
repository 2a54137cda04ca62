use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use askama::Template;
use tracing::{error, warn};

use super::templates::{ErrorTemplate, SITE_NAME};
use crate::server::AppState;
use crate::upstream::UpstreamError;

/// Failure of a page request. Each kind has its own status code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound(#[source] Option<UpstreamError>),
    #[error("{0}")]
    Validation(String),
    #[error("Upstream service unavailable")]
    Upstream(#[source] UpstreamError),
    #[error("Failed to render page")]
    Render(#[from] askama::Error),
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        if err.is_not_found() {
            AppError::NotFound(Some(err))
        } else {
            AppError::Upstream(err)
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error message followed by each of its sources, one per line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// What the error page middleware needs to render a failed request.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub details: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let details = error_chain(&self);
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %details, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %details, "request failed");
        }

        let mut response = (status, self.to_string()).into_response();
        response.extensions_mut().insert(ErrorReport {
            message: self.to_string(),
            details,
        });
        response
    }
}

/// Replaces the body of failed requests with the rendered error page.
///
/// The error chain is only shown when running in development.
pub async fn render_error_page(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };
    let status = response.status();

    let page = ErrorTemplate {
        title: format!("{} - Error", SITE_NAME),
        status: status.as_u16(),
        message: report.message,
        details: if state.config.is_development() {
            report.details
        } else {
            String::new()
        },
    };

    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!("failed to render error page: {}", e);
            response
        }
    }
}
