use axum::{extract::Request, http::uri::Uri, middleware::Next, response::Response};
use std::time::{Duration, Instant};
use tracing::info;

/// Collapses repeated slashes and strips a trailing slash.
pub fn normalized_path(path: &str) -> String {
    let mut normalized = path.to_string();

    while normalized.contains("//") {
        normalized = normalized.replace("//", "/");
    }

    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}

/// Rewrites the request path before routing. Must wrap the router, not be
/// added with `Router::layer`, which runs after the route has been picked.
pub async fn normalize_path(mut req: Request, next: Next) -> Response {
    let uri = req.uri();
    let path = uri.path();
    let normalized = normalized_path(path);

    if normalized != path {
        let mut parts = uri.clone().into_parts();
        let new_path_and_query = if let Some(query) = uri.query() {
            format!("{}?{}", normalized, query)
        } else {
            normalized
        };

        if let Ok(new_uri) = new_path_and_query.parse::<Uri>() {
            parts.path_and_query = new_uri.into_parts().path_and_query;
            if let Ok(new_uri) = Uri::from_parts(parts) {
                *req.uri_mut() = new_uri;
            }
        }
    }

    next.run(req).await
}

/// Milliseconds, saturating instead of truncating.
pub fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %uri,
        status = status,
        length = content_length,
        elapsed_ms = elapsed_ms(start.elapsed()),
        "HTTP request"
    );

    response
}
