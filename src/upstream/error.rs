use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} API error (HTTP {status}): {message}")]
    Status {
        service: &'static str,
        status: StatusCode,
        message: String,
    },
    #[error("{service} returned an unexpected response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{service} URL error: {source}")]
    Url {
        service: &'static str,
        #[source]
        source: url::ParseError,
    },
}

impl UpstreamError {
    /// HTTP status returned by the upstream service, if it got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport { source, .. } => source.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Transport { source, .. } if source.is_timeout())
    }

    pub fn service(&self) -> &'static str {
        match self {
            UpstreamError::Transport { service, .. }
            | UpstreamError::Status { service, .. }
            | UpstreamError::Decode { service, .. }
            | UpstreamError::Url { service, .. } => service,
        }
    }
}

/// Pulls a human readable message out of an upstream error body.
///
/// TMDB uses `status_message`, the Spotify accounts service uses
/// `error_description` and the Spotify web API nests `error.message`.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.get("status_message"),
            value.get("error_description"),
            value.get("error").and_then(|e| e.get("message")),
            value.get("message"),
            value.get("error"),
        ];
        for candidate in candidates.into_iter().flatten() {
            if let Some(msg) = candidate.as_str() {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    trimmed.chars().take(200).collect()
}
