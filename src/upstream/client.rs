use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::error::{error_message, UpstreamError};

const USER_AGENT: &str = concat!("soundtracker/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Per-upstream timeout and retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Timeout for a single attempt.
    pub timeout: Duration,
    /// Retries after the first attempt; 0 disables retrying.
    pub max_retries: u32,
    /// Sleep before the first retry, doubled for each following one.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `retry` (1-based), capped at 10 seconds.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

/// Parses a configured base URL, making sure relative joins append to its path.
pub fn parse_base_url(service: &'static str, raw: &str) -> Result<Url, UpstreamError> {
    let mut owned = raw.trim().to_string();
    if !owned.ends_with('/') {
        owned.push('/');
    }
    Url::parse(&owned).map_err(|source| UpstreamError::Url { service, source })
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// A `reqwest::Client` bound to one upstream service and its retry policy.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    service: &'static str,
    policy: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(service: &'static str, policy: RetryPolicy) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|source| UpstreamError::Transport { service, source })?;

        Ok(Self {
            http,
            service,
            policy,
        })
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub(crate) fn url_error(&self, source: url::ParseError) -> UpstreamError {
        UpstreamError::Url {
            service: self.service,
            source,
        }
    }

    /// Sends the request built by `build` and decodes a JSON body.
    ///
    /// `build` is called once per attempt. Transport timeouts, connect
    /// failures, 429 and 5xx responses are retried; other failures are not.
    pub async fn execute_json<T, F>(&self, build: F) -> Result<T, UpstreamError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder,
    {
        let service = self.service;
        let mut retries = 0u32;

        loop {
            let request = build(&self.http).timeout(self.policy.timeout);

            let response = match request.send().await {
                Ok(response) => response,
                Err(source) => {
                    if is_retryable_error(&source) && retries < self.policy.max_retries {
                        retries += 1;
                        warn!(
                            service,
                            retry = retries,
                            max_retries = self.policy.max_retries,
                            error = %source,
                            "upstream request failed, retrying"
                        );
                        tokio::time::sleep(self.policy.backoff(retries)).await;
                        continue;
                    }
                    return Err(UpstreamError::Transport { service, source });
                }
            };

            let status = response.status();
            debug!(service, url = %response.url(), status = status.as_u16(), "upstream response");

            if status.is_success() {
                let body = response
                    .bytes()
                    .await
                    .map_err(|source| UpstreamError::Transport { service, source })?;
                return serde_json::from_slice(&body)
                    .map_err(|source| UpstreamError::Decode { service, source });
            }

            if is_retryable_status(status) && retries < self.policy.max_retries {
                retries += 1;
                warn!(
                    service,
                    status = status.as_u16(),
                    retry = retries,
                    max_retries = self.policy.max_retries,
                    "upstream returned a retryable status, retrying"
                );
                tokio::time::sleep(self.policy.backoff(retries)).await;
                continue;
            }

            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            return Err(UpstreamError::Status {
                service,
                status,
                message: error_message(&body),
            });
        }
    }
}
