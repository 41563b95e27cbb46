// src/utils/http.rs

//! HTTP client utilities.
//!
//! Backend requests go through [`ApiClient`], which applies the
//! configured timeout, retries transient failures with a fixed delay,
//! and decodes JSON bodies with request context attached to errors.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::HttpConfig;
use crate::error::{AppError, Result};

/// Create a configured HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.timeout)
        .build()?;
    Ok(client)
}

/// Whether a response status is worth retrying.
///
/// Server-side failures are considered transient; anything else non-2xx
/// is a hard error.
fn is_transient(status: StatusCode) -> bool {
    status.is_server_error()
}

/// JSON API client with bounded retry.
pub struct ApiClient {
    client: Client,
    retry_attempts: u32,
    retry_delay: std::time::Duration,
}

impl ApiClient {
    /// Build an API client from the HTTP settings.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: config.retry_delay,
        })
    }

    /// GET a JSON document.
    ///
    /// `build` receives the underlying client and produces the request
    /// for each attempt. Transport errors and 5xx responses are retried
    /// up to the attempt budget; other non-2xx statuses and undecodable
    /// bodies fail immediately. `context` identifies the request in
    /// error messages and logs.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        context: &str,
        build: impl Fn(&Client) -> RequestBuilder,
    ) -> Result<T> {
        let mut attempt = 1;
        loop {
            match self.try_get(context, build(&self.client)).await {
                Ok(body) => {
                    return serde_json::from_str(&body).map_err(|e| {
                        AppError::upstream(context, format!("invalid JSON body: {e}"))
                    });
                }
                Err(retry) if attempt < self.retry_attempts && retry.transient => {
                    log::warn!(
                        "Request {} failed (attempt {}/{}): {}",
                        context,
                        attempt,
                        self.retry_attempts,
                        retry.error
                    );
                    attempt += 1;
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(retry) => return Err(retry.error),
            }
        }
    }

    async fn try_get(
        &self,
        context: &str,
        request: RequestBuilder,
    ) -> std::result::Result<String, RetryableError> {
        let response = request.send().await.map_err(|e| RetryableError {
            transient: true,
            error: e.into(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetryableError {
                transient: is_transient(status),
                error: AppError::upstream(context, format!("unexpected status {status}")),
            });
        }

        response.text().await.map_err(|e| RetryableError {
            transient: true,
            error: e.into(),
        })
    }
}

/// An attempt failure plus whether another attempt makes sense.
struct RetryableError {
    transient: bool,
    error: AppError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_transient() {
        assert!(is_transient(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(is_transient(StatusCode::BAD_GATEWAY));
        assert!(is_transient(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        assert!(!is_transient(StatusCode::UNAUTHORIZED));
        assert!(!is_transient(StatusCode::NOT_FOUND));
        assert!(!is_transient(StatusCode::TOO_MANY_REQUESTS));
    }
}
