// --- File: crates/eximbay_common/src/http/client.rs ---
//! Authenticated JSON transport to the payment gateway.
//!
//! One attempt per call, no retries. A non-2xx answer is *not* an error here:
//! it comes back as a [`GatewayResult`] with `success == false` and the raw
//! body. Only network-level failures produce a [`TransportError`].

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::EximbayError;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Creates a new HTTP client with custom configuration.
///
/// # Arguments
///
/// * `timeout_secs` - The timeout in seconds for the client
/// * `follow_redirects` - Whether the client should follow redirects
pub fn create_client(timeout_secs: u64, follow_redirects: bool) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(if follow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        })
        .build()
}

/// Network-level failure talking to the gateway.
///
/// Distinct from a gateway rejection, which is a successful call with a
/// non-2xx status.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("gateway did not respond in time: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("gateway unreachable: {0}")]
    Request(#[source] reqwest::Error),

    #[error("API key contains characters that are not valid in an Authorization header")]
    InvalidAuthorization,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err)
        } else {
            TransportError::Request(err)
        }
    }
}

impl From<TransportError> for EximbayError {
    fn from(err: TransportError) -> Self {
        let message = format!("Gateway: {}", err);
        match err {
            TransportError::Timeout(_) => EximbayError::TimeoutError(message),
            TransportError::Request(_) => EximbayError::HttpError(message),
            TransportError::InvalidAuthorization => EximbayError::ConfigError(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMethod {
    Get,
    Post,
}

impl fmt::Display for GatewayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayMethod::Get => f.write_str("GET"),
            GatewayMethod::Post => f.write_str("POST"),
        }
    }
}

/// Outcome of a gateway call that reached the gateway.
///
/// `parsed` is best effort: a 2xx answer whose body is not the expected JSON
/// still has `success == true`, just no parsed value. A non-2xx answer never
/// carries a parsed value.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResult<T> {
    success: bool,
    status: u16,
    raw_body: String,
    parsed: Option<T>,
}

impl<T> GatewayResult<T> {
    /// A non-2xx answer.
    pub fn rejected(status: u16, raw_body: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            raw_body: raw_body.into(),
            parsed: None,
        }
    }

    /// A 2xx answer; the body is parsed if possible.
    pub fn accepted(status: u16, raw_body: impl Into<String>) -> Self
    where
        T: DeserializeOwned,
    {
        let raw_body = raw_body.into();
        let parsed = match serde_json::from_str::<T>(&raw_body) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!("Gateway body is not the expected JSON, keeping raw text: {}", err);
                None
            }
        };
        Self {
            success: true,
            status,
            raw_body,
            parsed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn raw_body(&self) -> &str {
        &self.raw_body
    }

    pub fn parsed(&self) -> Option<&T> {
        self.parsed.as_ref()
    }

    /// `(success, raw_body, parsed)`
    pub fn into_parts(self) -> (bool, String, Option<T>) {
        (self.success, self.raw_body, self.parsed)
    }
}

/// HTTP client for the gateway API, shared via `Arc` or cheap `Clone`.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    client: Client,
}

impl GatewayClient {
    /// Builds a client with the given per-request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self, TransportError> {
        Ok(Self {
            client: create_client(timeout_secs, true)?,
        })
    }

    /// Wraps an already configured `reqwest::Client`.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Issues one authenticated call.
    ///
    /// `api_key` is sent verbatim as `Authorization: Basic <api_key>`; it is
    /// expected to already be in its transmittable form and is not re-encoded.
    /// For POST the body is serialized as JSON; GET additionally sends
    /// `Accept: application/json`.
    pub async fn call<T, B>(
        &self,
        method: GatewayMethod,
        url: &str,
        api_key: &str,
        body: Option<&B>,
    ) -> Result<GatewayResult<T>, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut authorization = HeaderValue::from_str(&format!("Basic {}", api_key))
            .map_err(|_| TransportError::InvalidAuthorization)?;
        authorization.set_sensitive(true);

        let request = match method {
            GatewayMethod::Get => self
                .client
                .get(url)
                .header(ACCEPT, HeaderValue::from_static("application/json")),
            GatewayMethod::Post => self.client.post(url),
        }
        .header(AUTHORIZATION, authorization);

        let request = match (method, body) {
            (GatewayMethod::Post, Some(body)) => request.json(body),
            _ => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        info!("Gateway {} {} -> {}", method, url, status);
        if status.is_success() {
            Ok(GatewayResult::accepted(status.as_u16(), body_text))
        } else {
            warn!("Gateway rejected {} {}: {}", method, url, body_text);
            Ok(GatewayResult::rejected(status.as_u16(), body_text))
        }
    }

    /// GET `url` and parse the answer as `T` (best effort).
    pub async fn get_json<T>(&self, url: &str, api_key: &str) -> Result<GatewayResult<T>, TransportError>
    where
        T: DeserializeOwned,
    {
        self.call::<T, ()>(GatewayMethod::Get, url, api_key, None).await
    }

    /// POST `body` as JSON to `url` and parse the answer as `T` (best effort).
    pub async fn post_json<T, B>(
        &self,
        url: &str,
        api_key: &str,
        body: &B,
    ) -> Result<GatewayResult<T>, TransportError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(GatewayMethod::Post, url, api_key, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GatewayResponse;

    #[test]
    fn test_rejected_result_never_carries_parsed_value() {
        let result: GatewayResult<GatewayResponse> =
            GatewayResult::rejected(400, r#"{"rescode":"0000"}"#);
        assert!(!result.is_success());
        assert!(result.parsed().is_none());
        assert_eq!(result.raw_body(), r#"{"rescode":"0000"}"#);
    }

    #[test]
    fn test_accepted_result_swallows_parse_errors() {
        let result: GatewayResult<GatewayResponse> = GatewayResult::accepted(200, "not-json");
        assert!(result.is_success());
        assert!(result.parsed().is_none());
        assert_eq!(result.status(), 200);
    }

    #[test]
    fn test_invalid_api_key_is_reported_as_config_problem() {
        let err: EximbayError = TransportError::InvalidAuthorization.into();
        assert!(matches!(err, EximbayError::ConfigError(_)));
    }
}
