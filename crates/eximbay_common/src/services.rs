// --- File: crates/eximbay_common/src/services.rs ---
//! Service abstractions for the gateway.
//!
//! Flows depend on [`GatewayTransport`] rather than on [`GatewayClient`]
//! directly, so they can be driven by a recording mock in tests.

use std::future::Future;
use std::pin::Pin;

use crate::http::client::{GatewayClient, GatewayResult, TransportError};
use crate::models::GatewayResponse;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Authenticated JSON calls to the payment gateway.
pub trait GatewayTransport: Send + Sync {
    /// GET `url`, sending `api_key` as the Basic credential.
    fn get(
        &self,
        url: &str,
        api_key: &str,
    ) -> BoxFuture<'_, GatewayResult<GatewayResponse>, TransportError>;

    /// POST `body` as JSON to `url`, sending `api_key` as the Basic credential.
    fn post(
        &self,
        url: &str,
        api_key: &str,
        body: serde_json::Value,
    ) -> BoxFuture<'_, GatewayResult<GatewayResponse>, TransportError>;
}

impl GatewayTransport for GatewayClient {
    fn get(
        &self,
        url: &str,
        api_key: &str,
    ) -> BoxFuture<'_, GatewayResult<GatewayResponse>, TransportError> {
        // Owned copies so the future only borrows `self`
        let url = url.to_string();
        let api_key = api_key.to_string();
        Box::pin(async move { self.get_json(&url, &api_key).await })
    }

    fn post(
        &self,
        url: &str,
        api_key: &str,
        body: serde_json::Value,
    ) -> BoxFuture<'_, GatewayResult<GatewayResponse>, TransportError> {
        let url = url.to_string();
        let api_key = api_key.to_string();
        Box::pin(async move { self.post_json(&url, &api_key, &body).await })
    }
}
