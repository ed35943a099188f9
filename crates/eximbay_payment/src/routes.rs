// --- File: crates/eximbay_payment/src/routes.rs ---

use axum::{
    routing::{get, post},
    Router,
};
use eximbay_common::GatewayTransport;
use eximbay_config::AppConfig;
use std::sync::Arc;

use crate::handlers::{
    ready_handler, ready_page_handler, ready_token_handler, rebill_handler, rebill_page_handler,
    return_handler, status_handler, PaymentState,
};

/// Creates a router containing all `/Payment/*` routes.
///
/// # Arguments
/// * `config` - Shared application configuration (`Arc<AppConfig>`).
/// * `gateway` - Transport used for every outbound gateway call.
pub fn routes(config: Arc<AppConfig>, gateway: Arc<dyn GatewayTransport>) -> Router {
    let payment_state = Arc::new(PaymentState { config, gateway });

    Router::new()
        // Pages for the operator's browser
        .route("/Payment/Ready", get(ready_page_handler))
        .route("/Payment/Rebill", get(rebill_page_handler))
        // Flows that call the gateway
        .route("/Payment/ReadyAsync", post(ready_handler))
        .route("/Payment/ReadyTokenAsync", post(ready_token_handler))
        .route("/Payment/RebillAsync", post(rebill_handler))
        // Called by the gateway
        .route("/Payment/ReturnAsync", post(return_handler))
        .route("/Payment/StatusAsync", post(status_handler))
        .with_state(payment_state)
}
