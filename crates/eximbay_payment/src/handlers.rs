// --- File: crates/eximbay_payment/src/handlers.rs ---
use axum::{
    extract::{Request, State},
    response::{Html, Json, Response},
    Form,
};
use eximbay_common::{log_error, map_json_error, EximbayError, GatewayTransport, IntoHttpResponse};
use eximbay_config::AppConfig;
use serde::Deserialize;
use std::sync::Arc;

use crate::callback::capture_callback;
use crate::logic::{ready_payment, rebill_with_token};
use crate::models::{CallbackKind, CallbackView, FlowKind, ReadyView, RebillView};

// --- State for Payment Handlers ---
// Configuration is read-only; the gateway client is shared.
#[derive(Clone)]
pub struct PaymentState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<dyn GatewayTransport>,
}

/// Form posted by the rebill page.
#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RebillForm {
    #[serde(default)]
    pub tokenid: String,
}

const READY_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Eximbay payment ready</title></head>
<body>
  <h1>Payment ready</h1>
  <form method="post" action="/Payment/ReadyAsync">
    <button type="submit">Standard payment (USD 1)</button>
  </form>
  <form method="post" action="/Payment/ReadyTokenAsync">
    <button type="submit">Tokenized payment (KRW 1000)</button>
  </form>
</body>
</html>"#;

const REBILL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Eximbay rebill</title></head>
<body>
  <h1>Rebill</h1>
  <form method="post" action="/Payment/RebillAsync">
    <label for="tokenid">Token id</label>
    <input id="tokenid" name="tokenid" type="text" required>
    <button type="submit">Rebill (KRW 1000)</button>
  </form>
</body>
</html>"#;

/// Entry page for the two "ready" flows.
pub async fn ready_page_handler() -> Html<&'static str> {
    Html(READY_PAGE)
}

/// Entry page for a rebill.
pub async fn rebill_page_handler() -> Html<&'static str> {
    Html(REBILL_PAGE)
}

/// Standard payment ready.
pub async fn ready_handler(
    State(state): State<Arc<PaymentState>>,
) -> Result<Json<ReadyView>, Response> {
    let result = ready_payment(
        &state.config.eximbay,
        state.gateway.as_ref(),
        FlowKind::Standard,
    )
    .await;
    if let Err(e) = &result {
        log_error(e, FlowKind::Standard.operation());
    }
    map_json_error(result, EximbayError::from)
}

/// Payment ready that registers a billing token.
pub async fn ready_token_handler(
    State(state): State<Arc<PaymentState>>,
) -> Result<Json<ReadyView>, Response> {
    let result = ready_payment(
        &state.config.eximbay,
        state.gateway.as_ref(),
        FlowKind::Tokenized,
    )
    .await;
    if let Err(e) = &result {
        log_error(e, FlowKind::Tokenized.operation());
    }
    map_json_error(result, EximbayError::from)
}

pub async fn rebill_handler(
    State(state): State<Arc<PaymentState>>,
    Form(form): Form<RebillForm>,
) -> Result<Json<RebillView>, Response> {
    let result =
        rebill_with_token(&state.config.eximbay, state.gateway.as_ref(), &form.tokenid).await;
    if let Err(e) = &result {
        log_error(e, "RebillAsync");
    }
    // Rendered by PaymentError itself so the failure details reach the page
    result.map(Json).map_err(IntoHttpResponse::into_http_response)
}

// --- Gateway callbacks ---
// Any content type; the raw body is shown as-is.

pub async fn return_handler(request: Request) -> Result<Json<CallbackView>, Response> {
    map_json_error(
        capture_callback(CallbackKind::Return, request).await,
        EximbayError::from,
    )
}

pub async fn status_handler(request: Request) -> Result<Json<CallbackView>, Response> {
    map_json_error(
        capture_callback(CallbackKind::Status, request).await,
        EximbayError::from,
    )
}
