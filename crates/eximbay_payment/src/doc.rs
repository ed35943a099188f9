// File: crates/eximbay_payment/src/doc.rs
#![allow(dead_code)] // Allow dead code for doc functions

#[cfg(feature = "openapi")]
use crate::models::{
    CallbackKind, CallbackView, FlowKind, OrderId, PaymentRequestPayload, ReadyView,
    RebillFailureView, RebillView,
};
#[cfg(feature = "openapi")]
use crate::rebill::{FailureKind, RebillFailure, RebillStep};
#[cfg(feature = "openapi")]
use crate::handlers::RebillForm;
#[cfg(feature = "openapi")]
use utoipa::OpenApi;

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/Payment/ReadyAsync",
    responses(
        (status = 200, description = "Gateway accepted the payment ready request", body = ReadyView),
        (status = 500, description = "Standard API key or merchant id not configured"),
        (status = 502, description = "Gateway unreachable or rejected the request"),
        (status = 504, description = "Gateway timed out")
    ),
    tag = "Payment"
)]
fn doc_ready_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/Payment/ReadyTokenAsync",
    responses(
        (status = 200, description = "Gateway accepted the tokenized payment ready request", body = ReadyView),
        (status = 500, description = "Token API key or merchant id not configured"),
        (status = 502, description = "Gateway unreachable or rejected the request"),
        (status = 504, description = "Gateway timed out")
    ),
    tag = "Payment"
)]
fn doc_ready_token_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/Payment/RebillAsync",
    request_body(
        content = RebillForm,
        content_type = "application/x-www-form-urlencoded",
        description = "Token id returned by a tokenized payment"
    ),
    responses(
        (status = 200, description = "Token verified and rebilled", body = RebillView),
        (status = 400, description = "Missing tokenid"),
        (status = 500, description = "Token API key, merchant id or base URL not usable"),
        (status = 502, description = "Token lookup or rebill failed; `rebill` holds the details", body = RebillFailureView),
        (status = 504, description = "Gateway timed out during lookup or rebill")
    ),
    tag = "Payment"
)]
fn doc_rebill_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/Payment/ReturnAsync",
    request_body(content = String, description = "Raw callback body, any content type"),
    responses(
        (status = 200, description = "Captured callback body", body = CallbackView)
    ),
    tag = "Payment Callbacks"
)]
fn doc_return_handler() {}

#[cfg(feature = "openapi")]
#[utoipa::path(
    post,
    path = "/Payment/StatusAsync",
    request_body(content = String, description = "Raw callback body, any content type"),
    responses(
        (status = 200, description = "Captured callback body", body = CallbackView)
    ),
    tag = "Payment Callbacks"
)]
fn doc_status_handler() {}

#[cfg(feature = "openapi")]
#[derive(OpenApi)]
#[openapi(
    paths(
        doc_ready_handler,
        doc_ready_token_handler,
        doc_rebill_handler,
        doc_return_handler,
        doc_status_handler
    ),
    components(
        schemas(
            ReadyView,
            RebillView,
            RebillForm,
            RebillFailureView,
            RebillFailure,
            RebillStep,
            FailureKind,
            CallbackView,
            CallbackKind,
            FlowKind,
            OrderId,
            PaymentRequestPayload
        )
    ),
    tags(
        (name = "Payment", description = "Eximbay payment ready and token rebill"),
        (name = "Payment Callbacks", description = "Return and status callbacks from Eximbay")
    )
)]
pub struct PaymentApiDoc;
