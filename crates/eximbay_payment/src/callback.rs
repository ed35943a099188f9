// --- File: crates/eximbay_payment/src/callback.rs ---
use axum::body::{Body, Bytes};
use axum::extract::Request;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::PaymentError;
use crate::models::{CallbackKind, CallbackView};

/// Upper bound on a buffered callback body.
pub const MAX_CALLBACK_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to read callback body: {0}")]
    Read(#[from] axum::Error),
}

/// Buffers the whole body and returns it as text. The request keeps a copy of
/// the bytes, so it can still be read or forwarded afterwards.
///
/// An absent or empty body yields `""`. Invalid UTF-8 is replaced, not rejected.
pub async fn capture_body(request: &mut Request) -> Result<String, CaptureError> {
    let body = std::mem::take(request.body_mut());
    let bytes: Bytes = axum::body::to_bytes(body, MAX_CALLBACK_BODY_BYTES).await?;
    let text = String::from_utf8_lossy(&bytes).into_owned();
    debug!("Captured {} byte callback body", bytes.len());
    *request.body_mut() = Body::from(bytes);
    Ok(text)
}

/// Captures a gateway callback for display.
pub async fn capture_callback(
    kind: CallbackKind,
    mut request: Request,
) -> Result<CallbackView, PaymentError> {
    let body = capture_body(&mut request).await?;

    if body.is_empty() {
        warn!("{} called without a body", kind.operation());
        return Ok(CallbackView {
            kind,
            body: None,
            error_message: Some(format!("{}: no callback body was received", kind.operation())),
        });
    }

    info!("{} callback body: {}", kind.operation(), body);
    Ok(CallbackView {
        kind,
        body: Some(body),
        error_message: None,
    })
}
