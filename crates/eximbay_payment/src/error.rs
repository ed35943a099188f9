// --- File: crates/eximbay_payment/src/error.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eximbay_common::{
    config_error, external_service_error, internal_error, validation_error, EximbayError,
    HttpStatusCode, IntoHttpResponse, TransportError,
};
use serde_json::json;
use thiserror::Error;

use crate::callback::CaptureError;
use crate::models::{FlowKind, RebillFailureView};
use crate::rebill::{FailureKind, RebillFailure};

/// Payment-flow error types.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The key or merchant id for the selected flow is empty
    #[error("Payment settings for the {flow} flow are missing (API key or merchant id is empty)")]
    ConfigurationMissing { flow: FlowKind },

    /// A configured value cannot be used (e.g. an unparsable base URL)
    #[error("Invalid gateway configuration: {0}")]
    InvalidConfiguration(String),

    /// Bad input from the caller
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The gateway could not be reached or did not answer in time
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The gateway answered with a non-2xx status or an unusable body
    #[error(
        "{operation} / API call failed (HTTP {status}, rescode={}): {body}",
        .rescode.as_deref().unwrap_or("none")
    )]
    GatewayRejected {
        operation: &'static str,
        status: u16,
        rescode: Option<String>,
        body: String,
    },

    /// The token lookup or the rebill call did not complete
    #[error("{failure}")]
    RebillFailed {
        input_token_id: String,
        failure: RebillFailure,
    },

    /// The callback body could not be read
    #[error(transparent)]
    Callback(#[from] CaptureError),

    /// Building the JSON payload failed
    #[error("Failed to serialize gateway payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn rebill_error(kind: FailureKind, message: String) -> EximbayError {
    match kind {
        FailureKind::Timeout => EximbayError::TimeoutError(message),
        FailureKind::Transport => EximbayError::HttpError(message),
        FailureKind::Rejected => external_service_error("Eximbay", message),
        FailureKind::Configuration => config_error(message),
        FailureKind::Internal => internal_error(message),
    }
}

/// Convert PaymentError to EximbayError
impl From<PaymentError> for EximbayError {
    fn from(err: PaymentError) -> Self {
        let message = err.to_string();
        match err {
            PaymentError::ConfigurationMissing { .. } | PaymentError::InvalidConfiguration(_) => {
                config_error(message)
            }
            PaymentError::Validation(_) | PaymentError::Callback(_) => validation_error(message),
            PaymentError::Transport(e) => e.into(),
            PaymentError::GatewayRejected { .. } => external_service_error("Eximbay", message),
            PaymentError::RebillFailed { failure, .. } => rebill_error(failure.kind, message),
            PaymentError::Serialization(_) => internal_error(message),
        }
    }
}

impl HttpStatusCode for PaymentError {
    fn status_code(&self) -> u16 {
        match self {
            PaymentError::ConfigurationMissing { .. } => 500,
            PaymentError::InvalidConfiguration(_) => 500,
            PaymentError::Validation(_) => 400,
            PaymentError::Transport(TransportError::Timeout(_)) => 504,
            PaymentError::Transport(TransportError::Request(_)) => 502,
            PaymentError::Transport(TransportError::InvalidAuthorization) => 500,
            PaymentError::GatewayRejected { .. } => 502,
            PaymentError::RebillFailed { failure, .. } => match failure.kind {
                FailureKind::Timeout => 504,
                FailureKind::Transport | FailureKind::Rejected => 502,
                FailureKind::Configuration | FailureKind::Internal => 500,
            },
            PaymentError::Callback(_) => 400,
            PaymentError::Serialization(_) => 500,
        }
    }
}

/// Same envelope as [`EximbayError`]; a failed rebill also carries a `rebill`
/// object with the step, kind, gateway body and looked-up card info.
impl IntoHttpResponse for PaymentError {
    fn into_http_response(self) -> Response {
        match self {
            PaymentError::RebillFailed {
                input_token_id,
                failure,
            } => {
                let view = RebillFailureView {
                    input_token_id,
                    failure,
                };
                let error = rebill_error(view.failure.kind, view.failure.to_string());
                let status_code = StatusCode::from_u16(error.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let body = Json(json!({
                    "error": {
                        "message": error.to_string(),
                        "code": status_code.as_u16(),
                    },
                    "rebill": view,
                }));
                (status_code, body).into_response()
            }
            other => EximbayError::from(other).into_http_response(),
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rebill::RebillStep;
    use axum::body::to_bytes;
    use serde_json::Value;

    fn rebill_failed(step: RebillStep, kind: FailureKind) -> PaymentError {
        PaymentError::RebillFailed {
            input_token_id: "tok_1".into(),
            failure: RebillFailure {
                step,
                kind,
                message: format!("{step} / API call failed"),
                raw_body: Some(r#"{"rescode":"0001"}"#.into()),
                token_card_info: None,
            },
        }
    }

    #[test]
    fn test_status_codes_agree_with_common_mapping() {
        let errors = vec![
            PaymentError::ConfigurationMissing {
                flow: FlowKind::Tokenized,
            },
            PaymentError::Validation("tokenid is required".into()),
            PaymentError::GatewayRejected {
                operation: "ReadyAsync",
                status: 400,
                rescode: None,
                body: "bad".into(),
            },
            rebill_failed(RebillStep::TokenLookup, FailureKind::Rejected),
            rebill_failed(RebillStep::TokenLookup, FailureKind::Timeout),
            rebill_failed(RebillStep::Rebill, FailureKind::Transport),
            rebill_failed(RebillStep::TokenLookup, FailureKind::Configuration),
            rebill_failed(RebillStep::Rebill, FailureKind::Internal),
        ];

        for err in errors {
            let expected = err.status_code();
            let common: EximbayError = err.into();
            assert_eq!(common.status_code(), expected, "{common}");
        }
    }

    #[test]
    fn test_rejection_message_names_operation_and_body() {
        let err = PaymentError::GatewayRejected {
            operation: "ReadyTokenAsync",
            status: 401,
            rescode: Some("E001".into()),
            body: r#"{"rescode":"E001"}"#.into(),
        };
        let message = err.to_string();
        assert!(message.starts_with("ReadyTokenAsync / API call failed"));
        assert!(message.contains("HTTP 401"));
        assert!(message.contains("rescode=E001"));
        assert!(message.contains(r#"{"rescode":"E001"}"#));
    }

    #[test]
    fn test_rebill_timeout_maps_to_gateway_timeout() {
        let err = rebill_failed(RebillStep::TokenLookup, FailureKind::Timeout);
        assert_eq!(err.status_code(), 504);
        assert!(matches!(
            EximbayError::from(err),
            EximbayError::TimeoutError(_)
        ));
    }

    #[tokio::test]
    async fn test_rebill_failure_renders_its_details() {
        let err = PaymentError::RebillFailed {
            input_token_id: "tok_1".into(),
            failure: RebillFailure {
                step: RebillStep::Rebill,
                kind: FailureKind::Rejected,
                message: "Rebill / API call failed (HTTP 500)".into(),
                raw_body: Some("boom".into()),
                token_card_info: Some(r#"{"rescode":"0000"}"#.into()),
            },
        };

        let response = err.into_http_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], 502);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Rebill / API call failed (HTTP 500): boom"));
        assert_eq!(body["rebill"]["input_token_id"], "tok_1");
        assert_eq!(body["rebill"]["step"], "rebill");
        assert_eq!(body["rebill"]["kind"], "rejected");
        assert_eq!(body["rebill"]["raw_body"], "boom");
        assert_eq!(body["rebill"]["token_card_info"], r#"{"rescode":"0000"}"#);
    }

    #[tokio::test]
    async fn test_other_errors_keep_the_plain_envelope() {
        let response = PaymentError::Validation("tokenid is required".into()).into_http_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], 400);
        assert!(body.get("rebill").is_none());
    }
}
