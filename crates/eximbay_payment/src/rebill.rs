// --- File: crates/eximbay_payment/src/rebill.rs ---
//! Token lookup followed by a rebill, as an explicit state machine.
//!
//! ```text
//! INIT --lookup ok, rescode 0000--> TOKEN_LOOKED_UP --rebill 2xx--> REBILLED
//!   \                                  \
//!    `--anything else--> FAILED         `--anything else--> FAILED
//! ```
//!
//! The rebill payload needs a [`VerifiedToken`], which only the lookup step
//! can produce, so no rebill request is ever built for an unverified token.

use eximbay_common::{GatewayResponse, GatewayTransport, TransportError};
use eximbay_config::PaymentFixtures;
use reqwest::Url;
use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

use crate::error::PaymentError;
use crate::logic::build_rebill_payment;
use crate::models::{GatewayCredential, OrderId};

// --- Endpoints ---

/// Token billing URLs under the configured API root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBillingEndpoints {
    base: Url,
}

impl TokenBillingEndpoints {
    /// Parses `api_base_url`, e.g. `https://api-test.eximbay.com/v1`.
    pub fn new(api_base_url: &str) -> Result<Self, PaymentError> {
        let base = Url::parse(api_base_url.trim()).map_err(|e| {
            PaymentError::InvalidConfiguration(format!("api_base_url '{}': {}", api_base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(PaymentError::InvalidConfiguration(format!(
                "api_base_url '{}' cannot carry a path",
                api_base_url
            )));
        }
        Ok(Self { base })
    }

    /// `{base}/payments/tokenbilling/{token_id}`
    pub fn lookup_url(&self, token_id: &str) -> Url {
        self.with_segments(&["payments", "tokenbilling", token_id])
    }

    /// `{base}/payments/tokenbilling/{token_id}/rebill`
    pub fn rebill_url(&self, token_id: &str) -> Url {
        self.with_segments(&["payments", "tokenbilling", token_id, "rebill"])
    }

    // Each segment is percent-encoded, so a token cannot add path components.
    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

// --- States ---

/// A token the gateway confirmed with rescode `"0000"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    token_id: String,
    card_info: String,
}

impl VerifiedToken {
    pub(crate) fn new(token_id: String, card_info: String) -> Self {
        Self {
            token_id,
            card_info,
        }
    }

    pub fn token_id(&self) -> &str {
        &self.token_id
    }

    /// Raw body of the lookup answer.
    pub fn card_info(&self) -> &str {
        &self.card_info
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RebillStep {
    TokenLookup,
    Rebill,
}

impl fmt::Display for RebillStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebillStep::TokenLookup => f.write_str("token lookup"),
            RebillStep::Rebill => f.write_str("rebill"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The gateway did not answer within the client timeout.
    Timeout,
    /// The gateway could not be reached.
    Transport,
    /// The gateway answered but not with success.
    Rejected,
    /// The configured key cannot be sent.
    Configuration,
    /// The request could not be built.
    Internal,
}

impl FailureKind {
    /// Kind of a call that never got an answer.
    pub fn of_transport(err: &TransportError) -> Self {
        match err {
            TransportError::Timeout(_) => FailureKind::Timeout,
            TransportError::Request(_) => FailureKind::Transport,
            TransportError::InvalidAuthorization => FailureKind::Configuration,
        }
    }
}

/// Why a rebill attempt stopped, with whatever the gateway said.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RebillFailure {
    pub step: RebillStep,
    pub kind: FailureKind,
    pub message: String,
    pub raw_body: Option<String>,
    /// Lookup body, once the token was verified.
    pub token_card_info: Option<String>,
}

impl RebillFailure {
    fn transport(step: RebillStep, err: &TransportError, token_card_info: Option<String>) -> Self {
        Self {
            step,
            kind: FailureKind::of_transport(err),
            message: format!("{} / API call failed: {}", step, err),
            raw_body: None,
            token_card_info,
        }
    }
}

impl fmt::Display for RebillFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(body) = self.raw_body.as_deref().filter(|b| !b.is_empty()) {
            write!(f, ": {}", body)?;
        }
        Ok(())
    }
}

/// Everything known after a completed rebill.
#[derive(Debug, Clone, PartialEq)]
pub struct RebillReceipt {
    pub token: VerifiedToken,
    pub order_id: OrderId,
    pub rescode: Option<String>,
    pub resmsg: Option<String>,
    pub response_body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RebillState {
    Init { token_id: String },
    TokenLookedUp { token: VerifiedToken },
    Rebilled(RebillReceipt),
    Failed(RebillFailure),
}

/// Terminal states only.
#[derive(Debug, Clone, PartialEq)]
pub enum RebillOutcome {
    Rebilled(RebillReceipt),
    Failed(RebillFailure),
}

impl RebillState {
    pub fn name(&self) -> &'static str {
        match self {
            RebillState::Init { .. } => "INIT",
            RebillState::TokenLookedUp { .. } => "TOKEN_LOOKED_UP",
            RebillState::Rebilled(_) => "REBILLED",
            RebillState::Failed(_) => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RebillState::Rebilled(_) | RebillState::Failed(_))
    }

    /// `Ok` for a terminal state, otherwise hands the state back.
    pub fn into_outcome(self) -> Result<RebillOutcome, RebillState> {
        match self {
            RebillState::Rebilled(receipt) => Ok(RebillOutcome::Rebilled(receipt)),
            RebillState::Failed(failure) => Ok(RebillOutcome::Failed(failure)),
            pending => Err(pending),
        }
    }
}

// --- Driver ---

/// Drives one rebill attempt. Each step issues at most one gateway call.
pub struct RebillFlow<'a> {
    gateway: &'a dyn GatewayTransport,
    credential: &'a GatewayCredential,
    endpoints: &'a TokenBillingEndpoints,
    fixtures: &'a PaymentFixtures,
    order_id: OrderId,
}

impl<'a> RebillFlow<'a> {
    pub fn new(
        gateway: &'a dyn GatewayTransport,
        credential: &'a GatewayCredential,
        endpoints: &'a TokenBillingEndpoints,
        fixtures: &'a PaymentFixtures,
        order_id: OrderId,
    ) -> Self {
        Self {
            gateway,
            credential,
            endpoints,
            fixtures,
            order_id,
        }
    }

    /// Runs from INIT until a terminal state.
    pub async fn run(&self, token_id: impl Into<String>) -> RebillOutcome {
        let mut state = RebillState::Init {
            token_id: token_id.into(),
        };
        loop {
            state = match state.into_outcome() {
                Ok(outcome) => return outcome,
                Err(pending) => self.step(pending).await,
            };
        }
    }

    /// Advances one transition. Terminal states are returned unchanged.
    pub async fn step(&self, state: RebillState) -> RebillState {
        match state {
            RebillState::Init { token_id } => self.lookup_token(token_id).await,
            RebillState::TokenLookedUp { token } => self.rebill(token).await,
            terminal => terminal,
        }
    }

    async fn lookup_token(&self, token_id: String) -> RebillState {
        let url = self.endpoints.lookup_url(&token_id);
        let result = match self.gateway.get(url.as_str(), self.credential.api_key()).await {
            Ok(result) => result,
            Err(err) => {
                warn!("Token lookup for {} did not complete: {}", token_id, err);
                return RebillState::Failed(RebillFailure::transport(
                    RebillStep::TokenLookup,
                    &err,
                    None,
                ));
            }
        };

        let status = result.status();
        let (success, raw_body, parsed) = result.into_parts();
        if success && parsed.as_ref().is_some_and(GatewayResponse::is_success_code) {
            info!("Token {} verified", token_id);
            return RebillState::TokenLookedUp {
                token: VerifiedToken::new(token_id, raw_body),
            };
        }

        let rescode = parsed.and_then(|p| p.rescode);
        warn!(
            "Token lookup for {} rejected (HTTP {}, rescode={:?})",
            token_id, status, rescode
        );
        RebillState::Failed(RebillFailure {
            step: RebillStep::TokenLookup,
            kind: FailureKind::Rejected,
            message: format!(
                "Token card lookup failed (HTTP {}, rescode={})",
                status,
                rescode.as_deref().unwrap_or("none")
            ),
            raw_body: Some(raw_body),
            token_card_info: None,
        })
    }

    async fn rebill(&self, token: VerifiedToken) -> RebillState {
        let payload = build_rebill_payment(self.credential, &self.order_id, &token, self.fixtures);
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(err) => {
                return RebillState::Failed(RebillFailure {
                    step: RebillStep::Rebill,
                    kind: FailureKind::Internal,
                    message: format!("Failed to serialize rebill payload: {}", err),
                    raw_body: None,
                    token_card_info: Some(token.card_info),
                });
            }
        };

        let url = self.endpoints.rebill_url(token.token_id());
        let result = match self
            .gateway
            .post(url.as_str(), self.credential.api_key(), body)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                warn!("Rebill for {} did not complete: {}", token.token_id(), err);
                return RebillState::Failed(RebillFailure::transport(
                    RebillStep::Rebill,
                    &err,
                    Some(token.card_info),
                ));
            }
        };

        let status = result.status();
        match result.into_parts() {
            (true, response_body, Some(parsed)) => {
                info!(
                    "Rebill {} for token {} answered rescode={:?}",
                    self.order_id,
                    token.token_id(),
                    parsed.rescode
                );
                RebillState::Rebilled(RebillReceipt {
                    token,
                    order_id: self.order_id.clone(),
                    rescode: parsed.rescode,
                    resmsg: parsed.resmsg,
                    response_body,
                })
            }
            (_, raw_body, _) => RebillState::Failed(RebillFailure {
                step: RebillStep::Rebill,
                kind: FailureKind::Rejected,
                message: format!("Rebill / API call failed (HTTP {})", status),
                raw_body: Some(raw_body),
                token_card_info: Some(token.card_info),
            }),
        }
    }
}
