// --- File: crates/eximbay_payment/src/models.rs ---

use chrono::{DateTime, Local, TimeZone};
use eximbay_config::EximbayConfig;
use serde::Serialize;
use std::fmt;

use crate::error::PaymentError;
use crate::rebill::RebillFailure;

// Conditionally import ToSchema if openapi feature is enabled
#[cfg(feature = "openapi")]
use utoipa::ToSchema;

// --- Flows & Credentials ---

/// Which merchant account a request is issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Plain payment ready (`api_key` / `merchant_id`).
    Standard,
    /// Token-creating payment ready and rebills (`api_key_token` / `merchant_id_token`).
    Tokenized,
}

impl FlowKind {
    /// Action name used in diagnostics.
    pub fn operation(&self) -> &'static str {
        match self {
            FlowKind::Standard => "ReadyAsync",
            FlowKind::Tokenized => "ReadyTokenAsync",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::Standard => f.write_str("standard"),
            FlowKind::Tokenized => f.write_str("tokenized"),
        }
    }
}

/// Endpoint, key and merchant id for one flow. Never built with a blank key or mid.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayCredential {
    endpoint_url: String,
    api_key: String,
    merchant_id: String,
}

impl GatewayCredential {
    /// Validates and assembles a credential.
    pub fn new(
        flow: FlowKind,
        endpoint_url: impl Into<String>,
        api_key: impl Into<String>,
        merchant_id: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let api_key = api_key.into();
        let merchant_id = merchant_id.into();
        if api_key.trim().is_empty() || merchant_id.trim().is_empty() {
            return Err(PaymentError::ConfigurationMissing { flow });
        }
        Ok(Self {
            endpoint_url: endpoint_url.into(),
            api_key,
            merchant_id,
        })
    }

    /// Selects the credential set for `flow` from configuration.
    pub fn for_flow(config: &EximbayConfig, flow: FlowKind) -> Result<Self, PaymentError> {
        match flow {
            FlowKind::Standard => Self::new(
                flow,
                config.api_ready_url.as_str(),
                config.api_key.as_str(),
                config.merchant_id.as_str(),
            ),
            FlowKind::Tokenized => Self::new(
                flow,
                config.api_ready_url.as_str(),
                config.api_key_token.as_str(),
                config.merchant_id_token.as_str(),
            ),
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }
}

impl fmt::Debug for GatewayCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayCredential")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_key", &"<redacted>")
            .field("merchant_id", &self.merchant_id)
            .finish()
    }
}

// --- Order Identifier ---

/// Local timestamp with millisecond precision, `yyyyMMddHHmmssfff`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub const FORMAT: &'static str = "%Y%m%d%H%M%S%3f";
    /// Length of every generated id.
    pub const LEN: usize = 17;

    /// Generates an id from the current local time.
    pub fn generate() -> Self {
        Self::from_time(&Local::now())
    }

    /// Formats `at` as an order id.
    pub fn from_time<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(at.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Gateway Request Payload ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum TransactionType {
    #[serde(rename = "PAYMENT")]
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "KRW")]
    Krw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum Language {
    #[serde(rename = "KR")]
    Kr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentSection {
    /// Omitted for rebills.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    pub order_id: OrderId,
    pub currency: Currency,
    /// Decimal amount as a string, as the gateway expects.
    pub amount: String,
    pub lang: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MerchantSection {
    pub mid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BuyerSection {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CallbackUrls {
    pub return_url: String,
    pub status_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DisplaySettings {
    pub display_type: String,
    pub issuer_country: String,
    pub ostype: String,
}

/// Passthrough fields echoed back by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct OtherParam {
    /// The order id.
    pub param1: String,
    /// Static partner tag.
    pub param2: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct TokenBilling {
    pub token_creation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct FastPayment {
    pub user_id: String,
    pub user_ci: String,
    pub phone_number: String,
    pub birthday: String,
    pub gender: String,
    pub foreigner: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProductLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
}

/// Body of a "ready" or "rebill" call. Sections a flow does not use are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaymentRequestPayload {
    pub payment: PaymentSection,
    pub merchant: MerchantSection,
    pub buyer: BuyerSection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<CallbackUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<DisplaySettings>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product: Vec<ProductLine>,
    pub other_param: OtherParam,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokenbilling: Option<TokenBilling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fast_payment: Option<FastPayment>,
}

// --- Views handed to the rendering boundary ---

/// Result of a successful "ready" call.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ReadyView {
    pub flow: FlowKind,
    pub order_id: OrderId,
    pub fgkey: Option<String>,
    pub rescode: Option<String>,
    pub resmsg: Option<String>,
    /// Every section the payment window needs, exactly as sent.
    pub request: PaymentRequestPayload,
}

/// Result of a completed rebill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RebillView {
    pub input_token_id: String,
    /// Raw body of the token card lookup.
    pub token_card_info: String,
    pub order_id: OrderId,
    pub rescode: Option<String>,
    pub resmsg: Option<String>,
    /// Raw body of the rebill answer.
    pub response_body: String,
}

/// What is known about a rebill that stopped, shown next to the error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RebillFailureView {
    pub input_token_id: String,
    #[serde(flatten)]
    pub failure: RebillFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CallbackKind {
    Return,
    Status,
}

impl CallbackKind {
    pub fn operation(&self) -> &'static str {
        match self {
            CallbackKind::Return => "ReturnAsync",
            CallbackKind::Status => "StatusAsync",
        }
    }
}

/// What the gateway posted to a callback endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CallbackView {
    pub kind: CallbackKind,
    pub body: Option<String>,
    pub error_message: Option<String>,
}
