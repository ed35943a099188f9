// --- File: crates/eximbay_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::fmt;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Outbound HTTP Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout for gateway calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

// --- Fixed test identity used when building gateway payloads ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentFixtures {
    #[serde(default = "default_buyer_name")]
    pub buyer_name: String,
    #[serde(default = "default_buyer_email")]
    pub buyer_email: String,
    /// Sent as `other_param.param2` on every request.
    #[serde(default = "default_partner_tag")]
    pub partner_tag: String,
    /// `fast_payment.user_id` for the tokenized flow.
    #[serde(default = "default_fast_payment_user_id")]
    pub fast_payment_user_id: String,
    /// Name of the single product line sent with a rebill.
    #[serde(default = "default_product_name")]
    pub product_name: String,
}

impl Default for PaymentFixtures {
    fn default() -> Self {
        Self {
            buyer_name: default_buyer_name(),
            buyer_email: default_buyer_email(),
            partner_tag: default_partner_tag(),
            fast_payment_user_id: default_fast_payment_user_id(),
            product_name: default_product_name(),
        }
    }
}

fn default_buyer_name() -> String {
    "eximbay".to_string()
}
fn default_buyer_email() -> String {
    "test@eximbay.com".to_string()
}
fn default_partner_tag() -> String {
    "TIGERBOOKING".to_string()
}
fn default_fast_payment_user_id() -> String {
    "edgar".to_string()
}
fn default_product_name() -> String {
    "test 상품".to_string()
}
fn default_api_base_url() -> String {
    "https://api-test.eximbay.com/v1".to_string()
}

// --- Eximbay Gateway Config ---
// Keys are usually injected through the "secret_from_env" marker.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Serialize, Clone)]
pub struct EximbayConfig {
    /// Endpoint for "payment ready" requests (both flows).
    #[serde(default)]
    pub api_ready_url: String,
    /// Root of the token billing API, e.g. `https://api-test.eximbay.com/v1`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub merchant_id: String,
    #[serde(default)]
    pub api_key_token: String,
    #[serde(default)]
    pub merchant_id_token: String,
    /// Public base URL the gateway calls back on (return/status URLs).
    #[serde(default)]
    pub request_base_url: String,
    #[serde(default)]
    pub fixtures: PaymentFixtures,
}

impl Default for EximbayConfig {
    fn default() -> Self {
        Self {
            api_ready_url: String::new(),
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            merchant_id: String::new(),
            api_key_token: String::new(),
            merchant_id_token: String::new(),
            request_base_url: String::new(),
            fixtures: PaymentFixtures::default(),
        }
    }
}

// Keeps API keys out of debug output and logs.
impl fmt::Debug for EximbayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EximbayConfig")
            .field("api_ready_url", &self.api_ready_url)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &redact(&self.api_key))
            .field("merchant_id", &self.merchant_id)
            .field("api_key_token", &redact(&self.api_key_token))
            .field("merchant_id_token", &self.merchant_id_token)
            .field("request_base_url", &self.request_base_url)
            .field("fixtures", &self.fixtures)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.trim().is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
}

impl EximbayConfig {
    /// Names of credential fields that are empty or whitespace-only.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("api_key", &self.api_key),
            ("merchant_id", &self.merchant_id),
            ("api_key_token", &self.api_key_token),
            ("merchant_id_token", &self.merchant_id_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,
    #[serde(default)]
    pub http: HttpClientConfig,
    #[serde(default)]
    pub eximbay: EximbayConfig,
}
