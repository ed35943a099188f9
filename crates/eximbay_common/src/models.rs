// --- File: crates/eximbay_common/src/models.rs ---

use serde::{Deserialize, Serialize};

/// Gateway `rescode` meaning success.
pub const RESCODE_SUCCESS: &str = "0000";

/// The fields of a gateway JSON answer this service reads.
///
/// Every field is optional and anything else in the body is ignored;
/// the raw body is kept alongside for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GatewayResponse {
    #[serde(default)]
    pub rescode: Option<String>,
    #[serde(default)]
    pub resmsg: Option<String>,
    /// Key handed to the payment window after a successful "ready" call.
    #[serde(default)]
    pub fgkey: Option<String>,
}

impl GatewayResponse {
    /// True when `rescode` is exactly `"0000"`. A missing code is not success.
    pub fn is_success_code(&self) -> bool {
        self.rescode.as_deref() == Some(RESCODE_SUCCESS)
    }
}
