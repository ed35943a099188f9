// --- File: crates/eximbay_payment/src/logic.rs ---
// Payload builders and the flows that send them.

use eximbay_common::GatewayTransport;
use eximbay_config::{EximbayConfig, PaymentFixtures};
use tracing::{info, warn};

use crate::error::PaymentError;
use crate::models::{
    BuyerSection, CallbackUrls, Currency, DisplaySettings, FastPayment, FlowKind,
    GatewayCredential, Language, MerchantSection, OrderId, OtherParam, PaymentRequestPayload,
    PaymentSection, ProductLine, ReadyView, RebillView, TokenBilling, TransactionType,
};
use crate::rebill::{RebillFlow, RebillOutcome, TokenBillingEndpoints, VerifiedToken};

pub const RETURN_PATH: &str = "/Payment/ReturnAsync";
pub const STATUS_PATH: &str = "/Payment/StatusAsync";

const STANDARD_AMOUNT: &str = "1";
const TOKENIZED_AMOUNT: &str = "1000";
const REBILL_UNIT_PRICE: &str = "1000";

// --- Payload Builders ---

/// Return and status callback URLs under `callback_base_url`.
pub fn callback_urls(callback_base_url: &str) -> CallbackUrls {
    let base = callback_base_url.trim().trim_end_matches('/');
    CallbackUrls {
        return_url: format!("{}{}", base, RETURN_PATH),
        status_url: format!("{}{}", base, STATUS_PATH),
    }
}

fn payment_window_settings() -> DisplaySettings {
    DisplaySettings {
        display_type: "R".to_string(),
        issuer_country: String::new(),
        ostype: "P".to_string(),
    }
}

fn buyer(fixtures: &PaymentFixtures) -> BuyerSection {
    BuyerSection {
        name: fixtures.buyer_name.clone(),
        email: fixtures.buyer_email.clone(),
    }
}

fn other_param(order_id: &OrderId, fixtures: &PaymentFixtures) -> OtherParam {
    OtherParam {
        param1: order_id.to_string(),
        param2: fixtures.partner_tag.clone(),
    }
}

/// USD 1 payment ready request under the standard merchant.
pub fn build_standard_payment(
    credential: &GatewayCredential,
    order_id: &OrderId,
    callback_base_url: &str,
    fixtures: &PaymentFixtures,
) -> PaymentRequestPayload {
    PaymentRequestPayload {
        payment: PaymentSection {
            transaction_type: Some(TransactionType::Payment),
            order_id: order_id.clone(),
            currency: Currency::Usd,
            amount: STANDARD_AMOUNT.to_string(),
            lang: Language::Kr,
        },
        merchant: MerchantSection {
            mid: credential.merchant_id().to_string(),
        },
        buyer: buyer(fixtures),
        url: Some(callback_urls(callback_base_url)),
        settings: Some(payment_window_settings()),
        product: Vec::new(),
        other_param: other_param(order_id, fixtures),
        tokenbilling: None,
        fast_payment: None,
    }
}

/// KRW 1000 payment ready request that also registers a billing token.
pub fn build_tokenized_payment(
    credential: &GatewayCredential,
    order_id: &OrderId,
    callback_base_url: &str,
    fixtures: &PaymentFixtures,
) -> PaymentRequestPayload {
    PaymentRequestPayload {
        payment: PaymentSection {
            transaction_type: Some(TransactionType::Payment),
            order_id: order_id.clone(),
            currency: Currency::Krw,
            amount: TOKENIZED_AMOUNT.to_string(),
            lang: Language::Kr,
        },
        merchant: MerchantSection {
            mid: credential.merchant_id().to_string(),
        },
        buyer: buyer(fixtures),
        url: Some(callback_urls(callback_base_url)),
        settings: Some(payment_window_settings()),
        product: Vec::new(),
        other_param: other_param(order_id, fixtures),
        tokenbilling: Some(TokenBilling {
            token_creation: "Y".to_string(),
        }),
        fast_payment: Some(FastPayment {
            user_id: fixtures.fast_payment_user_id.clone(),
            user_ci: String::new(),
            phone_number: String::new(),
            birthday: String::new(),
            gender: String::new(),
            foreigner: String::new(),
        }),
    }
}

/// Rebill request for a token that passed lookup.
pub fn build_rebill_payment(
    credential: &GatewayCredential,
    order_id: &OrderId,
    _token: &VerifiedToken,
    fixtures: &PaymentFixtures,
) -> PaymentRequestPayload {
    PaymentRequestPayload {
        payment: PaymentSection {
            transaction_type: None,
            order_id: order_id.clone(),
            currency: Currency::Krw,
            amount: REBILL_UNIT_PRICE.to_string(),
            lang: Language::Kr,
        },
        merchant: MerchantSection {
            mid: credential.merchant_id().to_string(),
        },
        buyer: buyer(fixtures),
        url: None,
        settings: None,
        product: vec![ProductLine {
            name: fixtures.product_name.clone(),
            quantity: 1,
            unit_price: REBILL_UNIT_PRICE.to_string(),
        }],
        other_param: other_param(order_id, fixtures),
        tokenbilling: None,
        fast_payment: None,
    }
}

// --- Flows ---

/// Sends a "ready" request for `flow` with a freshly generated order id.
pub async fn ready_payment(
    config: &EximbayConfig,
    gateway: &dyn GatewayTransport,
    flow: FlowKind,
) -> Result<ReadyView, PaymentError> {
    ready_payment_with_order(config, gateway, flow, OrderId::generate()).await
}

/// Like [`ready_payment`] with a caller-chosen order id.
pub async fn ready_payment_with_order(
    config: &EximbayConfig,
    gateway: &dyn GatewayTransport,
    flow: FlowKind,
    order_id: OrderId,
) -> Result<ReadyView, PaymentError> {
    // Rejects blank credentials before anything is built or sent
    let credential = GatewayCredential::for_flow(config, flow)?;

    let request = match flow {
        FlowKind::Standard => build_standard_payment(
            &credential,
            &order_id,
            &config.request_base_url,
            &config.fixtures,
        ),
        FlowKind::Tokenized => build_tokenized_payment(
            &credential,
            &order_id,
            &config.request_base_url,
            &config.fixtures,
        ),
    };
    let body = serde_json::to_value(&request)?;

    info!("Sending {} payment ready for order {}", flow, order_id);
    let result = gateway
        .post(credential.endpoint_url(), credential.api_key(), body)
        .await?;

    let status = result.status();
    match result.into_parts() {
        (true, _, Some(response)) => Ok(ReadyView {
            flow,
            order_id,
            fgkey: response.fgkey,
            rescode: response.rescode,
            resmsg: response.resmsg,
            request,
        }),
        (_, body, parsed) => {
            warn!("{} rejected for order {} (HTTP {})", flow.operation(), order_id, status);
            Err(PaymentError::GatewayRejected {
                operation: flow.operation(),
                status,
                rescode: parsed.and_then(|p| p.rescode),
                body,
            })
        }
    }
}

/// Looks up `token_id` and, if the gateway confirms it, rebills it.
pub async fn rebill_with_token(
    config: &EximbayConfig,
    gateway: &dyn GatewayTransport,
    token_id: &str,
) -> Result<RebillView, PaymentError> {
    let token_id = token_id.trim();
    if token_id.is_empty() {
        return Err(PaymentError::Validation("tokenid is required".to_string()));
    }

    let credential = GatewayCredential::for_flow(config, FlowKind::Tokenized)?;
    let endpoints = TokenBillingEndpoints::new(&config.api_base_url)?;
    let flow = RebillFlow::new(
        gateway,
        &credential,
        &endpoints,
        &config.fixtures,
        OrderId::generate(),
    );

    match flow.run(token_id).await {
        RebillOutcome::Rebilled(receipt) => Ok(RebillView {
            input_token_id: receipt.token.token_id().to_string(),
            token_card_info: receipt.token.card_info().to_string(),
            order_id: receipt.order_id,
            rescode: receipt.rescode,
            resmsg: receipt.resmsg,
            response_body: receipt.response_body,
        }),
        RebillOutcome::Failed(failure) => Err(PaymentError::RebillFailed {
            input_token_id: token_id.to_string(),
            failure,
        }),
    }
}
