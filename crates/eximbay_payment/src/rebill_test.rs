use eximbay_common::TransportError;
use eximbay_config::PaymentFixtures;

use crate::error::PaymentError;
use crate::logic::rebill_with_token;
use crate::models::{FlowKind, GatewayCredential, OrderId};
use crate::rebill::*;
use crate::test_support::{ok, status, test_config, ScriptedGateway};

fn endpoints() -> TokenBillingEndpoints {
    TokenBillingEndpoints::new("https://gateway.test/v1").unwrap()
}

#[test]
fn test_endpoint_urls() {
    let endpoints = endpoints();
    assert_eq!(
        endpoints.lookup_url("tok_1").as_str(),
        "https://gateway.test/v1/payments/tokenbilling/tok_1"
    );
    assert_eq!(
        endpoints.rebill_url("tok_1").as_str(),
        "https://gateway.test/v1/payments/tokenbilling/tok_1/rebill"
    );

    let trailing = TokenBillingEndpoints::new("https://gateway.test/v1/").unwrap();
    assert_eq!(trailing.lookup_url("a"), endpoints.lookup_url("a"));
}

#[test]
fn test_token_cannot_escape_its_path_segment() {
    let url = endpoints().lookup_url("../x?y#z");
    assert_eq!(
        url.as_str(),
        "https://gateway.test/v1/payments/tokenbilling/..%2Fx%3Fy%23z"
    );
}

#[test]
fn test_invalid_base_url_is_a_configuration_error() {
    assert!(matches!(
        TokenBillingEndpoints::new("not a url"),
        Err(PaymentError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        TokenBillingEndpoints::new("mailto:ops@example.com"),
        Err(PaymentError::InvalidConfiguration(_))
    ));
}

async fn run(gateway: &ScriptedGateway, token_id: &str) -> RebillOutcome {
    let credential = GatewayCredential::for_flow(&test_config(), FlowKind::Tokenized).unwrap();
    let endpoints = endpoints();
    let fixtures = PaymentFixtures::default();
    RebillFlow::new(
        gateway,
        &credential,
        &endpoints,
        &fixtures,
        OrderId::generate(),
    )
    .run(token_id)
    .await
}

#[tokio::test]
async fn test_rejected_lookup_never_rebills() {
    let gateway = ScriptedGateway::default().on_get(ok(r#"{"rescode":"0001","resmsg":"no card"}"#));

    let outcome = run(&gateway, "tok_1").await;

    match outcome {
        RebillOutcome::Failed(failure) => {
            assert_eq!(failure.step, RebillStep::TokenLookup);
            assert_eq!(failure.kind, FailureKind::Rejected);
            assert!(failure.message.contains("rescode=0001"));
            assert_eq!(
                failure.raw_body.as_deref(),
                Some(r#"{"rescode":"0001","resmsg":"no card"}"#)
            );
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(gateway.get_count(), 1);
    assert_eq!(gateway.post_count(), 0);
}

#[tokio::test]
async fn test_lookup_without_rescode_fails() {
    let gateway = ScriptedGateway::default().on_get(ok(r#"{"resmsg":"?"}"#));

    let outcome = run(&gateway, "tok_1").await;

    assert!(matches!(outcome, RebillOutcome::Failed(_)));
    assert_eq!(gateway.post_count(), 0);
}

#[tokio::test]
async fn test_lookup_http_error_fails() {
    let gateway = ScriptedGateway::default().on_get(status(404, "not found"));

    match run(&gateway, "tok_1").await {
        RebillOutcome::Failed(failure) => {
            assert!(failure.message.contains("HTTP 404"));
            assert_eq!(failure.raw_body.as_deref(), Some("not found"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(gateway.post_count(), 0);
}

#[tokio::test]
async fn test_unsendable_key_fails_as_configuration() {
    let gateway =
        ScriptedGateway::default().on_get(Err(TransportError::InvalidAuthorization));

    match run(&gateway, "tok_1").await {
        RebillOutcome::Failed(failure) => {
            assert_eq!(failure.kind, FailureKind::Configuration);
            assert_eq!(failure.raw_body, None);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_verified_token_is_rebilled() {
    let lookup_body = r#"{"rescode":"0000","card_no":"4111********1111"}"#;
    let gateway = ScriptedGateway::default()
        .on_get(ok(lookup_body))
        .on_post(ok(r#"{"rescode":"0000","resmsg":"Success"}"#));

    let outcome = run(&gateway, "tok_1").await;

    let receipt = match outcome {
        RebillOutcome::Rebilled(receipt) => receipt,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(receipt.rescode.as_deref(), Some("0000"));
    assert_eq!(receipt.resmsg.as_deref(), Some("Success"));
    assert_eq!(receipt.token.card_info(), lookup_body);

    let gets = gateway.gets.lock().unwrap();
    assert_eq!(gets[0].0, "https://gateway.test/v1/payments/tokenbilling/tok_1");
    assert_eq!(gets[0].1, "key-token");

    let posts = gateway.posts.lock().unwrap();
    let (url, api_key, body) = &posts[0];
    assert_eq!(url, "https://gateway.test/v1/payments/tokenbilling/tok_1/rebill");
    assert_eq!(api_key, "key-token");
    assert_eq!(body["merchant"]["mid"], "MID-TOKEN");
    assert_eq!(body["payment"]["order_id"], receipt.order_id.as_str());
}

#[tokio::test]
async fn test_rebill_rejection_keeps_card_info() {
    let gateway = ScriptedGateway::default()
        .on_get(ok(r#"{"rescode":"0000"}"#))
        .on_post(status(500, "boom"));

    match run(&gateway, "tok_1").await {
        RebillOutcome::Failed(failure) => {
            assert_eq!(failure.step, RebillStep::Rebill);
            assert_eq!(failure.raw_body.as_deref(), Some("boom"));
            assert_eq!(failure.token_card_info.as_deref(), Some(r#"{"rescode":"0000"}"#));
            assert_eq!(failure.to_string(), "Rebill / API call failed (HTTP 500): boom");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_rebill_without_parsed_body_fails() {
    let gateway = ScriptedGateway::default()
        .on_get(ok(r#"{"rescode":"0000"}"#))
        .on_post(ok("OK"));

    assert!(matches!(
        run(&gateway, "tok_1").await,
        RebillOutcome::Failed(RebillFailure {
            step: RebillStep::Rebill,
            ..
        })
    ));
}

#[tokio::test]
async fn test_step_walks_states_in_order() {
    let credential = GatewayCredential::for_flow(&test_config(), FlowKind::Tokenized).unwrap();
    let endpoints = endpoints();
    let fixtures = PaymentFixtures::default();
    let gateway = ScriptedGateway::default()
        .on_get(ok(r#"{"rescode":"0000"}"#))
        .on_post(ok(r#"{"rescode":"0000"}"#));
    let flow = RebillFlow::new(
        &gateway,
        &credential,
        &endpoints,
        &fixtures,
        OrderId::generate(),
    );

    let state = RebillState::Init {
        token_id: "tok_1".to_string(),
    };
    assert_eq!(state.name(), "INIT");
    let state = flow.step(state).await;
    assert_eq!(state.name(), "TOKEN_LOOKED_UP");
    assert_eq!(gateway.post_count(), 0);
    let state = flow.step(state).await;
    assert_eq!(state.name(), "REBILLED");
    assert!(state.is_terminal());

    // Terminal states do not move
    let state = flow.step(state).await;
    assert_eq!(state.name(), "REBILLED");
    assert_eq!(gateway.get_count(), 1);
    assert_eq!(gateway.post_count(), 1);
}

#[tokio::test]
async fn test_rebill_view_echoes_token_and_card_info() {
    let gateway = ScriptedGateway::default()
        .on_get(ok(r#"{"rescode":"0000","card":"visa"}"#))
        .on_post(ok(r#"{"rescode":"0000","resmsg":"Success"}"#));

    let view = rebill_with_token(&test_config(), &gateway, " tok_9 ")
        .await
        .unwrap();

    assert_eq!(view.input_token_id, "tok_9");
    assert_eq!(view.token_card_info, r#"{"rescode":"0000","card":"visa"}"#);
    assert_eq!(view.response_body, r#"{"rescode":"0000","resmsg":"Success"}"#);
}
