// Scripted gateway for unit tests.

use eximbay_common::{BoxFuture, GatewayResponse, GatewayResult, GatewayTransport, TransportError};
use eximbay_config::EximbayConfig;
use std::collections::VecDeque;
use std::sync::Mutex;

type Answer = Result<GatewayResult<GatewayResponse>, TransportError>;

/// Replays queued answers and records every call.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    get_answers: Mutex<VecDeque<Answer>>,
    post_answers: Mutex<VecDeque<Answer>>,
    pub gets: Mutex<Vec<(String, String)>>,
    pub posts: Mutex<Vec<(String, String, serde_json::Value)>>,
}

impl ScriptedGateway {
    pub fn on_get(self, answer: Answer) -> Self {
        self.get_answers.lock().unwrap().push_back(answer);
        self
    }

    pub fn on_post(self, answer: Answer) -> Self {
        self.post_answers.lock().unwrap().push_back(answer);
        self
    }

    pub fn get_count(&self) -> usize {
        self.gets.lock().unwrap().len()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

impl GatewayTransport for ScriptedGateway {
    fn get(
        &self,
        url: &str,
        api_key: &str,
    ) -> BoxFuture<'_, GatewayResult<GatewayResponse>, TransportError> {
        self.gets
            .lock()
            .unwrap()
            .push((url.to_string(), api_key.to_string()));
        let answer = self
            .get_answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected GET");
        Box::pin(async move { answer })
    }

    fn post(
        &self,
        url: &str,
        api_key: &str,
        body: serde_json::Value,
    ) -> BoxFuture<'_, GatewayResult<GatewayResponse>, TransportError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), api_key.to_string(), body));
        let answer = self
            .post_answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected POST");
        Box::pin(async move { answer })
    }
}

pub(crate) fn ok(body: &str) -> Answer {
    Ok(GatewayResult::accepted(200, body))
}

pub(crate) fn status(code: u16, body: &str) -> Answer {
    Ok(GatewayResult::rejected(code, body))
}

pub(crate) fn test_config() -> EximbayConfig {
    EximbayConfig {
        api_ready_url: "https://gateway.test/v1/payments/ready".to_string(),
        api_base_url: "https://gateway.test/v1".to_string(),
        api_key: "key-standard".to_string(),
        merchant_id: "MID-STANDARD".to_string(),
        api_key_token: "key-token".to_string(),
        merchant_id_token: "MID-TOKEN".to_string(),
        request_base_url: "https://callback.test/".to_string(),
        ..EximbayConfig::default()
    }
}
