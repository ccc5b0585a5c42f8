#![allow(dead_code)]

use rust_decimal::Decimal;
use saferpay_gateway::config::SaferpayConfig;
use saferpay_gateway::domain::payment::{Payment, PaymentStatus};
use saferpay_gateway::gateway::client::{basic_auth_headers, SaferpayClient};
use serde_json::Value;
use uuid::Uuid;
use wiremock::{Request, Respond, ResponseTemplate};

/// Responds 200 with a body built from the RequestId the client sent, so
/// the correlation echo check passes.
pub struct EchoResponse(pub fn(&str) -> Value);

impl Respond for EchoResponse {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let request_id = body["RequestHeader"]["RequestId"].as_str().unwrap();
        ResponseTemplate::new(200).set_body_json((self.0)(request_id))
    }
}

pub fn config() -> SaferpayConfig {
    SaferpayConfig::new("cust-1", "term-1")
}

pub fn config_for(base_url: &str) -> SaferpayConfig {
    let mut config = config();
    config.base_url_override = Some(base_url.to_string());
    config
}

pub fn client_for(base_url: &str) -> SaferpayClient {
    let headers = basic_auth_headers("user", "secret").unwrap();
    SaferpayClient::new(config_for(base_url), headers)
}

pub fn payment(total: Decimal) -> Payment {
    Payment {
        payment_id: Uuid::new_v4(),
        total,
        currency: "CHF".to_string(),
        description: "Test order".to_string(),
        transaction_token: None,
        captured_amount: None,
        status: PaymentStatus::New,
        status_message: None,
        success_url: "https://shop.example/success".to_string(),
        failure_url: "https://shop.example/failure".to_string(),
    }
}

pub fn initialized_payment(total: Decimal) -> Payment {
    let mut payment = payment(total);
    payment.transaction_token = Some("tok-1".to_string());
    payment.status = PaymentStatus::Initialized;
    payment
}
