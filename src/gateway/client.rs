use crate::config::SaferpayConfig;
use crate::domain::payment::Payment;
use crate::gateway::envelope;
use crate::gateway::error::{ErrorDetail, SaferpayError};
use crate::gateway::response::{self, AssertResult, CaptureResult, InitializeResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::Serialize;
use serde_json::Value;

pub const INITIALIZE_PATH: &str = "PaymentPage/Initialize";
pub const ASSERT_PATH: &str = "PaymentPage/Assert";
pub const CAPTURE_PATH: &str = "Transaction/Capture";

const USER_AGENT_VALUE: &str = concat!("saferpay-gateway/", env!("CARGO_PKG_VERSION"));

/// Builds the Basic credential header set the client attaches to every
/// outbound call.
pub fn basic_auth_headers(username: &str, password: &str) -> Result<HeaderMap, SaferpayError> {
    let credential = STANDARD.encode(format!("{username}:{password}"));
    let value = HeaderValue::try_from(format!("Basic {credential}"))
        .map_err(|_| SaferpayError::Validation("credentials are not header-safe".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// One logical call per operation: validate preconditions, build a fresh
/// envelope, send, classify the outcome, check the echoed correlation id,
/// validate the body shape.
pub struct SaferpayClient {
    config: SaferpayConfig,
    auth_headers: HeaderMap,
    http: reqwest::Client,
}

impl SaferpayClient {
    pub fn new(config: SaferpayConfig, auth_headers: HeaderMap) -> Self {
        let mut headers = auth_headers;
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        Self {
            config,
            auth_headers: headers,
            http: reqwest::Client::new(),
        }
    }

    pub async fn initialize(
        &self,
        payment: &Payment,
        return_url: &str,
    ) -> Result<InitializeResult, SaferpayError> {
        if payment.transaction_token.is_some() {
            return Err(SaferpayError::AlreadyProcessed(format!(
                "payment {} already has a gateway token",
                payment.payment_id
            )));
        }

        let request = envelope::initialize_request(&self.config, payment, return_url)?;
        let body = self
            .post(INITIALIZE_PATH, &request.request_header.request_id, &request)
            .await?;
        InitializeResult::from_value(&body)
    }

    pub async fn assert_outcome(&self, payment: &Payment) -> Result<AssertResult, SaferpayError> {
        let request = envelope::assert_request(&self.config, payment)?;
        let body = self
            .post(ASSERT_PATH, &request.request_header.request_id, &request)
            .await?;
        AssertResult::from_value(&body)
    }

    pub async fn capture(&self, transaction_id: &str) -> Result<CaptureResult, SaferpayError> {
        let request = envelope::capture_request(&self.config, transaction_id);
        let body = self
            .post(CAPTURE_PATH, &request.request_header.request_id, &request)
            .await?;
        CaptureResult::from_value(&body)
    }

    async fn post<T: Serialize>(
        &self,
        path: &str,
        request_id: &str,
        payload: &T,
    ) -> Result<Value, SaferpayError> {
        let url = format!("{}/{}", self.config.base_url(), path);
        let sent = self
            .http
            .post(&url)
            .headers(self.auth_headers.clone())
            .json(payload)
            .timeout(self.config.timeout)
            .send()
            .await;

        let response = match sent {
            Ok(r) => r,
            Err(e) => return Err(SaferpayError::Connectivity(e.to_string())),
        };

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SaferpayError::Connectivity(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_error_response(path, status.as_u16(), &text));
        }

        let body: Value = serde_json::from_str(&text).map_err(|_| {
            SaferpayError::Protocol(format!("{path} response is not valid JSON"))
        })?;

        let echoed = response::header_request_id(&body)?;
        if echoed != request_id {
            tracing::warn!(
                path,
                expected = request_id,
                got = %echoed,
                "response RequestId does not match the request"
            );
            return Err(SaferpayError::Protocol(format!(
                "response RequestId mismatch: expected {request_id}, got {echoed}"
            )));
        }

        Ok(body)
    }
}

fn classify_error_response(path: &str, http_status: u16, body: &str) -> SaferpayError {
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => {
            let detail = ErrorDetail::from_body(&parsed, http_status);
            tracing::warn!(path, %detail, "gateway returned an error response");
            SaferpayError::Gateway(detail)
        }
        Err(_) => SaferpayError::Protocol(format!(
            "gateway returned HTTP {http_status} with an unparsable body on {path}"
        )),
    }
}
