use crate::gateway::error::SaferpayError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Gateway-side transaction state reported by an assert call. Anything
/// outside this set fails the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Authorized,
    Canceled,
    Captured,
    Pending,
}

impl TransactionStatus {
    pub fn parse(raw: &str) -> Result<Self, SaferpayError> {
        match raw {
            "AUTHORIZED" => Ok(TransactionStatus::Authorized),
            "CANCELED" => Ok(TransactionStatus::Canceled),
            "CAPTURED" => Ok(TransactionStatus::Captured),
            "PENDING" => Ok(TransactionStatus::Pending),
            other => Err(SaferpayError::Protocol(format!(
                "unrecognized Transaction.Status {other:?} in response"
            ))),
        }
    }
}

/// Echoed correlation id, required on every response.
pub fn header_request_id(body: &Value) -> Result<String, SaferpayError> {
    body.pointer("/ResponseHeader/RequestId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SaferpayError::Protocol("missing RequestId in response header".to_string()))
}

fn required_str(body: &Value, pointer: &str, missing: &str) -> Result<String, SaferpayError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SaferpayError::Protocol(missing.to_string()))
}

fn optional_str(body: &Value, pointer: &str) -> String {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializeResult {
    pub request_id: String,
    pub token: String,
    pub redirect_url: String,
}

impl InitializeResult {
    pub fn from_value(body: &Value) -> Result<Self, SaferpayError> {
        Ok(Self {
            request_id: header_request_id(body)?,
            token: required_str(body, "/Token", "initialize response is missing Token")?,
            redirect_url: required_str(
                body,
                "/RedirectUrl",
                "initialize response is missing RedirectUrl",
            )?,
        })
    }

    pub fn to_value(&self) -> Value {
        json!({
            "request_id": self.request_id,
            "token": self.token,
            "redirect_url": self.redirect_url,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertResult {
    pub request_id: String,
    pub transaction_id: String,
    pub transaction_status: TransactionStatus,
    /// Present only once the transaction is captured; empty otherwise.
    pub capture_id: String,
}

impl AssertResult {
    pub fn from_value(body: &Value) -> Result<Self, SaferpayError> {
        let request_id = header_request_id(body)?;
        let transaction_id = required_str(
            body,
            "/Transaction/Id",
            "assert response is missing Transaction.Id",
        )?;
        let raw_status = required_str(
            body,
            "/Transaction/Status",
            "assert response is missing Transaction.Status",
        )?;

        Ok(Self {
            request_id,
            transaction_id,
            transaction_status: TransactionStatus::parse(&raw_status)?,
            capture_id: optional_str(body, "/Transaction/CaptureId"),
        })
    }

    pub fn to_value(&self) -> Value {
        json!({
            "request_id": self.request_id,
            "transaction_id": self.transaction_id,
            "transaction_status": self.transaction_status,
            "capture_id": self.capture_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub request_id: String,
    /// Some capture flows (pending-style schemes) omit the status.
    pub status: String,
}

impl CaptureResult {
    pub fn from_value(body: &Value) -> Result<Self, SaferpayError> {
        Ok(Self {
            request_id: header_request_id(body)?,
            status: optional_str(body, "/Status"),
        })
    }

    pub fn to_value(&self) -> Value {
        json!({
            "request_id": self.request_id,
            "status": self.status,
        })
    }
}
