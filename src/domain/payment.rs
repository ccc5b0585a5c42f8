use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    New,
    Initialized,
    AuthorizedPendingCapture,
    Confirmed,
    Rejected,
    Error,
}

/// Allowed status moves. `Confirmed` and `Rejected` are final; `Error`
/// ends the current attempt but stays open for an out-of-band retry.
pub fn transition_allowed(from: PaymentStatus, to: PaymentStatus) -> bool {
    use PaymentStatus::*;

    match (from, to) {
        (New, Initialized) | (New, Error) => true,
        (Initialized, Rejected)
        | (Initialized, AuthorizedPendingCapture)
        | (Initialized, Confirmed)
        | (Initialized, Error) => true,
        (AuthorizedPendingCapture, AuthorizedPendingCapture)
        | (AuthorizedPendingCapture, Confirmed)
        | (AuthorizedPendingCapture, Rejected)
        | (AuthorizedPendingCapture, Error) => true,
        (Error, Initialized)
        | (Error, AuthorizedPendingCapture)
        | (Error, Confirmed)
        | (Error, Rejected)
        | (Error, Error) => true,
        _ => false,
    }
}

/// Snapshot of one payment record as held by the store.
#[derive(Debug, Clone)]
pub struct Payment {
    pub payment_id: Uuid,
    pub total: Decimal,
    pub currency: String,
    pub description: String,
    pub transaction_token: Option<String>,
    pub captured_amount: Option<Decimal>,
    pub status: PaymentStatus,
    pub status_message: Option<String>,
    pub success_url: String,
    pub failure_url: String,
}

/// The controller never performs an HTTP redirect itself; it hands this
/// target back to the surrounding web layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub url: String,
}

impl Redirect {
    pub fn to(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
