use crate::domain::payment::{Payment, PaymentStatus};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub mod in_memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown payment {0}")]
    NotFound(Uuid),
    #[error("illegal status transition {from:?} -> {to:?}")]
    IllegalTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
    #[error("transaction token is already set")]
    TokenAlreadySet,
    #[error("captured amount is already recorded")]
    CaptureAlreadyRecorded,
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Persistence collaborator, keyed by payment id. Implementations must
/// serialize the read-modify-write for a given record: the token and the
/// captured amount are set at most once, and status moves outside
/// `transition_allowed` are rejected, so a racing duplicate caller fails
/// instead of double-capturing.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn get(&self, payment_id: Uuid) -> Result<Payment, StoreError>;

    async fn set_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
        message: Option<String>,
    ) -> Result<(), StoreError>;

    async fn set_transaction_token(&self, payment_id: Uuid, token: &str) -> Result<(), StoreError>;

    async fn set_captured_amount(
        &self,
        payment_id: Uuid,
        amount: Decimal,
    ) -> Result<(), StoreError>;

    async fn get_metadata(&self, payment_id: Uuid, key: &str)
        -> Result<Option<Value>, StoreError>;

    async fn set_metadata(
        &self,
        payment_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError>;
}
