use crate::domain::payment::{transition_allowed, Payment, PaymentStatus};
use crate::store::{PaymentStore, StoreError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

struct StoredPayment {
    payment: Payment,
    metadata: HashMap<String, Value>,
}

/// In-memory store for tests and embedding. Every mutation goes through
/// one lock, so per-record updates are serialized.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<Uuid, StoredPayment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, payment: Payment) {
        let mut payments = self.payments.write().await;
        payments.insert(
            payment.payment_id,
            StoredPayment {
                payment,
                metadata: HashMap::new(),
            },
        );
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn get(&self, payment_id: Uuid) -> Result<Payment, StoreError> {
        let payments = self.payments.read().await;
        payments
            .get(&payment_id)
            .map(|stored| stored.payment.clone())
            .ok_or(StoreError::NotFound(payment_id))
    }

    async fn set_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
        message: Option<String>,
    ) -> Result<(), StoreError> {
        let mut payments = self.payments.write().await;
        let stored = payments
            .get_mut(&payment_id)
            .ok_or(StoreError::NotFound(payment_id))?;

        if !transition_allowed(stored.payment.status, status) {
            return Err(StoreError::IllegalTransition {
                from: stored.payment.status,
                to: status,
            });
        }

        stored.payment.status = status;
        stored.payment.status_message = message;
        Ok(())
    }

    async fn set_transaction_token(&self, payment_id: Uuid, token: &str) -> Result<(), StoreError> {
        let mut payments = self.payments.write().await;
        let stored = payments
            .get_mut(&payment_id)
            .ok_or(StoreError::NotFound(payment_id))?;

        if stored.payment.transaction_token.is_some() {
            return Err(StoreError::TokenAlreadySet);
        }

        stored.payment.transaction_token = Some(token.to_string());
        Ok(())
    }

    async fn set_captured_amount(
        &self,
        payment_id: Uuid,
        amount: Decimal,
    ) -> Result<(), StoreError> {
        let mut payments = self.payments.write().await;
        let stored = payments
            .get_mut(&payment_id)
            .ok_or(StoreError::NotFound(payment_id))?;

        if stored.payment.captured_amount.is_some() {
            return Err(StoreError::CaptureAlreadyRecorded);
        }

        stored.payment.captured_amount = Some(amount);
        Ok(())
    }

    async fn get_metadata(
        &self,
        payment_id: Uuid,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        let payments = self.payments.read().await;
        let stored = payments
            .get(&payment_id)
            .ok_or(StoreError::NotFound(payment_id))?;
        Ok(stored.metadata.get(key).cloned())
    }

    async fn set_metadata(
        &self,
        payment_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut payments = self.payments.write().await;
        let stored = payments
            .get_mut(&payment_id)
            .ok_or(StoreError::NotFound(payment_id))?;
        stored.metadata.insert(key.to_string(), value);
        Ok(())
    }
}
