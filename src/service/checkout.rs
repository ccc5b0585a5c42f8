use crate::domain::payment::{PaymentStatus, Redirect};
use crate::gateway::client::SaferpayClient;
use crate::gateway::error::SaferpayError;
use crate::gateway::response::TransactionStatus;
use crate::store::{PaymentStore, StoreError};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub const INITIALIZE_RESPONSE_KEY: &str = "saferpay_initialize_response";
pub const ASSERT_RESPONSE_KEY: &str = "saferpay_assert_response";
pub const CAPTURE_RESPONSE_KEY: &str = "saferpay_capture_response";

const CAPTURE_STATUS_CAPTURED: &str = "CAPTURED";

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Gateway(#[from] SaferpayError),
    #[error("payment store failure: {0}")]
    Store(#[from] StoreError),
}

/// Drives one payment through the hosted-page lifecycle and decides the
/// redirect target. Persists through the injected store; the surrounding
/// web layer performs the actual redirect.
pub struct CheckoutService<S> {
    pub client: SaferpayClient,
    pub store: S,
}

impl<S: PaymentStore> CheckoutService<S> {
    pub fn new(client: SaferpayClient, store: S) -> Self {
        Self { client, store }
    }

    /// Initializes the payment at the gateway and returns the hosted-page
    /// redirect. Re-invoking with the token already set issues no second
    /// gateway call and re-signals the stored redirect, so one payment can
    /// never open two gateway sessions.
    pub async fn start(
        &self,
        payment_id: Uuid,
        return_url: &str,
    ) -> Result<Redirect, CheckoutError> {
        let payment = self.store.get(payment_id).await?;

        if payment.transaction_token.is_some() {
            let stored = self
                .store
                .get_metadata(payment_id, INITIALIZE_RESPONSE_KEY)
                .await?;
            let url = stored
                .as_ref()
                .and_then(|v| v.get("redirect_url"))
                .and_then(Value::as_str)
                .filter(|u| !u.is_empty())
                .ok_or_else(|| {
                    SaferpayError::Protocol(
                        "stored initialize response has no redirect url".to_string(),
                    )
                })?;
            return Ok(Redirect::to(url));
        }

        match self.client.initialize(&payment, return_url).await {
            Ok(initialized) => {
                self.store
                    .set_metadata(payment_id, INITIALIZE_RESPONSE_KEY, initialized.to_value())
                    .await?;
                self.store
                    .set_transaction_token(payment_id, &initialized.token)
                    .await?;
                self.store
                    .set_status(payment_id, PaymentStatus::Initialized, None)
                    .await?;
                tracing::info!(%payment_id, "payment initialized at gateway");
                Ok(Redirect::to(initialized.redirect_url))
            }
            Err(error) => {
                self.record_failure(payment_id, &error).await?;
                Err(error.into())
            }
        }
    }

    /// Handles the payer's return (or an async notification): asserts the
    /// gateway transaction, captures when only authorized, applies the
    /// status transition, and picks the success or failure redirect.
    /// Already-terminal payments short-circuit without a gateway call.
    pub async fn handle_return(&self, payment_id: Uuid) -> Result<Redirect, CheckoutError> {
        let payment = self.store.get(payment_id).await?;

        match payment.status {
            PaymentStatus::Confirmed => return Ok(Redirect::to(payment.success_url)),
            PaymentStatus::Rejected => return Ok(Redirect::to(payment.failure_url)),
            _ => {}
        }

        let asserted = match self.client.assert_outcome(&payment).await {
            Ok(asserted) => asserted,
            Err(error) => {
                self.record_failure(payment_id, &error).await?;
                return Err(error.into());
            }
        };
        self.store
            .set_metadata(payment_id, ASSERT_RESPONSE_KEY, asserted.to_value())
            .await?;
        tracing::info!(
            %payment_id,
            transaction_id = %asserted.transaction_id,
            status = ?asserted.transaction_status,
            "gateway transaction asserted"
        );

        match asserted.transaction_status {
            TransactionStatus::Canceled => {
                self.store
                    .set_status(payment_id, PaymentStatus::Rejected, None)
                    .await?;
                Ok(Redirect::to(payment.failure_url))
            }
            TransactionStatus::Captured => {
                self.store
                    .set_captured_amount(payment_id, payment.total)
                    .await?;
                self.store
                    .set_status(payment_id, PaymentStatus::Confirmed, None)
                    .await?;
                Ok(Redirect::to(payment.success_url))
            }
            TransactionStatus::Authorized => {
                self.store
                    .set_status(payment_id, PaymentStatus::AuthorizedPendingCapture, None)
                    .await?;

                let captured = match self.client.capture(&asserted.transaction_id).await {
                    Ok(captured) => captured,
                    Err(error) => {
                        self.record_failure(payment_id, &error).await?;
                        return Err(error.into());
                    }
                };
                self.store
                    .set_metadata(payment_id, CAPTURE_RESPONSE_KEY, captured.to_value())
                    .await?;

                if captured.status == CAPTURE_STATUS_CAPTURED {
                    self.store
                        .set_captured_amount(payment_id, payment.total)
                        .await?;
                    self.store
                        .set_status(payment_id, PaymentStatus::Confirmed, None)
                        .await?;
                } else {
                    tracing::info!(
                        %payment_id,
                        capture_status = %captured.status,
                        "capture not settled yet, awaiting reconciliation"
                    );
                }

                // The payer-facing flow succeeded whether or not back-office
                // settlement has landed.
                Ok(Redirect::to(payment.success_url))
            }
            TransactionStatus::Pending => Ok(Redirect::to(payment.success_url)),
        }
    }

    async fn record_failure(
        &self,
        payment_id: Uuid,
        error: &SaferpayError,
    ) -> Result<(), CheckoutError> {
        tracing::warn!(%payment_id, %error, "gateway call failed");
        self.store
            .set_status(payment_id, PaymentStatus::Error, Some(error.to_string()))
            .await?;
        Ok(())
    }
}
