use crate::config::SaferpayConfig;
use crate::domain::payment::Payment;
use crate::gateway::error::SaferpayError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use uuid::Uuid;

pub const SPEC_VERSION: &str = "1.45";

/// Common request header. `request_id` is a fresh UUID per envelope and
/// must be echoed back by the gateway.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestHeader {
    pub customer_id: String,
    pub request_id: String,
    pub retry_indicator: u8,
    pub spec_version: &'static str,
}

impl RequestHeader {
    pub fn new(customer_id: &str) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            request_id: Uuid::new_v4().to_string(),
            retry_indicator: 0,
            spec_version: SPEC_VERSION,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Amount {
    pub currency_code: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentBody {
    pub amount: Amount,
    pub description: String,
    pub order_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReturnUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notification {
    pub success_notify_url: String,
    pub fail_notify_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitializeRequest {
    pub request_header: RequestHeader,
    pub payment: PaymentBody,
    pub return_url: ReturnUrl,
    pub notification: Notification,
    pub terminal_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssertRequest {
    pub request_header: RequestHeader,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionReference {
    pub transaction_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptureRequest {
    pub request_header: RequestHeader,
    pub transaction_reference: TransactionReference,
}

/// Converts a decimal total into the gateway's integer minor-unit value
/// (CHF 19.99 becomes 1999). Midpoints round half-even; float math is
/// never involved.
pub fn amount_minor_units(total: Decimal) -> Result<i64, SaferpayError> {
    if total <= Decimal::ZERO {
        return Err(SaferpayError::Validation(format!(
            "amount must be positive, got {total}"
        )));
    }

    let minor = total
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|m| m.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|m| m.to_i64())
        .ok_or_else(|| {
            SaferpayError::Validation(format!("amount {total} does not fit a minor-unit integer"))
        })?;

    if minor < 1 {
        return Err(SaferpayError::Validation(format!(
            "amount {total} is below one minor unit"
        )));
    }

    Ok(minor)
}

pub fn initialize_request(
    config: &SaferpayConfig,
    payment: &Payment,
    return_url: &str,
) -> Result<InitializeRequest, SaferpayError> {
    if payment.currency.is_empty() {
        return Err(SaferpayError::Validation(
            "payment has no currency".to_string(),
        ));
    }
    if payment.description.is_empty() {
        return Err(SaferpayError::Validation(
            "payment has no description".to_string(),
        ));
    }
    let value = amount_minor_units(payment.total)?;

    Ok(InitializeRequest {
        request_header: RequestHeader::new(&config.customer_id),
        payment: PaymentBody {
            amount: Amount {
                currency_code: payment.currency.clone(),
                value,
            },
            description: payment.description.clone(),
            order_id: payment.payment_id.to_string(),
        },
        return_url: ReturnUrl {
            url: return_url.to_string(),
        },
        notification: Notification {
            success_notify_url: payment.success_url.clone(),
            fail_notify_url: payment.failure_url.clone(),
        },
        terminal_id: config.terminal_id.clone(),
    })
}

pub fn assert_request(
    config: &SaferpayConfig,
    payment: &Payment,
) -> Result<AssertRequest, SaferpayError> {
    let token = payment
        .transaction_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            SaferpayError::AlreadyProcessed(format!(
                "payment {} has no transaction token to assert",
                payment.payment_id
            ))
        })?;

    Ok(AssertRequest {
        request_header: RequestHeader::new(&config.customer_id),
        token: token.to_string(),
    })
}

pub fn capture_request(config: &SaferpayConfig, transaction_id: &str) -> CaptureRequest {
    CaptureRequest {
        request_header: RequestHeader::new(&config.customer_id),
        transaction_reference: TransactionReference {
            transaction_id: transaction_id.to_string(),
        },
    }
}
