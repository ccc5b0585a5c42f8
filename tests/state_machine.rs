use rust_decimal_macros::dec;
use saferpay_gateway::domain::payment::{transition_allowed, PaymentStatus};
use saferpay_gateway::store::in_memory::InMemoryPaymentStore;
use saferpay_gateway::store::{PaymentStore, StoreError};
use uuid::Uuid;

mod common;

const ALL_STATUSES: [PaymentStatus; 6] = [
    PaymentStatus::New,
    PaymentStatus::Initialized,
    PaymentStatus::AuthorizedPendingCapture,
    PaymentStatus::Confirmed,
    PaymentStatus::Rejected,
    PaymentStatus::Error,
];

#[test]
fn terminal_states_accept_no_transition() {
    for to in ALL_STATUSES {
        assert!(!transition_allowed(PaymentStatus::Confirmed, to));
        assert!(!transition_allowed(PaymentStatus::Rejected, to));
    }
}

#[test]
fn new_payments_only_initialize_or_fail() {
    assert!(transition_allowed(
        PaymentStatus::New,
        PaymentStatus::Initialized
    ));
    assert!(transition_allowed(PaymentStatus::New, PaymentStatus::Error));
    assert!(!transition_allowed(
        PaymentStatus::New,
        PaymentStatus::Confirmed
    ));
    assert!(!transition_allowed(
        PaymentStatus::New,
        PaymentStatus::Rejected
    ));
    assert!(!transition_allowed(
        PaymentStatus::New,
        PaymentStatus::AuthorizedPendingCapture
    ));
}

#[test]
fn initialized_payments_reach_every_outcome() {
    for to in [
        PaymentStatus::Rejected,
        PaymentStatus::AuthorizedPendingCapture,
        PaymentStatus::Confirmed,
        PaymentStatus::Error,
    ] {
        assert!(transition_allowed(PaymentStatus::Initialized, to));
    }
    assert!(!transition_allowed(
        PaymentStatus::Initialized,
        PaymentStatus::New
    ));
}

#[test]
fn errored_payments_stay_retryable() {
    for to in [
        PaymentStatus::Initialized,
        PaymentStatus::AuthorizedPendingCapture,
        PaymentStatus::Confirmed,
        PaymentStatus::Rejected,
        PaymentStatus::Error,
    ] {
        assert!(transition_allowed(PaymentStatus::Error, to));
    }
}

#[test]
fn pending_capture_can_be_reasserted() {
    assert!(transition_allowed(
        PaymentStatus::AuthorizedPendingCapture,
        PaymentStatus::AuthorizedPendingCapture
    ));
    assert!(transition_allowed(
        PaymentStatus::AuthorizedPendingCapture,
        PaymentStatus::Rejected
    ));
}

#[tokio::test]
async fn store_rejects_transitions_out_of_terminal_states() {
    let store = InMemoryPaymentStore::new();
    let mut payment = common::payment(dec!(10));
    payment.status = PaymentStatus::Confirmed;
    let payment_id = payment.payment_id;
    store.insert(payment).await;

    let result = store
        .set_status(payment_id, PaymentStatus::Initialized, None)
        .await;
    assert!(matches!(
        result,
        Err(StoreError::IllegalTransition {
            from: PaymentStatus::Confirmed,
            to: PaymentStatus::Initialized,
        })
    ));
}

#[tokio::test]
async fn token_is_set_at_most_once() {
    let store = InMemoryPaymentStore::new();
    let payment = common::payment(dec!(10));
    let payment_id = payment.payment_id;
    store.insert(payment).await;

    store.set_transaction_token(payment_id, "tok-1").await.unwrap();
    let second = store.set_transaction_token(payment_id, "tok-2").await;
    assert!(matches!(second, Err(StoreError::TokenAlreadySet)));

    let stored = store.get(payment_id).await.unwrap();
    assert_eq!(stored.transaction_token.as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn captured_amount_is_recorded_once() {
    let store = InMemoryPaymentStore::new();
    let payment = common::payment(dec!(10));
    let payment_id = payment.payment_id;
    store.insert(payment).await;

    store.set_captured_amount(payment_id, dec!(10)).await.unwrap();
    let second = store.set_captured_amount(payment_id, dec!(10)).await;
    assert!(matches!(second, Err(StoreError::CaptureAlreadyRecorded)));
}

#[tokio::test]
async fn status_message_travels_with_the_status() {
    let store = InMemoryPaymentStore::new();
    let payment = common::payment(dec!(10));
    let payment_id = payment.payment_id;
    store.insert(payment).await;

    store
        .set_status(payment_id, PaymentStatus::Error, Some("gateway down".to_string()))
        .await
        .unwrap();

    let stored = store.get(payment_id).await.unwrap();
    assert_eq!(stored.status, PaymentStatus::Error);
    assert_eq!(stored.status_message.as_deref(), Some("gateway down"));
}

#[tokio::test]
async fn unknown_payment_is_not_found() {
    let store = InMemoryPaymentStore::new();
    let missing = Uuid::new_v4();
    assert!(matches!(
        store.get(missing).await,
        Err(StoreError::NotFound(id)) if id == missing
    ));
}

#[tokio::test]
async fn metadata_round_trips_by_key() {
    let store = InMemoryPaymentStore::new();
    let payment = common::payment(dec!(10));
    let payment_id = payment.payment_id;
    store.insert(payment).await;

    assert!(store
        .get_metadata(payment_id, "saferpay_initialize_response")
        .await
        .unwrap()
        .is_none());

    store
        .set_metadata(
            payment_id,
            "saferpay_initialize_response",
            serde_json::json!({"redirect_url": "https://gateway.example/pay"}),
        )
        .await
        .unwrap();

    let stored = store
        .get_metadata(payment_id, "saferpay_initialize_response")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["redirect_url"], "https://gateway.example/pay");
}
