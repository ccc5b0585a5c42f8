use std::time::Duration;

pub const SANDBOX_BASE_URL: &str = "https://test.saferpay.com/api/Payment/v1";
pub const PRODUCTION_BASE_URL: &str = "https://www.saferpay.com/api/Payment/v1";

#[derive(Clone)]
pub struct SaferpayConfig {
    pub customer_id: String,
    pub terminal_id: String,
    pub sandbox: bool,
    pub base_url_override: Option<String>,
    pub timeout: Duration,
}

impl SaferpayConfig {
    pub fn new(customer_id: impl Into<String>, terminal_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            terminal_id: terminal_id.into(),
            sandbox: true,
            base_url_override: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_env() -> Self {
        Self {
            customer_id: std::env::var("SAFERPAY_CUSTOMER_ID").unwrap_or_default(),
            terminal_id: std::env::var("SAFERPAY_TERMINAL_ID").unwrap_or_default(),
            sandbox: std::env::var("SAFERPAY_SANDBOX")
                .map(|v| v != "false")
                .unwrap_or(true),
            base_url_override: std::env::var("SAFERPAY_BASE_URL").ok(),
            timeout: Duration::from_millis(
                std::env::var("SAFERPAY_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(30_000),
            ),
        }
    }

    pub fn base_url(&self) -> &str {
        match &self.base_url_override {
            Some(url) => url.as_str(),
            None if self.sandbox => SANDBOX_BASE_URL,
            None => PRODUCTION_BASE_URL,
        }
    }
}
