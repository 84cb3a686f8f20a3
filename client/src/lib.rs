//! Checkout initiator for embedding UIs.
//!
//! Wraps the checkout endpoint: picks the price for the chosen billing
//! period, guards against double submission while a request is in flight,
//! and classifies failures so the UI can show the right notice. The
//! returned `init_point` url is what the UI opens in a new browsing
//! context to hand the payer over to the gateway.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingPeriod {
    Monthly,
    Yearly,
}

impl BillingPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Yearly => "yearly",
        }
    }
}

/// Plan as served by the plans endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price_monthly: f64,
    pub price_yearly: f64,
}

impl Plan {
    pub fn price_for(&self, period: BillingPeriod) -> f64 {
        match period {
            BillingPeriod::Monthly => self.price_monthly,
            BillingPeriod::Yearly => self.price_yearly,
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckoutRequest<'a> {
    plan_id: &'a str,
    plan_name: &'a str,
    price: f64,
    cadence: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRedirect {
    pub preference_id: String,
    /// Url to open in a new browsing context to complete payment.
    pub init_point: String,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("a checkout request is already in flight")]
    InFlight,

    #[error("payment gateway not configured: {0}")]
    NotConfigured(String),

    #[error("not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("checkout failed: {0}")]
    Other(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl CheckoutError {
    /// Notice text for the end user, mirroring the membership app's toasts.
    pub fn user_notice(&self) -> &'static str {
        match self {
            CheckoutError::NotConfigured(_) => {
                "Mercado Pago não configurado. Entre em contato com o administrador."
            }
            CheckoutError::NotAuthenticated(_) => {
                "Você precisa estar logado para fazer uma assinatura."
            }
            _ => "Erro ao iniciar processo de pagamento. Tente novamente.",
        }
    }
}

pub struct CheckoutClient {
    http: reqwest::Client,
    api_base_url: String,
    in_flight: AtomicBool,
}

impl CheckoutClient {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        CheckoutClient {
            http: reqwest::Client::new(),
            api_base_url: api_base_url.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Starts a checkout for the given plan and billing period.
    ///
    /// Refuses to start while a previous call has not finished, so a
    /// double click cannot create two checkout intents at the gateway.
    pub async fn start_checkout(
        &self,
        plan: &Plan,
        period: BillingPeriod,
        access_token: &str,
    ) -> Result<CheckoutRedirect, CheckoutError> {
        let _guard = self.begin()?;

        let price = plan.price_for(period);
        info!("Starting checkout for plan {} at {:.2}", plan.id, price);

        let response = self
            .http
            .post(format!(
                "{}/api/secured/pay/checkout",
                self.api_base_url.trim_end_matches('/')
            ))
            .bearer_auth(access_token)
            .json(&CheckoutRequest {
                plan_id: &plan.id,
                plan_name: &plan.name,
                price,
                cadence: period.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body["error"].as_str().map(|s| s.to_string()))
                .unwrap_or_else(|| "checkout request failed".to_string());
            warn!("Checkout failed ({}): {}", status, message);
            return Err(classify_failure(status, message));
        }

        let redirect: CheckoutRedirect = response.json().await?;
        if redirect.init_point.is_empty() {
            return Err(CheckoutError::Other(
                "checkout response carried no redirect url".to_string(),
            ));
        }

        info!("Checkout preference {} ready", redirect.preference_id);
        Ok(redirect)
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, CheckoutError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CheckoutError::InFlight);
        }
        Ok(InFlightGuard {
            flag: &self.in_flight,
        })
    }
}

struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn classify_failure(status: StatusCode, message: String) -> CheckoutError {
    if status == StatusCode::UNAUTHORIZED || message.contains("Unauthorized") {
        return CheckoutError::NotAuthenticated(message);
    }
    if message.contains("not configured") {
        return CheckoutError::NotConfigured(message);
    }
    CheckoutError::Other(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Plan {
        Plan {
            id: "p1".to_string(),
            name: "Premium".to_string(),
            price_monthly: 29.90,
            price_yearly: 299.0,
        }
    }

    #[test]
    fn price_follows_billing_period() {
        assert_eq!(plan().price_for(BillingPeriod::Monthly), 29.90);
        assert_eq!(plan().price_for(BillingPeriod::Yearly), 299.0);
    }

    #[test]
    fn failures_are_classified_for_display() {
        let err = classify_failure(
            StatusCode::BAD_REQUEST,
            "Payment gateway not configured: token missing".to_string(),
        );
        assert!(matches!(err, CheckoutError::NotConfigured(_)));
        assert_eq!(
            err.user_notice(),
            "Mercado Pago não configurado. Entre em contato com o administrador."
        );

        let err = classify_failure(StatusCode::UNAUTHORIZED, "no token".to_string());
        assert!(matches!(err, CheckoutError::NotAuthenticated(_)));

        let err = classify_failure(StatusCode::BAD_REQUEST, "gateway exploded".to_string());
        assert!(matches!(err, CheckoutError::Other(_)));
    }

    #[test]
    fn second_checkout_is_blocked_while_in_flight() {
        let client = CheckoutClient::new("http://localhost:8080");

        let guard = client.begin().unwrap();
        assert!(matches!(client.begin(), Err(CheckoutError::InFlight)));

        drop(guard);
        assert!(client.begin().is_ok());
    }
}
