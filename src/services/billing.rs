//! Payments provider client.
//!
//! Implements the provider's hosted checkout Sessions API and customer
//! lookup. Requests are form-encoded in the provider's bracketed key style;
//! authentication is the secret key as a bearer credential.

use crate::config::BillingConfig;
use crate::models::CHECKOUT_CURRENCY;
use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

#[derive(Clone)]
pub struct BillingClient {
    client: Client,
    config: BillingConfig,
}

/// How the session is tied to a billing customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerBinding {
    /// Reuse an existing customer record; no email is passed.
    Existing(String),
    /// Let the provider create a customer lazily from this email.
    Email(String),
    /// Anonymous caller: no customer binding at all.
    Anonymous,
}

/// Parameters for a single-line-item subscription checkout session.
#[derive(Debug)]
pub struct NewCheckoutSession<'a> {
    pub plan_name: &'a str,
    /// Amount in minor currency units.
    pub unit_amount: u64,
    /// Recurring interval ("month" or "year").
    pub interval: &'static str,
    pub customer: CustomerBinding,
    pub success_url: String,
    pub cancel_url: String,
}

/// Hosted checkout session returned by the provider.
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Redirect URL the caller is sent to.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CustomerList {
    data: Vec<CustomerRecord>,
}

#[derive(Debug, Deserialize)]
struct CustomerRecord {
    id: String,
}

/// Provider API error envelope.
#[derive(Debug, Deserialize)]
pub struct BillingError {
    pub error: BillingErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct BillingErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: Option<String>,
    pub message: String,
}

impl BillingClient {
    pub fn new(config: BillingConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Check if the payments provider is configured (secret key is set).
    pub fn is_configured(&self) -> bool {
        !self.config.secret_key.expose_secret().is_empty()
    }

    /// Look up an existing billing customer by exact email, first match only.
    pub async fn find_customer_by_email(&self, email: &str) -> Result<Option<String>> {
        if !self.is_configured() {
            return Err(anyhow!("Payments provider credentials not configured"));
        }

        let url = format!("{}/customers", self.config.api_base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("email", email), ("limit", "1")])
            .bearer_auth(self.config.secret_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Customer lookup response");

        if status.is_success() {
            let list: CustomerList = serde_json::from_str(&body)?;
            Ok(list.data.into_iter().next().map(|c| c.id))
        } else {
            Err(self.provider_error("customer lookup", &body))
        }
    }

    /// Create a hosted subscription checkout session with one priced line item.
    pub async fn create_checkout_session(
        &self,
        session: &NewCheckoutSession<'_>,
    ) -> Result<CheckoutSession> {
        if !self.is_configured() {
            return Err(anyhow!("Payments provider credentials not configured"));
        }

        let params = Self::session_params(session);
        let url = format!("{}/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, body = %body, "Checkout session response");

        if status.is_success() {
            let created: CheckoutSession = serde_json::from_str(&body)?;
            tracing::info!(
                session_id = %created.id,
                plan = %session.plan_name,
                amount = session.unit_amount,
                interval = %session.interval,
                "Checkout session created"
            );
            Ok(created)
        } else {
            Err(self.provider_error("session creation", &body))
        }
    }

    /// Flatten a session request into the provider's form encoding.
    fn session_params(session: &NewCheckoutSession<'_>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("mode", "subscription".to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "line_items[0][price_data][currency]",
                CHECKOUT_CURRENCY.to_string(),
            ),
            (
                "line_items[0][price_data][unit_amount]",
                session.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][recurring][interval]",
                session.interval.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                session.plan_name.to_string(),
            ),
            ("success_url", session.success_url.clone()),
            ("cancel_url", session.cancel_url.clone()),
        ];

        match &session.customer {
            CustomerBinding::Existing(id) => params.push(("customer", id.clone())),
            CustomerBinding::Email(email) => params.push(("customer_email", email.clone())),
            CustomerBinding::Anonymous => {}
        }

        params
    }

    fn provider_error(&self, step: &str, body: &str) -> anyhow::Error {
        let error: BillingError = serde_json::from_str(body).unwrap_or_else(|_| BillingError {
            error: BillingErrorDetail {
                kind: "unknown".to_string(),
                code: None,
                message: body.to_string(),
            },
        });
        tracing::error!(
            kind = %error.error.kind,
            code = ?error.error.code,
            message = %error.error.message,
            "Payments provider {} failed",
            step
        );
        anyhow!("Payments provider error: {}", error.error.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn test_config(secret: &str) -> BillingConfig {
        BillingConfig {
            api_base_url: "https://api.stripe.com/v1".to_string(),
            secret_key: Secret::new(secret.to_string()),
        }
    }

    fn test_session(customer: CustomerBinding) -> NewCheckoutSession<'static> {
        NewCheckoutSession {
            plan_name: "Startup Plan",
            unit_amount: 1499,
            interval: "month",
            customer,
            success_url: "https://app.test/payment-success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://app.test/pricing".to_string(),
        }
    }

    fn value_of<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_is_configured() {
        assert!(BillingClient::new(test_config("sk_test_123")).is_configured());
        assert!(!BillingClient::new(test_config("")).is_configured());
    }

    #[test]
    fn session_params_carry_one_line_item() {
        let params = BillingClient::session_params(&test_session(CustomerBinding::Anonymous));

        assert_eq!(value_of(&params, "mode"), Some("subscription"));
        assert_eq!(value_of(&params, "line_items[0][quantity]"), Some("1"));
        assert_eq!(
            value_of(&params, "line_items[0][price_data][currency]"),
            Some("usd")
        );
        assert_eq!(
            value_of(&params, "line_items[0][price_data][unit_amount]"),
            Some("1499")
        );
        assert_eq!(
            value_of(&params, "line_items[0][price_data][recurring][interval]"),
            Some("month")
        );
        assert_eq!(
            value_of(&params, "line_items[0][price_data][product_data][name]"),
            Some("Startup Plan")
        );
        // The session-id placeholder must reach the provider unexpanded.
        assert_eq!(
            value_of(&params, "success_url"),
            Some("https://app.test/payment-success?session_id={CHECKOUT_SESSION_ID}")
        );
        assert_eq!(
            value_of(&params, "cancel_url"),
            Some("https://app.test/pricing")
        );
    }

    #[test]
    fn existing_customer_suppresses_email() {
        let params = BillingClient::session_params(&test_session(CustomerBinding::Existing(
            "cus_123".to_string(),
        )));
        assert_eq!(value_of(&params, "customer"), Some("cus_123"));
        assert_eq!(value_of(&params, "customer_email"), None);
    }

    #[test]
    fn unmatched_email_is_passed_through() {
        let params = BillingClient::session_params(&test_session(CustomerBinding::Email(
            "new@example.com".to_string(),
        )));
        assert_eq!(value_of(&params, "customer"), None);
        assert_eq!(value_of(&params, "customer_email"), Some("new@example.com"));
    }

    #[test]
    fn anonymous_sessions_have_no_customer_binding() {
        let params = BillingClient::session_params(&test_session(CustomerBinding::Anonymous));
        assert_eq!(value_of(&params, "customer"), None);
        assert_eq!(value_of(&params, "customer_email"), None);
    }
}
