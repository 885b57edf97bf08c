//! Checkout session orchestration.
//!
//! One request, one outcome: a dashboard redirect (Free), a contact redirect
//! (Enterprise), or a hosted checkout session. The steps run strictly in
//! sequence — caller resolution, plan routing, customer resolution, session
//! creation — and the audit write afterwards is the only step whose failure
//! is allowed to disappear.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use anyhow::anyhow;

use crate::{
    dtos::{CheckoutRequest, CheckoutResponse},
    error::AppError,
    models::{route_plan, BillingCycle, PlanRoute},
    services::{AuthUser, CustomerBinding, NewCheckoutSession},
    AppState,
};

/// Create a checkout session for a plan selection.
pub async fn create_checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<CheckoutResponse>, AppError> {
    let request: CheckoutRequest = serde_json::from_str(&body)
        .map_err(|e| AppError::InvalidRequest(anyhow!("invalid request body: {}", e)))?;

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(&state.config.checkout.default_origin)
        .to_string();

    // A missing or rejected token means an anonymous caller, not a failure.
    let caller = match bearer_token(&headers) {
        Some(token) => state.auth.resolve_user(token).await?,
        None => None,
    };

    let cycle = BillingCycle::from_request(request.billing_cycle.as_deref());

    tracing::info!(
        plan = ?request.plan,
        billing_cycle = %cycle.as_str(),
        user_id = ?caller.as_ref().map(|u| u.id),
        "Processing plan selection"
    );

    let plan = match route_plan(request.plan.as_deref()) {
        PlanRoute::Dashboard => {
            return Ok(Json(CheckoutResponse::redirect(
                format!("{}/dashboard", origin),
                "Free plan selected, no payment needed",
            )));
        }
        PlanRoute::Contact => {
            return Ok(Json(CheckoutResponse::redirect(
                format!("{}/contact", origin),
                "Enterprise plans are handled by our sales team",
            )));
        }
        PlanRoute::Paid(plan) => plan,
    };

    let customer = resolve_customer(&state, caller.as_ref()).await?;

    let session = state
        .billing
        .create_checkout_session(&NewCheckoutSession {
            plan_name: plan.name,
            unit_amount: plan.unit_amount(cycle),
            interval: cycle.interval(),
            customer,
            success_url: format!("{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}", origin),
            cancel_url: format!("{}/pricing", origin),
        })
        .await?;

    // Best-effort: a failed audit write never touches the caller's response.
    if let Some(user) = &caller {
        if let Err(e) = state
            .audit
            .record_plan_selected(user.id, plan.name, cycle.as_str())
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to record plan selection");
        }
    }

    Ok(Json(CheckoutResponse::session(session.url)))
}

/// Decide how the session binds to a billing customer.
///
/// An existing customer record for the caller's email is reused; otherwise
/// the raw email is handed to the provider, which creates the customer
/// lazily at session time. Email-less callers get no binding.
async fn resolve_customer(
    state: &AppState,
    caller: Option<&AuthUser>,
) -> Result<CustomerBinding, AppError> {
    let email = match caller.and_then(|u| u.email.as_deref()) {
        Some(email) => email,
        None => return Ok(CustomerBinding::Anonymous),
    };

    match state.billing.find_customer_by_email(email).await? {
        Some(customer_id) => {
            tracing::debug!(customer_id = %customer_id, "Reusing existing billing customer");
            Ok(CustomerBinding::Existing(customer_id))
        }
        None => Ok(CustomerBinding::Email(email.to_string())),
    }
}

/// Extract the bearer credential, tolerating a bare token without the prefix.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn bare_token_is_accepted() {
        let headers = headers_with_auth("abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn missing_or_empty_header_yields_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with_auth("Bearer ")), None);
    }
}
