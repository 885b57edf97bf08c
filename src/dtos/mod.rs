use serde::{Deserialize, Serialize};

/// Plan selection submitted by the pricing page.
///
/// Both fields are free-form strings: unknown plans fall through to the
/// default paid tier and any billing cycle other than `"annual"` is monthly.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub plan: Option<String>,
    #[serde(rename = "billingCycle")]
    pub billing_cycle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub url: String,
}

impl CheckoutResponse {
    /// Shortcut response for plans that never reach the payments provider.
    pub fn redirect(url: String, message: &str) -> Self {
        Self {
            error: false,
            message: Some(message.to_string()),
            url,
        }
    }

    /// Successful hosted checkout session.
    pub fn session(url: String) -> Self {
        Self {
            error: false,
            message: None,
            url,
        }
    }
}
