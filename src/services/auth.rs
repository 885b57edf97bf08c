//! Identity provider client.
//!
//! Exchanges a caller's bearer token for their user record. A token the
//! provider rejects yields an anonymous caller; only transport failures and
//! provider-side errors propagate.

use crate::config::AuthConfig;
use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    config: AuthConfig,
}

/// Authenticated caller as resolved by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Resolve the user behind a bearer token.
    ///
    /// Returns `None` when the provider does not recognize the token
    /// (expired, revoked, garbage). Downstream checkout logic treats that
    /// caller as anonymous.
    pub async fn resolve_user(&self, token: &str) -> Result<Option<AuthUser>> {
        let url = format!("{}/auth/v1/user", self.config.api_base_url);

        let response = self
            .client
            .get(&url)
            .header("apikey", self.config.anon_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send user lookup to {}: {}", url, e);
                anyhow!("Auth lookup failed: {}", e)
            })?;

        let status = response.status();

        if status.is_success() {
            let user: AuthUser = response.json().await?;
            tracing::debug!(user_id = %user.id, "Resolved authenticated caller");
            Ok(Some(user))
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!(status = %status, "Token rejected, treating caller as anonymous");
            Ok(None)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Auth provider error during user lookup");
            Err(anyhow!("Auth provider error: {} - {}", status, body))
        }
    }
}
