use anyhow::Result;
use dotenvy::dotenv;
use secrecy::Secret;
use serde::Deserialize;
use std::env;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub checkout: CheckoutConfig,
    pub auth: AuthConfig,
    pub billing: BillingConfig,
    pub audit: AuditConfig,
    pub service_name: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CheckoutConfig {
    /// Fallback used when the request carries no Origin header.
    pub default_origin: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuthConfig {
    /// Base URL of the identity platform (token introspection lives under /auth/v1).
    pub api_base_url: String,
    pub anon_key: Secret<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BillingConfig {
    /// Payments provider API root, e.g. https://api.stripe.com/v1
    pub api_base_url: String,
    pub secret_key: Secret<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AuditConfig {
    /// Base URL of the data platform (REST inserts live under /rest/v1).
    pub api_base_url: String,
    /// Elevated key for audit inserts, never the caller's token.
    pub service_role_key: Secret<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("CHECKOUT_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("CHECKOUT_SERVICE_PORT")
            .unwrap_or_else(|_| "3004".to_string())
            .parse()?;

        let default_origin =
            env::var("CHECKOUT_DEFAULT_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let auth_url = env::var("AUTH_API_URL").unwrap_or_else(|_| "http://localhost:9999".to_string());
        let anon_key = env::var("AUTH_ANON_KEY").unwrap_or_default();

        let billing_url =
            env::var("BILLING_API_URL").unwrap_or_else(|_| "https://api.stripe.com/v1".to_string());
        let billing_secret = env::var("BILLING_SECRET_KEY").unwrap_or_default();

        let audit_url = env::var("AUDIT_API_URL").unwrap_or_else(|_| auth_url.clone());
        let service_role_key = env::var("AUDIT_SERVICE_ROLE_KEY").unwrap_or_default();

        Ok(Self {
            server: ServerConfig { host, port },
            checkout: CheckoutConfig { default_origin },
            auth: AuthConfig {
                api_base_url: auth_url,
                anon_key: Secret::new(anon_key),
            },
            billing: BillingConfig {
                api_base_url: billing_url,
                secret_key: Secret::new(billing_secret),
            },
            audit: AuditConfig {
                api_base_url: audit_url,
                service_role_key: Secret::new(service_role_key),
            },
            service_name: "checkout-service".to_string(),
        })
    }
}
