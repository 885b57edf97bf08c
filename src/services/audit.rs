//! Best-effort audit trail client.
//!
//! Inserts plan-selection records through the data platform's REST surface
//! using the service-role key, never the caller's token. The caller of this
//! client decides what to do with failures; the checkout path swallows them.

use crate::config::AuditConfig;
use anyhow::{anyhow, Result};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Clone)]
pub struct AuditClient {
    client: Client,
    config: AuditConfig,
}

#[derive(Debug, Serialize)]
struct AuditRecord {
    user_id: Uuid,
    action_type: &'static str,
    details: serde_json::Value,
}

impl AuditClient {
    pub fn new(config: AuditConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Record which plan a caller selected.
    pub async fn record_plan_selected(
        &self,
        user_id: Uuid,
        plan_name: &str,
        billing_cycle: &str,
    ) -> Result<()> {
        let url = format!("{}/rest/v1/audit_logs", self.config.api_base_url);
        let key = self.config.service_role_key.expose_secret();

        let record = AuditRecord {
            user_id,
            action_type: "plan_selected",
            details: json!({
                "planName": plan_name,
                "billingCycle": billing_cycle,
            }),
        };

        let response = self
            .client
            .post(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", "return=minimal")
            .json(&record)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(user_id = %user_id, plan = %plan_name, "Plan selection recorded");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(anyhow!("Audit insert failed: {} - {}", status, body))
        }
    }
}
