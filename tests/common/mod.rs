use checkout_service::config::{
    AuditConfig, AuthConfig, BillingConfig, CheckoutConfig, Config, ServerConfig,
};
use checkout_service::startup::Application;
use secrecy::Secret;
use wiremock::MockServer;

pub const TEST_ORIGIN: &str = "https://app.example.com";

pub struct TestApp {
    pub address: String,
    pub auth_server: MockServer,
    pub billing_server: MockServer,
    pub audit_server: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let auth_server = MockServer::start().await;
        let billing_server = MockServer::start().await;
        let audit_server = MockServer::start().await;

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            checkout: CheckoutConfig {
                default_origin: "http://localhost:3000".to_string(),
            },
            auth: AuthConfig {
                api_base_url: auth_server.uri(),
                anon_key: Secret::new("test-anon-key".to_string()),
            },
            billing: BillingConfig {
                api_base_url: billing_server.uri(),
                secret_key: Secret::new("sk_test_123".to_string()),
            },
            audit: AuditConfig {
                api_base_url: audit_server.uri(),
                service_role_key: Secret::new("test-service-role-key".to_string()),
            },
            service_name: "checkout-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            auth_server,
            billing_server,
            audit_server,
        }
    }

    /// POST a plan selection, optionally with a bearer token.
    pub async fn post_checkout(
        &self,
        body: serde_json::Value,
        token: Option<&str>,
    ) -> reqwest::Response {
        let client = reqwest::Client::new();
        let mut request = client
            .post(format!("{}/checkout", self.address))
            .header("Origin", TEST_ORIGIN)
            .json(&body);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request.send().await.expect("Failed to execute request")
    }
}
