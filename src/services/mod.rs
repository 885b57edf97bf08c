pub mod audit;
pub mod auth;
pub mod billing;

pub use audit::AuditClient;
pub use auth::{AuthClient, AuthUser};
pub use billing::{BillingClient, CustomerBinding, NewCheckoutSession};
