//! HTTP handlers for checkout-service.

pub mod checkout;

pub use checkout::create_checkout;
