//! Card payments through Stripe Checkout.
//!
//! - [`PaymentGateway`] - hosted checkout session creation (mockable)
//! - [`StripeClient`] - Stripe REST implementation
//! - [`WebhookVerifier`] - `Stripe-Signature` verification
//! - [`StripeEvent`] / [`CompletedCheckoutSession`] - webhook payloads

mod gateway;
mod stripe;
mod webhook;

pub use gateway::{CheckoutRequest, CheckoutSession, PaymentGateway, PaymentGatewayError};
pub use stripe::{DEFAULT_API_BASE, StripeClient};
pub use webhook::{
    CHECKOUT_SESSION_COMPLETED, CompletedCheckoutSession, SignatureError, StripeEvent,
    WebhookVerifier, compute_signature,
};

#[cfg(test)]
pub use gateway::MockPaymentGateway;
