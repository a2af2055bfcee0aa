//! Stripe PaymentIntents client.
//!
//! Only the intent-creation call is modeled; the processor's own
//! transaction records are never consulted.

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::error::PaymentError;

/// An intent created by the processor. The client secret is opaque;
/// it authorizes client-side payment confirmation.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub client_secret: String,
}

/// External payment processor seam.
///
/// The API layer depends on this trait rather than on the concrete
/// Stripe client, so tests can substitute a stub.
pub trait PaymentProcessor: Send + Sync {
    /// Create a payment intent for `amount_minor` minor units of
    /// `currency`, returning the opaque client secret.
    fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> impl Future<Output = Result<PaymentIntent, PaymentError>> + Send;
}

/// Stripe implementation of [`PaymentProcessor`].
#[derive(Debug, Clone)]
pub struct StripeClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

const STRIPE_API_BASE: &str = "https://api.stripe.com";

impl StripeClient {
    /// Create a client using the given secret key against the live
    /// Stripe API.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self::with_base_url(secret_key, STRIPE_API_BASE)
    }

    /// Create a client against a custom base URL (for test servers).
    pub fn with_base_url(secret_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        Self {
            client: Client::new(),
            base_url: base.trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }
}

/// Wire shape of a successful intent-creation response. Stripe
/// returns many more fields; only the secret matters here.
#[derive(Debug, Deserialize)]
struct IntentResponse {
    client_secret: String,
}

impl PaymentProcessor for StripeClient {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.base_url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", currency.to_string()),
                ("payment_method_types[]", "card".to_string()),
            ])
            .send()
            .await
            .map_err(|e| PaymentError::Upstream(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Stripe intent creation failed");
            return Err(PaymentError::Upstream(format!(
                "HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let intent: IntentResponse = resp
            .json()
            .await
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;

        Ok(PaymentIntent {
            client_secret: intent.client_secret,
        })
    }
}
