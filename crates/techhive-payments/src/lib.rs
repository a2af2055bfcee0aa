//! TechHive Payments — charge computation and the external payment
//! processor client.
//!
//! The processor is an external collaborator that exchanges an amount
//! and currency for an opaque client secret; everything else (coupon
//! resolution, discount math, the minimum-charge floor) happens here.

mod checkout;
mod error;
mod stripe;

pub use checkout::{ChargeQuote, MIN_CHARGE_MINOR, quote_charge};
pub use error::PaymentError;
pub use stripe::{PaymentIntent, PaymentProcessor, StripeClient};
