//! Charge computation for the checkout flow.

use chrono::{DateTime, Utc};
use techhive_core::models::coupon::Coupon;

/// Minimum charge in minor units ($1.00) — the processor rejects
/// anything below this.
pub const MIN_CHARGE_MINOR: i64 = 100;

/// A computed charge: the amount to send to the processor and the
/// discount that was actually applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeQuote {
    /// Final amount in minor currency units (cents).
    pub amount_minor: i64,
    /// Discount applied, in whole currency units.
    pub discount_applied: f64,
}

/// Compute the final charge for a requested amount and an optionally
/// resolved coupon.
///
/// An absent or expired coupon silently contributes zero discount —
/// this path is deliberately lenient, unlike the strict apply-coupon
/// validation.
pub fn quote_charge(amount: f64, coupon: Option<&Coupon>, now: DateTime<Utc>) -> ChargeQuote {
    let discount = match coupon {
        Some(c) if c.is_valid_at(now) => c.discount,
        _ => 0.0,
    };

    let amount_minor = ((amount - discount) * 100.0).trunc() as i64;

    ChargeQuote {
        amount_minor: amount_minor.max(MIN_CHARGE_MINOR),
        discount_applied: discount,
    }
}
