//! Currency rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to cents, with halves rounded away from zero.
///
/// # Example
///
/// ```
/// use job_cost_engine::calculation::round_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_cents(Decimal::from_str("27.945").unwrap()), Decimal::from_str("27.95").unwrap());
/// assert_eq!(round_cents(Decimal::from_str("1701.7263").unwrap()), Decimal::from_str("1701.73").unwrap());
/// ```
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
