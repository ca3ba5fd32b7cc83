//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no settings or I/O access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Lowest amount ever charged for a registration.
pub const MIN_PRICE: Decimal = Decimal::ONE;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use regatta_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Reduce `amount` by `percentage` percent: `amount * (1 - pct/100)`.
pub fn apply_percentage_discount(amount: Decimal, percentage: i64) -> Decimal {
    amount * (Decimal::ONE - Decimal::from(percentage) / Decimal::ONE_HUNDRED)
}

/// Clamp an amount to [`MIN_PRICE`].
pub fn floor_price(amount: Decimal) -> Decimal {
    amount.max(MIN_PRICE)
}

/// Final registration price.
///
/// Applies the discount when a percentage is given, rounds to cents and
/// floors the result at [`MIN_PRICE`].
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use regatta_web::pricing::calculators::final_price;
///
/// assert_eq!(final_price(dec!(70000), Some(10)), dec!(63000));
/// assert_eq!(final_price(dec!(1), Some(99)), dec!(1));
/// ```
pub fn final_price(base: Decimal, discount_percentage: Option<i64>) -> Decimal {
    let amount = match discount_percentage {
        Some(pct) => apply_percentage_discount(base, pct),
        None => base,
    };
    floor_price(round_money(amount, 2))
}
