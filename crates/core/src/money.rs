//! Money
//!
//! The shop sells in a single currency. Amounts are carried as
//! [`Money`] and all arithmetic happens in minor units.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency of every price in the catalog.
pub const CURRENCY: &Currency = iso::ARS;

/// Price alias used throughout the domain.
pub type Price = Money<'static, Currency>;

/// Errors raised while turning user or document input into a [`Price`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The amount could not be parsed.
    #[error("invalid amount: {0}")]
    Invalid(String),

    /// The amount is below zero.
    #[error("amount must not be negative")]
    Negative,

    /// The amount is NaN or infinite.
    #[error("amount is not a finite number")]
    NotFinite,

    /// The amount does not fit in minor units.
    #[error("amount is out of range")]
    OutOfRange,
}

/// A zero amount in the shop currency.
pub fn zero() -> Price {
    Money::from_minor(0, CURRENCY)
}

/// Build a price from minor units (cents).
pub fn from_minor(minor_units: i64) -> Price {
    Money::from_minor(minor_units, CURRENCY)
}

/// Convert a decimal amount into a price, rounded half away from zero to
/// two places.
///
/// # Errors
///
/// Returns [`MoneyError::Negative`] for amounts below zero and
/// [`MoneyError::OutOfRange`] when the value does not fit in minor units.
pub fn price_from_decimal(amount: Decimal) -> Result<Price, MoneyError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyError::Negative);
    }

    let minor_units = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.to_i64())
        .ok_or(MoneyError::OutOfRange)?;

    Ok(from_minor(minor_units))
}

/// Convert a document number into a price.
///
/// # Errors
///
/// Returns [`MoneyError::NotFinite`] for NaN/infinity, otherwise the errors
/// of [`price_from_decimal`].
pub fn price_from_f64(amount: f64) -> Result<Price, MoneyError> {
    if !amount.is_finite() {
        return Err(MoneyError::NotFinite);
    }

    let decimal = Decimal::from_f64_retain(amount).ok_or(MoneyError::OutOfRange)?;

    price_from_decimal(decimal)
}

/// Parse a typed amount such as `"3.50"`, `"3,50"` or `"$ 12"`.
///
/// # Errors
///
/// Returns [`MoneyError::Invalid`] when the text is not a number, otherwise
/// the errors of [`price_from_decimal`].
pub fn parse_price(input: &str) -> Result<Price, MoneyError> {
    let trimmed = input.trim();
    let without_symbol = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();

    if without_symbol.is_empty() {
        return Err(MoneyError::Invalid(input.to_string()));
    }

    let amount = without_symbol
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_err| MoneyError::Invalid(input.to_string()))?;

    price_from_decimal(amount)
}

/// Decimal amount of a price.
pub fn to_decimal(price: &Price) -> Decimal {
    Decimal::new(price.to_minor_units(), 2)
}

/// Number used when writing a price to a document.
pub fn to_f64(price: &Price) -> f64 {
    to_decimal(price).to_f64().unwrap_or_default()
}

/// Format a price for display, e.g. `$3.50`.
pub fn format_money(price: &Price) -> String {
    let minor_units = price.to_minor_units();
    let abs_minor = minor_units.unsigned_abs();
    let sign = if minor_units < 0 { "-" } else { "" };

    format!("{sign}${}.{:02}", abs_minor / 100, abs_minor % 100)
}
