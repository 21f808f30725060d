//! Decimal amounts to integer minor units.

use crate::error::{Result, ShopError};
use bigdecimal::{BigDecimal, ToPrimitive};

/// ISO 4217 currencies without a fractional subunit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "TWD", "UGX", "VND",
    "VUV", "XAF", "XOF", "XPF",
];

const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// Number of decimal places for `currency`; unknown codes use 2.
pub fn currency_precision(currency: &str) -> u32 {
    let code = currency.trim().to_uppercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        3
    } else {
        2
    }
}

/// Converts `amount` to minor units of `currency`, rounding half away from zero.
pub fn to_minor_units(amount: &BigDecimal, currency: &str) -> Result<i64> {
    if *amount <= BigDecimal::from(0i64) {
        return Err(ShopError::conversion("amount must be a positive value"));
    }

    let factor = BigDecimal::from(10i64.pow(currency_precision(currency)));
    let scaled = amount * factor;
    let mut minor = scaled.with_scale(0);
    if (&scaled - &minor) * BigDecimal::from(2i64) >= BigDecimal::from(1i64) {
        minor = minor + BigDecimal::from(1i64);
    }

    let minor = minor
        .to_i64()
        .ok_or_else(|| ShopError::conversion("amount is too large to convert to minor units"))?;
    if minor <= 0 {
        return Err(ShopError::conversion(
            "amount is too small after conversion to minor units",
        ));
    }
    Ok(minor)
}
