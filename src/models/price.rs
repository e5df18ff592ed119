//! Fixed-precision money values.
//!
//! Prices are stored as `NUMERIC(10, 8)` and travel over JSON as plain numbers.

use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::{Deserialize, Deserializer, Serializer};
use std::str::FromStr;

/// Fractional digits kept for every price.
pub const PRICE_SCALE: i64 = 8;

/// Exclusive upper bound imposed by the column precision.
const PRICE_CEILING: i64 = 100;

/// Checks that a price is non-negative and fits the storage precision.
pub fn check_price(price: &BigDecimal) -> Result<(), &'static str> {
    if price < &BigDecimal::zero() {
        return Err("price must not be negative");
    }
    if price >= &BigDecimal::from(PRICE_CEILING) {
        return Err("price must be below 100");
    }
    Ok(())
}

pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.to_f64() {
        Some(number) => serializer.serialize_f64(number),
        None => serializer.serialize_str(&value.to_string()),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    let text = match Raw::deserialize(deserializer)? {
        Raw::Number(number) => number.to_string(),
        Raw::Text(text) => text,
    };
    BigDecimal::from_str(text.trim())
        .map(|value| value.round(PRICE_SCALE))
        .map_err(serde::de::Error::custom)
}
