//! Type-safe price representation using decimal arithmetic.
//!
//! Wix returns amounts as decimal strings (`"19.90"`) next to a separate ISO
//! 4217 currency code. [`Money`] keeps the amount as a [`Decimal`] so sums of
//! line items never pick up float rounding.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors constructing a [`Money`] value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// A monetary amount with its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code, as returned by Wix.
    pub currency: String,
}

impl Money {
    /// Create a new money value.
    #[must_use]
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Parse a Wix decimal amount string.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::InvalidAmount`] if the string is not a decimal.
    pub fn parse(amount: &str, currency: impl Into<String>) -> Result<Self, MoneyError> {
        let parsed = Decimal::from_str(amount.trim())
            .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))?;
        Ok(Self::new(parsed, currency))
    }

    /// Currency symbol for this amount's currency.
    #[must_use]
    pub fn symbol(&self) -> String {
        symbol_for(&self.currency)
    }

    /// Format for display (e.g., "$19.99", "₪120.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.symbol(), self.amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Currencies with a known display symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    ILS,
    #[default]
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::ILS => "₪",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ILS => "ILS",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ILS" => Ok(Self::ILS),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// Resolve a display symbol for any currency code.
///
/// Known currencies use their symbol; anything else displays as the code
/// itself so the amount is never shown without a currency.
#[must_use]
pub fn symbol_for(code: &str) -> String {
    code.parse::<CurrencyCode>().map_or_else(
        |_| code.trim().to_string(),
        |currency| currency.symbol().to_string(),
    )
}
