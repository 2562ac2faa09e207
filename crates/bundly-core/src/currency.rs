//! # Currency Module
//!
//! Converts reference-currency amounts into a cart's display currency.
//!
//! ## Why a Static Table?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE RATE TABLE IS A PLACEHOLDER                                        │
//! │                                                                         │
//! │  Merchants author fixed discounts in ONE reference currency (USD).     │
//! │  A shopper's cart can be in any currency, so the amount must be        │
//! │  converted before it appears in an operation.                          │
//! │                                                                         │
//! │  The engine performs NO I/O, so it cannot call a live rate service.    │
//! │  Instead the table is an injected, immutable configuration value:      │
//! │    • production hosts construct it from whatever source they trust     │
//! │    • tests substitute deterministic rates                              │
//! │    • Default::default() ships indicative placeholder rates             │
//! │                                                                         │
//! │  Unknown currency → rate 1.0 + warn! (never an error to the caller)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! Zero-decimal currencies (JPY, KRW, ...) round to the nearest whole unit;
//! all others round to two decimal places, half-up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// The currency fixed discount amounts are authored in.
pub const REFERENCE_CURRENCY: &str = "USD";

/// Currencies whose smallest unit is the whole unit (ISO 4217 exponent 0).
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

// =============================================================================
// Currency Table
// =============================================================================

/// Immutable reference-currency → display-currency rate table.
///
/// ## Design Notes
/// - Injected into evaluation rather than read from module-global state,
///   so tests can substitute rates deterministically
/// - Process-wide immutable configuration; safe to share across concurrent
///   evaluations without locking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTable {
    rates: BTreeMap<String, f64>,
}

impl CurrencyTable {
    /// Creates a table from explicit rates (reference currency → target).
    pub fn new(rates: BTreeMap<String, f64>) -> Self {
        CurrencyTable { rates }
    }

    /// Returns the conversion rate for a currency.
    ///
    /// Unknown currencies fall back to 1.0; the discount then applies at
    /// its reference magnitude rather than disappearing.
    pub fn rate(&self, currency: &str) -> f64 {
        match self.rates.get(currency) {
            Some(rate) => *rate,
            None => {
                warn!(currency, "no conversion rate configured, assuming 1.0");
                1.0
            }
        }
    }

    /// Converts a reference-currency amount into `currency`, rounded per
    /// that currency's convention.
    ///
    /// ## Example
    /// ```rust
    /// use bundly_core::currency::CurrencyTable;
    ///
    /// let table = CurrencyTable::default();
    /// assert_eq!(table.convert(10.0, "USD"), 10.0);
    /// ```
    pub fn convert(&self, amount: f64, currency: &str) -> f64 {
        round_for_currency(amount * self.rate(currency), currency)
    }
}

/// Indicative placeholder rates. Hosts should inject real ones.
impl Default for CurrencyTable {
    fn default() -> Self {
        let rates = [
            ("USD", 1.0),
            ("EUR", 0.92),
            ("GBP", 0.79),
            ("CAD", 1.36),
            ("AUD", 1.52),
            ("NZD", 1.65),
            ("JPY", 149.0),
            ("KRW", 1330.0),
            ("INR", 83.0),
            ("CHF", 0.88),
            ("SEK", 10.5),
            ("DKK", 6.86),
            ("NOK", 10.6),
            ("MXN", 17.1),
            ("BRL", 4.97),
            ("SGD", 1.34),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();

        CurrencyTable { rates }
    }
}

// =============================================================================
// Rounding & Formatting
// =============================================================================

/// Checks whether a currency has no minor unit.
pub fn is_zero_decimal(currency: &str) -> bool {
    ZERO_DECIMAL_CURRENCIES.contains(&currency)
}

/// Rounds an amount per the currency's convention, half-up.
pub fn round_for_currency(amount: f64, currency: &str) -> f64 {
    if is_zero_decimal(currency) {
        amount.round()
    } else {
        // Integer math on minor units keeps the half-up behavior exact
        (amount * 100.0).round() / 100.0
    }
}

/// Returns the display symbol for a currency, falling back to the code
/// itself when no symbol is known.
pub fn symbol(currency: &str) -> &str {
    match currency {
        "USD" | "CAD" | "AUD" | "NZD" | "SGD" | "MXN" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "KRW" => "₩",
        "INR" => "₹",
        "BRL" => "R$",
        "CHF" => "CHF ",
        "SEK" | "DKK" | "NOK" => "kr ",
        _ => currency,
    }
}

/// Formats an already-rounded amount for a discount message.
///
/// Whole amounts print without decimals ("10", not "10.00") so messages
/// read the way merchants author them; everything else keeps two places.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{:.2}", amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
