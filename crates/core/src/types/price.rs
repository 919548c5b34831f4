//! Price representation and formatting.
//!
//! The backend serializes prices as JSON numbers in the currency's standard
//! unit (dollars, not cents), so amounts are carried as `f64` end to end and
//! only rounded at the two boundaries that need integers or fixed decimals:
//! display formatting and gateway minor-unit conversion.

use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: f64, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display with the currency symbol and two decimals,
    /// e.g. `$19.99`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }

    /// Convert to the gateway's minor-unit convention.
    ///
    /// The authoritative charge amount always originates server-side; this
    /// conversion only prepares the request payload. Exponent 2 covers every
    /// currency the backend currently quotes; zero-exponent currencies (JPY)
    /// would need a per-currency exponent here.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_minor_units(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }
}

/// ISO 4217 currency codes quoted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Usd | Self::Cad | Self::Aud => "$",
            Self::Eur => "\u{20ac}",
            Self::Gbp => "\u{a3}",
        }
    }

    /// Lowercase code as the payment endpoint expects it.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Eur => "eur",
            Self::Gbp => "gbp",
            Self::Cad => "cad",
            Self::Aud => "aud",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_two_decimals() {
        let price = Price::new(19.99, CurrencyCode::Usd);
        assert_eq!(price.display(), "$19.99");

        // Accumulation stays in f64; rounding happens only at render time.
        let subtotal = Price::new(19.99 * 2.0, CurrencyCode::Usd);
        assert_eq!(subtotal.display(), "$39.98");
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(Price::new(42.50, CurrencyCode::Usd).to_minor_units(), 4250);
        assert_eq!(Price::new(0.0, CurrencyCode::Usd).to_minor_units(), 0);
        // Binary float artifacts must round to the nearest cent.
        assert_eq!(Price::new(19.99, CurrencyCode::Usd).to_minor_units(), 1999);
        assert_eq!(
            Price::new(0.1 + 0.2, CurrencyCode::Usd).to_minor_units(),
            30
        );
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::Usd.symbol(), "$");
        assert_eq!(CurrencyCode::Eur.symbol(), "\u{20ac}");
        assert_eq!(CurrencyCode::Gbp.symbol(), "\u{a3}");
    }

    #[test]
    fn test_currency_serde_uppercase() {
        let code: CurrencyCode = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(code, CurrencyCode::Usd);
        assert_eq!(code.code(), "usd");
    }

    #[test]
    fn test_currency_code_visible_from_crate_root() {
        let price = Price::new(9.5, crate::CurrencyCode::Eur);
        assert_eq!(price.display(), "\u{20ac}9.50");
    }
}
