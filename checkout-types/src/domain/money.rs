//! Currency codes, tax-inclusive prices and the gateway amount rule.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Currencies the gateway charges in whole units, without a ×100 minor-unit scale.
pub const ZERO_DECIMAL_CURRENCIES: [&str; 15] = [
    "BIF", // Burundian Franc
    "CLP", // Chilean Peso
    "DJF", // Djiboutian Franc
    "GNF", // Guinean Franc
    "JPY", // Japanese Yen
    "KMF", // Comorian Franc
    "KRW", // South Korean Won
    "MGA", // Malagasy Ariary
    "PYG", // Paraguayan Guaraní
    "RWF", // Rwandan Franc
    "VND", // Vietnamese Đồng
    "VUV", // Vanuatu Vatu
    "XAF", // Central African CFA Franc
    "XOF", // West African CFA Franc
    "XPF", // CFP Franc
];

/// ISO 4217 style currency code, always stored upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Returns the upper-case code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the gateway expects whole units for this currency.
    pub fn is_zero_decimal(&self) -> bool {
        ZERO_DECIMAL_CURRENCIES.contains(&self.0.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidCurrency(s.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
struct PriceParts {
    incl_tax: Decimal,
    currency: CurrencyCode,
}

/// Tax-inclusive order total in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PriceParts")]
pub struct Price {
    incl_tax: Decimal,
    currency: CurrencyCode,
}

impl Price {
    /// Creates a new price. Negative totals are rejected.
    pub fn new(incl_tax: Decimal, currency: CurrencyCode) -> Result<Self, DomainError> {
        if incl_tax < Decimal::ZERO {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self { incl_tax, currency })
    }

    /// Returns the tax-inclusive total.
    pub fn incl_tax(&self) -> Decimal {
        self.incl_tax
    }

    /// Returns the currency.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Integer amount the gateway expects for this total.
    ///
    /// Zero-decimal currencies send the total as is, everything else is
    /// scaled by 100. Both are rounded half-to-even to an integral value.
    pub fn gateway_amount(&self) -> Result<i64, DomainError> {
        let scaled = if self.currency.is_zero_decimal() {
            self.incl_tax
        } else {
            self.incl_tax
                .checked_mul(Decimal::ONE_HUNDRED)
                .ok_or(DomainError::AmountOutOfRange(self.incl_tax))?
        };

        scaled
            .round()
            .to_i64()
            .ok_or(DomainError::AmountOutOfRange(self.incl_tax))
    }
}

impl TryFrom<PriceParts> for Price {
    type Error = DomainError;

    fn try_from(parts: PriceParts) -> Result<Self, Self::Error> {
        Price::new(parts.incl_tax, parts.currency)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.incl_tax, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn price(incl_tax: Decimal, currency: &str) -> Price {
        Price::new(incl_tax, currency.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_currency_code_is_normalized() {
        let code: CurrencyCode = " usd ".parse().unwrap();
        assert_eq!(code.as_str(), "USD");
    }

    #[test]
    fn test_invalid_currency_code() {
        assert!(matches!(
            "US".parse::<CurrencyCode>(),
            Err(DomainError::InvalidCurrency(_))
        ));
        assert!(matches!(
            "U$D".parse::<CurrencyCode>(),
            Err(DomainError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn test_minor_unit_currency_is_scaled() {
        assert_eq!(price(dec!(19.99), "USD").gateway_amount().unwrap(), 1999);
        assert_eq!(price(dec!(10), "EUR").gateway_amount().unwrap(), 1000);
    }

    #[test]
    fn test_zero_decimal_currency_is_not_scaled() {
        assert_eq!(price(dec!(1500), "JPY").gateway_amount().unwrap(), 1500);
        assert_eq!(price(dec!(1500), "jpy").gateway_amount().unwrap(), 1500);
    }

    #[test]
    fn test_every_zero_decimal_currency() {
        for code in ZERO_DECIMAL_CURRENCIES {
            let p = price(dec!(250), code);
            assert!(p.currency().is_zero_decimal());
            assert_eq!(p.gateway_amount().unwrap(), 250, "currency {code}");
        }
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        assert_eq!(price(dec!(1500.5), "JPY").gateway_amount().unwrap(), 1500);
        assert_eq!(price(dec!(1501.5), "JPY").gateway_amount().unwrap(), 1502);
        assert_eq!(price(dec!(0.125), "USD").gateway_amount().unwrap(), 12);
        assert_eq!(price(dec!(0.135), "USD").gateway_amount().unwrap(), 14);
    }

    #[test]
    fn test_negative_price_fails() {
        let result = Price::new(dec!(-1), "USD".parse().unwrap());
        assert!(matches!(result, Err(DomainError::NegativeAmount)));
    }

    #[test]
    fn test_amount_out_of_range() {
        let p = price(Decimal::MAX, "USD");
        assert!(matches!(
            p.gateway_amount(),
            Err(DomainError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn test_price_deserialize_validates() {
        let ok: Price = serde_json::from_str(r#"{"incl_tax":"19.99","currency":"gbp"}"#).unwrap();
        assert_eq!(ok.currency().as_str(), "GBP");
        assert_eq!(ok.incl_tax(), dec!(19.99));

        let negative = serde_json::from_str::<Price>(r#"{"incl_tax":"-5","currency":"GBP"}"#);
        assert!(negative.is_err());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(price(dec!(19.99), "USD").to_string(), "19.99 USD");
    }
}
