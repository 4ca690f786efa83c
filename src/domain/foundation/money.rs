//! Money and currency value objects.
//!
//! Amounts are kept in minor units (cents) as `i64` so arithmetic is exact.
//! A `Money` value is always tied to its currency: equality compares both
//! fields, and arithmetic across different currencies is rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{DomainError, ValidationError};

/// ISO-4217 style currency code: three upper-case ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Currency used when a request does not name one.
    pub const DEFAULT_CODE: &'static str = "SAR";

    /// Creates a currency from a code, normalizing to upper case.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ValidationError::empty_field("currency"));
        }
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "must be a three-letter code",
            ));
        }
        Ok(Self(code))
    }

    /// The default currency.
    pub fn default_currency() -> Self {
        Self(Self::DEFAULT_CODE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::default_currency()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Currency {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Currency::new(value)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::new(s)
    }
}

/// Non-negative monetary amount in a specific currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRepr")]
pub struct Money {
    amount_cents: i64,
    currency: Currency,
}

#[derive(Deserialize)]
struct MoneyRepr {
    amount_cents: i64,
    currency: Currency,
}

impl TryFrom<MoneyRepr> for Money {
    type Error = ValidationError;

    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        Money::new(repr.amount_cents, repr.currency)
    }
}

impl Money {
    /// Creates a money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Result<Self, ValidationError> {
        if amount_cents < 0 {
            return Err(ValidationError::out_of_range(
                "amount",
                0,
                i64::MAX,
                amount_cents,
            ));
        }
        Ok(Self {
            amount_cents,
            currency,
        })
    }

    /// Parses a decimal amount such as `"100"` or `"100.5"` (at most two
    /// fraction digits).
    pub fn from_decimal_str(amount: &str, currency: Currency) -> Result<Self, ValidationError> {
        let amount = amount.trim();
        let invalid = || ValidationError::invalid_format("amount", "expected a decimal like 100.50");

        let (whole, fraction) = match amount.split_once('.') {
            Some((w, f)) => (w, f),
            None => (amount, ""),
        };
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction_cents))
            .ok_or_else(invalid)?;

        Money::new(cents, currency)
    }

    pub fn amount_cents(&self) -> i64 {
        self.amount_cents
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Decimal rendering of the amount without the currency (`"100.50"`).
    pub fn to_decimal_string(&self) -> String {
        format!("{}.{:02}", self.amount_cents / 100, self.amount_cents % 100)
    }

    /// Adds two amounts of the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        let sum = self
            .amount_cents
            .checked_add(other.amount_cents)
            .ok_or_else(|| DomainError::validation("amount", "Amount overflow"))?;
        Ok(Money {
            amount_cents: sum,
            currency: self.currency.clone(),
        })
    }

    /// Applies a rate in basis points (1500 = 15%), rounding half up.
    pub fn percentage(&self, basis_points: u32) -> Money {
        let scaled = self.amount_cents as i128 * basis_points as i128;
        let cents = (scaled + 5_000) / 10_000;
        Money {
            amount_cents: cents as i64,
            currency: self.currency.clone(),
        }
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::validation(
                "currency",
                format!(
                    "Cannot combine amounts in {} and {}",
                    self.currency, other.currency
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_decimal_string(), self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use proptest::prelude::*;

    fn sar() -> Currency {
        Currency::new("SAR").unwrap()
    }

    fn usd() -> Currency {
        Currency::new("USD").unwrap()
    }

    #[test]
    fn currency_normalizes_case() {
        assert_eq!(Currency::new("sar").unwrap().as_str(), "SAR");
    }

    #[test]
    fn currency_rejects_bad_codes() {
        assert!(Currency::new("").is_err());
        assert!(Currency::new("RIYAL").is_err());
        assert!(Currency::new("U5D").is_err());
    }

    #[test]
    fn money_rejects_negative_amounts() {
        assert!(Money::new(-1, sar()).is_err());
    }

    #[test]
    fn decimal_parsing_handles_fraction_lengths() {
        assert_eq!(Money::from_decimal_str("100", sar()).unwrap().amount_cents(), 10_000);
        assert_eq!(Money::from_decimal_str("100.5", sar()).unwrap().amount_cents(), 10_050);
        assert_eq!(Money::from_decimal_str("0.07", sar()).unwrap().amount_cents(), 7);
    }

    #[test]
    fn decimal_parsing_rejects_garbage() {
        assert!(Money::from_decimal_str("-5", sar()).is_err());
        assert!(Money::from_decimal_str("1.234", sar()).is_err());
        assert!(Money::from_decimal_str("abc", sar()).is_err());
        assert!(Money::from_decimal_str(".50", sar()).is_err());
    }

    #[test]
    fn display_includes_currency() {
        let money = Money::new(10_050, sar()).unwrap();
        assert_eq!(money.to_string(), "100.50 SAR");
    }

    #[test]
    fn adding_different_currencies_fails() {
        let a = Money::new(100, sar()).unwrap();
        let b = Money::new(100, usd()).unwrap();

        let err = a.checked_add(&b).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn percentage_rounds_half_up() {
        let base = Money::new(333, sar()).unwrap();
        // 15% of 3.33 = 0.4995 -> 0.50
        assert_eq!(base.percentage(1_500).amount_cents(), 50);
    }

    #[test]
    fn deserialization_validates_amount() {
        let json = r#"{"amount_cents": -5, "currency": "SAR"}"#;
        assert!(serde_json::from_str::<Money>(json).is_err());

        let json = r#"{"amount_cents": 500, "currency": "sar"}"#;
        let money: Money = serde_json::from_str(json).unwrap();
        assert_eq!(money.currency().as_str(), "SAR");
    }

    proptest! {
        #[test]
        fn same_amount_in_different_currencies_is_never_equal(cents in 0i64..1_000_000_000) {
            let a = Money::new(cents, sar()).unwrap();
            let b = Money::new(cents, usd()).unwrap();
            prop_assert_ne!(&a, &b);
            prop_assert!(a.checked_add(&b).is_err());
        }

        #[test]
        fn addition_in_one_currency_is_exact(a in 0i64..1_000_000_000, b in 0i64..1_000_000_000) {
            let sum = Money::new(a, sar()).unwrap()
                .checked_add(&Money::new(b, sar()).unwrap())
                .unwrap();
            prop_assert_eq!(sum.amount_cents(), a + b);
            prop_assert_eq!(sum.currency(), &sar());
        }
    }
}
