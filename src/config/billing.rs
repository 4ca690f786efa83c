//! Billing configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::Currency;

/// Currency and tax defaults for plans, payments and invoices.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// ISO currency used when a request names none
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Tax applied to invoices without an explicit tax amount, in basis
    /// points (1500 = 15%)
    #[serde(default = "default_tax_rate")]
    pub tax_rate_basis_points: u32,
}

impl BillingConfig {
    pub fn currency(&self) -> Result<Currency, ValidationError> {
        Currency::new(&self.default_currency)
            .map_err(|_| ValidationError::InvalidCurrency(self.default_currency.clone()))
    }

    /// Validate billing configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.currency()?;
        if self.tax_rate_basis_points > 10_000 {
            return Err(ValidationError::InvalidTaxRate);
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            tax_rate_basis_points: default_tax_rate(),
        }
    }
}

fn default_currency() -> String {
    "SAR".to_string()
}

fn default_tax_rate() -> u32 {
    1_500
}
