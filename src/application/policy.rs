//! Billing defaults applied by payment and invoice handlers.

use crate::domain::foundation::{Currency, Money};

/// Default VAT rate in basis points (15%).
pub const DEFAULT_TAX_RATE_BASIS_POINTS: u32 = 1_500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingPolicy {
    /// Used when a payment or invoice request names no currency.
    pub default_currency: Currency,
    /// Applied to the base amount when an invoice request omits the tax.
    pub tax_rate_basis_points: u32,
}

impl BillingPolicy {
    pub fn new(default_currency: Currency, tax_rate_basis_points: u32) -> Self {
        Self {
            default_currency,
            tax_rate_basis_points,
        }
    }

    pub fn tax_for(&self, base: &Money) -> Money {
        base.percentage(self.tax_rate_basis_points)
    }
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self::new(Currency::default_currency(), DEFAULT_TAX_RATE_BASIS_POINTS)
    }
}
