//! Engine Configuration
//!
//! Rates and vendor policies, read from the environment.

use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::aggregate::VendorPolicy;
use crate::error::{EngineError, Result};
use crate::request::PlanRequest;
use crate::schedule::Rates;

pub const DEFAULT_FEE_PERCENT: Decimal = dec!(0.07);
pub const DEFAULT_TAX_PERCENT: Decimal = dec!(0.0825);
pub const DEFAULT_SINGLE_PAYMENT_FEE_PERCENT: Decimal = dec!(0.03);
pub const DEFAULT_PLANS: &str = "1:3;4-4";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Default fee and tax rates
    pub rates: Rates,

    /// Vendors whose event dates are written without a year
    pub yearless_vendors: HashSet<String>,

    /// Plan requests used when a checkout supplies none
    pub default_plans: Vec<PlanRequest>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rates: Rates {
                fee_percent: DEFAULT_FEE_PERCENT,
                tax_percent: DEFAULT_TAX_PERCENT,
                single_payment_fee_percent: DEFAULT_SINGLE_PAYMENT_FEE_PERCENT,
            },
            yearless_vendors: HashSet::new(),
            default_plans: vec![
                PlanRequest::CycleRange { low: 1, high: 3 },
                PlanRequest::IntervalRange { low: 4, high: 4 },
            ],
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("INSTALLMENT_FEE_PERCENT") {
            config.rates.fee_percent = parse_percent("INSTALLMENT_FEE_PERCENT", &v)?;
        }
        if let Some(v) = lookup("INSTALLMENT_TAX_PERCENT") {
            config.rates.tax_percent = parse_percent("INSTALLMENT_TAX_PERCENT", &v)?;
        }
        if let Some(v) = lookup("INSTALLMENT_SINGLE_PAYMENT_FEE_PERCENT") {
            config.rates.single_payment_fee_percent =
                parse_percent("INSTALLMENT_SINGLE_PAYMENT_FEE_PERCENT", &v)?;
        }
        if let Some(v) = lookup("INSTALLMENT_YEARLESS_VENDORS") {
            config.yearless_vendors = v
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("INSTALLMENT_DEFAULT_PLANS") {
            config.default_plans = PlanRequest::parse_list(&v)
                .map_err(|e| EngineError::Config(format!("INSTALLMENT_DEFAULT_PLANS: {}", e)))?;
        }

        Ok(config)
    }

    /// Date policy for a vendor id (case-insensitive)
    pub fn policy_for(&self, vendor: &str) -> VendorPolicy {
        if self.yearless_vendors.contains(&vendor.trim().to_lowercase()) {
            VendorPolicy::YearlessRelative
        } else {
            VendorPolicy::Literal
        }
    }
}

fn parse_percent(key: &str, value: &str) -> Result<Decimal> {
    let percent: Decimal = value
        .trim()
        .parse()
        .map_err(|_| EngineError::Config(format!("{} is not a decimal: {:?}", key, value)))?;
    if percent < Decimal::ZERO || percent > Decimal::ONE {
        return Err(EngineError::Config(format!("{} must be between 0 and 1", key)));
    }
    Ok(percent)
}
