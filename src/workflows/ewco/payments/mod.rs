//! Grant payment calculation for woodland-creation applications.
//!
//! The engine is a pure function over the rate card: the same inputs always
//! produce the same five-part breakdown, and `total` is defined as the sum of
//! the components so itemized statements always reconcile.

mod rates;

pub use rates::PaymentRates;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared additional environmental benefit for a proposed woodland.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenefitCategory {
    None,
    Carbon,
    Biodiversity,
    Water,
    Flood,
    Access,
    Multiple,
}

impl BenefitCategory {
    pub const fn label(self) -> &'static str {
        match self {
            BenefitCategory::None => "none",
            BenefitCategory::Carbon => "carbon",
            BenefitCategory::Biodiversity => "biodiversity",
            BenefitCategory::Water => "water",
            BenefitCategory::Flood => "flood",
            BenefitCategory::Access => "access",
            BenefitCategory::Multiple => "multiple",
        }
    }

    /// Share of the additional-contribution ceiling paid for this category.
    pub const fn multiplier(self) -> f64 {
        match self {
            BenefitCategory::None => 0.0,
            BenefitCategory::Carbon => 0.3,
            BenefitCategory::Biodiversity => 0.4,
            BenefitCategory::Water => 0.25,
            BenefitCategory::Flood => 0.35,
            BenefitCategory::Access => 0.2,
            BenefitCategory::Multiple => 0.5,
        }
    }

    pub const fn qualifies_for_nature_recovery(self) -> bool {
        matches!(self, BenefitCategory::Biodiversity | BenefitCategory::Multiple)
    }
}

impl Default for BenefitCategory {
    fn default() -> Self {
        BenefitCategory::None
    }
}

impl fmt::Display for BenefitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BenefitCategory {
    type Err = InvalidInputError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(BenefitCategory::None),
            "carbon" => Ok(BenefitCategory::Carbon),
            "biodiversity" => Ok(BenefitCategory::Biodiversity),
            "water" => Ok(BenefitCategory::Water),
            "flood" => Ok(BenefitCategory::Flood),
            "access" => Ok(BenefitCategory::Access),
            "multiple" => Ok(BenefitCategory::Multiple),
            other => Err(InvalidInputError::UnknownBenefitCategory(other.to_string())),
        }
    }
}

/// Inputs required for a payment calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInput {
    pub area_hectares: f64,
    pub low_sensitivity: bool,
    pub benefit: BenefitCategory,
}

/// Itemized grant payment statement, GBP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub standard_capital: f64,
    pub annual_maintenance: f64,
    pub low_sensitivity_payment: f64,
    pub additional_contributions: f64,
    pub nature_recovery_premium: f64,
    pub total: f64,
}

/// Malformed or out-of-range input rejected before any calculation runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("land area must be greater than zero hectares (got {0})")]
    NonPositiveArea(f64),
    #[error("land area must be a finite number")]
    NonFiniteArea,
    #[error("unknown benefit category '{0}'")]
    UnknownBenefitCategory(String),
}

/// Stateless calculator applying the rate card to one application's inputs.
#[derive(Debug, Clone, Default)]
pub struct PaymentEngine {
    rates: PaymentRates,
}

impl PaymentEngine {
    pub fn new(rates: PaymentRates) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &PaymentRates {
        &self.rates
    }

    pub fn calculate(&self, input: &PaymentInput) -> Result<PaymentBreakdown, InvalidInputError> {
        let area = input.area_hectares;
        if !area.is_finite() {
            return Err(InvalidInputError::NonFiniteArea);
        }
        if area <= 0.0 {
            return Err(InvalidInputError::NonPositiveArea(area));
        }

        let rates = &self.rates;
        let standard_capital = area * rates.standard_capital_per_ha;
        let annual_maintenance =
            area * rates.maintenance_per_ha_per_year * f64::from(rates.maintenance_years);
        let low_sensitivity_payment = if input.low_sensitivity {
            area * rates.low_sensitivity_per_ha
        } else {
            0.0
        };
        let additional_contributions =
            area * rates.additional_base_per_ha * input.benefit.multiplier();
        let nature_recovery_premium = if input.benefit.qualifies_for_nature_recovery() {
            area * rates.nature_recovery_per_ha
        } else {
            0.0
        };

        let total = standard_capital
            + annual_maintenance
            + low_sensitivity_payment
            + additional_contributions
            + nature_recovery_premium;

        Ok(PaymentBreakdown {
            standard_capital,
            annual_maintenance,
            low_sensitivity_payment,
            additional_contributions,
            nature_recovery_premium,
            total,
        })
    }
}
