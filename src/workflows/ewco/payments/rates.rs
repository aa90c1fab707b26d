use serde::{Deserialize, Serialize};

/// Published EWCO rate card. All amounts are GBP per hectare unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRates {
    pub standard_capital_per_ha: f64,
    pub maintenance_per_ha_per_year: f64,
    pub maintenance_years: u32,
    pub low_sensitivity_per_ha: f64,
    /// Ceiling for additional contributions, scaled down by the per-category multiplier.
    pub additional_base_per_ha: f64,
    pub nature_recovery_per_ha: f64,
}

impl Default for PaymentRates {
    fn default() -> Self {
        Self {
            standard_capital_per_ha: 10_200.0,
            maintenance_per_ha_per_year: 400.0,
            maintenance_years: 15,
            low_sensitivity_per_ha: 1_100.0,
            additional_base_per_ha: 12_700.0,
            nature_recovery_per_ha: 3_300.0,
        }
    }
}
