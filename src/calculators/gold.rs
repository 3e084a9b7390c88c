// 🪙 Gold Calculator - value of jewellery by weight, rate and purity

use crate::error::CalcResult;
use crate::format::round_to;
use crate::validation::{require_min, require_range};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CALCULATOR: &str = "Gold";

fn default_karats() -> f64 {
    24.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldInput {
    pub weight_grams: f64,
    /// Market rate for 24K gold, per gram
    pub rate_per_gram: f64,
    #[serde(default = "default_karats")]
    pub karats: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldResult {
    /// Value at the quoted rate ignoring purity
    pub base_value: f64,
    pub actual_value: f64,
    pub purity_percentage: f64,
    pub pure_gold_weight: f64,
}

impl GoldInput {
    pub fn new(weight_grams: f64, rate_per_gram: f64, karats: f64) -> Self {
        GoldInput {
            weight_grams,
            rate_per_gram,
            karats,
        }
    }

    fn validate(&self) -> CalcResult<()> {
        require_min(
            "weight_grams",
            self.weight_grams,
            0.01,
            "Please enter a valid weight (minimum 0.01 grams)",
        )?;
        require_min(
            "rate_per_gram",
            self.rate_per_gram,
            1.0,
            "Please enter a valid gold rate per gram",
        )?;
        require_range(
            "karats",
            self.karats,
            1.0,
            24.0,
            "Purity should be between 1 and 24 karats",
        )?;
        Ok(())
    }
}

pub fn calculate(input: &GoldInput) -> CalcResult<GoldResult> {
    input.validate().map_err(|e| e.in_calculator(CALCULATOR))?;

    let purity = input.karats / 24.0;
    let base_value = input.weight_grams * input.rate_per_gram;
    let actual_value = base_value * purity;

    debug!(weight = input.weight_grams, karats = input.karats, actual_value, "gold valued");

    Ok(GoldResult {
        base_value: base_value.round(),
        actual_value: actual_value.round(),
        purity_percentage: round_to(purity * 100.0, 2),
        pure_gold_weight: round_to(input.weight_grams * purity, 3),
    })
}
