// ⚖️ BMI Calculator - Body Mass Index plus a healthy weight range

use crate::error::CalcResult;
use crate::format::round_to;
use crate::validation::require_min;
use serde::{Deserialize, Serialize};
use tracing::debug;

const CALCULATOR: &str = "BMI";

const CM_PER_INCH: f64 = 2.54;
const LB_PER_KG: f64 = 2.204_62;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// Weight in kg, height in cm
    #[default]
    Metric,
    /// Weight in lb, height in inches
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// WHO adult cut-offs: 18.5, 25, 30
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiInput {
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub unit: UnitSystem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// One decimal place
    pub bmi: f64,
    pub category: BmiCategory,
    pub category_label: String,
    pub ideal_weight: WeightRange,
}

impl BmiInput {
    pub fn metric(weight_kg: f64, height_cm: f64) -> Self {
        BmiInput {
            weight: weight_kg,
            height: height_cm,
            unit: UnitSystem::Metric,
        }
    }

    pub fn imperial(weight_lb: f64, feet: u32, inches: u32) -> Self {
        BmiInput {
            weight: weight_lb,
            height: f64::from(feet) * 12.0 + f64::from(inches),
            unit: UnitSystem::Imperial,
        }
    }
}

pub fn calculate(input: &BmiInput) -> CalcResult<BmiResult> {
    let checked = require_min("weight", input.weight, 1.0, "Please enter a valid weight greater than 0")
        .and_then(|_| {
            require_min("height", input.height, 1.0, "Please enter a valid height greater than 0")
        });
    checked.map_err(|e| e.in_calculator(CALCULATOR))?;

    let raw = match input.unit {
        UnitSystem::Metric => {
            let metres = input.height / 100.0;
            input.weight / (metres * metres)
        }
        UnitSystem::Imperial => input.weight * 703.0 / (input.height * input.height),
    };

    // Classify the displayed value so label and number always agree
    let bmi = round_to(raw, 1);
    let category = BmiCategory::from_bmi(bmi);

    debug!(bmi, category = category.label(), "bmi calculated");

    Ok(BmiResult {
        bmi,
        category,
        category_label: category.label().to_string(),
        ideal_weight: ideal_weight(input.height, input.unit),
    })
}

/// Hamwi formula: 45.5 kg (+2.2 kg/inch) to 48 kg (+2.7 kg/inch) above five feet
pub fn ideal_weight(height: f64, unit: UnitSystem) -> WeightRange {
    let inches = match unit {
        UnitSystem::Metric => height / CM_PER_INCH,
        UnitSystem::Imperial => height,
    };

    let (min_kg, max_kg) = if inches > 60.0 {
        let over = inches - 60.0;
        (45.5 + 2.2 * over, 48.0 + 2.7 * over)
    } else {
        (45.0, 55.0)
    };

    match unit {
        UnitSystem::Metric => WeightRange {
            min: min_kg.round(),
            max: max_kg.round(),
            unit: "kg".to_string(),
        },
        UnitSystem::Imperial if inches > 60.0 => WeightRange {
            min: (min_kg * LB_PER_KG).round(),
            max: (max_kg * LB_PER_KG).round(),
            unit: "lbs".to_string(),
        },
        UnitSystem::Imperial => WeightRange {
            min: 100.0,
            max: 120.0,
            unit: "lbs".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_bmi() {
        let result = calculate(&BmiInput::metric(70.0, 175.0)).unwrap();

        assert_eq!(result.bmi, 22.9);
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.category_label, "Normal Weight");
        assert_eq!(result.ideal_weight.min, 65.0);
        assert_eq!(result.ideal_weight.max, 72.0);
        assert_eq!(result.ideal_weight.unit, "kg");
    }

    #[test]
    fn test_imperial_bmi() {
        let result = calculate(&BmiInput::imperial(154.0, 5, 9)).unwrap();

        assert_eq!(result.bmi, 22.7);
        assert_eq!(result.category, BmiCategory::Normal);
        assert_eq!(result.ideal_weight.min, 144.0);
        assert_eq!(result.ideal_weight.max, 159.0);
        assert_eq!(result.ideal_weight.unit, "lbs");
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(24.9), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(29.9), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_short_height_fallback() {
        let range = ideal_weight(150.0, UnitSystem::Metric);
        assert_eq!((range.min, range.max), (45.0, 55.0));

        let range = ideal_weight(58.0, UnitSystem::Imperial);
        assert_eq!((range.min, range.max), (100.0, 120.0));
    }

    #[test]
    fn test_large_imperial_height() {
        let input = BmiInput::imperial(150.0, 400_000_000, 11);
        assert_eq!(input.height, 4_800_000_011.0);

        let result = calculate(&input).unwrap();
        assert_eq!(result.bmi, 0.0);
        assert_eq!(result.category, BmiCategory::Underweight);
    }

    #[test]
    fn test_rejects_zero_weight() {
        let err = calculate(&BmiInput::metric(0.0, 170.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error calculating BMI: Please enter a valid weight greater than 0"
        );
    }
}
