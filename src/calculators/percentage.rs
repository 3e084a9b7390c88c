// 💯 Percentage Calculator - percent of a value, percent change, ratio as percent

use crate::error::{CalcError, CalcResult};
use crate::format::round_to;
use crate::validation::require_min;
use serde::{Deserialize, Serialize};
use tracing::debug;

const CALCULATOR: &str = "Percentage";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentOfInput {
    pub percent: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentOfResult {
    pub result: f64,
    /// The percentage as a fraction, four decimals
    pub decimal: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentChangeInput {
    pub old_value: f64,
    pub new_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentChangeResult {
    pub absolute_change: f64,
    /// Signed, two decimals
    pub percentage_change: f64,
    pub is_increase: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioInput {
    pub numerator: f64,
    pub denominator: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioResult {
    pub decimal: f64,
    pub percentage: f64,
}

fn non_negative(field: &str, value: f64) -> CalcResult<f64> {
    require_min(field, value, 0.0, "Please enter valid positive numbers")
}

/// X% of Y
pub fn value_of(input: &PercentOfInput) -> CalcResult<PercentOfResult> {
    let checked = non_negative("percent", input.percent).and_then(|_| non_negative("value", input.value));
    checked.map_err(|e| e.in_calculator(CALCULATOR))?;

    let result = input.percent / 100.0 * input.value;
    debug!(percent = input.percent, value = input.value, result, "percent of value");

    Ok(PercentOfResult {
        result: round_to(result, 2),
        decimal: round_to(input.percent / 100.0, 4),
    })
}

/// Percentage increase or decrease from old to new
pub fn change(input: &PercentChangeInput) -> CalcResult<PercentChangeResult> {
    let checked = non_negative("old_value", input.old_value)
        .and_then(|_| non_negative("new_value", input.new_value))
        .and_then(|_| {
            if input.old_value == 0.0 {
                Err(CalcError::Invalid(
                    "Original value must not be zero".to_string(),
                ))
            } else {
                Ok(())
            }
        });
    checked.map_err(|e| e.in_calculator(CALCULATOR))?;

    let absolute_change = input.new_value - input.old_value;
    let percentage_change = absolute_change / input.old_value * 100.0;
    debug!(old = input.old_value, new = input.new_value, percentage_change, "percent change");

    Ok(PercentChangeResult {
        absolute_change: round_to(absolute_change, 2),
        percentage_change: round_to(percentage_change, 2),
        is_increase: absolute_change >= 0.0,
    })
}

/// X is what percent of Y
pub fn ratio(input: &RatioInput) -> CalcResult<RatioResult> {
    let checked = non_negative("numerator", input.numerator)
        .and_then(|_| non_negative("denominator", input.denominator))
        .and_then(|_| {
            if input.denominator == 0.0 {
                Err(CalcError::Invalid("Total value must not be zero".to_string()))
            } else {
                Ok(())
            }
        });
    checked.map_err(|e| e.in_calculator(CALCULATOR))?;

    let decimal = input.numerator / input.denominator;
    debug!(numerator = input.numerator, denominator = input.denominator, decimal, "ratio");

    Ok(RatioResult {
        decimal: round_to(decimal, 4),
        percentage: round_to(decimal * 100.0, 2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_of() {
        let result = value_of(&PercentOfInput { percent: 15.0, value: 200.0 }).unwrap();
        assert_eq!(result.result, 30.0);
        assert_eq!(result.decimal, 0.15);
    }

    #[test]
    fn test_change() {
        let up = change(&PercentChangeInput { old_value: 80.0, new_value: 100.0 }).unwrap();
        assert_eq!(up.percentage_change, 25.0);
        assert_eq!(up.absolute_change, 20.0);
        assert!(up.is_increase);

        let down = change(&PercentChangeInput { old_value: 200.0, new_value: 150.0 }).unwrap();
        assert_eq!(down.percentage_change, -25.0);
        assert!(!down.is_increase);
    }

    #[test]
    fn test_ratio() {
        let result = ratio(&RatioInput { numerator: 1.0, denominator: 3.0 }).unwrap();
        assert_eq!(result.decimal, 0.3333);
        assert_eq!(result.percentage, 33.33);
    }

    #[test]
    fn test_zero_base_rejected() {
        let err = change(&PercentChangeInput { old_value: 0.0, new_value: 5.0 }).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error calculating Percentage: Original value must not be zero"
        );
        assert!(ratio(&RatioInput { numerator: 5.0, denominator: 0.0 }).is_err());
        assert!(value_of(&PercentOfInput { percent: -5.0, value: 10.0 }).is_err());
    }
}
