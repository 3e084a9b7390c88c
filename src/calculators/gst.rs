// 🧾 GST Calculator - add tax to a net price, or pull it out of a gross price

use crate::error::CalcResult;
use crate::validation::{require_min, require_range};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CALCULATOR: &str = "GST";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstMode {
    /// Amount is net of tax; GST is added on top
    #[default]
    Exclusive,
    /// Amount already includes GST
    Inclusive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GstInput {
    pub amount: f64,
    /// GST rate in percent (0, 5, 12, 18, 28 are the usual slabs)
    pub rate: f64,
    #[serde(default)]
    pub mode: GstMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GstResult {
    pub base_amount: f64,
    pub gst_amount: f64,
    pub total_amount: f64,
    /// Central and state halves of the tax for intra-state supplies
    pub cgst: f64,
    pub sgst: f64,
}

impl GstInput {
    pub fn new(amount: f64, rate: f64, mode: GstMode) -> Self {
        GstInput { amount, rate, mode }
    }
}

pub fn calculate(input: &GstInput) -> CalcResult<GstResult> {
    let checked = require_min("amount", input.amount, 0.0, "Please enter a valid amount").and_then(|_| {
        require_range(
            "rate",
            input.rate,
            0.0,
            100.0,
            "GST rate should be between 0 and 100",
        )
    });
    checked.map_err(|e| e.in_calculator(CALCULATOR))?;

    let (base_amount, gst_amount, total_amount) = match input.mode {
        GstMode::Exclusive => {
            let gst = input.amount * input.rate / 100.0;
            (input.amount, gst, input.amount + gst)
        }
        GstMode::Inclusive => {
            let gst = input.amount - input.amount * 100.0 / (100.0 + input.rate);
            (input.amount - gst, gst, input.amount)
        }
    };

    debug!(amount = input.amount, rate = input.rate, mode = ?input.mode, gst_amount, "gst calculated");

    Ok(GstResult {
        base_amount,
        gst_amount,
        total_amount,
        cgst: gst_amount / 2.0,
        sgst: gst_amount / 2.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive() {
        let result = calculate(&GstInput::new(1000.0, 18.0, GstMode::Exclusive)).unwrap();

        assert_eq!(result.base_amount, 1000.0);
        assert_eq!(result.gst_amount, 180.0);
        assert_eq!(result.total_amount, 1180.0);
        assert_eq!(result.cgst, 90.0);
    }

    #[test]
    fn test_inclusive() {
        let result = calculate(&GstInput::new(1180.0, 18.0, GstMode::Inclusive)).unwrap();

        assert!((result.base_amount - 1000.0).abs() < 1e-9);
        assert!((result.gst_amount - 180.0).abs() < 1e-9);
        assert_eq!(result.total_amount, 1180.0);
    }

    #[test]
    fn test_zero_rate() {
        let result = calculate(&GstInput::new(500.0, 0.0, GstMode::Inclusive)).unwrap();
        assert_eq!(result.gst_amount, 0.0);
        assert_eq!(result.base_amount, 500.0);
    }

    #[test]
    fn test_rejects_bad_rate() {
        let err = calculate(&GstInput::new(500.0, 101.0, GstMode::Exclusive)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error calculating GST: GST rate should be between 0 and 100"
        );

        let err = calculate(&GstInput::new(-1.0, 18.0, GstMode::Exclusive)).unwrap_err();
        assert_eq!(err.field(), Some("amount"));
    }
}
