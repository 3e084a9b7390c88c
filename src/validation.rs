// ✅ Input validation
// Range checks shared by every calculator, plus parsing of user-typed amounts.

use crate::error::{CalcError, CalcResult};

/// Reject NaN/infinite values and anything outside `[min, max]`.
///
/// `message` is shown to the user verbatim when the range check fails.
pub fn require_range(field: &str, value: f64, min: f64, max: f64, message: &str) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::NotANumber {
            field: field.to_string(),
        });
    }

    if value < min || value > max {
        return Err(CalcError::out_of_range(field, value, message));
    }

    Ok(value)
}

/// Same as [`require_range`] with no upper bound.
pub fn require_min(field: &str, value: f64, min: f64, message: &str) -> CalcResult<f64> {
    require_range(field, value, min, f64::MAX, message)
}

/// Parse an amount the way a user types it: "1,00,000", "₹ 2,500.50", " 42 ".
pub fn parse_amount(field: &str, text: &str) -> CalcResult<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(CalcError::Missing {
            field: field.to_string(),
        });
    }

    let value: f64 = cleaned.parse().map_err(|_| CalcError::NotANumber {
        field: field.to_string(),
    })?;

    if !value.is_finite() {
        return Err(CalcError::NotANumber {
            field: field.to_string(),
        });
    }

    Ok(value)
}
