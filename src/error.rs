// ⚠️ Calculator errors
// Every failure is an input problem the user can fix; there is no fatal class.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Field was left empty
    #[error("Please enter a value for {field}")]
    Missing { field: String },

    /// Field could not be read as a number (or was NaN/infinite)
    #[error("Please enter a valid number for {field}")]
    NotANumber { field: String },

    /// Field parsed but falls outside the allowed range
    #[error("{message}")]
    OutOfRange {
        field: String,
        value: f64,
        message: String,
    },

    /// Combination of inputs that no single range check catches
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    InvalidDate(String),

    /// Tax rules file could not be used
    #[error("Invalid tax rules: {0}")]
    Rules(String),

    /// Wraps an input error with the calculator it came from
    #[error("Error calculating {calculator}: {source}")]
    InCalculator {
        calculator: String,
        #[source]
        source: Box<CalcError>,
    },
}

pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    pub fn out_of_range(field: &str, value: f64, message: impl Into<String>) -> Self {
        CalcError::OutOfRange {
            field: field.to_string(),
            value,
            message: message.into(),
        }
    }

    /// Prefix the error with the calculator name. Already-wrapped errors are left alone.
    pub fn in_calculator(self, calculator: &str) -> Self {
        match self {
            CalcError::InCalculator { .. } => self,
            other => CalcError::InCalculator {
                calculator: calculator.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The input field responsible, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            CalcError::Missing { field }
            | CalcError::NotANumber { field }
            | CalcError::OutOfRange { field, .. } => Some(field),
            CalcError::InCalculator { source, .. } => source.field(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculator_prefix() {
        let err = CalcError::out_of_range("amount", 10.0, "Loan amount should be at least ₹1,000")
            .in_calculator("EMI");

        assert_eq!(
            err.to_string(),
            "Error calculating EMI: Loan amount should be at least ₹1,000"
        );
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn test_prefix_applied_once() {
        let err = CalcError::Invalid("bad".to_string())
            .in_calculator("GST")
            .in_calculator("Other");

        assert_eq!(err.to_string(), "Error calculating GST: bad");
    }
}
