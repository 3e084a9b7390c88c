// 🏠 EMI Calculator - Equated Monthly Installment on an amortizing loan
//
// EMI = P · r · (1+r)^n / ((1+r)^n − 1)
//   P = principal, r = annual rate / 12 / 100, n = tenure in months

use crate::error::{CalcError, CalcResult};
use crate::format::round_to;
use crate::validation::{require_min, require_range};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

pub const MIN_PRINCIPAL: f64 = 1_000.0;
pub const MIN_RATE: f64 = 0.1;
pub const MAX_RATE: f64 = 100.0;
/// 50 years
pub const MAX_TENURE_MONTHS: u32 = 600;

const CALCULATOR: &str = "EMI";

// ============================================================================
// INPUT / OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenureUnit {
    #[default]
    Years,
    Months,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    /// Loan amount in rupees
    pub principal: f64,

    /// Annual interest rate in percent
    pub annual_rate: f64,

    pub tenure: u32,

    #[serde(default)]
    pub tenure_unit: TenureUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiResult {
    /// Monthly installment, whole rupees
    pub emi: f64,
    pub total_amount: f64,
    pub total_interest: f64,
    pub months: u32,
    pub monthly_rate: f64,
    /// Share of the total payment that is principal (percent, one decimal)
    pub principal_share_pct: f64,
    pub interest_share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub closing_balance: f64,
}

// ============================================================================
// CALCULATION
// ============================================================================

impl EmiInput {
    pub fn new(principal: f64, annual_rate: f64, tenure: u32, tenure_unit: TenureUnit) -> Self {
        EmiInput {
            principal,
            annual_rate,
            tenure,
            tenure_unit,
        }
    }

    fn validate(&self) -> CalcResult<()> {
        require_min(
            "principal",
            self.principal,
            MIN_PRINCIPAL,
            "Loan amount should be at least ₹1,000",
        )?;
        require_range(
            "annual_rate",
            self.annual_rate,
            MIN_RATE,
            MAX_RATE,
            "Interest rate should be between 0.1 and 100",
        )?;
        if self.tenure < 1 {
            return Err(CalcError::out_of_range(
                "tenure",
                self.tenure as f64,
                "Loan tenure should be at least 1",
            ));
        }
        Ok(())
    }

    pub fn months(&self) -> CalcResult<u32> {
        let months = match self.tenure_unit {
            TenureUnit::Months => Some(self.tenure),
            TenureUnit::Years => self.tenure.checked_mul(12),
        };
        months
            .filter(|m| *m <= MAX_TENURE_MONTHS)
            .ok_or_else(|| {
                CalcError::out_of_range(
                    "tenure",
                    self.tenure as f64,
                    "Loan tenure should be at most 50 years (600 months)",
                )
            })
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 100.0 / 12.0
    }
}

/// Unrounded installment for `principal` over `months` at `monthly_rate`
pub fn installment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    let growth = (1.0 + monthly_rate).powf(f64::from(months));
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Validated month count and installment
fn checked_installment(input: &EmiInput) -> CalcResult<(u32, f64)> {
    input.validate()?;
    let months = input.months()?;
    let emi = installment(input.principal, input.monthly_rate(), months);
    if !emi.is_finite() || emi <= 0.0 {
        return Err(CalcError::out_of_range(
            "tenure",
            input.tenure as f64,
            "Loan terms do not give a payable installment",
        ));
    }
    Ok((months, emi))
}

pub fn calculate(input: &EmiInput) -> CalcResult<EmiResult> {
    let (months, emi) = checked_installment(input).map_err(|e| e.in_calculator(CALCULATOR))?;
    let monthly_rate = input.monthly_rate();

    let total_amount = emi * months as f64;
    let total_interest = total_amount - input.principal;

    debug!(
        principal = input.principal,
        rate = input.annual_rate,
        months,
        emi,
        "emi calculated"
    );

    Ok(EmiResult {
        emi: emi.round(),
        total_amount: total_amount.round(),
        total_interest: total_interest.round(),
        months,
        monthly_rate,
        principal_share_pct: round_to(input.principal / total_amount * 100.0, 1),
        interest_share_pct: round_to(total_interest / total_amount * 100.0, 1),
    })
}

/// Month-by-month schedule. The final payment absorbs rounding so the loan closes at zero.
pub fn amortization_schedule(input: &EmiInput) -> CalcResult<Vec<AmortizationRow>> {
    let (months, emi) = checked_installment(input).map_err(|e| e.in_calculator(CALCULATOR))?;
    let monthly_rate = input.monthly_rate();

    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = input.principal;

    for month in 1..=months {
        let interest = balance * monthly_rate;
        let (principal_part, payment) = if month == months {
            (balance, balance + interest)
        } else {
            (emi - interest, emi)
        };
        balance = if month == months {
            0.0
        } else {
            (balance - principal_part).max(0.0)
        };

        rows.push(AmortizationRow {
            month,
            payment: round_to(payment, 2),
            principal: round_to(principal_part, 2),
            interest: round_to(interest, 2),
            balance: round_to(balance, 2),
        });
    }

    Ok(rows)
}

/// Aggregate a monthly schedule into loan years
pub fn yearly_summary(rows: &[AmortizationRow]) -> Vec<YearlySummary> {
    let mut years: Vec<YearlySummary> = Vec::new();

    for row in rows {
        let year = (row.month - 1) / 12 + 1;
        match years.last_mut() {
            Some(summary) if summary.year == year => {
                summary.principal_paid += row.principal;
                summary.interest_paid += row.interest;
                summary.closing_balance = row.balance;
            }
            _ => years.push(YearlySummary {
                year,
                principal_paid: row.principal,
                interest_paid: row.interest,
                closing_balance: row.balance,
            }),
        }
    }

    for summary in &mut years {
        summary.principal_paid = round_to(summary.principal_paid, 2);
        summary.interest_paid = round_to(summary.interest_paid, 2);
    }

    years
}

/// Write the schedule as CSV with a header row
pub fn write_schedule_csv<W: Write>(writer: W, rows: &[AmortizationRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for row in rows {
        wtr.serialize(row).context("Failed to write schedule row")?;
    }

    wtr.flush().context("Failed to flush schedule CSV")?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_loan_emi() {
        // ₹10 lakh at 10% for 20 years
        let input = EmiInput::new(1_000_000.0, 10.0, 20, TenureUnit::Years);
        let result = calculate(&input).unwrap();

        assert_eq!(result.emi, 9650.0);
        assert_eq!(result.months, 240);
        assert_eq!(result.total_amount, 2_316_052.0);
        assert_eq!(result.total_interest, 1_316_052.0);
    }

    #[test]
    fn test_tenure_in_months() {
        let input = EmiInput::new(100_000.0, 12.0, 12, TenureUnit::Months);
        let result = calculate(&input).unwrap();

        assert_eq!(result.emi, 8885.0);
        assert_eq!(result.total_interest, 6619.0);
        assert!((result.principal_share_pct + result.interest_share_pct - 100.0).abs() < 0.11);
    }

    #[test]
    fn test_validation_messages() {
        let low = EmiInput::new(999.0, 10.0, 1, TenureUnit::Years);
        assert_eq!(
            calculate(&low).unwrap_err().to_string(),
            "Error calculating EMI: Loan amount should be at least ₹1,000"
        );

        let rate = EmiInput::new(50_000.0, 0.05, 1, TenureUnit::Years);
        assert_eq!(calculate(&rate).unwrap_err().field(), Some("annual_rate"));

        let tenure = EmiInput::new(50_000.0, 9.0, 0, TenureUnit::Months);
        assert_eq!(calculate(&tenure).unwrap_err().field(), Some("tenure"));
    }

    #[test]
    fn test_tenure_cap() {
        let longest = EmiInput::new(100_000.0, 100.0, 50, TenureUnit::Years);
        let result = calculate(&longest).unwrap();
        assert!(result.emi.is_finite());
        assert_eq!(result.months, MAX_TENURE_MONTHS);

        let years = EmiInput::new(100_000.0, 100.0, 100_000, TenureUnit::Years);
        let err = calculate(&years).unwrap_err();
        assert_eq!(err.field(), Some("tenure"));
        assert_eq!(
            err.to_string(),
            "Error calculating EMI: Loan tenure should be at most 50 years (600 months)"
        );

        let months = EmiInput::new(100_000.0, 10.0, 3_000_000_000, TenureUnit::Months);
        assert_eq!(calculate(&months).unwrap_err().field(), Some("tenure"));
        assert!(amortization_schedule(&months).is_err());

        let overflow = EmiInput::new(100_000.0, 10.0, u32::MAX, TenureUnit::Years);
        assert!(calculate(&overflow).is_err());
    }

    #[test]
    fn test_schedule_closes_loan() {
        let input = EmiInput::new(500_000.0, 8.5, 5, TenureUnit::Years);
        let rows = amortization_schedule(&input).unwrap();

        assert_eq!(rows.len(), 60);
        assert_eq!(rows.last().unwrap().balance, 0.0);

        let principal_sum: f64 = rows.iter().map(|r| r.principal).sum();
        assert!((principal_sum - 500_000.0).abs() < 0.5);

        // Interest falls as the balance is paid down
        assert!(rows[0].interest > rows[59].interest);
    }

    #[test]
    fn test_yearly_summary() {
        let input = EmiInput::new(120_000.0, 10.0, 30, TenureUnit::Months);
        let rows = amortization_schedule(&input).unwrap();
        let years = yearly_summary(&rows);

        assert_eq!(years.len(), 3);
        assert_eq!(years[0].year, 1);
        assert_eq!(years[2].closing_balance, 0.0);
        assert!(years[0].closing_balance > years[1].closing_balance);
    }

    #[test]
    fn test_schedule_csv() {
        let input = EmiInput::new(10_000.0, 12.0, 3, TenureUnit::Months);
        let rows = amortization_schedule(&input).unwrap();

        let mut buffer = Vec::new();
        write_schedule_csv(&mut buffer, &rows).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("month,payment,principal,interest,balance"));
        assert_eq!(text.lines().count(), 4);
    }
}
