// 📈 SIP Calculator - future value of a fixed monthly investment
//
// FV = P · ((1+i)^n − 1) / i           (contribution at end of month)
// FV = P · ((1+i)^n − 1) / i · (1+i)   (contribution at start of month)

use crate::error::{CalcError, CalcResult};
use crate::validation::{require_min, require_range};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MAX_YEARS: u32 = 50;

const CALCULATOR: &str = "SIP";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionTiming {
    #[default]
    EndOfMonth,
    StartOfMonth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SipInput {
    pub monthly_investment: f64,
    /// Expected annual return in percent
    pub annual_return: f64,
    pub years: u32,
    #[serde(default)]
    pub timing: ContributionTiming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipYear {
    pub year: u32,
    pub invested: f64,
    pub future_value: f64,
    pub returns: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipResult {
    pub total_investment: f64,
    pub maturity_amount: f64,
    pub total_returns: f64,
    pub monthly_rate: f64,
    pub months: u32,
    pub yearly_breakdown: Vec<SipYear>,
}

impl SipInput {
    pub fn new(monthly_investment: f64, annual_return: f64, years: u32) -> Self {
        SipInput {
            monthly_investment,
            annual_return,
            years,
            timing: ContributionTiming::EndOfMonth,
        }
    }

    pub fn with_timing(mut self, timing: ContributionTiming) -> Self {
        self.timing = timing;
        self
    }

    fn validate(&self) -> CalcResult<()> {
        require_min(
            "monthly_investment",
            self.monthly_investment,
            1.0,
            "Please enter a valid monthly investment amount greater than 0",
        )?;
        require_range(
            "annual_return",
            self.annual_return,
            0.1,
            100.0,
            "Please enter a valid expected return rate between 0.1% and 100%",
        )?;
        if self.years < 1 || self.years > MAX_YEARS {
            return Err(CalcError::out_of_range(
                "years",
                self.years as f64,
                "Please enter a valid time period between 1 and 50 years",
            ));
        }
        Ok(())
    }
}

/// Unrounded future value after `months` contributions
pub fn future_value(monthly: f64, monthly_rate: f64, months: u32, timing: ContributionTiming) -> f64 {
    let value = monthly * ((1.0 + monthly_rate).powi(months as i32) - 1.0) / monthly_rate;
    match timing {
        ContributionTiming::EndOfMonth => value,
        ContributionTiming::StartOfMonth => value * (1.0 + monthly_rate),
    }
}

pub fn calculate(input: &SipInput) -> CalcResult<SipResult> {
    input.validate().map_err(|e| e.in_calculator(CALCULATOR))?;

    let monthly_rate = input.annual_return / 12.0 / 100.0;
    let months = input.years * 12;

    let total_investment = input.monthly_investment * months as f64;
    let maturity_amount = future_value(input.monthly_investment, monthly_rate, months, input.timing);

    let yearly_breakdown = (1..=input.years)
        .map(|year| {
            let m = year * 12;
            let invested = input.monthly_investment * m as f64;
            let future = future_value(input.monthly_investment, monthly_rate, m, input.timing);
            SipYear {
                year,
                invested: invested.round(),
                future_value: future.round(),
                returns: (future - invested).round(),
            }
        })
        .collect();

    debug!(
        monthly = input.monthly_investment,
        rate = input.annual_return,
        years = input.years,
        maturity_amount,
        "sip calculated"
    );

    Ok(SipResult {
        total_investment: total_investment.round(),
        maturity_amount: maturity_amount.round(),
        total_returns: (maturity_amount - total_investment).round(),
        monthly_rate,
        months,
        yearly_breakdown,
    })
}
