// 📋 Result reports - the figures a user reads, formatted and spelled out
//
// Every calculator result turns into a titled list of label/value lines.
// Money lines also carry the amount in words, the way a cheque is written.

use crate::calculators::{BmiResult, TaxResult};
use crate::format::{format_currency, format_number, format_percent, format_rupees};
use crate::request::CalculationResult;
use crate::words::{number_to_words, rupees_in_words, WordStyle};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub lines: Vec<ReportLine>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Report {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn line(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push(ReportLine {
            label: label.to_string(),
            value: value.into(),
            words: None,
        });
        self
    }

    /// Whole-rupee amount with its words
    pub fn rupees(mut self, label: &str, amount: f64) -> Self {
        self.lines.push(ReportLine {
            label: label.to_string(),
            value: format_rupees(amount),
            words: Some(rupees_in_words(amount.round())),
        });
        self
    }

    /// Amount with paise, with its words
    pub fn currency(mut self, label: &str, amount: f64) -> Self {
        self.lines.push(ReportLine {
            label: label.to_string(),
            value: format_currency(amount),
            words: Some(rupees_in_words(amount)),
        });
        self
    }

    pub fn spelled(mut self, label: &str, value: String, amount: f64, style: WordStyle) -> Self {
        self.lines.push(ReportLine {
            label: label.to_string(),
            value,
            words: Some(number_to_words(amount, &style)),
        });
        self
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "━".repeat(self.title.chars().count().max(24)))?;

        let width = self
            .lines
            .iter()
            .map(|line| line.label.chars().count())
            .max()
            .unwrap_or(0);

        for line in &self.lines {
            writeln!(f, "  {:<width$}  {}", line.label, line.value, width = width)?;
            if let Some(words) = &line.words {
                writeln!(f, "  {:<width$}  ({})", "", words, width = width)?;
            }
        }
        Ok(())
    }
}

impl From<&CalculationResult> for Report {
    fn from(result: &CalculationResult) -> Self {
        match result {
            CalculationResult::Emi(r) => Report::new("🏠 EMI")
                .rupees("Monthly EMI", r.emi)
                .rupees("Total Interest", r.total_interest)
                .rupees("Total Amount", r.total_amount)
                .line("Tenure", format!("{} months", r.months))
                .line("Principal Share", format_percent(r.principal_share_pct, 1))
                .line("Interest Share", format_percent(r.interest_share_pct, 1)),

            CalculationResult::Gst(r) => Report::new("🧾 GST")
                .currency("Base Amount", r.base_amount)
                .currency("GST Amount", r.gst_amount)
                .line("CGST", format_currency(r.cgst))
                .line("SGST", format_currency(r.sgst))
                .currency("Total Amount", r.total_amount),

            CalculationResult::Sip(r) => Report::new("📈 SIP")
                .rupees("Total Investment", r.total_investment)
                .rupees("Expected Returns", r.total_returns)
                .rupees("Maturity Value", r.maturity_amount)
                .spelled(
                    "Period",
                    format!("{} months", r.months),
                    r.months as f64,
                    WordStyle::Months,
                ),

            CalculationResult::Tax(r) => tax_report("💼 Income Tax", r),

            CalculationResult::TaxCompare(cmp) => Report::new("💼 Tax Regime Comparison")
                .rupees("New Regime Tax", cmp.new_regime.total_tax)
                .rupees("Old Regime Tax", cmp.old_regime.total_tax)
                .line("Better Option", cmp.better.as_str())
                .rupees("You Save", cmp.savings),

            CalculationResult::Bmi(r) => bmi_report(r),

            CalculationResult::Age(r) => Report::new(format!("🎂 Age {}", r.zodiac.symbol))
                .spelled(
                    "Age",
                    format!("{} years, {} months, {} days", r.years, r.months, r.days),
                    r.years as f64,
                    WordStyle::Years,
                )
                .line("Total Months", format_number(r.total_months as f64, 0))
                .line("Total Days", format_number(r.total_days as f64, 0))
                .line("Total Hours", format_number(r.total_hours as f64, 0))
                .line("Total Minutes", format_number(r.total_minutes as f64, 0))
                .line("Next Birthday", r.next_birthday.format("%d %b %Y").to_string())
                .spelled(
                    "Days Until Birthday",
                    r.days_until_birthday.to_string(),
                    r.days_until_birthday as f64,
                    WordStyle::Days,
                )
                .line("Zodiac Sign", format!("{} {}", r.zodiac.symbol, r.zodiac.name)),

            CalculationResult::Gold(r) => Report::new("🪙 Gold")
                .rupees("Base Value", r.base_value)
                .rupees("Actual Value", r.actual_value)
                .line("Purity", format_percent(r.purity_percentage, 2))
                .line("Pure Gold", format!("{} g", format_number(r.pure_gold_weight, 3))),

            CalculationResult::Fuel(r) => Report::new("⛽ Fuel Cost")
                .spelled(
                    "Fuel Needed",
                    format!("{} L", format_number(r.fuel_needed_litres, 2)),
                    r.fuel_needed_litres,
                    WordStyle::Unit("Litres".to_string()),
                )
                .rupees("Trip Cost", r.total_cost)
                .line("Cost per km", format_currency(r.cost_per_km))
                .rupees("Round Trip", r.round_trip_cost)
                .rupees("Monthly (40 trips)", r.monthly_cost)
                .line("CO₂ Emitted", format!("{} kg", format_number(r.co2_kg, 1))),

            CalculationResult::PercentageOf(r) => Report::new("💯 Percentage")
                .spelled(
                    "Result",
                    format_number(r.result, 2),
                    r.result,
                    WordStyle::Decimal,
                )
                .line("As Decimal", r.decimal.to_string()),

            CalculationResult::PercentageChange(r) => {
                let direction = if r.is_increase { "Increase" } else { "Decrease" };
                Report::new("💯 Percentage Change")
                    .spelled(
                        direction,
                        format_percent(r.percentage_change.abs(), 2),
                        r.percentage_change.abs(),
                        WordStyle::Percentage,
                    )
                    .line("Absolute Change", format_number(r.absolute_change, 2))
            }

            CalculationResult::PercentageRatio(r) => Report::new("💯 Ratio")
                .spelled(
                    "Percentage",
                    format_percent(r.percentage, 2),
                    r.percentage,
                    WordStyle::Percentage,
                )
                .line("As Decimal", r.decimal.to_string()),

            CalculationResult::Discount(r) => Report::new("🏷️ Discount")
                .currency("Original Price", r.original_price)
                .currency("You Save", r.discount_amount)
                .line("Savings", format_percent(r.savings_percentage, 2))
                .line("After Discount", format_currency(r.price_after_discount))
                .line("GST", format_currency(r.gst_amount))
                .currency("Final Price", r.final_price),

            CalculationResult::DiscountCart(r) => Report::new("🛒 Cart")
                .line("Items", r.items_counted.to_string())
                .currency("Original Total", r.total_original)
                .currency("Total Discount", r.total_discount)
                .line("Overall Discount", format_percent(r.discount_percentage, 1))
                .line("GST", format_currency(r.gst_amount))
                .currency("Final Total", r.final_total),
        }
    }
}

fn tax_report(title: &str, r: &TaxResult) -> Report {
    Report::new(title)
        .line("Regime", format!("{} ({})", r.regime.as_str(), r.financial_year))
        .rupees("Taxable Income", r.taxable_income)
        .line("Deductions", format_rupees(r.deductions_applied))
        .line("Tax on Slabs", format_rupees(r.base_tax))
        .line("Rebate (87A)", format_rupees(r.rebate))
        .line("Surcharge", format_rupees(r.surcharge))
        .line("Cess", format_rupees(r.cess))
        .rupees("Total Tax", r.total_tax)
        .line("Monthly Tax", format_rupees(r.monthly_tax))
        .line("Effective Rate", format_percent(r.effective_rate, 2))
}

fn bmi_report(r: &BmiResult) -> Report {
    Report::new("⚖️ BMI")
        .line("BMI", format_number(r.bmi, 1))
        .line("Category", r.category_label.clone())
        .line(
            "Healthy Weight",
            format!(
                "{}-{} {}",
                format_number(r.ideal_weight.min, 0),
                format_number(r.ideal_weight.max, 0),
                r.ideal_weight.unit
            ),
        )
}
