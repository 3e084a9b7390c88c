// 🧮 Income Tax Calculator - Indian slab-based progressive tax
//
// Rules as data: slabs, rebates, surcharge bands and deduction caps live in
// `TaxRules` so a new financial year is a JSON file, not a code change.
//
// total = (slab tax − rebate) + surcharge + cess

use crate::error::{CalcError, CalcResult};
use crate::format::round_to;
use crate::validation::require_min;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const CALCULATOR: &str = "income tax";

// ============================================================================
// RULES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slab {
    /// Upper bound of the slab; `None` means no upper limit
    pub up_to: Option<f64>,

    /// Rate as a fraction (0.05 = 5%)
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeRules {
    pub slabs: Vec<Slab>,

    /// Rebate applies when taxable income is at or below this
    pub rebate_threshold: f64,
    pub rebate_amount: f64,

    pub salaried_standard_deduction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeBand {
    /// Surcharge applies when gross income is strictly above this
    pub threshold: f64,
    pub rate: f64,
}

/// Old-regime deduction limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionCaps {
    pub section_80c: f64,
    pub section_80d: f64,
    pub housing_loan_interest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRules {
    pub financial_year: String,
    pub new_regime: RegimeRules,
    pub old_regime: RegimeRules,
    pub surcharge: Vec<SurchargeBand>,
    pub cess_rate: f64,
    pub old_regime_caps: DeductionCaps,
}

impl TaxRules {
    /// Rules for FY 2025-26
    pub fn fy_2025_26() -> Self {
        TaxRules {
            financial_year: "FY 2025-26".to_string(),
            new_regime: RegimeRules {
                slabs: vec![
                    Slab { up_to: Some(400_000.0), rate: 0.0 },
                    Slab { up_to: Some(800_000.0), rate: 0.05 },
                    Slab { up_to: Some(1_200_000.0), rate: 0.10 },
                    Slab { up_to: Some(1_600_000.0), rate: 0.15 },
                    Slab { up_to: Some(2_000_000.0), rate: 0.20 },
                    Slab { up_to: Some(2_400_000.0), rate: 0.25 },
                    Slab { up_to: None, rate: 0.30 },
                ],
                rebate_threshold: 1_200_000.0,
                rebate_amount: 60_000.0,
                salaried_standard_deduction: 75_000.0,
            },
            old_regime: RegimeRules {
                slabs: vec![
                    Slab { up_to: Some(250_000.0), rate: 0.0 },
                    Slab { up_to: Some(500_000.0), rate: 0.05 },
                    Slab { up_to: Some(1_000_000.0), rate: 0.20 },
                    Slab { up_to: None, rate: 0.30 },
                ],
                rebate_threshold: 500_000.0,
                rebate_amount: 12_500.0,
                salaried_standard_deduction: 50_000.0,
            },
            surcharge: vec![
                SurchargeBand { threshold: 50_000_000.0, rate: 0.37 },
                SurchargeBand { threshold: 20_000_000.0, rate: 0.25 },
                SurchargeBand { threshold: 10_000_000.0, rate: 0.15 },
                SurchargeBand { threshold: 5_000_000.0, rate: 0.10 },
            ],
            cess_rate: 0.04,
            old_regime_caps: DeductionCaps {
                section_80c: 150_000.0,
                section_80d: 50_000.0,
                housing_loan_interest: 200_000.0,
            },
        }
    }

    /// Load rules from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read tax rules file: {:?}", path.as_ref()))?;

        let rules = TaxRules::from_json(&content).context("Failed to parse tax rules JSON")?;
        info!(year = %rules.financial_year, path = ?path.as_ref(), "loaded tax rules");
        Ok(rules)
    }

    pub fn from_json(content: &str) -> CalcResult<Self> {
        let mut rules: TaxRules =
            serde_json::from_str(content).map_err(|e| CalcError::Rules(e.to_string()))?;
        rules.validate()?;
        // Highest band first so the first match wins
        rules
            .surcharge
            .sort_by(|a, b| b.threshold.total_cmp(&a.threshold));
        Ok(rules)
    }

    /// Slabs must ascend and end open-ended; rates are fractions
    pub fn validate(&self) -> CalcResult<()> {
        for (name, regime) in [("new", &self.new_regime), ("old", &self.old_regime)] {
            let slabs = &regime.slabs;
            if slabs.is_empty() {
                return Err(CalcError::Rules(format!("{} regime has no slabs", name)));
            }

            let mut previous = 0.0;
            for (i, slab) in slabs.iter().enumerate() {
                if !(0.0..=1.0).contains(&slab.rate) {
                    return Err(CalcError::Rules(format!(
                        "{} regime slab {} has rate {} outside 0..1",
                        name, i, slab.rate
                    )));
                }
                match slab.up_to {
                    Some(limit) if limit <= previous => {
                        return Err(CalcError::Rules(format!(
                            "{} regime slabs must ascend (slab {})",
                            name, i
                        )));
                    }
                    Some(limit) => previous = limit,
                    None if i + 1 != slabs.len() => {
                        return Err(CalcError::Rules(format!(
                            "{} regime has an open-ended slab before the last one",
                            name
                        )));
                    }
                    None => {}
                }
            }

            if slabs.last().and_then(|s| s.up_to).is_some() {
                return Err(CalcError::Rules(format!(
                    "{} regime's last slab must have no upper limit",
                    name
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.cess_rate) {
            return Err(CalcError::Rules(format!("cess rate {} outside 0..1", self.cess_rate)));
        }

        Ok(())
    }

    pub fn regime(&self, regime: Regime) -> &RegimeRules {
        match regime {
            Regime::New => &self.new_regime,
            Regime::Old => &self.old_regime,
        }
    }

    fn surcharge_rate(&self, income: f64) -> f64 {
        self.surcharge
            .iter()
            .find(|band| income > band.threshold)
            .map(|band| band.rate)
            .unwrap_or(0.0)
    }
}

impl Default for TaxRules {
    fn default() -> Self {
        Self::fy_2025_26()
    }
}

// ============================================================================
// INPUT / OUTPUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    #[default]
    New,
    Old,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::New => "New Regime",
            Regime::Old => "Old Regime",
        }
    }
}

/// Old-regime deductions as claimed (caps are applied during calculation)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deductions {
    #[serde(default)]
    pub section_80c: f64,
    #[serde(default)]
    pub section_80d: f64,
    #[serde(default)]
    pub hra_exemption: f64,
    #[serde(default)]
    pub housing_loan_interest: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxInput {
    pub annual_income: f64,

    #[serde(default)]
    pub regime: Regime,

    /// Salaried filers get the regime's standard deduction
    #[serde(default)]
    pub salaried: bool,

    /// Standard deduction claimed by a non-salaried filer
    #[serde(default)]
    pub standard_deduction: Option<f64>,

    #[serde(default)]
    pub deductions: Deductions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabTax {
    pub from: f64,
    pub to: Option<f64>,
    pub rate_pct: f64,
    pub taxable_amount: f64,
    pub tax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub regime: Regime,
    pub financial_year: String,
    pub taxable_income: f64,
    pub deductions_applied: f64,
    pub base_tax: f64,
    pub rebate: f64,
    pub tax_after_rebate: f64,
    pub surcharge: f64,
    pub cess: f64,
    pub total_tax: f64,
    pub monthly_tax: f64,
    pub monthly_income: f64,
    /// Total tax as percent of gross income, two decimals
    pub effective_rate: f64,
    pub breakdown: Vec<SlabTax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeComparison {
    pub new_regime: TaxResult,
    pub old_regime: TaxResult,
    pub better: Regime,
    pub savings: f64,
}

impl TaxInput {
    pub fn new(annual_income: f64, regime: Regime) -> Self {
        TaxInput {
            annual_income,
            regime,
            salaried: false,
            standard_deduction: None,
            deductions: Deductions::default(),
        }
    }

    pub fn salaried(mut self) -> Self {
        self.salaried = true;
        self
    }

    pub fn with_deductions(mut self, deductions: Deductions) -> Self {
        self.deductions = deductions;
        self
    }

    fn validate(&self) -> CalcResult<()> {
        if !(self.annual_income.is_finite() && self.annual_income > 0.0) {
            return Err(CalcError::out_of_range(
                "annual_income",
                self.annual_income,
                "Please enter a valid annual income greater than 0.",
            ));
        }

        let d = &self.deductions;
        for (field, value) in [
            ("section_80c", d.section_80c),
            ("section_80d", d.section_80d),
            ("hra_exemption", d.hra_exemption),
            ("housing_loan_interest", d.housing_loan_interest),
            ("standard_deduction", self.standard_deduction.unwrap_or(0.0)),
        ] {
            require_min(field, value, 0.0, "Deductions cannot be negative")?;
        }

        Ok(())
    }
}

// ============================================================================
// CALCULATION
// ============================================================================

/// Tax on `taxable` across progressive slabs, with the per-slab split
pub fn tax_from_slabs(taxable: f64, slabs: &[Slab]) -> (f64, Vec<SlabTax>) {
    let mut total = 0.0;
    let mut breakdown = Vec::new();
    let mut lower = 0.0;

    for slab in slabs {
        if taxable <= lower {
            break;
        }

        let upper = slab.up_to.unwrap_or(f64::INFINITY);
        let in_slab = taxable.min(upper) - lower;
        let tax = in_slab * slab.rate;
        total += tax;

        breakdown.push(SlabTax {
            from: lower,
            to: slab.up_to,
            rate_pct: round_to(slab.rate * 100.0, 2),
            taxable_amount: in_slab.round(),
            tax: tax.round(),
        });

        lower = upper;
    }

    (total, breakdown)
}

pub fn calculate(input: &TaxInput, rules: &TaxRules) -> CalcResult<TaxResult> {
    input.validate().map_err(|e| e.in_calculator(CALCULATOR))?;

    let income = input.annual_income;
    let regime_rules = rules.regime(input.regime);

    let standard = if input.salaried {
        regime_rules.salaried_standard_deduction
    } else {
        input.standard_deduction.unwrap_or(0.0)
    };

    let deductions = match input.regime {
        Regime::New => standard,
        Regime::Old => {
            let caps = &rules.old_regime_caps;
            let d = &input.deductions;
            d.section_80c.min(caps.section_80c)
                + d.section_80d.min(caps.section_80d)
                + d.hra_exemption
                + d.housing_loan_interest.min(caps.housing_loan_interest)
                + standard
        }
    };

    let taxable = (income - deductions).max(0.0);
    let (base_tax, breakdown) = tax_from_slabs(taxable, &regime_rules.slabs);

    let rebate = if taxable <= regime_rules.rebate_threshold {
        regime_rules.rebate_amount.min(base_tax)
    } else {
        0.0
    };
    let tax_after_rebate = (base_tax - rebate).max(0.0);

    let surcharge = tax_after_rebate * rules.surcharge_rate(income);
    let cess = rules.cess_rate * (tax_after_rebate + surcharge);
    let total_tax = (tax_after_rebate + surcharge + cess).round();

    debug!(
        income,
        regime = input.regime.as_str(),
        taxable,
        total_tax,
        "income tax calculated"
    );

    Ok(TaxResult {
        regime: input.regime,
        financial_year: rules.financial_year.clone(),
        taxable_income: taxable.round(),
        deductions_applied: deductions.round(),
        base_tax: base_tax.round(),
        rebate: rebate.round(),
        tax_after_rebate: tax_after_rebate.round(),
        surcharge: surcharge.round(),
        cess: cess.round(),
        total_tax,
        monthly_tax: (total_tax / 12.0).round(),
        monthly_income: (income / 12.0).round(),
        effective_rate: round_to(total_tax / income * 100.0, 2),
        breakdown,
    })
}

/// Run the same filer through both regimes. Ties go to the new regime.
pub fn compare_regimes(input: &TaxInput, rules: &TaxRules) -> CalcResult<RegimeComparison> {
    let mut as_new = input.clone();
    as_new.regime = Regime::New;
    let mut as_old = input.clone();
    as_old.regime = Regime::Old;

    let new_regime = calculate(&as_new, rules)?;
    let old_regime = calculate(&as_old, rules)?;

    let (better, savings) = if old_regime.total_tax < new_regime.total_tax {
        (Regime::Old, new_regime.total_tax - old_regime.total_tax)
    } else {
        (Regime::New, old_regime.total_tax - new_regime.total_tax)
    };

    Ok(RegimeComparison {
        new_regime,
        old_regime,
        better,
        savings,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> TaxRules {
        TaxRules::fy_2025_26()
    }

    #[test]
    fn test_new_regime_rebate_zeroes_tax() {
        // 12.75L salaried → 12L taxable → full rebate
        let input = TaxInput::new(1_275_000.0, Regime::New).salaried();
        let result = calculate(&input, &rules()).unwrap();

        assert_eq!(result.taxable_income, 1_200_000.0);
        assert_eq!(result.base_tax, 60_000.0);
        assert_eq!(result.rebate, 60_000.0);
        assert_eq!(result.total_tax, 0.0);
        assert_eq!(result.effective_rate, 0.0);
    }

    #[test]
    fn test_new_regime_twenty_lakh() {
        let result = calculate(&TaxInput::new(2_000_000.0, Regime::New), &rules()).unwrap();

        assert_eq!(result.base_tax, 200_000.0);
        assert_eq!(result.rebate, 0.0);
        assert_eq!(result.surcharge, 0.0);
        assert_eq!(result.cess, 8_000.0);
        assert_eq!(result.total_tax, 208_000.0);
        assert_eq!(result.effective_rate, 10.4);
        assert_eq!(result.monthly_tax, 17_333.0);
        assert_eq!(result.breakdown.len(), 5);
        assert_eq!(result.breakdown[4].tax, 80_000.0);
    }

    #[test]
    fn test_old_regime_with_capped_deductions() {
        let input = TaxInput::new(1_000_000.0, Regime::Old)
            .salaried()
            .with_deductions(Deductions {
                section_80c: 200_000.0,
                section_80d: 25_000.0,
                hra_exemption: 0.0,
                housing_loan_interest: 0.0,
            });
        let result = calculate(&input, &rules()).unwrap();

        assert_eq!(result.deductions_applied, 225_000.0);
        assert_eq!(result.taxable_income, 775_000.0);
        assert_eq!(result.base_tax, 67_500.0);
        assert_eq!(result.cess, 2_700.0);
        assert_eq!(result.total_tax, 70_200.0);
    }

    #[test]
    fn test_old_regime_rebate() {
        let result = calculate(&TaxInput::new(500_000.0, Regime::Old), &rules()).unwrap();
        assert_eq!(result.base_tax, 12_500.0);
        assert_eq!(result.rebate, 12_500.0);
        assert_eq!(result.total_tax, 0.0);
    }

    #[test]
    fn test_surcharge_band() {
        let result = calculate(&TaxInput::new(6_000_000.0, Regime::New), &rules()).unwrap();

        assert_eq!(result.base_tax, 1_380_000.0);
        assert_eq!(result.surcharge, 138_000.0);
        assert_eq!(result.cess, 60_720.0);
        assert_eq!(result.total_tax, 1_578_720.0);
    }

    #[test]
    fn test_rejects_zero_income() {
        let err = calculate(&TaxInput::new(0.0, Regime::New), &rules()).unwrap_err();
        assert_eq!(err.field(), Some("annual_income"));
    }

    #[test]
    fn test_compare_regimes() {
        let input = TaxInput::new(1_000_000.0, Regime::Old).salaried();
        let comparison = compare_regimes(&input, &rules()).unwrap();

        assert_eq!(comparison.new_regime.total_tax, 0.0);
        assert_eq!(comparison.old_regime.total_tax, 106_600.0);
        assert_eq!(comparison.better, Regime::New);
        assert_eq!(comparison.savings, 106_600.0);
    }

    #[test]
    fn test_rules_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");

        let mut custom = rules();
        custom.financial_year = "FY 2030-31".to_string();
        fs::write(&path, serde_json::to_string_pretty(&custom).unwrap()).unwrap();

        let loaded = TaxRules::from_file(&path).unwrap();
        assert_eq!(loaded.financial_year, "FY 2030-31");
        assert_eq!(loaded.new_regime, custom.new_regime);
    }

    #[test]
    fn test_rules_validation() {
        let mut bad = rules();
        bad.old_regime.slabs[1].up_to = Some(100_000.0);
        assert!(matches!(bad.validate(), Err(CalcError::Rules(_))));

        let mut closed = rules();
        closed.new_regime.slabs.pop();
        assert!(closed.validate().is_err());

        assert!(TaxRules::from_json("{not json").is_err());
    }
}
