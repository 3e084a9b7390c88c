// 🧮 Calculation requests - one tagged envelope for every calculator
//
// The CLI, the API server and the journal all speak this type:
//   {"calculator": "emi", "principal": 1000000, "annual_rate": 10, "tenure": 20}

use crate::calculators::{
    age, bmi, discount, emi, fuel, gold, gst, percentage, sip, tax, AgeInput, AgeResult,
    BmiInput, BmiResult, CartInput, CartResult, DiscountInput, DiscountResult, EmiInput,
    EmiResult, FuelInput, FuelResult, GoldInput, GoldResult, GstInput, GstResult,
    PercentChangeInput, PercentChangeResult, PercentOfInput, PercentOfResult, RatioInput,
    RatioResult, RegimeComparison, SipInput, SipResult, TaxInput, TaxResult, TaxRules,
};
use crate::error::CalcResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationRequest {
    Emi(EmiInput),
    Gst(GstInput),
    Sip(SipInput),
    Tax(TaxInput),
    TaxCompare(TaxInput),
    Bmi(BmiInput),
    Age(AgeInput),
    Gold(GoldInput),
    Fuel(FuelInput),
    PercentageOf(PercentOfInput),
    PercentageChange(PercentChangeInput),
    PercentageRatio(RatioInput),
    Discount(DiscountInput),
    DiscountCart(CartInput),
}

/// Typed result, serialized without a tag (the request already names it)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationResult {
    Emi(EmiResult),
    Gst(GstResult),
    Sip(SipResult),
    Tax(TaxResult),
    TaxCompare(RegimeComparison),
    Bmi(BmiResult),
    Age(AgeResult),
    Gold(GoldResult),
    Fuel(FuelResult),
    PercentageOf(PercentOfResult),
    PercentageChange(PercentChangeResult),
    PercentageRatio(RatioResult),
    Discount(DiscountResult),
    DiscountCart(CartResult),
}

#[derive(Debug, Clone, Serialize)]
pub struct CalculationOutcome {
    pub calculator: String,
    pub result: CalculationResult,
}

/// Calculator catalog entry for listings
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const CATALOG: [CalculatorInfo; 14] = [
    CalculatorInfo { name: "emi", title: "EMI", description: "Monthly installment, total interest and amortization for a loan" },
    CalculatorInfo { name: "gst", title: "GST", description: "Add GST to a net price or extract it from a gross price" },
    CalculatorInfo { name: "sip", title: "SIP", description: "Future value of a monthly investment with yearly breakdown" },
    CalculatorInfo { name: "tax", title: "Income Tax", description: "Income tax under the new or old regime with slab breakdown" },
    CalculatorInfo { name: "tax_compare", title: "Tax Regime Comparison", description: "The same income under both regimes and which one saves more" },
    CalculatorInfo { name: "bmi", title: "BMI", description: "Body Mass Index, category and healthy weight range" },
    CalculatorInfo { name: "age", title: "Age", description: "Exact age, life totals, next birthday and zodiac sign" },
    CalculatorInfo { name: "gold", title: "Gold", description: "Value of gold by weight, rate and karat purity" },
    CalculatorInfo { name: "fuel", title: "Fuel Cost", description: "Trip fuel, cost, monthly commute cost and CO₂" },
    CalculatorInfo { name: "percentage_of", title: "Percentage Of", description: "X percent of Y" },
    CalculatorInfo { name: "percentage_change", title: "Percentage Change", description: "Increase or decrease from one value to another" },
    CalculatorInfo { name: "percentage_ratio", title: "Percentage Ratio", description: "X as a percentage of Y" },
    CalculatorInfo { name: "discount", title: "Discount", description: "Sale price after a percentage or fixed discount, with optional GST" },
    CalculatorInfo { name: "discount_cart", title: "Cart Discount", description: "Totals for several discounted items, with optional GST" },
];

impl CalculationRequest {
    /// Snake-case tag, matching the `calculator` field of the JSON form
    pub fn name(&self) -> &'static str {
        match self {
            CalculationRequest::Emi(_) => "emi",
            CalculationRequest::Gst(_) => "gst",
            CalculationRequest::Sip(_) => "sip",
            CalculationRequest::Tax(_) => "tax",
            CalculationRequest::TaxCompare(_) => "tax_compare",
            CalculationRequest::Bmi(_) => "bmi",
            CalculationRequest::Age(_) => "age",
            CalculationRequest::Gold(_) => "gold",
            CalculationRequest::Fuel(_) => "fuel",
            CalculationRequest::PercentageOf(_) => "percentage_of",
            CalculationRequest::PercentageChange(_) => "percentage_change",
            CalculationRequest::PercentageRatio(_) => "percentage_ratio",
            CalculationRequest::Discount(_) => "discount",
            CalculationRequest::DiscountCart(_) => "discount_cart",
        }
    }

    /// Run with the built-in tax rules
    pub fn run(&self) -> CalcResult<CalculationOutcome> {
        self.run_with(&TaxRules::default())
    }

    pub fn run_with(&self, rules: &TaxRules) -> CalcResult<CalculationOutcome> {
        let result = match self {
            CalculationRequest::Emi(input) => CalculationResult::Emi(emi::calculate(input)?),
            CalculationRequest::Gst(input) => CalculationResult::Gst(gst::calculate(input)?),
            CalculationRequest::Sip(input) => CalculationResult::Sip(sip::calculate(input)?),
            CalculationRequest::Tax(input) => CalculationResult::Tax(tax::calculate(input, rules)?),
            CalculationRequest::TaxCompare(input) => {
                CalculationResult::TaxCompare(tax::compare_regimes(input, rules)?)
            }
            CalculationRequest::Bmi(input) => CalculationResult::Bmi(bmi::calculate(input)?),
            CalculationRequest::Age(input) => CalculationResult::Age(age::calculate(input)?),
            CalculationRequest::Gold(input) => CalculationResult::Gold(gold::calculate(input)?),
            CalculationRequest::Fuel(input) => CalculationResult::Fuel(fuel::calculate(input)?),
            CalculationRequest::PercentageOf(input) => {
                CalculationResult::PercentageOf(percentage::value_of(input)?)
            }
            CalculationRequest::PercentageChange(input) => {
                CalculationResult::PercentageChange(percentage::change(input)?)
            }
            CalculationRequest::PercentageRatio(input) => {
                CalculationResult::PercentageRatio(percentage::ratio(input)?)
            }
            CalculationRequest::Discount(input) => {
                CalculationResult::Discount(discount::single(input)?)
            }
            CalculationRequest::DiscountCart(input) => {
                CalculationResult::DiscountCart(discount::multiple(input)?)
            }
        };

        Ok(CalculationOutcome {
            calculator: self.name().to_string(),
            result,
        })
    }

    /// SHA-256 of the request JSON. Field order is fixed by the struct definitions.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_string(self).unwrap_or_default());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::{GstMode, Regime};

    #[test]
    fn test_parse_tagged_request() {
        let json = r#"{"calculator": "emi", "principal": 1000000, "annual_rate": 10, "tenure": 20}"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.name(), "emi");
        let outcome = request.run().unwrap();
        match outcome.result {
            CalculationResult::Emi(result) => assert_eq!(result.emi, 9650.0),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_result_serializes_untagged() {
        let request = CalculationRequest::Gst(GstInput::new(1000.0, 18.0, GstMode::Exclusive));
        let outcome = request.run().unwrap();
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["calculator"], "gst");
        assert_eq!(value["result"]["total_amount"], 1180.0);
    }

    #[test]
    fn test_tax_compare_uses_rules() {
        let input = TaxInput::new(1_000_000.0, Regime::New).salaried();
        let outcome = CalculationRequest::TaxCompare(input)
            .run_with(&TaxRules::fy_2025_26())
            .unwrap();

        match outcome.result {
            CalculationResult::TaxCompare(cmp) => assert_eq!(cmp.better, Regime::New),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_errors_pass_through() {
        let json = r#"{"calculator": "gold", "weight_grams": 10, "rate_per_gram": 6000, "karats": 30}"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        let err = request.run().unwrap_err();
        assert_eq!(err.field(), Some("karats"));
    }

    #[test]
    fn test_unknown_calculator_rejected() {
        let json = r#"{"calculator": "mortgage", "amount": 5}"#;
        assert!(serde_json::from_str::<CalculationRequest>(json).is_err());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = CalculationRequest::Gst(GstInput::new(1000.0, 18.0, GstMode::Exclusive));
        let b = CalculationRequest::Gst(GstInput::new(1000.0, 18.0, GstMode::Exclusive));
        let c = CalculationRequest::Gst(GstInput::new(1000.0, 12.0, GstMode::Exclusive));

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_catalog_matches_tags() {
        for entry in CATALOG.iter() {
            let json = format!(r#"{{"calculator": "{}"}}"#, entry.name);
            let err = serde_json::from_str::<CalculationRequest>(&json).unwrap_err();
            // Known tag, so the failure is a missing field rather than an unknown variant
            assert!(err.to_string().contains("missing field"), "{}: {}", entry.name, err);
        }
    }
}
