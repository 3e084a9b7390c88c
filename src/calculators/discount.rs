// 🏷️ Discount Calculator - single item and shopping cart, with optional GST

use crate::error::{CalcError, CalcResult};
use crate::format::round_to;
use crate::validation::{require_min, require_range};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CALCULATOR: &str = "Discount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    #[default]
    Percentage,
    FixedAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountInput {
    pub original_price: f64,
    /// Percent off, or rupees off for a fixed discount
    pub discount: f64,
    #[serde(default)]
    pub kind: DiscountKind,
    /// GST in percent, applied after the discount
    #[serde(default)]
    pub gst_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountResult {
    pub original_price: f64,
    pub discount_amount: f64,
    pub price_after_discount: f64,
    pub gst_amount: f64,
    pub final_price: f64,
    pub savings_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default)]
    pub name: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub discount_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartInput {
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub gst_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartResult {
    pub items_counted: usize,
    pub total_original: f64,
    pub total_discount: f64,
    pub price_after_discount: f64,
    pub gst_amount: f64,
    pub final_total: f64,
    /// Overall discount across the cart, one decimal
    pub discount_percentage: f64,
}

impl DiscountInput {
    pub fn percent(original_price: f64, discount: f64) -> Self {
        DiscountInput {
            original_price,
            discount,
            kind: DiscountKind::Percentage,
            gst_rate: None,
        }
    }

    pub fn fixed(original_price: f64, discount: f64) -> Self {
        DiscountInput {
            original_price,
            discount,
            kind: DiscountKind::FixedAmount,
            gst_rate: None,
        }
    }

    pub fn with_gst(mut self, rate: f64) -> Self {
        self.gst_rate = Some(rate);
        self
    }

    fn validate(&self) -> CalcResult<()> {
        require_min(
            "original_price",
            self.original_price,
            0.01,
            "Please enter a valid original price",
        )?;
        match self.kind {
            DiscountKind::Percentage => require_range(
                "discount",
                self.discount,
                0.0,
                100.0,
                "Discount percentage should be between 0 and 100",
            )?,
            DiscountKind::FixedAmount => require_range(
                "discount",
                self.discount,
                0.0,
                self.original_price,
                "Discount amount cannot exceed the original price",
            )?,
        };
        validate_gst(self.gst_rate)
    }
}

fn validate_gst(rate: Option<f64>) -> CalcResult<()> {
    if let Some(rate) = rate {
        require_range("gst_rate", rate, 0.0, 100.0, "GST rate should be between 0 and 100")?;
    }
    Ok(())
}

pub fn single(input: &DiscountInput) -> CalcResult<DiscountResult> {
    input.validate().map_err(|e| e.in_calculator(CALCULATOR))?;

    let discount_amount = match input.kind {
        DiscountKind::Percentage => input.original_price * input.discount / 100.0,
        DiscountKind::FixedAmount => input.discount,
    };
    let discounted = input.original_price - discount_amount;
    let gst_amount = discounted * input.gst_rate.unwrap_or(0.0) / 100.0;

    debug!(price = input.original_price, discount_amount, gst_amount, "discount applied");

    Ok(DiscountResult {
        original_price: round_to(input.original_price, 2),
        discount_amount: round_to(discount_amount, 2),
        price_after_discount: round_to(discounted, 2),
        gst_amount: round_to(gst_amount, 2),
        final_price: round_to(discounted + gst_amount, 2),
        savings_percentage: round_to(discount_amount / input.original_price * 100.0, 2),
    })
}

/// Items with a price of zero or less are ignored
pub fn multiple(input: &CartInput) -> CalcResult<CartResult> {
    let result = cart_totals(input);
    result.map_err(|e| e.in_calculator(CALCULATOR))
}

fn cart_totals(input: &CartInput) -> CalcResult<CartResult> {
    validate_gst(input.gst_rate)?;

    let mut counted = 0;
    let mut total_original = 0.0;
    let mut total_discount = 0.0;

    for item in input.items.iter().filter(|item| item.price > 0.0) {
        require_range(
            "discount_pct",
            item.discount_pct,
            0.0,
            100.0,
            "Discount percentage should be between 0 and 100",
        )?;
        counted += 1;
        total_original += item.price;
        total_discount += item.price * item.discount_pct / 100.0;
    }

    if counted == 0 {
        return Err(CalcError::Invalid(
            "Please add at least one item with a price".to_string(),
        ));
    }

    let discounted = total_original - total_discount;
    let gst_amount = discounted * input.gst_rate.unwrap_or(0.0) / 100.0;

    debug!(items = counted, total_original, total_discount, "cart totalled");

    Ok(CartResult {
        items_counted: counted,
        total_original: round_to(total_original, 2),
        total_discount: round_to(total_discount, 2),
        price_after_discount: round_to(discounted, 2),
        gst_amount: round_to(gst_amount, 2),
        final_total: round_to(discounted + gst_amount, 2),
        discount_percentage: round_to(total_discount / total_original * 100.0, 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, discount_pct: f64) -> CartItem {
        CartItem {
            name: None,
            price,
            discount_pct,
        }
    }

    #[test]
    fn test_percentage_discount() {
        let result = single(&DiscountInput::percent(2500.0, 20.0)).unwrap();

        assert_eq!(result.discount_amount, 500.0);
        assert_eq!(result.price_after_discount, 2000.0);
        assert_eq!(result.final_price, 2000.0);
        assert_eq!(result.savings_percentage, 20.0);
    }

    #[test]
    fn test_fixed_discount_with_gst() {
        let result = single(&DiscountInput::fixed(1000.0, 150.0).with_gst(18.0)).unwrap();

        assert_eq!(result.price_after_discount, 850.0);
        assert_eq!(result.gst_amount, 153.0);
        assert_eq!(result.final_price, 1003.0);
        assert_eq!(result.savings_percentage, 15.0);
    }

    #[test]
    fn test_fixed_discount_cannot_exceed_price() {
        let err = single(&DiscountInput::fixed(100.0, 150.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error calculating Discount: Discount amount cannot exceed the original price"
        );
    }

    #[test]
    fn test_cart_totals() {
        let input = CartInput {
            items: vec![item(1000.0, 10.0), item(500.0, 20.0), item(0.0, 50.0)],
            gst_rate: Some(5.0),
        };
        let result = multiple(&input).unwrap();

        assert_eq!(result.items_counted, 2);
        assert_eq!(result.total_original, 1500.0);
        assert_eq!(result.total_discount, 200.0);
        assert_eq!(result.price_after_discount, 1300.0);
        assert_eq!(result.gst_amount, 65.0);
        assert_eq!(result.final_total, 1365.0);
        assert_eq!(result.discount_percentage, 13.3);
    }

    #[test]
    fn test_empty_cart() {
        let input = CartInput {
            items: vec![item(0.0, 10.0)],
            gst_rate: None,
        };
        assert!(matches!(
            multiple(&input),
            Err(CalcError::InCalculator { .. })
        ));
    }
}
