// Calculators
//
// Each calculator is a pure function of a serde input struct:
// - validate every field, failing with a CalcError naming the calculator
// - compute with unrounded intermediates
// - round only the values it returns

pub mod age;
pub mod bmi;
pub mod discount;
pub mod emi;
pub mod fuel;
pub mod gold;
pub mod gst;
pub mod percentage;
pub mod sip;
pub mod tax;

pub use age::{AgeInput, AgeResult, Zodiac};
pub use bmi::{BmiCategory, BmiInput, BmiResult, UnitSystem, WeightRange};
pub use discount::{CartInput, CartItem, CartResult, DiscountInput, DiscountKind, DiscountResult};
pub use emi::{AmortizationRow, EmiInput, EmiResult, TenureUnit, YearlySummary};
pub use fuel::{EfficiencyUnit, FuelInput, FuelResult, FuelType};
pub use gold::{GoldInput, GoldResult};
pub use gst::{GstInput, GstMode, GstResult};
pub use percentage::{
    PercentChangeInput, PercentChangeResult, PercentOfInput, PercentOfResult, RatioInput,
    RatioResult,
};
pub use sip::{ContributionTiming, SipInput, SipResult, SipYear};
pub use tax::{
    Deductions, Regime, RegimeComparison, RegimeRules, Slab, SlabTax, TaxInput, TaxResult,
    TaxRules,
};
