// ⛽ Fuel Cost Calculator - trip cost, fuel needed and CO₂ emitted

use crate::error::CalcResult;
use crate::format::round_to;
use crate::validation::require_min;
use serde::{Deserialize, Serialize};
use tracing::debug;

const CALCULATOR: &str = "Fuel Cost";

const KM_PER_MILE: f64 = 1.609_34;
/// 1 mpg (US) in km per litre
const KMPL_PER_MPG: f64 = 0.425_144;
/// Trips per month for the commuter estimate (20 working days, both ways)
pub const MONTHLY_TRIPS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyUnit {
    /// Distance in km, efficiency in km/l
    #[default]
    KmPerLitre,
    /// Distance in miles, efficiency in miles per US gallon
    MilesPerGallon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    #[default]
    Petrol,
    Diesel,
    Cng,
}

impl FuelType {
    /// kg of CO₂ per litre burned
    pub fn emission_factor(&self) -> f64 {
        match self {
            FuelType::Petrol => 2.31,
            FuelType::Diesel => 2.68,
            FuelType::Cng => 2.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelInput {
    pub distance: f64,
    pub efficiency: f64,
    /// Price per litre
    pub price: f64,
    #[serde(default)]
    pub unit: EfficiencyUnit,
    #[serde(default)]
    pub fuel_type: FuelType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelResult {
    pub distance_km: f64,
    pub fuel_needed_litres: f64,
    pub total_cost: f64,
    pub cost_per_km: f64,
    pub round_trip_cost: f64,
    pub monthly_cost: f64,
    pub co2_kg: f64,
}

impl FuelInput {
    pub fn new(distance: f64, efficiency: f64, price: f64) -> Self {
        FuelInput {
            distance,
            efficiency,
            price,
            unit: EfficiencyUnit::KmPerLitre,
            fuel_type: FuelType::Petrol,
        }
    }

    pub fn in_miles(mut self) -> Self {
        self.unit = EfficiencyUnit::MilesPerGallon;
        self
    }

    pub fn with_fuel(mut self, fuel_type: FuelType) -> Self {
        self.fuel_type = fuel_type;
        self
    }

    fn validate(&self) -> CalcResult<()> {
        require_min("distance", self.distance, 0.1, "Please enter a valid distance")?;
        require_min("efficiency", self.efficiency, 0.1, "Please enter a valid fuel efficiency")?;
        require_min("price", self.price, 0.1, "Please enter a valid fuel price")?;
        Ok(())
    }
}

pub fn calculate(input: &FuelInput) -> CalcResult<FuelResult> {
    input.validate().map_err(|e| e.in_calculator(CALCULATOR))?;

    let (distance_km, kmpl) = match input.unit {
        EfficiencyUnit::KmPerLitre => (input.distance, input.efficiency),
        EfficiencyUnit::MilesPerGallon => (input.distance * KM_PER_MILE, input.efficiency * KMPL_PER_MPG),
    };

    let litres = distance_km / kmpl;
    let cost = litres * input.price;

    debug!(distance_km, kmpl, litres, cost, fuel = ?input.fuel_type, "fuel cost calculated");

    Ok(FuelResult {
        distance_km: round_to(distance_km, 2),
        fuel_needed_litres: round_to(litres, 2),
        total_cost: cost.round(),
        cost_per_km: round_to(cost / distance_km, 2),
        round_trip_cost: (cost * 2.0).round(),
        monthly_cost: (cost * MONTHLY_TRIPS).round(),
        co2_kg: round_to(litres * input.fuel_type.emission_factor(), 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_petrol_trip() {
        let result = calculate(&FuelInput::new(100.0, 15.0, 100.0)).unwrap();

        assert_eq!(result.fuel_needed_litres, 6.67);
        assert_eq!(result.total_cost, 667.0);
        assert_eq!(result.cost_per_km, 6.67);
        assert_eq!(result.round_trip_cost, 1333.0);
        assert_eq!(result.monthly_cost, 26_667.0);
        assert_eq!(result.co2_kg, 15.4);
    }

    #[test]
    fn test_miles_per_gallon() {
        let result = calculate(&FuelInput::new(100.0, 30.0, 100.0).in_miles()).unwrap();

        assert_eq!(result.distance_km, 160.93);
        assert_eq!(result.fuel_needed_litres, 12.62);
        assert_eq!(result.total_cost, 1262.0);
    }

    #[test]
    fn test_diesel_emits_more() {
        let petrol = calculate(&FuelInput::new(200.0, 18.0, 95.0)).unwrap();
        let diesel = calculate(&FuelInput::new(200.0, 18.0, 95.0).with_fuel(FuelType::Diesel)).unwrap();
        assert!(diesel.co2_kg > petrol.co2_kg);
        assert_eq!(diesel.total_cost, petrol.total_cost);
    }

    #[test]
    fn test_rejects_zero_efficiency() {
        let err = calculate(&FuelInput::new(100.0, 0.0, 100.0)).unwrap_err();
        assert_eq!(err.field(), Some("efficiency"));
    }
}
