//! Engineered features computed from the raw answers.
//!
//! A derived feature is only emitted when the active schema names it, so the
//! same code serves models trained with and without feature engineering.

use crate::answers::RawAnswers;
use crate::assembler::{FeatureMap, FeatureValue};
use crate::schema::ExpectedSchema;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedFeature {
    Inactive,
    LowFruits,
    LowVeggies,
    PoorHealth,
    MentalPhysicalBurden,
    CardioRiskSum,
    LifestyleRiskSum,
}

/// General-health codes at or above this count as poor health (4 = fair, 5 = poor).
const POOR_HEALTH_FROM: u8 = 4;

impl DerivedFeature {
    pub const CATALOG: [DerivedFeature; 7] = [
        DerivedFeature::Inactive,
        DerivedFeature::LowFruits,
        DerivedFeature::LowVeggies,
        DerivedFeature::PoorHealth,
        DerivedFeature::MentalPhysicalBurden,
        DerivedFeature::CardioRiskSum,
        DerivedFeature::LifestyleRiskSum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DerivedFeature::Inactive => "inactive",
            DerivedFeature::LowFruits => "low_fruits",
            DerivedFeature::LowVeggies => "low_veggies",
            DerivedFeature::PoorHealth => "poor_health",
            DerivedFeature::MentalPhysicalBurden => "mental_physical_burden",
            DerivedFeature::CardioRiskSum => "cardio_risk_sum",
            DerivedFeature::LifestyleRiskSum => "lifestyle_risk_sum",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::CATALOG.into_iter().find(|f| f.name() == name)
    }

    /// Value of this feature for one submission. Total over every answer set.
    pub fn compute(self, raw: &RawAnswers) -> i64 {
        let flag = i64::from;
        let absent = |b: bool| i64::from(!b);
        match self {
            DerivedFeature::Inactive => absent(raw.phys_activity),
            DerivedFeature::LowFruits => absent(raw.fruits),
            DerivedFeature::LowVeggies => absent(raw.veggies),
            DerivedFeature::PoorHealth => flag(raw.gen_hlth >= POOR_HEALTH_FROM),
            DerivedFeature::MentalPhysicalBurden => {
                i64::from(raw.optional.ment_hlth) + i64::from(raw.optional.phys_hlth)
            }
            DerivedFeature::CardioRiskSum => {
                flag(raw.high_bp)
                    + flag(raw.high_chol)
                    + flag(raw.heart_disease_or_attack)
                    + flag(raw.stroke)
            }
            DerivedFeature::LifestyleRiskSum => {
                flag(raw.smoker)
                    + flag(raw.hvy_alcohol_consump)
                    + absent(raw.phys_activity)
                    + absent(raw.fruits)
                    + absent(raw.veggies)
            }
        }
    }
}

/// Derived features for `raw`, restricted to those `schema` names.
pub fn derive(schema: &ExpectedSchema, raw: &RawAnswers) -> FeatureMap {
    DerivedFeature::CATALOG
        .into_iter()
        .filter(|feature| schema.contains(feature.name()))
        .map(|feature| {
            let value = feature.compute(raw);
            debug!("derived {} = {value}", feature.name());
            (feature.name().to_string(), FeatureValue::Int(value))
        })
        .collect()
}
