use serde::{Deserialize, Serialize};

use crate::numeric::{parse_leading_number, to_fixed};

/// Life-stage / activity categories with a known DER multiplier range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifeStage {
    #[serde(rename = "kitten_under_4m")]
    KittenUnder4Months,
    #[serde(rename = "kitten_4_to_12m")]
    Kitten4To12Months,
    #[default]
    #[serde(rename = "adult_neutered")]
    AdultNeutered,
    #[serde(rename = "adult_intact")]
    AdultIntact,
    #[serde(rename = "pregnant")]
    Pregnant,
    #[serde(rename = "lactating")]
    Lactating,
    #[serde(rename = "weight_loss")]
    WeightLoss,
    #[serde(rename = "weight_gain")]
    WeightGain,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerRange {
    pub stage: LifeStage,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

pub const DER_RANGES: [DerRange; 8] = [
    DerRange { stage: LifeStage::KittenUnder4Months, label: "Kitten (<4 months)", min: 2.5, max: 3.0 },
    DerRange { stage: LifeStage::Kitten4To12Months, label: "Kitten (4-12 months)", min: 2.0, max: 2.5 },
    DerRange { stage: LifeStage::AdultNeutered, label: "Adult (neutered)", min: 1.2, max: 1.4 },
    DerRange { stage: LifeStage::AdultIntact, label: "Adult (intact)", min: 1.4, max: 1.6 },
    DerRange { stage: LifeStage::Pregnant, label: "Pregnant", min: 1.6, max: 2.0 },
    DerRange { stage: LifeStage::Lactating, label: "Lactating", min: 2.0, max: 6.0 },
    DerRange { stage: LifeStage::WeightLoss, label: "Weight loss", min: 0.8, max: 1.0 },
    DerRange { stage: LifeStage::WeightGain, label: "Weight gain", min: 1.2, max: 1.8 },
];

impl LifeStage {
    pub fn range(self) -> &'static DerRange {
        DER_RANGES
            .iter()
            .find(|r| r.stage == self)
            .unwrap_or(&DER_RANGES[2])
    }
}

/// Water need per kg of body weight, ml/day.
const WATER_ML_PER_KG: (f64, f64) = (40.0, 60.0);

/// Resting energy requirement, kcal/day.
pub fn rer(weight_kg: f64) -> f64 {
    70.0 * weight_kg.powf(0.75)
}

/// Daily needs, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCalorieResult {
    pub rer: String,
    pub min_calories: String,
    pub max_calories: String,
    pub min_water: String,
    pub max_water: String,
}

/// `None` unless `weight_input` reads as a positive finite number of kg.
pub fn daily_needs(weight_input: &str, range: &DerRange) -> Option<DailyCalorieResult> {
    let weight = parse_leading_number(weight_input).filter(|w| *w > 0.0)?;
    let rer = rer(weight);

    Some(DailyCalorieResult {
        rer: to_fixed(rer, 1),
        min_calories: to_fixed(rer * range.min, 1),
        max_calories: to_fixed(rer * range.max, 1),
        min_water: to_fixed(weight * WATER_ML_PER_KG.0, 0),
        max_water: to_fixed(weight * WATER_ML_PER_KG.1, 0),
    })
}
