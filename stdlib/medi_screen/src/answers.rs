//! Raw questionnaire answers as handed over by the form layer.
//!
//! Field names follow the BRFSS survey columns the classifiers were trained on.
//! Yes/no answers are stored as `bool` and travel as `0`/`1`; categorical
//! selections are stored as their integer codes.

use crate::assembler::{FeatureMap, FeatureValue};
use crate::dispatch::Mode;
use serde::{Deserialize, Serialize};

/// Column names of the collected answers.
pub mod fields {
    pub const HIGH_BP: &str = "HighBP";
    pub const HIGH_CHOL: &str = "HighChol";
    pub const CHOL_CHECK: &str = "CholCheck";
    pub const BMI: &str = "BMI";
    pub const SMOKER: &str = "Smoker";
    pub const STROKE: &str = "Stroke";
    pub const HEART_DISEASE_OR_ATTACK: &str = "HeartDiseaseorAttack";
    pub const PHYS_ACTIVITY: &str = "PhysActivity";
    pub const FRUITS: &str = "Fruits";
    pub const VEGGIES: &str = "Veggies";
    pub const HVY_ALCOHOL_CONSUMP: &str = "HvyAlcoholConsump";
    pub const ANY_HEALTHCARE: &str = "AnyHealthcare";
    pub const NO_DOC_BC_COST: &str = "NoDocbcCost";
    pub const GEN_HLTH: &str = "GenHlth";
    pub const MENT_HLTH: &str = "MentHlth";
    pub const PHYS_HLTH: &str = "PhysHlth";
    pub const DIFF_WALK: &str = "DiffWalk";
    pub const SEX: &str = "Sex";
    pub const AGE: &str = "Age";
    pub const EDUCATION: &str = "Education";
    pub const INCOME: &str = "Income";

    /// Every collected column, in survey order.
    pub const ALL: [&str; 21] = [
        HIGH_BP,
        HIGH_CHOL,
        CHOL_CHECK,
        BMI,
        SMOKER,
        STROKE,
        HEART_DISEASE_OR_ATTACK,
        PHYS_ACTIVITY,
        FRUITS,
        VEGGIES,
        HVY_ALCOHOL_CONSUMP,
        ANY_HEALTHCARE,
        NO_DOC_BC_COST,
        GEN_HLTH,
        MENT_HLTH,
        PHYS_HLTH,
        DIFF_WALK,
        SEX,
        AGE,
        EDUCATION,
        INCOME,
    ];
}

/// Serde adapter for yes/no answers: written as `0`/`1`, read from either a
/// number or a JSON boolean.
mod flag {
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Serializer;
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = bool;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0, 1 or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
                Ok(v)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
                match v {
                    0 => Ok(false),
                    1 => Ok(true),
                    other => Err(E::invalid_value(Unexpected::Unsigned(other), &self)),
                }
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
                match v {
                    0 => Ok(false),
                    1 => Ok(true),
                    other => Err(E::invalid_value(Unexpected::Signed(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

/// Sex as coded in the survey data (male = 1, female = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn code(self) -> u8 {
        match self {
            Sex::Female => 0,
            Sex::Male => 1,
        }
    }
}

impl From<Sex> for u8 {
    fn from(sex: Sex) -> u8 {
        sex.code()
    }
}

impl TryFrom<u8> for Sex {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Sex::Female),
            1 => Ok(Sex::Male),
            other => Err(format!("Invalid sex code: {other}")),
        }
    }
}

/// Smoking history as asked on the form. Former and current smokers both
/// count as smokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

impl SmokingStatus {
    pub fn is_smoker(self) -> bool {
        !matches!(self, SmokingStatus::Never)
    }
}

/// Body-mass index from height in centimetres and weight in kilograms.
pub fn bmi_from(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Five-year age band code: 18–24 is 1, 25–29 is 2, ..., 80 and older is 13.
pub fn age_band_code(years: u32) -> u8 {
    match years {
        0..=24 => 1,
        80.. => 13,
        // 25..=79 fits in u8 after the division
        y => ((y - 25) / 5 + 2) as u8,
    }
}

/// Answers from the optional part of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalAnswers {
    #[serde(rename = "CholCheck", with = "flag")]
    pub chol_check: bool,
    #[serde(rename = "DiffWalk", with = "flag")]
    pub diff_walk: bool,
    #[serde(rename = "NoDocbcCost", with = "flag")]
    pub no_doc_bc_cost: bool,
    #[serde(rename = "AnyHealthcare", with = "flag")]
    pub any_healthcare: bool,
    /// Days with poor mental health in the last 30.
    #[serde(rename = "MentHlth")]
    pub ment_hlth: u8,
    /// Days with poor physical health in the last 30.
    #[serde(rename = "PhysHlth")]
    pub phys_hlth: u8,
}

impl OptionalAnswers {
    /// Values the form submits when the optional section stays closed.
    ///
    /// The binary form pre-selects "yes" for the cholesterol check and for
    /// healthcare access; the multi-class form starts every question at "no".
    pub fn form_defaults(mode: Mode) -> Self {
        let assumed_yes = matches!(mode, Mode::Binary);
        Self {
            chol_check: assumed_yes,
            diff_walk: false,
            no_doc_bc_cost: false,
            any_healthcare: assumed_yes,
            ment_hlth: 0,
            phys_hlth: 0,
        }
    }
}

/// One complete submission of the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawAnswers {
    #[serde(rename = "HighBP", with = "flag")]
    pub high_bp: bool,
    #[serde(rename = "HighChol", with = "flag")]
    pub high_chol: bool,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "Smoker", with = "flag")]
    pub smoker: bool,
    #[serde(rename = "Stroke", with = "flag")]
    pub stroke: bool,
    #[serde(rename = "HeartDiseaseorAttack", with = "flag")]
    pub heart_disease_or_attack: bool,
    #[serde(rename = "PhysActivity", with = "flag")]
    pub phys_activity: bool,
    #[serde(rename = "Fruits", with = "flag")]
    pub fruits: bool,
    #[serde(rename = "Veggies", with = "flag")]
    pub veggies: bool,
    #[serde(rename = "HvyAlcoholConsump", with = "flag")]
    pub hvy_alcohol_consump: bool,
    /// General health, 1 (excellent) to 5 (poor).
    #[serde(rename = "GenHlth")]
    pub gen_hlth: u8,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    /// Age band code, see [`age_band_code`].
    #[serde(rename = "Age")]
    pub age: u8,
    #[serde(rename = "Education")]
    pub education: u8,
    #[serde(rename = "Income")]
    pub income: u8,
    #[serde(flatten)]
    pub optional: OptionalAnswers,
}

impl RawAnswers {
    /// Flat name -> value mapping of every collected column.
    ///
    /// BMI stays a float; every other column is an integer.
    pub fn base_values(&self) -> FeatureMap {
        let yes_no = |b: bool| FeatureValue::from(b);
        let code = |c: u8| FeatureValue::Int(i64::from(c));
        let o = &self.optional;

        [
            (fields::HIGH_BP, yes_no(self.high_bp)),
            (fields::HIGH_CHOL, yes_no(self.high_chol)),
            (fields::CHOL_CHECK, yes_no(o.chol_check)),
            (fields::BMI, FeatureValue::Float(self.bmi)),
            (fields::SMOKER, yes_no(self.smoker)),
            (fields::STROKE, yes_no(self.stroke)),
            (
                fields::HEART_DISEASE_OR_ATTACK,
                yes_no(self.heart_disease_or_attack),
            ),
            (fields::PHYS_ACTIVITY, yes_no(self.phys_activity)),
            (fields::FRUITS, yes_no(self.fruits)),
            (fields::VEGGIES, yes_no(self.veggies)),
            (fields::HVY_ALCOHOL_CONSUMP, yes_no(self.hvy_alcohol_consump)),
            (fields::ANY_HEALTHCARE, yes_no(o.any_healthcare)),
            (fields::NO_DOC_BC_COST, yes_no(o.no_doc_bc_cost)),
            (fields::GEN_HLTH, code(self.gen_hlth)),
            (fields::MENT_HLTH, code(o.ment_hlth)),
            (fields::PHYS_HLTH, code(o.phys_hlth)),
            (fields::DIFF_WALK, yes_no(o.diff_walk)),
            (fields::SEX, code(self.sex.code())),
            (fields::AGE, code(self.age)),
            (fields::EDUCATION, code(self.education)),
            (fields::INCOME, code(self.income)),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

impl Default for RawAnswers {
    /// Every answer at zero / "no"; useful as a starting point in tests.
    fn default() -> Self {
        Self {
            high_bp: false,
            high_chol: false,
            bmi: 0.0,
            smoker: false,
            stroke: false,
            heart_disease_or_attack: false,
            phys_activity: false,
            fruits: false,
            veggies: false,
            hvy_alcohol_consump: false,
            gen_hlth: 0,
            sex: Sex::Female,
            age: 0,
            education: 0,
            income: 0,
            optional: OptionalAnswers::form_defaults(Mode::Multiclass),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bmi_uses_metres() {
        assert_relative_eq!(bmi_from(175.0, 75.0), 24.489_795_918, epsilon = 1e-6);
        assert_relative_eq!(bmi_from(200.0, 100.0), 25.0);
    }

    #[test]
    fn age_bands_cover_survey_range() {
        assert_eq!(age_band_code(18), 1);
        assert_eq!(age_band_code(24), 1);
        assert_eq!(age_band_code(25), 2);
        assert_eq!(age_band_code(52), 7);
        assert_eq!(age_band_code(79), 12);
        assert_eq!(age_band_code(80), 13);
        assert_eq!(age_band_code(97), 13);
    }

    #[test]
    fn former_smokers_count_as_smokers() {
        assert!(!SmokingStatus::Never.is_smoker());
        assert!(SmokingStatus::Former.is_smoker());
        assert!(SmokingStatus::Current.is_smoker());
    }

    #[test]
    fn form_defaults_differ_per_variant() {
        let multi = OptionalAnswers::form_defaults(Mode::Multiclass);
        assert!(!multi.chol_check && !multi.any_healthcare);
        let binary = OptionalAnswers::form_defaults(Mode::Binary);
        assert!(binary.chol_check && binary.any_healthcare);
        assert!(!binary.diff_walk && !binary.no_doc_bc_cost);
    }

    #[test]
    fn base_values_cover_every_column() {
        let answers = RawAnswers {
            high_bp: true,
            bmi: 30.5,
            sex: Sex::Male,
            gen_hlth: 4,
            ..RawAnswers::default()
        };
        let values = answers.base_values();
        assert_eq!(values.len(), fields::ALL.len());
        for name in fields::ALL {
            assert!(values.contains_key(name), "missing {name}");
        }
        assert_eq!(values[fields::HIGH_BP], FeatureValue::Int(1));
        assert_eq!(values[fields::BMI], FeatureValue::Float(30.5));
        assert_eq!(values[fields::SEX], FeatureValue::Int(1));
        assert_eq!(values[fields::GEN_HLTH], FeatureValue::Int(4));
    }

    #[test]
    fn deserializes_flat_form_payload() {
        let payload = serde_json::json!({
            "HighBP": 1, "HighChol": false, "BMI": 27.4, "Smoker": 0,
            "Stroke": 0, "HeartDiseaseorAttack": 0, "PhysActivity": true,
            "Fruits": 1, "Veggies": 1, "HvyAlcoholConsump": 0, "GenHlth": 3,
            "Sex": 0, "Age": 7, "Education": 4, "Income": 5,
            "CholCheck": 1, "DiffWalk": 0, "NoDocbcCost": 0,
            "AnyHealthcare": 1, "MentHlth": 2, "PhysHlth": 0
        });
        let answers: RawAnswers = serde_json::from_value(payload).unwrap();
        assert!(answers.high_bp);
        assert!(answers.phys_activity);
        assert_eq!(answers.sex, Sex::Female);
        assert_eq!(answers.optional.ment_hlth, 2);
        assert!(answers.optional.chol_check);
    }

    #[test]
    fn rejects_out_of_range_flags() {
        let payload = serde_json::json!({
            "HighBP": 2, "HighChol": 0, "BMI": 27.4, "Smoker": 0,
            "Stroke": 0, "HeartDiseaseorAttack": 0, "PhysActivity": 0,
            "Fruits": 1, "Veggies": 1, "HvyAlcoholConsump": 0, "GenHlth": 3,
            "Sex": 0, "Age": 7, "Education": 4, "Income": 5,
            "CholCheck": 1, "DiffWalk": 0, "NoDocbcCost": 0,
            "AnyHealthcare": 1, "MentHlth": 2, "PhysHlth": 0
        });
        assert!(serde_json::from_value::<RawAnswers>(payload).is_err());
    }
}
