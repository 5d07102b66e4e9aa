use medi_screen::{
    age_band_code, bmi_from, ExpectedSchema, LinearClassifier, Mode, OptionalAnswers, RawAnswers,
    Screener, Sex, SmokingStatus,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Binary head fit on three columns, one of them engineered
    let names: Vec<String> = ["HighBP", "BMI", "lifestyle_risk_sum"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let model = LinearClassifier::new("demo", vec![vec![1.2, 0.08, 0.4]], vec![-4.0])?
        .with_feature_names(names.clone())?;
    let screener = Screener::new(ExpectedSchema::new(names)?, Arc::new(model), Mode::Binary);

    let answers = RawAnswers {
        high_bp: true,
        high_chol: false,
        bmi: bmi_from(178.0, 94.0),
        smoker: SmokingStatus::Former.is_smoker(),
        stroke: false,
        heart_disease_or_attack: false,
        phys_activity: false,
        fruits: true,
        veggies: true,
        hvy_alcohol_consump: false,
        gen_hlth: 3,
        sex: Sex::Male,
        age: age_band_code(52),
        education: 4,
        income: 5,
        optional: OptionalAnswers::form_defaults(Mode::Binary),
    };

    let record = screener.record_for(&answers);
    println!("record={}", serde_json::to_string(&record)?);
    let result = screener.screen(&answers)?;
    println!("{result}");
    Ok(())
}
