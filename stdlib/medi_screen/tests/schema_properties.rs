use medi_screen::{
    assemble, derive, DerivedFeature, ExpectedSchema, FeatureMap, FeatureValue, OptionalAnswers,
    RawAnswers, Sex,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn feature_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(medi_screen::answers::fields::ALL.to_vec()).prop_map(String::from),
        prop::sample::select(
            DerivedFeature::CATALOG
                .iter()
                .map(|f| f.name())
                .collect::<Vec<_>>()
        )
        .prop_map(String::from),
        "[a-z][a-z_]{0,11}",
    ]
}

fn schema_strategy() -> impl Strategy<Value = ExpectedSchema> {
    prop::collection::btree_set(feature_name(), 1..12).prop_flat_map(|set| {
        let names: Vec<String> = set.into_iter().collect();
        Just(names)
            .prop_shuffle()
            .prop_map(|names| ExpectedSchema::new(names).expect("valid schema"))
    })
}

fn value_strategy() -> impl Strategy<Value = FeatureValue> {
    prop_oneof![
        (-5i64..40).prop_map(FeatureValue::Int),
        (10.0f64..60.0).prop_map(FeatureValue::Float),
    ]
}

fn raw_strategy() -> impl Strategy<Value = RawAnswers> {
    (
        prop::array::uniform9(any::<bool>()),
        prop::array::uniform4(any::<bool>()),
        1u8..=5,
        0u8..=30,
        0u8..=30,
        12.0f64..60.0,
    )
        .prop_map(|(core, opt, gen_hlth, ment, phys, bmi)| RawAnswers {
            high_bp: core[0],
            high_chol: core[1],
            bmi,
            smoker: core[2],
            stroke: core[3],
            heart_disease_or_attack: core[4],
            phys_activity: core[5],
            fruits: core[6],
            veggies: core[7],
            hvy_alcohol_consump: core[8],
            gen_hlth,
            sex: if opt[0] { Sex::Male } else { Sex::Female },
            age: 7,
            education: 4,
            income: 5,
            optional: OptionalAnswers {
                chol_check: opt[1],
                diff_walk: opt[2],
                no_doc_bc_cost: opt[3],
                any_healthcare: true,
                ment_hlth: ment,
                phys_hlth: phys,
            },
        })
}

proptest! {
    #[test]
    fn assembled_keys_equal_schema(
        schema in schema_strategy(),
        base in prop::collection::btree_map(feature_name(), value_strategy(), 0..20),
    ) {
        let record = assemble(&schema, &base);
        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        let expected: Vec<&str> = schema.iter().collect();
        prop_assert_eq!(names, expected);

        for (name, value) in record.iter() {
            let want = base.get(name).copied().unwrap_or(FeatureValue::ZERO);
            prop_assert_eq!(value, want);
        }
    }

    #[test]
    fn derived_present_iff_in_schema(schema in schema_strategy(), raw in raw_strategy()) {
        let derived = derive(&schema, &raw);
        for feature in DerivedFeature::CATALOG {
            prop_assert_eq!(derived.contains_key(feature.name()), schema.contains(feature.name()));
        }
        let catalog: BTreeSet<&str> = DerivedFeature::CATALOG.iter().map(|f| f.name()).collect();
        prop_assert!(derived.keys().all(|k| catalog.contains(k.as_str())));
    }

    #[test]
    fn risk_sums_are_bounded(raw in raw_strategy()) {
        let cardio = DerivedFeature::CardioRiskSum.compute(&raw);
        let lifestyle = DerivedFeature::LifestyleRiskSum.compute(&raw);
        prop_assert!((0..=4).contains(&cardio));
        prop_assert!((0..=5).contains(&lifestyle));
        prop_assert_eq!(
            DerivedFeature::PoorHealth.compute(&raw),
            i64::from(raw.gen_hlth >= 4)
        );
    }
}

#[test]
fn derived_for_none_some_and_all_catalog_names() {
    let raw = RawAnswers::default();
    let all: Vec<String> = DerivedFeature::CATALOG
        .iter()
        .map(|f| f.name().to_string())
        .collect();

    let none = ExpectedSchema::new(vec!["HighBP".into(), "BMI".into()]).unwrap();
    assert!(derive(&none, &raw).is_empty());

    let some = ExpectedSchema::new(vec!["inactive".into(), "BMI".into()]).unwrap();
    let derived = derive(&some, &raw);
    assert_eq!(derived.len(), 1);
    assert_eq!(derived["inactive"], FeatureValue::Int(1));

    let every = ExpectedSchema::new(all.clone()).unwrap();
    let derived = derive(&every, &raw);
    let expected: BTreeSet<String> = all.into_iter().collect();
    assert_eq!(derived.keys().cloned().collect::<BTreeSet<_>>(), expected);
}

#[test]
fn superset_input_is_trimmed_to_schema() {
    let schema = ExpectedSchema::new(vec!["HighBP".into(), "BMI".into(), "inactive".into()]).unwrap();
    let raw = RawAnswers {
        high_bp: true,
        bmi: 30.5,
        ..RawAnswers::default()
    };
    let mut values: FeatureMap = raw.base_values();
    values.extend(derive(&schema, &raw));

    let record = assemble(&schema, &values);
    assert_eq!(record.len(), 3);
    assert_eq!(record.get("HighBP"), Some(FeatureValue::Int(1)));
    assert_eq!(record.get("BMI"), Some(FeatureValue::Float(30.5)));
    assert_eq!(record.get("inactive"), Some(FeatureValue::Int(1)));
    assert_eq!(record.get("Age"), None);
}
