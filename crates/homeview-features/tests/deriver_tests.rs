//! Behavioral tests for the feature deriver

use chrono::NaiveDate;
use homeview_features::*;
use rstest::rstest;

fn house(yr_built: i32, sqft_basement: f64, yr_renovated: i32, bathrooms: f64, month: u32) -> HouseRecord {
    HouseRecord {
        id: None,
        date: NaiveDate::from_ymd_opt(2014, month, 15).unwrap(),
        price: 450_000.0,
        bathrooms,
        floors: 2.0,
        waterfront: false,
        sqft_lot: 7200.0,
        sqft_basement,
        yr_built,
        yr_renovated,
        zipcode: 98001,
        condition: 3,
        lat: 47.3,
        long: -122.2,
    }
}

fn sample_dataset() -> Vec<HouseRecord> {
    vec![
        house(1900, 0.0, 0, 1.0, 1),
        house(1954, 400.0, 1991, 2.25, 3),
        house(1955, 0.0, 0, 3.0, 6),
        house(2010, 910.0, 0, 2.5, 9),
        house(1987, 0.0, 2002, 7.0, 12),
    ]
}

// === Age and basement ===

#[rstest]
#[case(1900, AgeClass::Old)]
#[case(1954, AgeClass::Old)]
#[case(1955, AgeClass::New)]
#[case(2015, AgeClass::New)]
fn test_age_house(#[case] yr_built: i32, #[case] expected: AgeClass) {
    let features = FeatureDeriver::new().derive(&house(yr_built, 0.0, 0, 1.0, 1));
    assert_eq!(features.age_house, expected);
}

#[test]
fn test_age_and_basement_over_dataset() {
    let deriver = FeatureDeriver::new();
    for record in sample_dataset() {
        let features = deriver.derive(&record);
        assert_eq!(
            features.age_house.as_str() == "old",
            record.yr_built < 1955,
            "yr_built {}",
            record.yr_built
        );
        assert_eq!(
            features.basement.as_str() == "yes",
            record.sqft_basement > 0.0,
            "sqft_basement {}",
            record.sqft_basement
        );
    }
}

#[rstest]
#[case(0, YesNo::No)]
#[case(1991, YesNo::Yes)]
fn test_is_renovated(#[case] yr_renovated: i32, #[case] expected: YesNo) {
    let features = FeatureDeriver::new().derive(&house(1990, 0.0, yr_renovated, 1.0, 1));
    assert_eq!(features.is_renovated, expected);
}

// === Season ===

#[rstest]
#[case(12, Season::Winter)]
#[case(1, Season::Winter)]
#[case(2, Season::Winter)]
#[case(3, Season::Spring)]
#[case(5, Season::Spring)]
#[case(6, Season::Summer)]
#[case(8, Season::Summer)]
#[case(9, Season::Fall)]
#[case(11, Season::Fall)]
fn test_season_from_month(#[case] month: u32, #[case] expected: Season) {
    assert_eq!(Season::from_month(month), Some(expected));

    let features = FeatureDeriver::new().derive(&house(1990, 0.0, 0, 1.0, month));
    assert_eq!(features.season, expected);
    assert_eq!(features.month, month);
}

// === Bathrooms ===

#[rstest]
#[case(3.0, "yes")]
#[case(0.0, "yes")]
#[case(8.0, "yes")]
#[case(2.5, "no")]
#[case(0.75, "no")]
#[case(7.75, "no")]
#[case(7.0, "unknown")]
#[case(1.1, "unknown")]
fn test_complete_bathroom(#[case] bathrooms: f64, #[case] expected: &str) {
    assert_eq!(BathroomClass::classify(bathrooms).as_str(), expected);
}

// === Purity ===

#[test]
fn test_reapply_is_idempotent() {
    let deriver = FeatureDeriver::new();
    let augmented = deriver.augment_all(sample_dataset());

    for record in &augmented {
        let again = deriver.reapply(record);
        assert_eq!(&again, record);
        assert_eq!(deriver.reapply(&again), again);
    }
}

#[test]
fn test_order_independent() {
    let deriver = FeatureDeriver::new();
    let forward = deriver.augment_all(sample_dataset());

    let mut reversed_input = sample_dataset();
    reversed_input.reverse();
    let mut reversed = deriver.augment_all(reversed_input);
    reversed.reverse();

    assert_eq!(forward, reversed);
}

#[test]
fn test_augment_preserves_inputs() {
    let deriver = FeatureDeriver::new();
    let inputs = sample_dataset();
    let augmented = deriver.augment_all(inputs.clone());

    assert_eq!(augmented.len(), inputs.len());
    for (input, output) in inputs.iter().zip(augmented.iter()) {
        assert_eq!(input, &output.record);
    }
}
