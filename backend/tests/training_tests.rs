//! Model bootstrap tests

use crop_advisor::external::CsvMarketProvider;
use crop_advisor::services::{load_training_set, train_price_models, train_suitability_model};
use shared::features::{CROP_FEATURE_DIM, CROP_FEATURE_NAMES};

fn training_csv(rows: &[(&[f64], &str)]) -> String {
    let mut out = CROP_FEATURE_NAMES.join(",");
    out.push_str(",crop\n");
    for (values, label) in rows {
        let fields: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        out.push_str(&fields.join(","));
        out.push(',');
        out.push_str(label);
        out.push('\n');
    }
    out
}

// ============================================================================
// Price models
// ============================================================================

#[test]
fn test_price_models_need_two_records() {
    let csv = "\
date,crop,region,price,demand_index,supply_index
2024-01-01,rice,,300,0.6,0.4
2024-02-01,rice,,310,0.6,0.4
2024-01-01,cotton,,900,0.5,0.5
";
    let market = CsvMarketProvider::from_reader(csv.as_bytes()).unwrap();
    let crops = vec!["rice".to_string(), "cotton".to_string(), "maize".to_string()];
    let models = train_price_models(&market, &crops, None);

    assert!(models.is_trained("rice"));
    assert!(!models.is_trained("cotton"));
    assert!(!models.is_trained("maize"));
}

// ============================================================================
// Suitability training set
// ============================================================================

#[test]
fn test_suitability_model_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training.csv");
    let rice = vec![1.0; CROP_FEATURE_DIM];
    let wheat = vec![0.0; CROP_FEATURE_DIM];
    std::fs::write(
        &path,
        training_csv(&[(rice.as_slice(), "rice"), (wheat.as_slice(), "wheat")]),
    )
    .unwrap();

    let (x, y) = load_training_set(&path).unwrap();
    assert_eq!(x.len(), 2);
    assert_eq!(x[0].len(), CROP_FEATURE_DIM);
    assert_eq!(y, vec!["rice".to_string(), "wheat".to_string()]);

    let model = train_suitability_model(&path).unwrap();
    assert!(model.is_trained());
    assert_eq!(model.predict_best_crops(&rice, 1).unwrap(), vec!["rice".to_string()]);
}

#[test]
fn test_training_header_must_match_feature_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training.csv");
    let mut names: Vec<&str> = CROP_FEATURE_NAMES.to_vec();
    names.swap(0, 1);
    std::fs::write(&path, format!("{},crop\n", names.join(","))).unwrap();

    assert!(load_training_set(&path).is_err());
}

#[test]
fn test_training_rejects_non_numeric_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training.csv");
    let mut csv = training_csv(&[]);
    let mut fields = vec!["1.0".to_string(); CROP_FEATURE_DIM];
    fields[3] = "windy".to_string();
    csv.push_str(&format!("{},rice\n", fields.join(",")));
    std::fs::write(&path, csv).unwrap();

    assert!(load_training_set(&path).is_err());
}
