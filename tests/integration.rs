//! Integration tests for ChurnForge

use churnforge::{predict_churn, ChurnError, ChurnLabel, CustomerRecord, ModelContext};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write a fitted-scaler artifact with realistic training statistics.
fn create_scaler_file() -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let scaler = json!({
        "mean": [40.0, 1.0, 2.0, 32.0, 65.0, 2280.0],
        "scale": [12.0, 1.5, 4.0, 24.0, 30.0, 2265.0]
    });
    fs::write(file.path(), serde_json::to_string(&scaler).unwrap()).unwrap();
    file
}

/// Write a two-tree classifier artifact.
///
/// Tree 0 splits on scaled tenure (column 8): short tenure contributes a
/// +0.9 churn margin, long tenure -0.6. Tree 1 splits on gender (column 0):
/// female -0.2, male +0.1.
fn create_model_file() -> NamedTempFile {
    let file = NamedTempFile::new().unwrap();
    let model = json!({
        "n_features": 11,
        "base_score": 0.0,
        "trees": [
            { "nodes": [
                { "feature": 8, "threshold": 0.0, "left": 1, "right": 2 },
                { "value": 0.9 },
                { "value": -0.6 }
            ] },
            { "nodes": [
                { "feature": 0, "threshold": 0.5, "left": 1, "right": 2 },
                { "value": -0.2 },
                { "value": 0.1 }
            ] }
        ]
    });
    fs::write(file.path(), serde_json::to_string(&model).unwrap()).unwrap();
    file
}

fn load_context(scaler: &NamedTempFile, model: &NamedTempFile) -> ModelContext {
    ModelContext::load(scaler.path(), model.path()).unwrap()
}

fn baseline_record() -> CustomerRecord {
    CustomerRecord {
        gender: "Male".to_string(),
        senior_citizen: "No".to_string(),
        partner: "No".to_string(),
        dependents: "No".to_string(),
        payment_method: "Electronic check".to_string(),
        age: 30.0,
        num_dependents: 0.0,
        num_referrals: 0.0,
        tenure_months: 12.0,
        monthly_charge: 50.0,
        total_charges: 600.0,
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[test]
fn test_end_to_end_churn_prediction() {
    let scaler = create_scaler_file();
    let model = create_model_file();
    let context = load_context(&scaler, &model);

    // Tenure 12 scales to (12 - 32) / 24 < 0, so tree 0 contributes 0.9;
    // male contributes 0.1. Margin 1.0.
    let prediction = predict_churn(&context, &baseline_record()).unwrap();

    assert_eq!(prediction.label, ChurnLabel::Churn);
    assert!((prediction.churn_probability - sigmoid(1.0)).abs() < 1e-9);
    assert!(
        (prediction.stay_probability() - (1.0 - prediction.churn_probability)).abs() < 1e-12
    );
    // Rendered with one decimal place this is 73.1%.
    assert_eq!(
        format!("{:.1}", prediction.churn_probability * 100.0),
        "73.1"
    );
}

#[test]
fn test_end_to_end_stay_prediction() {
    let scaler = create_scaler_file();
    let model = create_model_file();
    let context = load_context(&scaler, &model);

    let mut record = baseline_record();
    record.gender = "Female".to_string();
    record.tenure_months = 80.0; // scales to 2.0, tree 0 contributes -0.6

    let prediction = predict_churn(&context, &record).unwrap();
    assert_eq!(prediction.label, ChurnLabel::Stay);
    assert!((prediction.churn_probability - sigmoid(-0.8)).abs() < 1e-9);
}

#[test]
fn test_identical_inputs_yield_identical_predictions() {
    let scaler = create_scaler_file();
    let model = create_model_file();

    // Two independently loaded contexts and repeated calls must agree.
    let first = predict_churn(&load_context(&scaler, &model), &baseline_record()).unwrap();
    let context = load_context(&scaler, &model);
    let second = predict_churn(&context, &baseline_record()).unwrap();
    let third = predict_churn(&context, &baseline_record()).unwrap();

    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn test_probability_invariants_across_inputs() {
    let scaler = create_scaler_file();
    let model = create_model_file();
    let context = load_context(&scaler, &model);

    let mut records = Vec::new();
    for gender in ["Male", "Female"] {
        for tenure in [0.0, 12.0, 55.0, 100.0] {
            let mut record = baseline_record();
            record.gender = gender.to_string();
            record.tenure_months = tenure;
            records.push(record);
        }
    }

    for record in &records {
        let prediction = predict_churn(&context, record).unwrap();
        let churn = prediction.churn_probability;
        assert!((0.0..=1.0).contains(&churn));
        assert!((prediction.stay_probability() + churn - 1.0).abs() < 1e-12);
        assert_eq!(prediction.label == ChurnLabel::Churn, churn >= 0.5);
    }
}

#[test]
fn test_missing_scaler_halts_before_inference() {
    let model = create_model_file();

    let err = ModelContext::load(Path::new("no_such_scaler.json"), model.path()).unwrap_err();
    assert_eq!(
        err,
        ChurnError::ArtifactMissing {
            path: Path::new("no_such_scaler.json").to_path_buf(),
        }
    );
    assert!(err.is_fatal());
}

#[test]
fn test_missing_model_halts_before_inference() {
    let scaler = create_scaler_file();

    let err = ModelContext::load(scaler.path(), Path::new("no_such_model.json")).unwrap_err();
    assert!(matches!(err, ChurnError::ArtifactMissing { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_corrupt_model_artifact_is_reported() {
    let scaler = create_scaler_file();
    let model = NamedTempFile::new().unwrap();
    fs::write(model.path(), "not json at all {").unwrap();

    let err = ModelContext::load(scaler.path(), model.path()).unwrap_err();
    assert!(matches!(err, ChurnError::ArtifactCorrupt { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_scaler_with_wrong_width_is_rejected() {
    let scaler = NamedTempFile::new().unwrap();
    let narrow = json!({ "mean": [0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0] });
    fs::write(scaler.path(), serde_json::to_string(&narrow).unwrap()).unwrap();
    let model = create_model_file();

    let err = ModelContext::load(scaler.path(), model.path()).unwrap_err();
    assert!(matches!(err, ChurnError::ArtifactCorrupt { .. }));
}

#[test]
fn test_classifier_with_wrong_width_is_rejected() {
    let scaler = create_scaler_file();
    let model = NamedTempFile::new().unwrap();
    let narrow = json!({
        "n_features": 9,
        "base_score": 0.0,
        "trees": [ { "nodes": [ { "value": 0.2 } ] } ]
    });
    fs::write(model.path(), serde_json::to_string(&narrow).unwrap()).unwrap();

    let err = ModelContext::load(scaler.path(), model.path()).unwrap_err();
    assert_eq!(
        err,
        ChurnError::FeatureShape {
            expected: 11,
            actual: 9,
        }
    );
}

#[test]
fn test_unrecognized_category_leaves_context_usable() {
    let scaler = create_scaler_file();
    let model = create_model_file();
    let context = load_context(&scaler, &model);

    let mut bad = baseline_record();
    bad.payment_method = "Wire transfer".to_string();

    let err = predict_churn(&context, &bad).unwrap_err();
    assert_eq!(
        err,
        ChurnError::UnrecognizedCategory {
            field: "payment_method",
            value: "Wire transfer".to_string(),
        }
    );
    assert!(!err.is_fatal());

    // The failed request must not poison the session.
    assert!(predict_churn(&context, &baseline_record()).is_ok());
}

#[test]
fn test_out_of_range_value_is_a_per_request_error() {
    let scaler = create_scaler_file();
    let model = create_model_file();
    let context = load_context(&scaler, &model);

    let mut bad = baseline_record();
    bad.total_charges = 50000.0;

    let err = predict_churn(&context, &bad).unwrap_err();
    assert!(matches!(
        err,
        ChurnError::ValueOutOfRange {
            field: "total_charges",
            ..
        }
    ));
    assert!(!err.is_fatal());
    assert!(predict_churn(&context, &baseline_record()).is_ok());
}
