mod common;

use std::sync::Arc;
use std::thread;

use common::{sample_record, service_with, BrokenModel, FixedModel, NanModel};
use laptime_lib::{Error, ModelHandle, PredictionService};

#[test]
fn stubbed_model_value_is_returned_exactly() {
    let model = FixedModel::new(90.123);
    let service = service_with(model.clone());

    let result = service.predict(&sample_record()).expect("prediction succeeds");

    assert_eq!(result.predicted_lap_time_seconds, 90.123);
    let seen = model.last_seen().expect("model invoked");
    assert_eq!(seen.as_slice(), &[5.0, 10.0, 31.4, 42.1, 25.8, 0.0]);
}

#[test]
fn estimate_is_rounded_to_three_decimals() {
    let service = service_with(FixedModel::new(88.456789));
    let result = service.predict(&sample_record()).unwrap();
    assert_eq!(result.predicted_lap_time_seconds, 88.457);

    let scaled = result.predicted_lap_time_seconds * 1000.0;
    assert!((scaled - scaled.round()).abs() < 1e-6);
}

#[test]
fn prediction_is_deterministic() {
    let service = service_with(FixedModel::new(91.5));
    let first = service.predict(&sample_record()).unwrap();
    let second = service.predict(&sample_record()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn minimum_lap_number_succeeds_and_zero_fails() {
    let service = service_with(FixedModel::new(90.0));

    let mut record = sample_record();
    record.lap_number = 1;
    assert!(service.predict(&record).is_ok());

    record.lap_number = 0;
    let err = service.predict(&record).unwrap_err();
    assert!(matches!(err, Error::Validation { field: "lapNumber", .. }));
}

#[test]
fn fresh_tyres_succeed_and_negative_life_fails() {
    let service = service_with(FixedModel::new(90.0));

    let mut record = sample_record();
    record.tyre_life = 0.0;
    assert!(service.predict(&record).is_ok());

    record.tyre_life = -3.0;
    let err = service.predict(&record).unwrap_err();
    assert!(matches!(err, Error::Validation { field: "tyreLife", .. }));
}

#[test]
fn unknown_compound_is_rejected_without_invoking_model() {
    let model = FixedModel::new(90.0);
    let service = service_with(model.clone());

    for label in ["Intermediate", "Wet", "soft", ""] {
        let mut record = sample_record();
        record.compound = label.to_string();
        let err = service.predict(&record).unwrap_err();
        assert!(
            matches!(err, Error::UnknownCompound { .. }),
            "label {label:?} should be rejected, got {err:?}"
        );
    }
    assert_eq!(model.call_count(), 0);
}

#[test]
fn unavailable_model_refuses_every_request() {
    let service = PredictionService::new(ModelHandle::unavailable("model file missing"));
    assert!(!service.is_ready());

    let mut invalid = sample_record();
    invalid.lap_number = 0;

    for record in [sample_record(), invalid] {
        let err = service.predict(&record).unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { .. }));
        assert_eq!(err.kind(), "model_unavailable");
    }
}

#[test]
fn invocation_failure_surfaces_as_model_unavailable() {
    let service = service_with(Arc::new(BrokenModel));
    let err = service.predict(&sample_record()).unwrap_err();
    match err {
        Error::ModelUnavailable { reason } => assert!(reason.contains("weights corrupted")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_finite_estimate_surfaces_as_model_unavailable() {
    let service = service_with(Arc::new(NanModel));
    let err = service.predict(&sample_record()).unwrap_err();
    assert!(matches!(err, Error::ModelUnavailable { .. }));
}

#[test]
fn huge_finite_estimate_stays_finite() {
    let service = service_with(FixedModel::new(1e306));
    let result = service.predict(&sample_record()).expect("prediction succeeds");
    assert!(result.predicted_lap_time_seconds.is_finite());
    assert_eq!(result.predicted_lap_time_seconds, 1e306);

    let json = serde_json::to_string(&result).expect("serializes");
    assert!(!json.contains("null"));
}

#[test]
fn service_is_shared_across_threads() {
    let model = FixedModel::new(90.5);
    let service = service_with(model.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            thread::spawn(move || {
                let mut record = sample_record();
                record.lap_number = i + 1;
                service.predict(&record).expect("prediction succeeds")
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().expect("thread completes");
        assert_eq!(result.predicted_lap_time_seconds, 90.5);
    }
    assert_eq!(model.call_count(), 8);
}
