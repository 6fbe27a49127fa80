use std::path::PathBuf;

use fraudgate::{AppFeatures, Detector, OnnxModel, ProbabilityModel, RuntimeConfig};

const TEST_MODEL_ENV: &str = "FRAUDGATE_TEST_MODEL";

// Path of a real exported fraud model (five f32 inputs, one probability out).
fn test_model_path() -> PathBuf {
    let path = std::env::var(TEST_MODEL_ENV)
        .unwrap_or_else(|_| panic!("set {} to an ONNX fraud model to run this test", TEST_MODEL_ENV));
    PathBuf::from(path)
}

#[test]
#[ignore = "needs an ONNX model artifact; set FRAUDGATE_TEST_MODEL"]
fn test_onnx_model_returns_probability() -> Result<(), Box<dyn std::error::Error>> {
    let model = OnnxModel::load(&test_model_path(), &RuntimeConfig::default())?;

    for features in [
        AppFeatures::new(3.0, 1000, 5000, 6000, true),
        AppFeatures::new(4.8, 5_000_000, 10_000_000, 12_000_000, false),
        AppFeatures::new(0.0, 0, 0, 0, false),
    ] {
        let probability = model.predict_probability(&features.to_input())?;
        assert!((0.0..=1.0).contains(&probability), "{} is not a probability", probability);
    }
    Ok(())
}

#[test]
#[ignore = "needs an ONNX model artifact; set FRAUDGATE_TEST_MODEL"]
fn test_detector_loads_artifact_from_path() -> Result<(), Box<dyn std::error::Error>> {
    let path = test_model_path();
    let detector = Detector::builder().with_model_path(&path)?.build()?;
    assert_eq!(detector.model_path(), Some(path.as_path()));

    let features = AppFeatures::default();
    let first = detector.predict(&features)?;
    let second = detector.predict(&features)?;
    assert_eq!(first, second);
    Ok(())
}
