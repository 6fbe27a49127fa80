mod common;

use std::path::PathBuf;

use common::serve_once;
use fraudgate::{ArtifactSpec, ModelError, ModelManager};

// SHA-256 of b"onnx-bytes"
fn artifact_hash() -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(b"onnx-bytes"))
}

fn scratch(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fraudgate-test-{}-{}", tag, std::process::id()))
}

#[tokio::test]
async fn test_fetch_verifies_and_stores() -> Result<(), Box<dyn std::error::Error>> {
    let (base, _server) = serve_once(200, "application/octet-stream", "onnx-bytes", None).await;
    let manager = ModelManager::new(scratch("fetch"))?;
    let spec = ArtifactSpec::new("fraud-ann", format!("{}/model.onnx", base), artifact_hash());
    manager.remove(&spec.name)?;

    let path = tokio_test::assert_ok!(manager.ensure(&spec).await);
    assert!(path.ends_with("fraud-ann/model.onnx"));
    assert!(!path.with_extension("onnx.part").exists());
    assert_eq!(std::fs::read(&path)?, b"onnx-bytes");
    assert!(manager.verify(&spec)?);

    // Already present and valid: no second request is made (the server only answers once).
    assert_eq!(manager.ensure(&spec).await?, path);
    Ok(())
}

#[tokio::test]
async fn test_hash_mismatch_leaves_nothing_behind() -> Result<(), Box<dyn std::error::Error>> {
    let (base, _server) = serve_once(200, "application/octet-stream", "tampered", None).await;
    let manager = ModelManager::new(scratch("mismatch"))?;
    let spec = ArtifactSpec::new("fraud-ann", format!("{}/model.onnx", base), artifact_hash());
    manager.remove(&spec.name)?;

    let err = tokio_test::assert_err!(manager.fetch(&spec).await);
    assert!(matches!(err, ModelError::HashMismatch { .. }));
    assert!(!manager.is_present(&spec.name));
    assert!(!manager.get_model_path(&spec.name).with_extension("onnx.part").exists());
    Ok(())
}

#[tokio::test]
async fn test_download_status_error() -> Result<(), Box<dyn std::error::Error>> {
    let (base, _server) = serve_once(404, "text/plain", "missing", None).await;
    let manager = ModelManager::new(scratch("status"))?;
    let spec = ArtifactSpec::new("fraud-ann", format!("{}/model.onnx", base), artifact_hash());

    let err = manager.fetch(&spec).await.unwrap_err();
    assert!(matches!(err, ModelError::DownloadStatus { status: 404, .. }));
    Ok(())
}

#[test]
fn test_default_models_dir_honours_env() {
    std::env::set_var("FRAUDGATE_CACHE", "/tmp/fraudgate-cache-test");
    let path = ModelManager::get_default_models_dir();
    assert_eq!(path, PathBuf::from("/tmp/fraudgate-cache-test/models"));
    std::env::remove_var("FRAUDGATE_CACHE");

    let path = ModelManager::get_default_models_dir();
    assert!(path.to_string_lossy().contains("fraudgate"));
}
