use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

pub const CACHE_ENV: &str = "FRAUDGATE_CACHE";
pub const MODEL_FILE_NAME: &str = "model.onnx";
const PARTIAL_SUFFIX: &str = "part";

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("Download of {url} failed with status {status}")]
    DownloadStatus { url: String, status: u16 },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model verification failed")]
    VerificationFailed,
    #[error("Hash mismatch for {name}: expected {expected}, got {actual}")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// Where a fraud model artifact comes from and what it must hash to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub name: String,
    pub url: String,
    /// Lower-case hex SHA-256 of the file.
    pub sha256: String,
}

impl ArtifactSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            sha256: sha256.into().to_ascii_lowercase(),
        }
    }
}

/// Local cache of model artifacts, laid out as `<models_dir>/<name>/model.onnx`.
#[derive(Clone, Debug)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        if let Ok(path) = env::var(CACHE_ENV) {
            return PathBuf::from(path).join("models");
        }
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("fraudgate").join("models");
        }
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("fraudgate").join("models");
        }
        env::temp_dir().join("fraudgate").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(name).join(MODEL_FILE_NAME)
    }

    fn partial_path(&self, name: &str) -> PathBuf {
        self.get_model_path(name).with_extension(format!("onnx.{}", PARTIAL_SUFFIX))
    }

    pub fn is_present(&self, name: &str) -> bool {
        let path = self.get_model_path(name);
        log::debug!("Model path: {:?} (exists: {})", path, path.exists());
        path.exists()
    }

    /// Checks the cached file against the expected hash. A missing file is `Ok(false)`.
    pub fn verify(&self, spec: &ArtifactSpec) -> Result<bool, ModelError> {
        let path = self.get_model_path(&spec.name);
        if !path.exists() {
            return Ok(false);
        }
        let bytes = fs::read(&path)?;
        let hash = sha256_hex(&bytes);
        log::debug!("{:?}: calculated {} expected {}", path, hash, spec.sha256);
        Ok(hash == spec.sha256)
    }

    /// Downloads the artifact, checks its hash and writes it into the cache.
    pub async fn fetch(&self, spec: &ArtifactSpec) -> Result<PathBuf, ModelError> {
        let _lock = self.download_lock.lock().await;
        let path = self.get_model_path(&spec.name);

        log::info!("Downloading model '{}' from {}", spec.name, spec.url);
        let response = reqwest::get(&spec.url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::DownloadStatus {
                url: spec.url.clone(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        let hash = sha256_hex(&bytes);
        if hash != spec.sha256 {
            log::error!("Hash mismatch for '{}': expected {}, got {}", spec.name, spec.sha256, hash);
            return Err(ModelError::HashMismatch {
                name: spec.name.clone(),
                expected: spec.sha256.clone(),
                actual: hash,
            });
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Readers only ever see a complete file at `path`.
        let partial = self.partial_path(&spec.name);
        if let Err(e) = fs::write(&partial, &bytes).and_then(|_| fs::rename(&partial, &path)) {
            if partial.exists() {
                if let Err(cleanup) = fs::remove_file(&partial) {
                    log::warn!("Could not remove partial download {:?}: {}", partial, cleanup);
                }
            }
            return Err(e.into());
        }

        if !self.verify(spec)? {
            if let Err(e) = self.remove(&spec.name) {
                log::warn!("Could not remove unverified model '{}': {}", spec.name, e);
            }
            return Err(ModelError::VerificationFailed);
        }

        log::info!("Model '{}' stored at {:?}", spec.name, path);
        Ok(path)
    }

    /// Returns the cached artifact path, fetching it when missing or corrupt.
    pub async fn ensure(&self, spec: &ArtifactSpec) -> Result<PathBuf, ModelError> {
        if self.verify(spec)? {
            log::info!("Model '{}' present and verified", spec.name);
            return Ok(self.get_model_path(&spec.name));
        }
        if self.is_present(&spec.name) {
            log::warn!("Model '{}' failed verification, re-downloading", spec.name);
            self.remove(&spec.name)?;
        }
        self.fetch(spec).await
    }

    /// Returns the path of an already cached artifact without touching the network.
    pub fn require(&self, name: &str) -> Result<PathBuf, ModelError> {
        if self.is_present(name) {
            Ok(self.get_model_path(name))
        } else {
            Err(ModelError::NotDownloaded(name.to_string()))
        }
    }

    pub fn remove(&self, name: &str) -> Result<(), ModelError> {
        let path = self.get_model_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
