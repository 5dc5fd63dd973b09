use super::naive_bayes::MultinomialNaiveBayes;
use super::vectorizer::{TfidfVectorizer, Tokenizer};
use crate::error::{AnalyticsError, Result};
use crate::models::ClassifierOptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifierModel {
    pub trained_at: DateTime<Utc>,
    pub training_documents: usize,
    pub options: ClassifierOptions,
    pub vectorizer: TfidfVectorizer,
    pub classifier: MultinomialNaiveBayes,
}

#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    checksum: String,
    model: Box<RawValue>,
}

impl ClassifierModel {
    pub fn predict_with(&self, tokenizer: &Tokenizer, text: &str) -> String {
        let row = self.vectorizer.transform(tokenizer, text);
        self.classifier.predict(&row).to_string()
    }

    pub fn predict(&self, text: &str) -> Result<String> {
        Ok(self.predict_with(&Tokenizer::new()?, text))
    }

    pub fn labels(&self) -> &[String] {
        self.classifier.classes()
    }

    /// Writes the model next to `path` and renames it into place, so readers
    /// see either the previous model or this one.
    pub fn save(&self, path: &Path) -> Result<()> {
        let payload = serde_json::to_string(self)?;
        let artifact = ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            checksum: digest(payload.as_bytes()),
            model: RawValue::from_string(payload)?,
        };
        let bytes = serde_json::to_vec(&artifact)?;

        let temp_path = temp_path_for(path);
        if let Some(parent) = temp_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let written = (|| {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&temp_path, path)
        })();

        if let Err(error) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(error.into());
        }

        tracing::info!(
            path = %path.display(),
            labels = self.labels().len(),
            vocabulary = self.vectorizer.len(),
            "saved classifier model"
        );
        Ok(())
    }

    /// `Ok(None)` when no model has been saved at `path`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(|error| AnalyticsError::persistence(path, error))?;
        let artifact: ModelArtifact = serde_json::from_slice(&bytes)
            .map_err(|error| AnalyticsError::persistence(path, error))?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(AnalyticsError::persistence(
                path,
                format!("unsupported format version {}", artifact.format_version),
            ));
        }

        let payload = artifact.model.get();
        if digest(payload.as_bytes()) != artifact.checksum {
            return Err(AnalyticsError::persistence(path, "checksum mismatch"));
        }

        let model: ClassifierModel = serde_json::from_str(payload)
            .map_err(|error| AnalyticsError::persistence(path, error))?;

        if !model.vectorizer.is_consistent() || !model.classifier.is_consistent(model.vectorizer.len()) {
            return Err(AnalyticsError::persistence(
                path,
                "feature dimensions do not match the classifier",
            ));
        }

        Ok(Some(model))
    }
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "model".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
}
