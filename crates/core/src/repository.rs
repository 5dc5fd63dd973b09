use crate::error::Result;
use crate::store::DocumentStore;
use std::path::{Path, PathBuf};

pub const DEFAULT_STORE_DIR: &str = "cloud_storage";
pub const DEFAULT_MODEL_FILE: &str = "classifier.json";

#[derive(Debug, Clone)]
pub struct Repository {
    store: DocumentStore,
    model_path: PathBuf,
}

impl Repository {
    pub fn new(store_root: impl Into<PathBuf>, model_path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store: DocumentStore::open(store_root)?,
            model_path: model_path.into(),
        })
    }

    // The model sits beside the store directory, never inside it.
    pub fn in_directory(base: &Path) -> Result<Self> {
        Self::new(base.join(DEFAULT_STORE_DIR), base.join(DEFAULT_MODEL_FILE))
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn has_model(&self) -> bool {
        self.model_path.is_file()
    }
}
