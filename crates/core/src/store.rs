use crate::error::{AnalyticsError, Result};
use crate::models::{DocumentFormat, StoredDocument};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Sorted by filename; batch passes rely on this order.
    pub fn list(&self) -> Result<Vec<StoredDocument>> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let filename = entry.file_name().to_str().ok_or_else(|| {
                AnalyticsError::Validation(format!(
                    "stored file name is not valid utf-8: {}",
                    entry.path().display()
                ))
            })?;

            documents.push(describe(filename, entry.path())?);
        }

        Ok(documents)
    }

    pub fn get(&self, filename: &str) -> Result<StoredDocument> {
        let path = self.resolve_path(filename)?;
        describe(filename, &path)
    }

    pub fn resolve_path(&self, filename: &str) -> Result<PathBuf> {
        validate_filename(filename)?;
        let path = self.root.join(filename);
        if path.is_file() {
            Ok(path)
        } else {
            Err(AnalyticsError::NotFound(filename.to_string()))
        }
    }

    /// Writes `content` under `filename`, replacing any previous file of that
    /// name. Returns only after the bytes are flushed to disk.
    pub fn save<R: Read>(&self, filename: &str, mut content: R) -> Result<StoredDocument> {
        validate_filename(filename)?;
        let path = self.root.join(filename);

        let mut file = File::create(&path)?;
        let written = io::copy(&mut content, &mut file)?;
        file.flush()?;
        file.sync_all()?;

        tracing::debug!(filename, bytes = written, "saved document");
        describe(filename, &path)
    }
}

fn describe(filename: &str, path: &Path) -> Result<StoredDocument> {
    let metadata = fs::metadata(path)?;

    Ok(StoredDocument {
        filename: filename.to_string(),
        path: path.to_path_buf(),
        size_bytes: metadata.len(),
        format: DocumentFormat::from_filename(filename),
        modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
    })
}

fn validate_filename(filename: &str) -> Result<()> {
    let mut components = Path::new(filename).components();
    let is_plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if filename.is_empty() || !is_plain || filename.contains(&['/', '\\'][..]) {
        return Err(AnalyticsError::Validation(format!(
            "filename must be a bare file name: {filename:?}"
        )));
    }

    Ok(())
}
