use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Other,
}

impl DocumentFormat {
    pub fn from_filename(filename: &str) -> Self {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        if extension.eq_ignore_ascii_case("pdf") {
            DocumentFormat::Pdf
        } else if extension.eq_ignore_ascii_case("docx") {
            DocumentFormat::Docx
        } else {
            DocumentFormat::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub format: DocumentFormat,
    pub modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: String,
    pub full_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingExample {
    pub filename: String,
    pub label: String,
}

impl TrainingExample {
    pub fn new(filename: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationResult {
    pub filename: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StoreStatistics {
    pub count: usize,
    pub total_size_bytes: u64,
}

impl StoreStatistics {
    pub fn total_size_kb(&self) -> f64 {
        self.total_size_bytes as f64 / 1024.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassifierOptions {
    pub smoothing_alpha: f64,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            smoothing_alpha: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_derived_from_suffix_case_insensitively() {
        assert_eq!(DocumentFormat::from_filename("a.pdf"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("A.PDF"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("memo.DocX"), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_filename("memo.doc"), DocumentFormat::Other);
        assert_eq!(DocumentFormat::from_filename("notes"), DocumentFormat::Other);
        assert_eq!(DocumentFormat::from_filename(".pdf"), DocumentFormat::Other);
    }

    #[test]
    fn size_in_kb_matches_bytes() {
        let stats = StoreStatistics {
            count: 2,
            total_size_bytes: 3072,
        };
        assert_eq!(stats.total_size_kb(), 3.0);
    }
}
