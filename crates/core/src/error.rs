use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to parse {filename}: {reason}")]
    Parse { filename: String, reason: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("classifier model at {path} is unusable: {reason}")]
    Persistence { path: String, reason: String },
}

impl AnalyticsError {
    pub fn parse(filename: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            filename: filename.into(),
            reason: reason.to_string(),
        }
    }

    pub fn persistence(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Persistence {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Parse { filename, .. } => Some(filename),
            Self::NotFound(filename) => Some(filename),
            _ => None,
        }
    }
}

pub type Result<T, E = AnalyticsError> = std::result::Result<T, E>;
