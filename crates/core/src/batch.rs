use crate::error::Result;
use crate::models::StoredDocument;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedDocument {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BatchReport<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedDocument>,
}

impl<T> BatchReport<T> {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Visits every document in order. `visit` returns `None` to leave a document
/// out of the items without counting it as skipped.
pub(crate) fn run_batch<T, F>(
    documents: &[StoredDocument],
    policy: FailurePolicy,
    mut visit: F,
) -> Result<BatchReport<T>>
where
    F: FnMut(&StoredDocument) -> Result<Option<T>>,
{
    let mut items = Vec::new();
    let mut skipped = Vec::new();

    for document in documents {
        match visit(document) {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(error) if policy == FailurePolicy::Skip => {
                tracing::warn!(filename = %document.filename, reason = %error, "skipped document");
                skipped.push(SkippedDocument {
                    filename: document.filename.clone(),
                    reason: error.to_string(),
                });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(BatchReport { items, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use crate::models::DocumentFormat;
    use std::path::PathBuf;

    fn document(filename: &str) -> StoredDocument {
        StoredDocument {
            filename: filename.to_string(),
            path: PathBuf::from(filename),
            size_bytes: 0,
            format: DocumentFormat::from_filename(filename),
            modified_at: None,
        }
    }

    fn visit(document: &StoredDocument) -> Result<Option<String>> {
        match document.filename.as_str() {
            "bad.pdf" => Err(AnalyticsError::parse("bad.pdf", "corrupt xref")),
            "hidden.txt" => Ok(None),
            name => Ok(Some(name.to_uppercase())),
        }
    }

    #[test]
    fn abort_stops_at_first_failure() {
        let documents = vec![document("a.pdf"), document("bad.pdf"), document("c.pdf")];

        let error = run_batch(&documents, FailurePolicy::Abort, visit).unwrap_err();

        assert_eq!(error.filename(), Some("bad.pdf"));
    }

    #[test]
    fn skip_reports_failures_and_keeps_order() -> Result<(), Box<dyn std::error::Error>> {
        let documents = vec![
            document("a.pdf"),
            document("bad.pdf"),
            document("hidden.txt"),
            document("c.pdf"),
        ];

        let report = run_batch(&documents, FailurePolicy::Skip, visit)?;

        assert_eq!(report.items, vec!["A.PDF".to_string(), "C.PDF".to_string()]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].filename, "bad.pdf");
        assert!(report.skipped[0].reason.contains("corrupt xref"));
        assert!(!report.is_complete());
        Ok(())
    }
}
