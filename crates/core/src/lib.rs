pub mod batch;
pub mod classifier;
pub mod error;
pub mod extractor;
pub mod models;
pub mod repository;
pub mod search;
pub mod sorter;
pub mod stats;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{BatchReport, FailurePolicy, SkippedDocument};
pub use classifier::{
    ClassifierModel, ClassifierPredictor, ClassifierTrainer, MultinomialNaiveBayes,
    TfidfVectorizer, Tokenizer,
};
pub use error::{AnalyticsError, Result};
pub use extractor::{
    extract_content, extract_full_text, extract_page_texts, extract_paragraphs, extract_title,
    PageText,
};
pub use models::{
    ClassificationResult, ClassifierOptions, DocumentFormat, ExtractedContent, StoreStatistics,
    StoredDocument, TrainingExample,
};
pub use repository::{Repository, DEFAULT_MODEL_FILE, DEFAULT_STORE_DIR};
pub use search::SearchEngine;
pub use sorter::Sorter;
pub use stats::stats;
pub use store::DocumentStore;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::write_pdf;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn invoice_and_contract_walkthrough() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let repository = Repository::in_directory(dir.path())?;
        let root = repository.store().root().to_path_buf();
        write_pdf(&root.join("a.pdf"), &[&["Invoice 100"], &["pay by friday"]])?;
        write_pdf(&root.join("b.pdf"), &[&["Contract Z"], &["parties agree"]])?;

        let matches = SearchEngine::new(repository.clone()).search(&["pay"])?;
        let sorted = Sorter::new(repository.clone()).sort_by_title()?;
        let statistics = stats(&repository)?;

        assert_eq!(matches, vec!["a.pdf"]);
        // "Contract Z" < "Invoice 100" by code point.
        assert_eq!(sorted, vec!["b.pdf", "a.pdf"]);
        assert_eq!(statistics.count, 2);
        assert_eq!(
            statistics.total_size_bytes,
            fs::metadata(root.join("a.pdf"))?.len() + fs::metadata(root.join("b.pdf"))?.len()
        );
        assert!(!repository.has_model());
        Ok(())
    }
}
