use crate::batch::{run_batch, BatchReport, FailurePolicy};
use crate::error::Result;
use crate::extractor::extract_full_text;
use crate::repository::Repository;

pub struct SearchEngine {
    repository: Repository,
}

impl SearchEngine {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// No keywords matches every document.
    pub fn search<S: AsRef<str>>(&self, keywords: &[S]) -> Result<Vec<String>> {
        self.search_with_policy(keywords, FailurePolicy::Abort)
            .map(|report| report.items)
    }

    pub fn search_best_effort<S: AsRef<str>>(&self, keywords: &[S]) -> Result<BatchReport<String>> {
        self.search_with_policy(keywords, FailurePolicy::Skip)
    }

    pub fn search_with_policy<S: AsRef<str>>(
        &self,
        keywords: &[S],
        policy: FailurePolicy,
    ) -> Result<BatchReport<String>> {
        let folded = fold_keywords(keywords);
        let documents = self.repository.store().list()?;

        run_batch(&documents, policy, |document| {
            let text = extract_full_text(document)?;
            Ok(contains_all(&text, &folded).then(|| document.filename.clone()))
        })
    }
}

pub fn fold_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| keyword.as_ref().to_lowercase())
        .collect()
}

/// `folded_terms` must already be lowercased.
pub fn contains_all(text: &str, folded_terms: &[String]) -> bool {
    let lowered = text.to_lowercase();
    folded_terms.iter().all(|term| lowered.contains(term.as_str()))
}
