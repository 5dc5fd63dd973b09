use crate::batch::{run_batch, BatchReport, FailurePolicy};
use crate::error::Result;
use crate::extractor::extract_title;
use crate::repository::Repository;

pub struct Sorter {
    repository: Repository,
}

impl Sorter {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub fn sort_by_title(&self) -> Result<Vec<String>> {
        self.sort_with_policy(FailurePolicy::Abort)
            .map(|report| report.items)
    }

    pub fn sort_by_title_best_effort(&self) -> Result<BatchReport<String>> {
        self.sort_with_policy(FailurePolicy::Skip)
    }

    pub fn sort_with_policy(&self, policy: FailurePolicy) -> Result<BatchReport<String>> {
        let documents = self.repository.store().list()?;
        let titled = run_batch(&documents, policy, |document| {
            Ok(Some((extract_title(document)?, document.filename.clone())))
        })?;

        let mut items = titled.items;
        // `sort_by` is stable; ties stay in enumeration order.
        items.sort_by(|(left, _), (right, _)| left.cmp(right));

        Ok(BatchReport {
            items: items.into_iter().map(|(_, filename)| filename).collect(),
            skipped: titled.skipped,
        })
    }
}
