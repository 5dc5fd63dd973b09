use crate::error::Result;
use crate::models::StoreStatistics;
use crate::repository::Repository;

pub fn stats(repository: &Repository) -> Result<StoreStatistics> {
    let documents = repository.store().list()?;

    Ok(StoreStatistics {
        count: documents.len(),
        total_size_bytes: documents.iter().map(|document| document.size_bytes).sum(),
    })
}
