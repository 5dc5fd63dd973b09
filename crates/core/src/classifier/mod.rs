pub mod model;
pub mod naive_bayes;
pub mod vectorizer;

pub use model::ClassifierModel;
pub use naive_bayes::MultinomialNaiveBayes;
pub use vectorizer::{SparseVector, TfidfVectorizer, Tokenizer};

use crate::batch::{run_batch, BatchReport, FailurePolicy};
use crate::error::{AnalyticsError, Result};
use crate::extractor::extract_full_text;
use crate::models::{ClassificationResult, ClassifierOptions, TrainingExample};
use crate::repository::Repository;
use chrono::Utc;

pub struct ClassifierTrainer {
    repository: Repository,
    options: ClassifierOptions,
}

impl ClassifierTrainer {
    pub fn new(repository: Repository) -> Self {
        Self::with_options(repository, ClassifierOptions::default())
    }

    pub fn with_options(repository: Repository, options: ClassifierOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    pub fn train_from_lists<F, L>(&self, files: &[F], labels: &[L]) -> Result<ClassifierModel>
    where
        F: AsRef<str>,
        L: AsRef<str>,
    {
        if files.len() != labels.len() {
            return Err(AnalyticsError::Validation(format!(
                "each file needs a label: got {} files and {} labels",
                files.len(),
                labels.len()
            )));
        }

        let examples = files
            .iter()
            .zip(labels)
            .map(|(file, label)| TrainingExample::new(file.as_ref(), label.as_ref()))
            .collect::<Vec<_>>();

        self.train(&examples)
    }

    /// Fits a new model and replaces the saved one. Nothing is written unless
    /// every example resolves and extracts.
    pub fn train(&self, examples: &[TrainingExample]) -> Result<ClassifierModel> {
        if examples.is_empty() {
            return Err(AnalyticsError::Validation(
                "at least one training example is required".to_string(),
            ));
        }
        let alpha = self.options.smoothing_alpha;
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(AnalyticsError::Validation(format!(
                "smoothing alpha must be positive, got {alpha}"
            )));
        }

        let store = self.repository.store();
        let mut texts = Vec::with_capacity(examples.len());
        let mut labels = Vec::with_capacity(examples.len());
        for example in examples {
            let document = store.get(&example.filename)?;
            texts.push(extract_full_text(&document)?);
            labels.push(example.label.clone());
        }

        let tokenizer = Tokenizer::new()?;
        let vectorizer = TfidfVectorizer::fit(&tokenizer, &texts)?;
        let rows = texts
            .iter()
            .map(|text| vectorizer.transform(&tokenizer, text))
            .collect::<Vec<_>>();
        let classifier = MultinomialNaiveBayes::fit(&rows, &labels, vectorizer.len(), alpha)?;

        let model = ClassifierModel {
            trained_at: Utc::now(),
            training_documents: examples.len(),
            options: self.options,
            vectorizer,
            classifier,
        };
        model.save(self.repository.model_path())?;

        tracing::info!(
            documents = examples.len(),
            labels = model.labels().len(),
            "trained classifier"
        );
        Ok(model)
    }
}

pub struct ClassifierPredictor {
    repository: Repository,
}

impl ClassifierPredictor {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Tells "no model yet" apart from "no documents" when `classify_all`
    /// returns nothing.
    pub fn is_trained(&self) -> bool {
        self.repository.has_model()
    }

    pub fn load_model(&self) -> Result<Option<ClassifierModel>> {
        ClassifierModel::load(self.repository.model_path())
    }

    pub fn classify_all(&self) -> Result<Vec<ClassificationResult>> {
        self.classify_with_policy(FailurePolicy::Abort)
            .map(|report| report.items)
    }

    pub fn classify_all_best_effort(&self) -> Result<BatchReport<ClassificationResult>> {
        self.classify_with_policy(FailurePolicy::Skip)
    }

    pub fn classify_with_policy(
        &self,
        policy: FailurePolicy,
    ) -> Result<BatchReport<ClassificationResult>> {
        let Some(model) = self.load_model()? else {
            tracing::debug!(
                path = %self.repository.model_path().display(),
                "no classifier model saved"
            );
            return Ok(BatchReport {
                items: Vec::new(),
                skipped: Vec::new(),
            });
        };

        let tokenizer = Tokenizer::new()?;
        let documents = self.repository.store().list()?;

        run_batch(&documents, policy, |document| {
            let text = extract_full_text(document)?;
            Ok(Some(ClassificationResult {
                filename: document.filename.clone(),
                label: model.predict_with(&tokenizer, &text),
            }))
        })
    }
}
