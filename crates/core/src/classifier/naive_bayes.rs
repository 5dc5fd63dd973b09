use super::vectorizer::SparseVector;
use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultinomialNaiveBayes {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `[class][feature]` smoothed log likelihoods.
    feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNaiveBayes {
    pub fn fit(
        rows: &[SparseVector],
        labels: &[String],
        features: usize,
        alpha: f64,
    ) -> Result<Self> {
        if rows.len() != labels.len() || rows.is_empty() {
            return Err(AnalyticsError::Validation(format!(
                "{} feature rows for {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(AnalyticsError::Validation(format!(
                "smoothing alpha must be positive, got {alpha}"
            )));
        }

        let classes = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0f64; features]; classes.len()];
        for (row, label) in rows.iter().zip(labels) {
            let class = classes
                .binary_search(label)
                .map_err(|_| AnalyticsError::Validation(format!("unknown label {label}")))?;
            class_count[class] += 1;
            for &(index, weight) in row {
                feature_count[class][index] += weight;
            }
        }

        let total = rows.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect();

        let smoothed_features = alpha * features as f64;
        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let denominator = (counts.iter().sum::<f64>() + smoothed_features).ln();
                counts
                    .into_iter()
                    .map(|count| (count + alpha).ln() - denominator)
                    .collect()
            })
            .collect();

        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    pub fn joint_log_likelihood(&self, row: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| {
                prior
                    + row
                        .iter()
                        .map(|&(index, weight)| weight * log_prob[index])
                        .sum::<f64>()
            })
            .collect()
    }

    /// Most probable class; ties go to the class that sorts first.
    pub fn predict(&self, row: &SparseVector) -> &str {
        let scores = self.joint_log_likelihood(row);
        let mut best = 0;
        for (class, score) in scores.iter().enumerate() {
            if *score > scores[best] {
                best = class;
            }
        }
        &self.classes[best]
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub(crate) fn is_consistent(&self, features: usize) -> bool {
        !self.classes.is_empty()
            && self.class_log_prior.len() == self.classes.len()
            && self.feature_log_prob.len() == self.classes.len()
            && self.feature_log_prob.iter().all(|row| row.len() == features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn separable_rows_predict_their_own_label() -> Result<()> {
        let rows = vec![vec![(0, 1.0)], vec![(1, 1.0)], vec![(0, 0.6), (2, 0.8)]];
        let model = MultinomialNaiveBayes::fit(&rows, &labels(&["invoice", "contract", "invoice"]), 3, 1.0)?;

        assert_eq!(model.classes(), ["contract", "invoice"]);
        assert_eq!(model.predict(&vec![(0, 1.0)]), "invoice");
        assert_eq!(model.predict(&vec![(1, 1.0)]), "contract");
        Ok(())
    }

    #[test]
    fn empty_row_falls_back_to_prior() -> Result<()> {
        let rows = vec![vec![(0, 1.0)], vec![(1, 1.0)], vec![(1, 1.0)]];
        let model = MultinomialNaiveBayes::fit(&rows, &labels(&["a", "b", "b"]), 2, 1.0)?;

        assert_eq!(model.predict(&Vec::new()), "b");
        Ok(())
    }

    #[test]
    fn ties_resolve_to_first_sorted_class() -> Result<()> {
        let rows = vec![vec![(0, 1.0)], vec![(0, 1.0)]];
        let model = MultinomialNaiveBayes::fit(&rows, &labels(&["zeta", "alpha"]), 1, 1.0)?;

        assert_eq!(model.predict(&vec![(0, 1.0)]), "alpha");
        Ok(())
    }

    #[test]
    fn non_positive_alpha_is_rejected() {
        let rows = vec![vec![(0, 1.0)]];
        let result = MultinomialNaiveBayes::fit(&rows, &labels(&["a"]), 1, 0.0);
        assert!(matches!(result, Err(AnalyticsError::Validation(_))));
    }
}
