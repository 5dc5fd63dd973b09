use crate::error::{AnalyticsError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const TOKEN_PATTERN: &str = r"\b\w\w+\b";

// `(feature index, weight)` pairs in ascending index order.
pub type SparseVector = Vec<(usize, f64)>;

pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(TOKEN_PATTERN)?,
        })
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|token| token.as_str().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit(tokenizer: &Tokenizer, texts: &[String]) -> Result<Self> {
        let tokenized = texts
            .iter()
            .map(|text| tokenizer.tokens(text))
            .collect::<Vec<_>>();

        let terms = tokenized
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<BTreeSet<_>>();
        if terms.is_empty() {
            return Err(AnalyticsError::Validation(
                "training documents contain no words to learn from".to_string(),
            ));
        }

        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.to_string(), index))
            .collect::<BTreeMap<_, _>>();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let distinct = tokens.iter().collect::<BTreeSet<_>>();
            for term in distinct {
                if let Some(&index) = vocabulary.get(term.as_str()) {
                    document_frequency[index] += 1;
                }
            }
        }

        let documents = texts.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|df| ((1.0 + documents) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Ok(Self { vocabulary, idf })
    }

    pub fn transform(&self, tokenizer: &Tokenizer, text: &str) -> SparseVector {
        let mut counts = BTreeMap::<usize, f64>::new();
        for token in tokenizer.tokens(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect::<SparseVector>();

        let norm = row.iter().map(|(_, weight)| weight * weight).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, weight) in &mut row {
                *weight /= norm;
            }
        }

        row
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.idf.len() == self.vocabulary.len()
            && self.vocabulary.values().all(|&index| index < self.idf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn tokens_are_lowercased_words_of_two_or_more_chars() -> Result<()> {
        let tokenizer = Tokenizer::new()?;
        assert_eq!(
            tokenizer.tokens("A Quick-brown fox, x 42!"),
            vec!["quick", "brown", "fox", "42"]
        );
        Ok(())
    }

    #[test]
    fn vocabulary_is_sorted_and_idf_is_smoothed() -> Result<()> {
        let tokenizer = Tokenizer::new()?;
        let vectorizer = TfidfVectorizer::fit(&tokenizer, &texts(&["apple banana", "apple cherry"]))?;

        assert_eq!(vectorizer.len(), 3);
        assert_eq!(vectorizer.vocabulary.get("apple"), Some(&0));
        assert_eq!(vectorizer.vocabulary.get("cherry"), Some(&2));
        assert!((vectorizer.idf[0] - 1.0).abs() < 1e-12);
        let rare = (3.0f64 / 2.0).ln() + 1.0;
        assert!((vectorizer.idf[1] - rare).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn rows_are_unit_length_and_ignore_unknown_terms() -> Result<()> {
        let tokenizer = Tokenizer::new()?;
        let vectorizer = TfidfVectorizer::fit(&tokenizer, &texts(&["apple banana", "apple cherry"]))?;

        let row = vectorizer.transform(&tokenizer, "banana banana apple durian");
        let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();

        assert_eq!(row.iter().map(|(index, _)| *index).collect::<Vec<_>>(), vec![0, 1]);
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(vectorizer.transform(&tokenizer, "durian").is_empty());
        Ok(())
    }

    #[test]
    fn empty_vocabulary_is_rejected() -> Result<()> {
        let tokenizer = Tokenizer::new()?;
        let result = TfidfVectorizer::fit(&tokenizer, &texts(&["", "a b c"]));
        assert!(matches!(result, Err(AnalyticsError::Validation(_))));
        Ok(())
    }
}
