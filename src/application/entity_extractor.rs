//! Entity Extractor
//!
//! Turns recognizer output into the list of place mentions to geocode.

use crate::domain::entities::PlaceMention;
use crate::domain::errors::ExtractionError;
use crate::domain::ports::EntityRecognizer;
use std::collections::HashSet;
use std::sync::Arc;

const ARTICLE: &str = "the ";

/// Filters and normalizes recognizer spans into place mentions.
///
/// The recognizer is built once at process start and shared by every run.
pub struct EntityExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl EntityExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Extract place mentions from `text`.
    ///
    /// Keeps GPE, LOC and FAC spans, strips a leading "The ", trims, and
    /// drops empties. Mentions come back deduplicated in first-mention
    /// order.
    pub async fn extract(&self, text: &str) -> Result<Vec<PlaceMention>, ExtractionError> {
        let entities = self.recognizer.recognize(text).await?;

        let mut seen = HashSet::new();
        let mut mentions = Vec::new();

        for entity in entities.iter().filter(|e| e.label.is_geographic()) {
            let mention = normalize(&entity.text);
            if mention.is_empty() {
                continue;
            }
            if seen.insert(mention.to_string()) {
                tracing::debug!(mention, label = entity.label.as_str(), "extracted place");
                mentions.push(mention.to_string());
            }
        }

        Ok(mentions)
    }
}

/// Trim and remove a case-insensitive leading definite article.
fn normalize(text: &str) -> &str {
    let text = text.trim_start();
    match text.get(..ARTICLE.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(ARTICLE) => text[ARTICLE.len()..].trim(),
        _ => text.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::StaticRecognizer;

    fn extractor(entities: &[(&str, &str)]) -> EntityExtractor {
        EntityExtractor::new(Arc::new(StaticRecognizer::new(entities)))
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("The Hague"), "Hague");
        assert_eq!(normalize("the Alps"), "Alps");
        assert_eq!(normalize("THE Nile"), "Nile");
        assert_eq!(normalize("  Paris  "), "Paris");
        assert_eq!(normalize("Theodore"), "Theodore");
        assert_eq!(normalize("The "), "");
        assert_eq!(normalize("The"), "The");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_multibyte_boundary() {
        // Byte 4 falls inside the second "ö".
        assert_eq!(normalize("Töölö"), "Töölö");
    }

    #[tokio::test]
    async fn test_extract_keeps_place_labels_only() {
        let ex = extractor(&[
            ("Paris", "GPE"),
            ("Marie", "PERSON"),
            ("the Alps", "LOC"),
            ("Heathrow", "FAC"),
            ("UNESCO", "ORG"),
        ]);

        let mentions = ex.extract("...").await.unwrap();
        assert_eq!(mentions, vec!["Paris", "Alps", "Heathrow"]);
    }

    #[tokio::test]
    async fn test_extract_dedups_in_first_mention_order() {
        let ex = extractor(&[
            ("Paris", "GPE"),
            ("Berlin", "GPE"),
            ("Paris", "GPE"),
            ("The Berlin", "GPE"),
        ]);

        assert_eq!(ex.extract("...").await.unwrap(), vec!["Paris", "Berlin"]);
    }

    #[tokio::test]
    async fn test_extract_drops_empty_mentions() {
        let ex = extractor(&[("   ", "GPE"), ("The ", "LOC")]);
        assert!(ex.extract("...").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extract_nothing() {
        let ex = extractor(&[]);
        assert!(ex.extract("hello world").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_extract_propagates_recognizer_failure() {
        let ex = EntityExtractor::new(Arc::new(StaticRecognizer::failing()));
        assert!(matches!(
            ex.extract("Paris").await,
            Err(ExtractionError::Unavailable(_))
        ));
    }
}
