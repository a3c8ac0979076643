//! Entity Recognizer Port
//!
//! Defines the interface for named-entity recognition over free text.

use crate::domain::entities::RecognizedEntity;
use crate::domain::errors::ExtractionError;
use async_trait::async_trait;

/// Recognizer that labels spans of text.
///
/// This is an outbound port that abstracts the NER model. Implementations
/// may call a model server, run a gazetteer, or anything else that returns
/// labelled spans. Filtering to place labels happens in the caller.
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Label every entity in `text`, in order of appearance.
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, ExtractionError>;
}
