//! HTTP Entity Recognizer Adapter
//!
//! Implements EntityRecognizer by posting text to an NER model server
//! (a spaCy REST wrapper or compatible).

use crate::domain::entities::RecognizedEntity;
use crate::domain::errors::ExtractionError;
use crate::domain::ports::EntityRecognizer;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    text: &'a str,
}

/// Accepted response shapes: a bare list, or a list wrapped under `ents`
/// or `entities`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecognizeResponse {
    List(Vec<RecognizedEntity>),
    Wrapped {
        #[serde(alias = "entities")]
        ents: Vec<RecognizedEntity>,
    },
}

impl RecognizeResponse {
    fn into_entities(self) -> Vec<RecognizedEntity> {
        match self {
            Self::List(entities) | Self::Wrapped { ents: entities } => entities,
        }
    }
}

/// Recognizer calling `POST {url}` with `{"text": ...}`.
pub struct HttpEntityRecognizer {
    url: String,
    client: reqwest::Client,
}

impl HttpEntityRecognizer {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl EntityRecognizer for HttpEntityRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedEntity>, ExtractionError> {
        let response = self
            .client
            .post(&self.url)
            .json(&RecognizeRequest { text })
            .send()
            .await
            .map_err(|e| ExtractionError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status(status.as_u16()));
        }

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::Malformed(e.to_string()))?;

        Ok(body.into_entities())
    }
}
