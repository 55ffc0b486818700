//! External Buy/Sell classifier.
//!
//! The model itself lives outside this process; [`RemoteClassifier`] posts
//! the latest feature vector to it over HTTP.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::services::analysis::latest::round_to;
use crate::services::analysis::FeatureVector;

/// Predicted label with the model's probability for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    pub signal: String,
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Missing features: {0}")]
    Features(String),

    #[error("Classifier request failed: {0}")]
    Http(String),

    #[error("Classifier returned {0}")]
    Status(u16),

    #[error("Invalid classifier response: {0}")]
    Parse(String),
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, features: &FeatureVector) -> Result<ClassifierVerdict, ClassifierError>;
}

#[derive(Debug, Serialize)]
struct ClassifyRequest {
    features: serde_json::Value,
}

/// HTTP client for a classifier service answering
/// `POST {"features": {...}}` with `{"signal", "confidence"}`.
pub struct RemoteClassifier {
    client: Client,
    url: String,
}

impl RemoteClassifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, features: &FeatureVector) -> Result<ClassifierVerdict, ClassifierError> {
        let body = ClassifyRequest {
            features: features.to_json(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::Status(response.status().as_u16()));
        }

        let verdict: ClassifierVerdict = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        debug!("Classifier verdict: {} ({})", verdict.signal, verdict.confidence);
        Ok(ClassifierVerdict {
            confidence: round_to(verdict.confidence, 2),
            ..verdict
        })
    }
}
