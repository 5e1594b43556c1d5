use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{EmbeddingError, EmbeddingProvider, Fingerprint, TaskType};
use crate::config::{ApiKey, Config};
use crate::constants::validate_embedding_dim;

pub(crate) const API_KEY_HEADER: &str = "x-goog-api-key";
pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Embedding provider backed by the `embedContent` endpoint.
///
/// The credential comes from [`Config`] and is fixed for the lifetime of the
/// embedder; nothing is read from the environment per call.
pub struct GeminiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: ApiKey,
    expected_dim: usize,
}

impl std::fmt::Debug for GeminiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiEmbedder")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("expected_dim", &self.expected_dim)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: &'static str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: Option<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

impl GeminiEmbedder {
    /// Builds the HTTP client. The request timeout matches `config.embed_timeout`;
    /// [`super::acquire_fingerprint`] applies the same bound around the whole call.
    pub fn new(config: &Config) -> Result<Self, EmbeddingError> {
        let client = reqwest::Client::builder()
            .timeout(config.embed_timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let model = qualified_model_name(&config.embedding_model);
        let endpoint = format!(
            "{}/v1beta/{}:embedContent",
            config.api_base_url.trim_end_matches('/'),
            model
        );

        info!(
            endpoint = %endpoint,
            expected_dim = config.embedding_dim,
            "Embedding provider configured"
        );

        Ok(Self {
            client,
            endpoint,
            model,
            api_key: config.api_key.clone(),
            expected_dim: config.embedding_dim,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn expected_dim(&self) -> usize {
        self.expected_dim
    }
}

impl EmbeddingProvider for GeminiEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str, task: TaskType) -> Result<Fingerprint, EmbeddingError> {
        let request = EmbedContentRequest {
            model: &self.model,
            content: Content {
                parts: vec![Part { text }],
            },
            task_type: task.as_api_str(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        debug!(status = status.as_u16(), body_len = body.len(), "Embedding response received");
        parse_embedding_response(&body, self.expected_dim)
    }
}

/// `text-embedding-004` → `models/text-embedding-004`.
pub fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

/// Maps a non-success HTTP status to an [`EmbeddingError`].
pub fn classify_status(status: StatusCode, body: &str) -> EmbeddingError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EmbeddingError::Unauthorized {
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => EmbeddingError::RateLimited,
        _ => {
            let message = serde_json::from_str::<ApiErrorBody>(body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            EmbeddingError::Provider {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Parses an `embedContent` body and checks the vector dimension.
pub fn parse_embedding_response(
    body: &str,
    expected_dim: usize,
) -> Result<Fingerprint, EmbeddingError> {
    let parsed: EmbedContentResponse =
        serde_json::from_str(body).map_err(|e| EmbeddingError::Malformed {
            reason: e.to_string(),
        })?;

    let values = parsed
        .embedding
        .ok_or_else(|| EmbeddingError::Malformed {
            reason: "response has no `embedding` field".to_string(),
        })?
        .values;

    validate_embedding_dim(expected_dim, values.len()).map_err(|e| EmbeddingError::Malformed {
        reason: e.to_string(),
    })?;

    if values.iter().any(|v| !v.is_finite()) {
        return Err(EmbeddingError::Malformed {
            reason: "embedding contains non-finite values".to_string(),
        });
    }

    Ok(Fingerprint::new(values))
}
