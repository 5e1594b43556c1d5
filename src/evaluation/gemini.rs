use std::time::Duration;

use genai::chat::{ChatMessage, ChatRequest};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::error::EvaluationError;
use super::prompt::{build_prompt, parse_reply};
use super::types::EvaluationOutcome;
use super::ProposalScorer;
use crate::config::Config;
use crate::embedding::gemini::{API_KEY_HEADER, CONNECT_TIMEOUT};

const MODELS_PAGE_SIZE: u32 = 1000;
const GENERATE_METHOD: &str = "generateContent";

/// Root of the versioned API under `base_url`, as `genai` expects it.
pub fn api_root(base_url: &str) -> String {
    format!("{}/v1beta/", base_url.trim_end_matches('/'))
}

/// `genai` client that authenticates with the configured key and sends every
/// request to `config.api_base_url`.
fn client_for(config: &Config) -> Client {
    let key = config.api_key.expose().to_string();
    let auth = AuthResolver::from_resolver_fn(
        move |_model: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
            Ok(Some(AuthData::from_single(key.clone())))
        },
    );

    let root = api_root(&config.api_base_url);
    let target = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            Ok(ServiceTarget {
                endpoint: Endpoint::from_owned(root.clone()),
                ..target
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth)
        .with_service_target_resolver(target)
        .build()
}

/// Rubric scorer backed by a Gemini chat model.
pub struct GeminiScorer {
    client: Client,
    model: String,
    timeout: Duration,
}

impl GeminiScorer {
    pub fn new(config: &Config) -> Self {
        Self {
            client: client_for(config),
            model: config.scoring_model.clone(),
            timeout: config.scoring_timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(super) fn client(&self) -> &Client {
        &self.client
    }

    async fn request(&self, text: &str) -> Result<String, EvaluationError> {
        if text.trim().is_empty() {
            return Err(EvaluationError::EmptyInput);
        }

        let request = ChatRequest::new(vec![ChatMessage::user(build_prompt(text))]);
        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, request, None),
        )
        .await
        .map_err(|_| EvaluationError::Timeout {
            secs: self.timeout.as_secs(),
        })?
        .map_err(|e| EvaluationError::Provider {
            reason: e.to_string(),
        })?;

        response
            .first_text()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .ok_or(EvaluationError::EmptyResponse)
    }
}

impl ProposalScorer for GeminiScorer {
    async fn evaluate(&self, text: &str) -> EvaluationOutcome {
        match self.request(text).await {
            Ok(reply) => {
                debug!(model = %self.model, reply_len = reply.len(), "Scoring reply received");
                parse_reply(&reply)
            }
            Err(e) => {
                warn!(model = %self.model, error = %e, "Proposal scoring failed");
                EvaluationOutcome::Failed(e.to_string())
            }
        }
    }
}

impl std::fmt::Debug for GeminiScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiScorer")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelListResponse {
    #[serde(default)]
    models: Vec<ModelEntry>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// One page of the `models` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPage {
    /// Chat-capable models, without the `models/` prefix.
    pub names: Vec<String>,
    pub next_page_token: Option<String>,
}

/// Parses a `models` listing body, keeping models that support `generateContent`.
pub fn parse_model_list(body: &str) -> Result<ModelPage, EvaluationError> {
    let parsed: ModelListResponse =
        serde_json::from_str(body).map_err(|e| EvaluationError::Provider {
            reason: format!("malformed model listing: {e}"),
        })?;

    let names = parsed
        .models
        .into_iter()
        .filter(|m| m.supported_generation_methods.iter().any(|g| g == GENERATE_METHOD))
        .map(|m| match m.name.strip_prefix("models/") {
            Some(short) => short.to_string(),
            None => m.name,
        })
        .collect();

    Ok(ModelPage {
        names,
        next_page_token: parsed.next_page_token.filter(|t| !t.is_empty()),
    })
}

/// Maps a non-success listing status to an [`EvaluationError`].
pub fn classify_list_status(status: StatusCode, body: &str) -> EvaluationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EvaluationError::Unauthorized {
            status: status.as_u16(),
        },
        _ => {
            let message = serde_json::from_str::<ApiErrorBody>(body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            EvaluationError::Provider {
                reason: format!("HTTP {}: {message}", status.as_u16()),
            }
        }
    }
}

/// Chat-capable Gemini models the configured key can use, sorted by name.
///
/// Queries `{api_base_url}/v1beta/models` and follows `nextPageToken` until the
/// listing is exhausted. A rejected key is [`EvaluationError::Unauthorized`].
pub async fn list_models(config: &Config) -> Result<Vec<String>, EvaluationError> {
    let client = reqwest::Client::builder()
        .timeout(config.embed_timeout)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(|e| EvaluationError::Provider {
            reason: e.to_string(),
        })?;
    let url = format!("{}models", api_root(&config.api_base_url));

    let mut names = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let mut request = client
            .get(&url)
            .header(API_KEY_HEADER, config.api_key.expose())
            .query(&[("pageSize", MODELS_PAGE_SIZE.to_string())]);
        if let Some(token) = &page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(|e| EvaluationError::Provider {
            reason: format!("GET {url}: {e}"),
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| EvaluationError::Provider {
            reason: format!("GET {url}: {e}"),
        })?;
        if !status.is_success() {
            return Err(classify_list_status(status, &body));
        }

        let page = parse_model_list(&body)?;
        debug!(models = page.names.len(), more = page.next_page_token.is_some(), "Model page received");
        names.extend(page.names);
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    names.sort();
    names.dedup();
    Ok(names)
}
