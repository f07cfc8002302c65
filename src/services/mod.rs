pub mod extract;
pub mod prompt_store;

use crate::config::{Config, GeminiSettings, OpenAiSettings, Provider};
use chrono::prelude::*;
use log::{debug, warn};
use redis_async::{client::PairedConnection, resp_array};
use reqwest::{header, Client};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to send request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned no text")]
    EmptyResponse,
    #[error("no model supplier configured")]
    Unconfigured,
}

pub struct ModelService {
    client: Client,
    supplier: ApiSupplier,
}

#[derive(Clone)]
pub enum ApiSupplier {
    OpenAi {
        url: String,
        model: String,
        api_key: String,
    },
    Gemini {
        redis_client: Option<PairedConnection>,
        url: String,
        model: String,
        api_key: String,
        pro_model: Option<String>,
        rate_limit_per_minute: u16,
    },
}

/// Counts calls in the current minute; true while the count stays within `rate_limit`.
async fn within_quota(redis_client: &PairedConnection, rate_limit: u16) -> bool {
    let now = Utc::now();
    let redis_key = format!("model_quota_{}", now.format("%Y-%m-%dT%H:%M"));

    let current_count: i64 = match redis_client.send(resp_array!["INCR", &redis_key]).await {
        Ok(value) => value,
        Err(e) => {
            warn!("quota counter unavailable: {}", e);
            return false;
        }
    };

    if current_count == 1 {
        let expire_timestamp = (now + chrono::Duration::minutes(1)).timestamp();
        redis_client.send_and_forget(resp_array![
            "EXPIREAT",
            &redis_key,
            expire_timestamp.to_string()
        ]);
    }

    current_count <= rate_limit as i64
}

impl ApiSupplier {
    pub fn from_config(config: &Config, redis_client: Option<PairedConnection>) -> Option<Self> {
        match config.provider {
            Provider::Gemini => config.gemini.clone().map(|settings| {
                let GeminiSettings {
                    url,
                    api_key,
                    model,
                    pro_model,
                    rate_limit_per_minute,
                } = settings;
                ApiSupplier::Gemini {
                    redis_client,
                    url,
                    model,
                    api_key,
                    pro_model,
                    rate_limit_per_minute,
                }
            }),
            Provider::OpenAi => config.openai.clone().map(|settings| {
                let OpenAiSettings {
                    url,
                    api_key,
                    model,
                } = settings;
                ApiSupplier::OpenAi {
                    url,
                    model,
                    api_key,
                }
            }),
        }
    }

    /// Picks the preferred Gemini model while the per-minute quota allows it.
    async fn gemini_model(&self) -> Option<&str> {
        match self {
            ApiSupplier::Gemini {
                redis_client,
                model,
                pro_model,
                rate_limit_per_minute,
                ..
            } => {
                if let (Some(pro_model), Some(redis_client)) = (pro_model, redis_client) {
                    if within_quota(redis_client, *rate_limit_per_minute).await {
                        return Some(pro_model.as_str());
                    }
                }
                Some(model.as_str())
            }
            ApiSupplier::OpenAi { .. } => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ModelService {
    pub fn new(supplier: ApiSupplier, timeout: Duration) -> Result<Self, ModelError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, supplier })
    }

    pub fn from_config(
        config: &Config,
        redis_client: Option<PairedConnection>,
    ) -> Result<Self, ModelError> {
        let supplier =
            ApiSupplier::from_config(config, redis_client).ok_or(ModelError::Unconfigured)?;
        Self::new(supplier, config.model_timeout)
    }

    /// Sends a single-turn prompt and returns the trimmed reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let text = match &self.supplier {
            ApiSupplier::Gemini { url, api_key, .. } => {
                let model = self.supplier.gemini_model().await.unwrap_or_default();
                let endpoint = format!("{}/{}:generateContent", url.trim_end_matches('/'), model);
                debug!("gemini request to {}", endpoint);

                let request_body = json!({
                    "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
                });
                let response = self
                    .client
                    .post(&endpoint)
                    .header("x-goog-api-key", api_key)
                    .json(&request_body)
                    .send()
                    .await?;
                let response = check_status(response).await?;
                response.json::<GeminiResponse>().await?.text()
            }
            ApiSupplier::OpenAi {
                url,
                model,
                api_key,
            } => {
                let request_body = json!({
                    "model": model,
                    "messages": [{ "role": "user", "content": prompt }],
                });
                let response = self
                    .client
                    .post(url)
                    .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
                    .header(header::CONTENT_TYPE, "application/json")
                    .json(&request_body)
                    .send()
                    .await?;
                let response = check_status(response).await?;
                response
                    .json::<CompletionResponse>()
                    .await?
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .unwrap_or_default()
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ModelError::Status {
        status: status.as_u16(),
        body,
    })
}
