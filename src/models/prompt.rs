use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoredPrompt {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub prompt: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl StoredPrompt {
    pub fn new(prompt: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt,
            created_at: Utc::now(),
        }
    }
}
