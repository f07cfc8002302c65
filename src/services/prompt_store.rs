use crate::config::RedisSettings;
use crate::models::prompt::StoredPrompt;
use log::info;
use redis_async::client::{ConnectionBuilder, PairedConnection};
use redis_async::resp_array;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis_async::error::Error),
    #[error("stored prompt is not valid JSON: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub async fn connect_redis(settings: &RedisSettings) -> Result<PairedConnection, StoreError> {
    let mut builder = ConnectionBuilder::new(settings.host.as_str(), settings.port)?;
    if let Some(password) = &settings.password {
        builder.password(password.as_str());
    }
    let connection = builder.paired_connect().await?;
    info!("connected to redis at {}:{}", settings.host, settings.port);
    Ok(connection)
}

/// Insert-and-list storage for free-text prompts.
pub enum PromptStore {
    Memory(RwLock<Vec<StoredPrompt>>),
    Redis {
        connection: PairedConnection,
        key: String,
    },
}

impl PromptStore {
    pub fn memory() -> Self {
        PromptStore::Memory(RwLock::new(Vec::new()))
    }

    pub fn redis(connection: PairedConnection, key: impl Into<String>) -> Self {
        PromptStore::Redis {
            connection,
            key: key.into(),
        }
    }

    pub async fn insert(&self, prompt: String) -> Result<StoredPrompt, StoreError> {
        let stored = StoredPrompt::new(prompt);
        match self {
            PromptStore::Memory(prompts) => prompts.write().await.push(stored.clone()),
            PromptStore::Redis { connection, key } => {
                let encoded = serde_json::to_string(&stored)?;
                let _: i64 = connection
                    .send(resp_array!["RPUSH", key.as_str(), encoded])
                    .await?;
            }
        }
        Ok(stored)
    }

    /// All prompts in insertion order.
    pub async fn list(&self) -> Result<Vec<StoredPrompt>, StoreError> {
        match self {
            PromptStore::Memory(prompts) => Ok(prompts.read().await.clone()),
            PromptStore::Redis { connection, key } => {
                let encoded: Vec<String> = connection
                    .send(resp_array!["LRANGE", key.as_str(), "0", "-1"])
                    .await?;
                encoded
                    .iter()
                    .map(|item| serde_json::from_str(item).map_err(StoreError::from))
                    .collect()
            }
        }
    }
}
