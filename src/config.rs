use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("unknown LLM_PROVIDER `{0}`, expected `gemini` or `openai`")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    OpenAi,
}

#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub pro_model: Option<String>,
    pub rate_limit_per_minute: u16,
}

#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub url: String,
    pub api_key: String,
    pub model: String,
}

/// Knobs for how agents talk to the model.
#[derive(Debug, Clone, Copy)]
pub struct AgentSettings {
    pub history_window: usize,
    pub max_questions: usize,
    pub repair_attempts: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            history_window: 6,
            max_questions: 5,
            repair_attempts: 3,
        }
    }
}

pub struct Config {
    pub host: String,
    pub port: u16,
    pub client_origin: Option<String>,
    pub provider: Provider,
    pub gemini: Option<GeminiSettings>,
    pub openai: Option<OpenAiSettings>,
    pub redis: Option<RedisSettings>,
    pub prompt_store_key: String,
    pub model_timeout: Duration,
    pub agents: AgentSettings,
}

fn parsed<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    env::var(name).map_or_else(|_| default, |value| value.parse().unwrap_or(default))
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("LLM_PROVIDER")
            .unwrap_or_else(|_| "gemini".to_string())
            .to_lowercase()
            .as_str()
        {
            "gemini" => Provider::Gemini,
            "openai" => Provider::OpenAi,
            other => return Err(ConfigError::UnknownProvider(other.to_string())),
        };

        let gemini = match non_empty("GEMINI_KEY") {
            Some(api_key) => Some(GeminiSettings {
                url: env::var("GEMINI_URL").unwrap_or_else(|_| {
                    "https://generativelanguage.googleapis.com/v1beta/models".to_string()
                }),
                api_key,
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string()),
                pro_model: non_empty("GEMINI_PRO_MODEL"),
                rate_limit_per_minute: parsed("RATE_LIMIT_PER_MINUTE", 3),
            }),
            None => None,
        };

        let openai = match non_empty("OPENAI_KEY") {
            Some(api_key) => Some(OpenAiSettings {
                url: env::var("OPENAI_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
                api_key,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            }),
            None => None,
        };

        match provider {
            Provider::Gemini if gemini.is_none() => return Err(ConfigError::Missing("GEMINI_KEY")),
            Provider::OpenAi if openai.is_none() => return Err(ConfigError::Missing("OPENAI_KEY")),
            _ => {}
        }

        let redis = non_empty("REDIS_HOST").map(|host| RedisSettings {
            host,
            port: parsed("REDIS_PORT", 6379),
            password: non_empty("REDIS_PASSWORD"),
        });

        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("SERVER_PORT", 8080),
            client_origin: non_empty("CLIENT_ORIGIN"),
            provider,
            gemini,
            openai,
            redis,
            prompt_store_key: env::var("PROMPT_STORE_KEY").unwrap_or_else(|_| "prompts".to_string()),
            model_timeout: Duration::from_secs(parsed("MODEL_TIMEOUT_SECS", 120)),
            agents: AgentSettings {
                history_window: parsed("HISTORY_WINDOW", 6),
                max_questions: parsed("MAX_QUESTIONS", 5),
                repair_attempts: parsed("JSON_REPAIR_ATTEMPTS", 3).max(1),
            },
        })
    }
}
