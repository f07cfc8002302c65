use crate::services::extract::ParseError;
use crate::services::prompt_store::StoreError;
use crate::services::ModelError;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid JSON body")]
    InvalidBody(#[source] JsonPayloadError),
    #[error("{context}")]
    Model {
        context: String,
        #[source]
        source: ModelError,
    },
    #[error("{context}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },
    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
    #[error("Failed to encode reply")]
    Encoding(#[from] serde_json::Error),
}

impl AppError {
    pub fn model(context: impl Into<String>, source: ModelError) -> Self {
        AppError::Model {
            context: context.into(),
            source,
        }
    }

    pub fn parse(context: impl Into<String>, source: ParseError) -> Self {
        AppError::Parse {
            context: context.into(),
            source,
        }
    }

    pub fn store(context: &'static str, source: StoreError) -> Self {
        AppError::Store { context, source }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::BadRequest(_) => None,
            AppError::InvalidBody(source) => Some(source.to_string()),
            AppError::Model { source, .. } => Some(source.to_string()),
            AppError::Parse { source, .. } => Some(source.to_string()),
            AppError::Store { source, .. } => Some(source.to_string()),
            AppError::Encoding(source) => Some(source.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self.details() {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn bad_request_has_no_details() {
        let response = AppError::BadRequest("prompt is required.".into()).error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "prompt is required." }));
    }

    #[actix_web::test]
    async fn model_failure_is_internal_error_with_details() {
        let error = AppError::model("Failed to generate project plan", ModelError::EmptyResponse);
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Failed to generate project plan");
        assert_eq!(value["details"], "model returned no text");
    }

    #[actix_web::test]
    async fn store_failures_name_the_operation() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let response = AppError::store("Failed to fetch prompts.", StoreError::Encoding(source))
            .error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Failed to fetch prompts.");
        assert!(value["details"]
            .as_str()
            .unwrap()
            .starts_with("stored prompt is not valid JSON"));
    }
}
