use crate::errors::AppError;
use crate::models::prompt::PromptRequest;
use crate::services::prompt_store::PromptStore;
use actix_web::{web, HttpResponse};
use log::{error, info};
use serde_json::json;

pub async fn store_prompt(
    body: web::Json<PromptRequest>,
    store: web::Data<PromptStore>,
) -> Result<HttpResponse, AppError> {
    let prompt = match body.into_inner().prompt {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => return Err(AppError::BadRequest("prompt is required.".to_string())),
    };

    let stored = store.insert(prompt).await.map_err(|e| {
        error!("Error storing prompt: {}", e);
        AppError::store("Failed to store prompt.", e)
    })?;
    info!("stored prompt {}", stored.id);

    Ok(HttpResponse::Created().json(json!({
        "message": "Prompt stored successfully!",
        "data": stored,
    })))
}

pub async fn list_prompts(store: web::Data<PromptStore>) -> Result<HttpResponse, AppError> {
    let prompts = store.list().await.map_err(|e| {
        error!("Error fetching prompts: {}", e);
        AppError::store("Failed to fetch prompts.", e)
    })?;

    if prompts.is_empty() {
        return Ok(HttpResponse::NotFound().json(json!({ "message": "No prompts found." })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Prompts fetched successfully!",
        "data": prompts,
    })))
}
