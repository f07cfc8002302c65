use crate::agents::AgentService;
use crate::errors::AppError;
use crate::models::prompt::PromptRequest;
use actix_web::{web, HttpResponse};
use serde_json::json;

pub async fn snapshot(agents: web::Data<AgentService>) -> Result<HttpResponse, AppError> {
    let snapshot = agents.workspace().snapshot().await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

pub async fn reset_all(agents: web::Data<AgentService>) -> HttpResponse {
    agents.workspace().clear_all().await;
    HttpResponse::Ok().json(json!({ "message": "All conversations reset successfully" }))
}

pub async fn set_refined_prompt(
    agents: web::Data<AgentService>,
    body: web::Json<PromptRequest>,
) -> Result<HttpResponse, AppError> {
    let prompt = match body.into_inner().prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt,
        _ => return Err(AppError::BadRequest("prompt is required.".to_string())),
    };
    agents.workspace().set_refined_prompt(prompt.as_str()).await;
    Ok(HttpResponse::Ok().json(json!({ "refined_prompt": prompt })))
}
