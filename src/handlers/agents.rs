use crate::agents::AgentService;
use crate::errors::AppError;
use crate::models::agent::AgentKind;
use crate::models::chat::ChatRequest;
use actix_web::{web, HttpResponse};
use log::error;
use serde_json::json;

pub async fn info(kind: web::Data<AgentKind>) -> HttpResponse {
    let path = kind.path();
    HttpResponse::Ok().json(json!({
        "message": kind.title(),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "chat": format!("POST {}/chat", path),
            "history": format!("GET {}/history", path),
            "reset": format!("POST {}/reset", path),
        }
    }))
}

pub async fn chat(
    kind: web::Data<AgentKind>,
    agents: web::Data<AgentService>,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
    let kind = *kind.get_ref();
    match agents.chat(kind, &body.message).await {
        Ok(reply) => Ok(HttpResponse::Ok().json(reply)),
        Err(e) => {
            error!("Error in {} chat: {}", kind.key(), e);
            Err(e)
        }
    }
}

pub async fn reset(kind: web::Data<AgentKind>, agents: web::Data<AgentService>) -> HttpResponse {
    agents.reset(*kind.get_ref()).await;
    HttpResponse::Ok().json(json!({ "message": "Conversation reset successfully" }))
}

pub async fn history(kind: web::Data<AgentKind>, agents: web::Data<AgentService>) -> HttpResponse {
    HttpResponse::Ok().json(agents.history(*kind.get_ref()))
}
