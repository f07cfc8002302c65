pub mod agents;
pub mod prompts;
pub mod workspace;

use crate::errors::AppError;
use crate::models::agent::AgentKind;
use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse, Responder};
use serde_json::json;

pub async fn index() -> impl Responder {
    let agents: Vec<_> = AgentKind::ALL
        .iter()
        .map(|kind| json!({ "name": kind.key(), "title": kind.title(), "path": kind.path() }))
        .collect();

    HttpResponse::Ok().json(json!({
        "message": "Agent desk API",
        "version": env!("CARGO_PKG_VERSION"),
        "agents": agents,
        "endpoints": {
            "prompts": "GET|POST /user/storeMongoDb",
            "workspace": "GET /workspace, POST /workspace/reset, POST /workspace/refined-prompt",
        }
    }))
}

pub fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidBody(err).into()
}
