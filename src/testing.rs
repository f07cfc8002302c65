//! In-process stand-in for an OpenAI-compatible completion endpoint.

use crate::services::{ApiSupplier, ModelService};
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

type Replies = Mutex<VecDeque<String>>;
type Prompts = Mutex<Vec<String>>;

pub struct FakeModel {
    pub url: String,
    prompts: web::Data<Prompts>,
}

impl FakeModel {
    pub fn service(&self) -> ModelService {
        ModelService::new(
            ApiSupplier::OpenAi {
                url: self.url.clone(),
                model: "fake-model".to_string(),
                api_key: "test-key".to_string(),
            },
            Duration::from_secs(5),
        )
        .expect("http client")
    }

    /// Prompts received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

async fn complete(
    body: web::Json<Value>,
    replies: web::Data<Replies>,
    prompts: web::Data<Prompts>,
) -> HttpResponse {
    let prompt = body["messages"][0]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    prompts.lock().unwrap().push(prompt);

    match replies.lock().unwrap().pop_front() {
        Some(reply) => HttpResponse::Ok().json(json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": reply } }]
        })),
        None => HttpResponse::ServiceUnavailable().body("no scripted reply left"),
    }
}

/// Serves `replies` one per request, then answers 503.
pub async fn spawn_fake_model(replies: Vec<&str>) -> FakeModel {
    let replies: web::Data<Replies> = web::Data::new(Mutex::new(
        replies.into_iter().map(String::from).collect(),
    ));
    let prompts: web::Data<Prompts> = web::Data::new(Mutex::new(Vec::new()));

    let server_prompts = prompts.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(1 << 20))
            .app_data(replies.clone())
            .app_data(server_prompts.clone())
            .route("/v1/chat/completions", web::post().to(complete))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind fake model");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    FakeModel {
        url: format!("http://{}/v1/chat/completions", addr),
        prompts,
    }
}
