use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};
use std::io;

mod agents;
mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
mod store;
#[cfg(test)]
mod testing;

use agents::AgentService;
use config::Config;
use services::prompt_store::{connect_redis, PromptStore};
use services::ModelService;

/// `*` or no origin at all means any origin.
fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) if origin != "*" => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials(),
        _ => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let redis_client = match &config.redis {
        Some(settings) => match connect_redis(settings).await {
            Ok(connection) => Some(connection),
            Err(e) => {
                warn!("redis unavailable, falling back to in-memory prompt store: {}", e);
                None
            }
        },
        None => None,
    };

    let prompt_store = web::Data::new(match &redis_client {
        Some(connection) => PromptStore::redis(connection.clone(), config.prompt_store_key.as_str()),
        None => PromptStore::memory(),
    });

    let model = ModelService::from_config(&config, redis_client)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    let agent_service = web::Data::new(AgentService::new(model, config.agents));

    let client_origin = config.client_origin.clone();
    info!("listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(cors(client_origin.as_deref()))
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().error_handler(handlers::json_error))
            .app_data(prompt_store.clone())
            .app_data(agent_service.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
