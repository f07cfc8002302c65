use crate::handlers::agents as handlers;
use crate::models::agent::AgentKind;
use actix_web::{web, Scope};

pub fn agent_routes(kind: AgentKind) -> Scope {
    web::scope(kind.path())
        .app_data(web::Data::new(kind))
        .route("", web::get().to(handlers::info))
        .route("/chat", web::post().to(handlers::chat))
        .route("/reset", web::post().to(handlers::reset))
        .route("/history", web::get().to(handlers::history))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    for kind in AgentKind::ALL {
        cfg.service(agent_routes(kind));
    }
}
