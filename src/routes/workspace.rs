use crate::handlers::workspace as handlers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/workspace")
            .route("", web::get().to(handlers::snapshot))
            .route("/reset", web::post().to(handlers::reset_all))
            .route("/refined-prompt", web::post().to(handlers::set_refined_prompt)),
    );
}
