use crate::handlers::prompts as handlers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/user/storeMongoDb")
            .route(web::post().to(handlers::store_prompt))
            .route(web::get().to(handlers::list_prompts)),
    );
}
