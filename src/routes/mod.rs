pub mod agents;
pub mod prompts;
pub mod workspace;

use crate::handlers;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .configure(prompts::configure)
        .configure(workspace::configure)
        .configure(agents::configure);
}
