use actix_web::web;

use crate::handlers::{contact, home::htb_stats};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact-submit")
            .route(web::post().to(contact::submit_contact))
    );
    cfg.service(htb_stats);
}
