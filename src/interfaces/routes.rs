use actix_web::web;

use crate::handlers::home::home;

mod admin;
mod contact;
mod payload_error;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .configure(contact::config_routes)
            .configure(admin::config_routes)
    );

    cfg.configure(payload_error::config_routes);
}
