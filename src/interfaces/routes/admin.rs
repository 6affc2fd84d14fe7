use actix_web::web;

use crate::handlers::submissions;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/submissions")
            .service(
                web::resource("")
                    .route(web::get().to(submissions::list_submissions))
            )
            .service(
                web::resource("/{submission_id}")
                    .route(web::get().to(submissions::get_submission))
                    .route(web::patch().to(submissions::update_submission_status))
                    .route(web::delete().to(submissions::delete_submission))
            )
    );
}
