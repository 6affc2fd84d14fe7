use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use std::time::Duration;

use crate::constants::START_TIME;

#[get("/")]
pub async fn home() -> impl Responder {
    let uptime = Utc::now()
        .signed_duration_since(*START_TIME)
        .to_std()
        .unwrap_or_default();

    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the portfolio contact API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime": format_duration(Duration::from_secs(uptime.as_secs())).to_string(),
        "endpoints": {
            "contact": "/api/contact-submit",
            "stats": "/api/htb-stats"
        }
    }))
}

/// Static stats shown on the home page.
#[get("/htb-stats")]
pub async fn htb_stats() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "boxes_rooted": "25+"
    }))
}
