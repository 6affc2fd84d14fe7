use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    web, HttpResponse,
};
use tracing::instrument;

use crate::{
    entities::{client::ClientContext, submission::ContactForm},
    errors::AppError,
    settings::GatewayConfig,
    AppState,
};

const SESSION_MAX_AGE_DAYS: i64 = 14;

fn session_cookie(config: &GatewayConfig, session_id: &str) -> Cookie<'static> {
    Cookie::build(config.session_cookie_name.clone(), session_id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(CookieDuration::days(SESSION_MAX_AGE_DAYS))
        .finish()
}

#[instrument(skip(state, client, form), fields(client_ip = ?client.ip))]
pub async fn submit_contact(
    state: web::Data<AppState>,
    client: ClientContext,
    form: Result<web::Form<ContactForm>, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    let form = form
        .map(web::Form::into_inner)
        .map_err(AppError::from);

    let response = state.contact_handler
        .submit(&client, form)
        .await?;

    let mut builder = HttpResponse::Ok();
    if client.new_session {
        builder.cookie(session_cookie(&state.config, &client.session_id));
    }

    Ok(builder.json(response))
}
