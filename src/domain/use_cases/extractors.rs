use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{
    entities::client::ClientContext,
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

const MAX_SESSION_ID_LENGTH: usize = 64;

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LENGTH
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState missing in extractor");
        AppError::InternalError("Application state missing".into())
    })
}

/// Extractor for the caller's address, user agent and session.
/// A session id is minted when the request carries none (or a malformed one).
impl FromRequest for ClientContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let state = match app_state(req) {
            Ok(state) => state,
            Err(e) => return ready(Err(e.into())),
        };
        let config = &state.config;

        let ip = get_client_ip(req, config.trust_x_forwarded_for);
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let session_id = req
            .cookie(&config.session_cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|id| is_valid_session_id(id));

        ready(Ok(ClientContext::new(ip, user_agent, session_id)))
    }
}

/// Extractor for the reviewer API. Requires `Authorization: Bearer <admin token>`.
/// Returns 401 when the token is wrong, missing, or no admin token is configured.
#[derive(Debug)]
pub struct AdminAccess;

impl FromRequest for AdminAccess {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let state = match app_state(req) {
            Ok(state) => state,
            Err(e) => return ready(Err(e.into())),
        };

        let Some(expected) = state.config.admin_token.as_deref() else {
            tracing::warn!("Reviewer API called but no admin token is configured");
            return ready(Err(AppError::UnauthorizedAccess.into()));
        };

        let presented = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| {
                let (scheme, token) = value.trim().split_once(' ')?;
                scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
            });

        match presented {
            Some(token) if token == expected => ready(Ok(AdminAccess)),
            _ => ready(Err(AppError::UnauthorizedAccess.into())),
        }
    }
}
