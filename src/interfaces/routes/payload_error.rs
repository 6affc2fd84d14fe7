use actix_web::{
    web,
    http::StatusCode,
    error::{JsonPayloadError, QueryPayloadError, UrlencodedError},
};

use crate::{constants::MAX_FORM_BODY_BYTES, errors::AppError};

/// Renders body and query extraction failures in the same envelope as every other error.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .limit(MAX_FORM_BODY_BYTES)
            .error_handler(|err, _req| form_error(err).into())
    );
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| json_error(err).into()));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| query_error(err).into()));
}

fn form_error(err: UrlencodedError) -> AppError {
    let status = match err {
        UrlencodedError::Overflow { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        UrlencodedError::ContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::BAD_REQUEST,
    };
    AppError::MalformedPayload {
        status,
        message: format!("Form payload error: {}", err),
    }
}

fn json_error(err: JsonPayloadError) -> AppError {
    AppError::MalformedPayload {
        status: StatusCode::BAD_REQUEST,
        message: format!("JSON payload error: {}", err),
    }
}

fn query_error(err: QueryPayloadError) -> AppError {
    AppError::MalformedPayload {
        status: StatusCode::BAD_REQUEST,
        message: format!("Query error: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn form_errors_map_to_matching_statuses() {
        assert_eq!(form_error(UrlencodedError::ContentType).status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            form_error(UrlencodedError::Overflow { size: 10, limit: 5 }).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(form_error(UrlencodedError::UnknownLength).status_code(), StatusCode::BAD_REQUEST);
    }

}
