use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::submission::{SubmissionFilter, SubmissionStatusUpdate},
    errors::AppError,
    use_cases::extractors::AdminAccess,
    AppState,
};

#[instrument(skip(_admin, state))]
pub async fn list_submissions(
    _admin: AdminAccess,
    state: web::Data<AppState>,
    query: web::Query<SubmissionFilter>,
) -> Result<impl Responder, AppError> {
    let response = state.review_handler
        .list_submissions(query.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(_admin, state))]
pub async fn get_submission(
    _admin: AdminAccess,
    submission_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let submission = state.review_handler.get_submission(&submission_id).await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[instrument(skip(_admin, state, data))]
pub async fn update_submission_status(
    _admin: AdminAccess,
    submission_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<SubmissionStatusUpdate>,
) -> Result<impl Responder, AppError> {
    let submission = state.review_handler
        .update_status(&submission_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(submission))
}

#[instrument(skip(_admin, state))]
pub async fn delete_submission(
    _admin: AdminAccess,
    submission_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.review_handler.delete_submission(&submission_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
