use std::sync::Arc;

use tracing::info;

use crate::{
    entities::submission::{Submission, SubmissionFilter, SubmissionListResponse, SubmissionStatusUpdate},
    errors::AppError,
    repositories::submission::SubmissionRepository,
    utils::valid_uuid::valid_uuid,
};

/// Reviewer workflow over stored submissions. Content is read-only here;
/// only the `read` and `replied` flags change.
pub struct SubmissionReviewHandler {
    pub submission_repo: Arc<dyn SubmissionRepository>,
}

impl SubmissionReviewHandler {
    pub fn new(submission_repo: Arc<dyn SubmissionRepository>) -> Self {
        SubmissionReviewHandler { submission_repo }
    }

    /// Lists submissions newest first
    pub async fn list_submissions(&self, filter: SubmissionFilter) -> Result<SubmissionListResponse, AppError> {
        let submissions = self.submission_repo.list_submissions(&filter).await?;
        let total = self.submission_repo.count_submissions(&filter).await?;

        Ok(SubmissionListResponse {
            submissions,
            total,
            page: filter.page(),
            per_page: filter.per_page(),
        })
    }

    pub async fn get_submission(&self, id: &str) -> Result<Submission, AppError> {
        let valid_id = valid_uuid(id)?;
        self.submission_repo.get_submission_by_id(&valid_id).await
    }

    pub async fn update_status(
        &self,
        id: &str,
        update: SubmissionStatusUpdate,
    ) -> Result<Submission, AppError> {
        let valid_id = valid_uuid(id)?;

        if update.read.is_none() && update.replied.is_none() {
            return self.submission_repo.get_submission_by_id(&valid_id).await;
        }

        let submission = self.submission_repo.update_status(&valid_id, &update).await?;
        info!(submission_id = %submission.id, read = submission.read, replied = submission.replied, "Submission status updated");
        Ok(submission)
    }

    pub async fn delete_submission(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.submission_repo.delete_submission(&valid_id).await?;
        info!(submission_id = %valid_id, "Submission deleted");
        Ok(())
    }
}
