use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    entities::submission::{NewSubmission, Submission, SubmissionFilter, SubmissionStatusUpdate},
    errors::AppError,
    repositories::submission::SubmissionRepository,
};

/// Process-local submission store, used when no database is configured and in tests.
#[derive(Clone, Default)]
pub struct InMemorySubmissionRepo {
    submissions: Arc<RwLock<Vec<Submission>>>,
}

impl InMemorySubmissionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored submission, oldest first.
    pub fn snapshot(&self) -> Vec<Submission> {
        self.submissions.read().clone()
    }

    pub fn len(&self) -> usize {
        self.submissions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.read().is_empty()
    }

    fn not_found() -> AppError {
        AppError::NotFound("Submission not found".into())
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepo {
    async fn create_submission(&self, submission: &NewSubmission) -> Result<Submission, AppError> {
        let created = submission.clone().into_submission(Uuid::new_v4());
        self.submissions.write().push(created.clone());
        Ok(created)
    }

    async fn get_submission_by_id(&self, id: &Uuid) -> Result<Submission, AppError> {
        self.submissions
            .read()
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>, AppError> {
        let mut matching: Vec<Submission> = self.submissions
            .read()
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();

        matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

        Ok(matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.per_page() as usize)
            .collect())
    }

    async fn count_submissions(&self, filter: &SubmissionFilter) -> Result<i64, AppError> {
        let count = self.submissions.read().iter().filter(|s| filter.matches(s)).count();
        Ok(count as i64)
    }

    async fn update_status(&self, id: &Uuid, update: &SubmissionStatusUpdate) -> Result<Submission, AppError> {
        let mut submissions = self.submissions.write();
        let submission = submissions
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(Self::not_found)?;

        if let Some(read) = update.read {
            submission.read = read;
        }
        if let Some(replied) = update.replied {
            submission.replied = replied;
        }

        Ok(submission.clone())
    }

    async fn delete_submission(&self, id: &Uuid) -> Result<(), AppError> {
        let mut submissions = self.submissions.write();
        let before = submissions.len();
        submissions.retain(|s| &s.id != id);

        if submissions.len() == before {
            Err(Self::not_found())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn new_submission(name: &str, minutes: i64) -> NewSubmission {
        NewSubmission {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            subject: None,
            message: "Hello there, nice portfolio!".into(),
            submitted_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes),
            client_ip: None,
            user_agent: String::new(),
        }
    }

    #[tokio::test]
    async fn lists_newest_first_with_pagination() {
        let repo = InMemorySubmissionRepo::new();
        for (i, name) in ["Ada", "Grace", "Linus"].iter().enumerate() {
            repo.create_submission(&new_submission(name, i as i64)).await.unwrap();
        }

        let filter = SubmissionFilter { per_page: Some(2), ..Default::default() };
        let page = repo.list_submissions(&filter).await.unwrap();

        assert_eq!(page.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(), ["Linus", "Grace"]);
        assert_eq!(repo.count_submissions(&filter).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn status_update_only_touches_given_flags() {
        let repo = InMemorySubmissionRepo::new();
        let created = repo.create_submission(&new_submission("Ada", 0)).await.unwrap();

        let update = SubmissionStatusUpdate { read: Some(true), replied: None };
        let updated = repo.update_status(&created.id, &update).await.unwrap();

        assert!(updated.read);
        assert!(!updated.replied);
        assert_eq!(updated.message, created.message);
    }

    #[tokio::test]
    async fn deleting_unknown_submission_is_not_found() {
        let repo = InMemorySubmissionRepo::new();
        let result = repo.delete_submission(&Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
