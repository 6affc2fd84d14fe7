use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::submission::{NewSubmission, Submission, SubmissionFilter, SubmissionStatusUpdate},
    errors::AppError,
    repositories::sqlx_repo::SqlxSubmissionRepo,
};

#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create_submission(&self, submission: &NewSubmission) -> Result<Submission, AppError>;
    async fn get_submission_by_id(&self, id: &Uuid) -> Result<Submission, AppError>;
    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>, AppError>;
    async fn count_submissions(&self, filter: &SubmissionFilter) -> Result<i64, AppError>;
    async fn update_status(&self, id: &Uuid, update: &SubmissionStatusUpdate) -> Result<Submission, AppError>;
    async fn delete_submission(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxSubmissionRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSubmissionRepo { pool }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &SubmissionFilter) {
    builder.push(" WHERE TRUE");

    if let Some(read) = filter.read {
        builder.push(" AND read = ").push_bind(read);
    }
    if let Some(replied) = filter.replied {
        builder.push(" AND replied = ").push_bind(replied);
    }
    if let Some(term) = filter.search_term() {
        let pattern = format!("%{}%", term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"));
        builder
            .push(" AND (name ILIKE ").push_bind(pattern.clone())
            .push(" OR email ILIKE ").push_bind(pattern.clone())
            .push(" OR COALESCE(subject, '') ILIKE ").push_bind(pattern.clone())
            .push(" OR message ILIKE ").push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl SubmissionRepository for SqlxSubmissionRepo {
    async fn create_submission(&self, submission: &NewSubmission) -> Result<Submission, AppError> {
        let created = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO contact_submissions
                (id, name, email, subject, message, submitted_at, client_ip, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.subject)
        .bind(&submission.message)
        .bind(submission.submitted_at)
        .bind(&submission.client_ip)
        .bind(&submission.user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_submission_by_id(&self, id: &Uuid) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"SELECT * FROM contact_submissions WHERE id = $1"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM contact_submissions");
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY submitted_at DESC LIMIT ")
            .push_bind(i64::from(filter.per_page()))
            .push(" OFFSET ")
            .push_bind(i64::from(filter.offset()));

        let submissions = builder
            .build_query_as::<Submission>()
            .fetch_all(&self.pool)
            .await?;

        Ok(submissions)
    }

    async fn count_submissions(&self, filter: &SubmissionFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM contact_submissions");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update_status(&self, id: &Uuid, update: &SubmissionStatusUpdate) -> Result<Submission, AppError> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE contact_submissions
            SET read = COALESCE($2, read), replied = COALESCE($3, replied)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.read)
        .bind(update.replied)
        .fetch_one(&self.pool)
        .await?;

        Ok(submission)
    }

    async fn delete_submission(&self, id: &Uuid) -> Result<(), AppError> {
        sqlx::query(r#"DELETE FROM contact_submissions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| {
                if result.rows_affected() == 0 {
                    Err(AppError::NotFound("Submission not found".into()))
                } else {
                    Ok(())
                }
            })?
    }
}
