use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::routes::{ErrorResponse, error_chain_fmt};

/// A persisted feedback submission, as the admin listing exposes it.
#[derive(serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub rating: i16,
    pub improvements: Vec<String>,
    pub other_suggestion: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(thiserror::Error)]
pub enum ListError {
    #[error("Failed to fetch feedbacks.")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ListError {
    fn status_code(&self) -> StatusCode {
        match self {
            ListError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// The review listing: every submission ever made, or an error. Never a
/// partial list.
#[tracing::instrument(name = "Listing feedback submissions", skip(pool))]
pub async fn list_feedback(pool: web::Data<PgPool>) -> Result<HttpResponse, ListError> {
    let records = fetch_all_feedback(&pool)
        .await
        .context("Failed to retrieve feedback submissions from the database")?;
    Ok(HttpResponse::Ok().json(records))
}

/// Newest submissions first. The ordering is part of the store's contract;
/// callers do not re-sort.
#[tracing::instrument(name = "Fetching all feedback from the database", skip(pool))]
pub async fn fetch_all_feedback(pool: &PgPool) -> Result<Vec<FeedbackRecord>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackRecord>(
        r#"
        SELECT id, name, email, rating, improvements, other_suggestion, created_at
        FROM feedback
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        e
    })
}
