use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use anyhow::Context;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{FeedbackEmail, FeedbackName, FeedbackRating, NewFeedback};
use crate::routes::{ErrorResponse, error_chain_fmt};

/// The raw submission, exactly as the form posts it.
///
/// Every field is defaulted so that a missing input turns into the same
/// "required fields" validation error an empty input produces, instead of a
/// deserialization failure with a different body shape.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub rating: i16,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub other_suggestion: Option<String>,
}

impl TryFrom<FeedbackData> for NewFeedback {
    type Error = String;

    fn try_from(data: FeedbackData) -> Result<Self, Self::Error> {
        // Same first gate as the form itself: all three mandatory inputs must
        // be present before any finer checks run. A rating of zero means the
        // visitor never picked a star.
        if data.name.trim().is_empty() || data.email.trim().is_empty() || data.rating == 0 {
            return Err("Name, email, and rating are required fields.".into());
        }
        let rating = FeedbackRating::parse(data.rating)?;
        let email = FeedbackEmail::parse(data.email)?;
        let name = FeedbackName::parse(data.name)?;
        let other_suggestion = data
            .other_suggestion
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Ok(Self {
            name,
            email,
            rating,
            improvements: data.improvements,
            other_suggestion,
        })
    }
}

#[derive(thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    ValidationError(String),
    #[error("An error occurred while submitting your feedback. Please try again.")]
    UnexpectedError(#[from] anyhow::Error),
}

// Same logic to get the full error chain on `Debug`
impl std::fmt::Debug for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubmissionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubmissionError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

#[derive(serde::Serialize)]
pub struct SubmissionResponse {
    pub message: String,
    pub id: Uuid,
}

/// `submit_feedback` orchestrates the work to be done by calling the required
/// routines and translates their outcome into the proper response according
/// to the rules and conventions of HTTP.
///
/// Validation runs to completion before the database is involved: a rejected
/// submission never issues a store call.
#[tracing::instrument(
    name = "Submitting new feedback",
    skip(payload, pool),
    fields(
        feedback_email = %payload.email,
        feedback_name = %payload.name
    )
)]
pub async fn submit_feedback(
    payload: web::Json<FeedbackData>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubmissionError> {
    let new_feedback: NewFeedback = payload
        .into_inner()
        .try_into()
        .map_err(SubmissionError::ValidationError)?;
    let id = insert_feedback(&pool, &new_feedback)
        .await
        .context("Failed to store the feedback submission")?;
    Ok(HttpResponse::Ok().json(SubmissionResponse {
        message: "Thank you for your feedback! It has been submitted successfully.".into(),
        id,
    }))
}

/// insert_feedback takes care of the database logic.
/// It has no awareness of the surrounding web framework, that means, no
/// web::Json or web::Data wrappers as input types.
#[tracing::instrument(name = "Saving new feedback in the database", skip(feedback, pool))]
pub async fn insert_feedback(pool: &PgPool, feedback: &NewFeedback) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO feedback (id, name, email, rating, improvements, other_suggestion, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(feedback.name.as_ref())
    .bind(feedback.email.as_ref())
    .bind(feedback.rating.get())
    .bind(&feedback.improvements)
    .bind(feedback.other_suggestion.as_deref())
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        e
    })?;
    Ok(id)
}
