use crate::domain::{FeedbackEmail, FeedbackName, FeedbackRating};

/// A feedback submission that passed every validation check and is ready to
/// be persisted.
#[derive(Debug)]
pub struct NewFeedback {
    pub name: FeedbackName,
    pub email: FeedbackEmail,
    pub rating: FeedbackRating,
    // Free-form tags, kept in the order the visitor ticked them.
    pub improvements: Vec<String>,
    pub other_suggestion: Option<String>,
}
