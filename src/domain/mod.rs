mod feedback_email;
mod feedback_name;
mod feedback_rating;
mod new_feedback;

pub use feedback_email::FeedbackEmail;
pub use feedback_name::FeedbackName;
pub use feedback_rating::FeedbackRating;
pub use new_feedback::NewFeedback;
