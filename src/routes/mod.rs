mod admin;
mod feedback;
mod form;
mod health_check;

pub use admin::*;
pub use feedback::*;
pub use form::*;
pub use health_check::*;

/// Body shape shared by every error response: `{"error": "..."}`.
#[derive(serde::Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

/// Walks the whole chain of causes behind an error, so `Debug` output tells
/// the full story instead of only the outermost message.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
