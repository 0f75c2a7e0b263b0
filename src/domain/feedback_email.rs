use std::sync::LazyLock;

use regex::Regex;

// Same pattern the form applies on the client side. Compiled once, the first
// time an email is parsed.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile the email pattern")
});

/// The email address attached to a feedback submission.
///
/// Parsing normalizes the address: surrounding whitespace is trimmed and the
/// whole address is lower-cased before validation, so equal addresses compare
/// equal once stored.
#[derive(Debug)]
pub struct FeedbackEmail(String);

impl FeedbackEmail {
    pub fn parse(s: String) -> Result<FeedbackEmail, String> {
        let normalized = s.trim().to_lowercase();
        if EMAIL_PATTERN.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err("Please enter a valid email address.".into())
        }
    }
}

impl AsRef<str> for FeedbackEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FeedbackEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
