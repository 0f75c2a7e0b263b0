use unicode_segmentation::UnicodeSegmentation;

/// The name a visitor signed their feedback with.
///
/// Stored already trimmed; surrounding whitespace never reaches the database.
#[derive(Debug)]
pub struct FeedbackName(String);

impl FeedbackName {
    /// Returns an instance of `FeedbackName` if the input satisfies all
    /// our validation constraints on feedback names, an error message otherwise.
    pub fn parse(s: String) -> Result<FeedbackName, String> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err("Name, email, and rating are required fields.".into());
        }

        // A grapheme is defined by the Unicode standard as a "user-perceived"
        // character: `å` is a single grapheme, but it is composed of two
        // characters (`a` and `̊`). 256 of them is plenty for a name.
        if trimmed.graphemes(true).count() > 256 {
            return Err(format!("{} is not a valid feedback name.", s));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for FeedbackName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
