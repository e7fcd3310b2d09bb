//! # Rejection Handlers
//!
//! Conversions from Axum extractor rejections into [`AppError`], so that
//! malformed request bodies render through the standard fail envelope
//! instead of Axum's plain-text defaults. Wire with
//! `WithRejection<Json<T>, AppError>`.

use axum::extract::rejection::JsonRejection;

use crate::AppError;

/// Handle JSON deserialization errors and convert them to API errors.
///
/// Catches errors like "missing field `email`" and rewrites them into the
/// standard message format.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match &rejection {
            JsonRejection::JsonDataError(err) => friendly_message(&err.body_text()),
            JsonRejection::JsonSyntaxError(_) => "Invalid JSON in request body".to_string(),
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with Content-Type: application/json".to_string()
            },
            _ => rejection.body_text(),
        };

        Self::bad_request(message)
    }
}

/// Extract a user-friendly message from a serde error string.
///
/// "missing field `email` at line 1 column 2" becomes
/// "Missing required field: email"; anything else passes through.
fn friendly_message(raw: &str) -> String {
    const PREFIX: &str = "missing field `";

    if let Some(start) = raw.find(PREFIX) {
        let rest = &raw[start + PREFIX.len() ..];
        if let Some(end) = rest.find('`') {
            return format!("Missing required field: {}", &rest[.. end]);
        }
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_rewritten() {
        let raw = "Failed to deserialize the JSON body into the target type: missing field `email` at line 1 column 34";
        assert_eq!(friendly_message(raw), "Missing required field: email");
    }

    #[test]
    fn test_missing_field_without_closing_backtick_passes_through() {
        let raw = "missing field `email";
        assert_eq!(friendly_message(raw), raw);
    }

    #[test]
    fn test_other_messages_pass_through() {
        let raw = "invalid type: integer `7`, expected a string at line 1 column 12";
        assert_eq!(friendly_message(raw), raw);
    }
}
