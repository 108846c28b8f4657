use reqwest::StatusCode;
use serde_json::Value;

use crate::repository::StorageError;

/// Extract the human-readable message from an error response body.
///
/// Checks `detail`, `message`, `error`, the first `non_field_errors` entry,
/// then the first message of every field, in that order.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("HTTP error! status: {}", status.as_u16());
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };
    if fields.is_empty() {
        return fallback();
    }

    for key in ["detail", "message", "error"] {
        if let Some(Value::String(text)) = fields.get(key) {
            return text.clone();
        }
    }
    if let Some(first) = fields
        .get("non_field_errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(Value::as_str)
    {
        return first.to_owned();
    }

    let field_errors: Vec<&str> = fields
        .values()
        .filter_map(|v| v.as_array().and_then(|errors| errors.first()))
        .filter_map(Value::as_str)
        .collect();
    if field_errors.is_empty() {
        Value::Object(fields).to_string()
    } else {
        field_errors.join(", ")
    }
}

/// Whether an error response is unexpected enough to log.
///
/// Server errors always are. Client errors are expected when the backend
/// explains them.
pub(crate) fn should_log(status: StatusCode, body: &str) -> bool {
    if status.is_server_error() {
        return true;
    }
    if !status.is_client_error() {
        return false;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => fields.is_empty(),
        _ => true,
    }
}

/// Map a non-success status to the storage error taxonomy.
pub(crate) fn status_error(status: StatusCode, message: String) -> StorageError {
    match status.as_u16() {
        400 | 409 | 422 => StorageError::Validation(message),
        401 => StorageError::Unauthorized(message),
        403 => StorageError::Forbidden(message),
        404 => StorageError::NotFound(message),
        code => StorageError::Server {
            status: code,
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BAD: StatusCode = StatusCode::BAD_REQUEST;

    #[test]
    fn detail_wins() {
        let body = r#"{"message": "m", "detail": "Invalid token."}"#;
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, body), "Invalid token.");
    }

    #[test]
    fn error_key_is_read() {
        let body = r#"{"error": "Topic not found"}"#;
        assert_eq!(error_message(StatusCode::NOT_FOUND, body), "Topic not found");
    }

    #[test]
    fn non_field_errors_use_first_entry() {
        let body = r#"{"non_field_errors": ["Invalid email or password.", "other"]}"#;
        assert_eq!(error_message(BAD, body), "Invalid email or password.");
    }

    #[test]
    fn field_errors_are_joined() {
        let body = r#"{"name": ["A topic with this name already exists."], "color": ["Enter a valid hex color."]}"#;
        let message = error_message(BAD, body);
        assert!(message.contains("A topic with this name already exists."));
        assert!(message.contains(", "));
    }

    #[test]
    fn unknown_shape_falls_back_to_raw_json() {
        let body = r#"{"code": 7}"#;
        assert_eq!(error_message(BAD, body), r#"{"code":7}"#);
    }

    #[test]
    fn empty_or_html_body_reports_status() {
        assert_eq!(error_message(BAD, ""), "HTTP error! status: 400");
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "HTTP error! status: 502"
        );
        assert_eq!(error_message(BAD, "{}"), "HTTP error! status: 400");
    }

    #[test]
    fn explained_client_errors_are_not_logged() {
        assert!(!should_log(BAD, r#"{"name": ["taken"]}"#));
        assert!(!should_log(StatusCode::FORBIDDEN, r#"{"detail": "no"}"#));
        assert!(should_log(BAD, "{}"));
        assert!(should_log(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail": "boom"}"#));
    }

    #[test]
    fn statuses_map_to_taxonomy() {
        assert!(matches!(status_error(BAD, String::new()), StorageError::Validation(_)));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, String::new()),
            StorageError::Forbidden(_)
        ));
        assert!(matches!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, String::new()),
            StorageError::Server { status: 503, .. }
        ));
    }
}
