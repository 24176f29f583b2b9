//! RFC 7807 problem details returned for every failed request.
//!
//! See: https://datatracker.ietf.org/doc/html/rfc7807

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Problem type URI. Always `about:blank`, so `title` is the status phrase.
    #[serde(rename = "type")]
    pub error_type: String,

    pub title: String,

    pub status: u16,

    /// Occurrence-specific explanation, safe to show to the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// The request path that failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            instance: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, path: impl Into<String>) -> Self {
        self.instance = Some(path.into());
        self
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized").with_detail("Log in to continue.")
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(403, "Forbidden").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(422, "Unprocessable Entity").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_type_field_and_skips_empty_members() {
        let value = serde_json::to_value(ErrorResponse::internal_error()).unwrap();

        assert_eq!(value["type"], "about:blank");
        assert_eq!(value["status"], 500);
        assert!(value.get("detail").is_none());
        assert!(value.get("instance").is_none());
    }

    #[test]
    fn forbidden_carries_detail() {
        let err = ErrorResponse::forbidden("only the author may edit this post");
        assert_eq!(err.status, 403);
        assert_eq!(err.detail.as_deref(), Some("only the author may edit this post"));
    }
}
