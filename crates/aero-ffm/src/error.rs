use std::path::PathBuf;

const MAX_BODY_CHARS: usize = 256;

/// Errors from a feasibility planning call.
#[derive(Debug, thiserror::Error)]
pub enum FfmError {
    #[error("FFM configuration error: {0}")]
    Configuration(String),

    #[error("FFM transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("FFM service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    #[error("FFM response did not match the plan schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("Failed to read mock plan {path}: {source}")]
    Fixture {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FfmError {
    pub(crate) fn service(status: reqwest::StatusCode, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(MAX_BODY_CHARS) {
            Some((cut, _)) => format!("{}...", &body[..cut]),
            None => body.to_string(),
        };
        FfmError::Service {
            status: status.as_u16(),
            body,
        }
    }

    /// Whether a manual retry by the caller could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FfmError::Transport(_) => true,
            FfmError::Service { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_body_is_truncated() {
        let long = "x".repeat(1_000);
        let err = FfmError::service(reqwest::StatusCode::BAD_GATEWAY, &long);
        match &err {
            FfmError::Service { status, body } => {
                assert_eq!(*status, 502);
                assert_eq!(body.len(), MAX_BODY_CHARS + 3);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(err.is_transient());
    }

    #[test]
    fn client_errors_are_not_transient() {
        let err = FfmError::service(reqwest::StatusCode::UNPROCESSABLE_ENTITY, "bad route");
        assert!(!err.is_transient());
        assert_eq!(err.to_string(), "FFM service returned HTTP 422: bad route");
        assert!(!FfmError::Configuration("missing".into()).is_transient());
    }
}
