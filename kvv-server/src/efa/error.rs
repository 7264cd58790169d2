//! EFA client error types.

/// Errors from the EFA HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum EfaError {
    /// Request never produced a response (connect failure, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-200 status.
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16 },

    /// Upstream body was not valid JSON.
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}

impl EfaError {
    /// The upstream HTTP status, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            EfaError::Upstream { status } => Some(*status),
            EfaError::Http(e) => e.status().map(|s| s.as_u16()),
            EfaError::Json { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EfaError::Upstream { status: 503 };
        assert_eq!(err.to_string(), "upstream returned HTTP 503");
        assert_eq!(err.status(), Some(503));

        let err = EfaError::Json {
            message: "expected value at line 1 column 1".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert_eq!(err.status(), None);
    }
}
