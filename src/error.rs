use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced by the share pipeline. Every variant terminates the
/// request with a single error response; nothing is retried.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The request carried no usable song url.
    #[error("You must attach a song to share! ( ?song= )")]
    MissingInput,

    /// The lookup service had no match for the url, or matched nothing we
    /// can build a record from.
    #[error("song lookup failed: {0}")]
    NotFound(String),

    /// The lookup response was missing structure the share card needs.
    #[error("song lookup response was malformed: {0}")]
    Malformed(String),

    /// The webhook endpoint rejected the message. Status text and body are
    /// kept verbatim for the caller.
    #[error("webhook delivery failed ( {status} ): {body}")]
    Delivery { status: String, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ShareError {
    /// A failed delivery is on us; everything else is a bad request.
    pub fn status(&self) -> StatusCode {
        match self {
            ShareError::Delivery { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_failures_are_server_errors() {
        let err = ShareError::Delivery {
            status: "Internal Server Error".to_string(),
            body: "invalid token".to_string(),
        };

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn everything_else_is_a_bad_request() {
        assert_eq!(ShareError::MissingInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ShareError::NotFound("status 404 Not Found".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShareError::Malformed("missing thumbnail url".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
