//! Classification of HTTP status failures into readable errors.

use reqwest::StatusCode;

/// A request that reached the server but was answered with an error status.
#[derive(Debug)]
pub enum HttpStatusError {
    /// Rate limit exceeded (HTTP 403 with rate limit message or 429)
    RateLimitExceeded(String),
    /// Authentication failed (HTTP 401)
    AuthenticationFailed(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden(String),
    /// Other 4xx responses
    ClientError(String),
    /// 5xx responses
    ServerError(String),
}

impl std::fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpStatusError::RateLimitExceeded(msg) => {
                write!(
                    f,
                    "Rate limit exceeded: {}. Try again later or set GITHUB_TOKEN environment variable.",
                    msg
                )
            }
            HttpStatusError::AuthenticationFailed(msg) => {
                write!(f, "Authentication failed: {}. Check your GITHUB_TOKEN.", msg)
            }
            HttpStatusError::NotFound(msg) => {
                write!(f, "Not found: {}", msg)
            }
            HttpStatusError::Forbidden(msg) => {
                write!(f, "Access forbidden: {}. You may need authentication.", msg)
            }
            HttpStatusError::ClientError(msg) => {
                write!(f, "Request error: {}", msg)
            }
            HttpStatusError::ServerError(msg) => {
                write!(f, "Server error: {}", msg)
            }
        }
    }
}

impl std::error::Error for HttpStatusError {}

/// Classifies a status error. Returns `None` for errors that carry no status
/// (connection failures, timeouts, decode errors).
pub fn classify_error(error: &reqwest::Error) -> Option<HttpStatusError> {
    let status = error.status()?;
    let classified = match status {
        StatusCode::UNAUTHORIZED => HttpStatusError::AuthenticationFailed(
            "Invalid or missing authentication token".to_string(),
        ),
        StatusCode::FORBIDDEN => {
            let msg = error.to_string();
            if msg.contains("rate limit") || msg.contains("API rate limit") {
                HttpStatusError::RateLimitExceeded("GitHub API rate limit exceeded".to_string())
            } else {
                HttpStatusError::Forbidden("Access to this resource is forbidden".to_string())
            }
        }
        StatusCode::TOO_MANY_REQUESTS => {
            HttpStatusError::RateLimitExceeded("Too many requests".to_string())
        }
        StatusCode::NOT_FOUND => {
            HttpStatusError::NotFound("The requested resource was not found".to_string())
        }
        s if s.is_client_error() => {
            HttpStatusError::ClientError(format!("HTTP {} error", s.as_u16()))
        }
        s => HttpStatusError::ServerError(format!("HTTP {} error", s.as_u16())),
    };
    Some(classified)
}

/// Converts an error from `error_for_status()` into an `anyhow::Error`,
/// replacing it with an [`HttpStatusError`] when it carries a status.
pub fn classify_status(error: reqwest::Error) -> anyhow::Error {
    match classify_error(&error) {
        Some(classified) => anyhow::Error::from(classified),
        None => anyhow::Error::from(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn status_error(status: usize) -> reqwest::Error {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(status)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = client.get(server.url()).send().await.unwrap();
        response.error_for_status().unwrap_err()
    }

    #[test]
    fn test_http_status_error_display() {
        let err = HttpStatusError::RateLimitExceeded("test".to_string());
        assert!(err.to_string().contains("Rate limit"));
        assert!(err.to_string().contains("GITHUB_TOKEN"));

        let err = HttpStatusError::AuthenticationFailed("test".to_string());
        assert!(err.to_string().contains("Authentication"));

        let err = HttpStatusError::NotFound("test".to_string());
        assert!(err.to_string().contains("Not found"));

        let err = HttpStatusError::Forbidden("test".to_string());
        assert!(err.to_string().contains("forbidden"));

        let err = HttpStatusError::ServerError("HTTP 502 error".to_string());
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_classify_error_unauthorized() {
        let err = status_error(401).await;
        assert!(matches!(
            classify_error(&err),
            Some(HttpStatusError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_forbidden() {
        let err = status_error(403).await;
        assert!(matches!(
            classify_error(&err),
            Some(HttpStatusError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_too_many_requests() {
        let err = status_error(429).await;
        assert!(matches!(
            classify_error(&err),
            Some(HttpStatusError::RateLimitExceeded(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_not_found() {
        let err = status_error(404).await;
        assert!(matches!(
            classify_error(&err),
            Some(HttpStatusError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_other_client_error() {
        let err = status_error(400).await;
        assert!(matches!(
            classify_error(&err),
            Some(HttpStatusError::ClientError(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_error_server_error() {
        let err = status_error(503).await;
        assert!(matches!(
            classify_error(&err),
            Some(HttpStatusError::ServerError(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_status_wraps_classified_error() {
        let err = status_error(404).await;
        let result = classify_status(err);
        assert!(result.downcast_ref::<HttpStatusError>().is_some());
    }
}
