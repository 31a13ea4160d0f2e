use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingHeader,
    #[error("Invalid authentication token")]
    InvalidToken,
}

/// Check the bearer token against the configured secret.
///
/// An empty secret disables auth entirely. Comparison is a plain string
/// compare; the trust boundary here is internal and the token never selects
/// between observable code paths beyond accept/reject.
pub fn validate_auth(headers: &HeaderMap, expected: &str) -> Result<(), AuthError> {
    if expected.is_empty() {
        return Ok(());
    }

    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::MissingHeader)?;

    if token != expected {
        return Err(AuthError::InvalidToken);
    }

    Ok(())
}
