//! # Authentication Module
//!
//! Bearer API key authentication for the Aurathent HTTP API.
//!
//! ## Configuration
//!
//! - `AURATHENT_API_KEY`: If set, all requests except the health routes require this key
//!
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use super::ApiError;
use axum::{
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

/// Routes that never require a key (load balancer probes).
const EXEMPT_PATHS: [&str; 2] = ["/", "/health"];

// =============================================================================
// API KEY AUTHENTICATION
// =============================================================================

/// Get API key from environment variable.
///
/// Returns `Some(key)` if `AURATHENT_API_KEY` is set and non-empty,
/// `None` otherwise (disabling authentication).
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("AURATHENT_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// Constant-time key comparison over equal-length padded buffers.
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    let max_len = provided.len().max(expected.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided.len()].copy_from_slice(provided);
    padded_expected[..expected.len()].copy_from_slice(expected);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided.len() == expected.len()
}

/// API key authentication middleware.
///
/// Accepts both `Bearer <key>` and a raw `<key>` in the Authorization header.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = get_api_key_from_env() else {
        return Ok(next.run(request).await);
    };

    if EXEMPT_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) => {
            let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);
            if keys_match(provided.as_bytes(), expected.as_bytes()) {
                Ok(next.run(request).await)
            } else {
                tracing::warn!(
                    event = "auth_failure",
                    reason = "invalid_api_key",
                    "Authentication failed: invalid API key"
                );
                Err(ApiError::Unauthorized)
            }
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                "Missing Authorization header"
            );
            Err(ApiError::Unauthorized)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_match() {
        assert!(keys_match(b"secret", b"secret"));
    }

    #[test]
    fn prefix_does_not_match() {
        assert!(!keys_match(b"secret", b"secret-longer"));
        assert!(!keys_match(b"", b"secret"));
    }
}
