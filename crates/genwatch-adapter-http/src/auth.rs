//! HTTP Basic authentication for the controller.
//!
//! The controller has a single account named `admin`. Only the password is
//! configurable.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Account name the controller expects.
pub const USERNAME: &str = "admin";

/// Factory default password.
pub const DEFAULT_PASSWORD: &str = "cummins";

/// Encode `admin:<password>` as standard base64 (with padding).
///
/// # Examples
///
/// ```
/// use genwatch_adapter_http::encode_credentials;
///
/// assert_eq!(encode_credentials("cummins"), "YWRtaW46Y3VtbWlucw==");
/// ```
#[must_use]
pub fn encode_credentials(password: &str) -> String {
    STANDARD.encode(format!("{USERNAME}:{password}"))
}

/// Full `Authorization` header value.
#[must_use]
pub fn authorization_header(password: &str) -> String {
    format!("Basic {}", encode_credentials(password))
}

/// Decode an `Authorization` header value (or bare credentials) into user and password.
///
/// # Errors
///
/// Returns error if the input is not base64, not UTF-8, or lacks a `:` separator.
///
/// # Examples
///
/// ```
/// use genwatch_adapter_http::{authorization_header, decode_credentials};
///
/// let (user, password) = decode_credentials(&authorization_header("secret")).unwrap();
/// assert_eq!(user, "admin");
/// assert_eq!(password, "secret");
/// ```
pub fn decode_credentials(value: &str) -> Result<(String, String), AuthError> {
    let encoded = value.strip_prefix("Basic ").unwrap_or(value).trim();
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| AuthError::Base64Decode(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| AuthError::Utf8Decode(e.to_string()))?;

    text.split_once(':')
        .map(|(user, password)| (user.to_string(), password.to_string()))
        .ok_or(AuthError::MissingSeparator)
}

/// Errors that can occur while decoding credentials.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// Base64 decoding failed
    #[error("base64 decode error: {0}")]
    Base64Decode(String),
    /// UTF-8 decoding failed
    #[error("UTF-8 decode error: {0}")]
    Utf8Decode(String),
    /// No `user:password` separator
    #[error("credentials lack a ':' separator")]
    MissingSeparator,
}
