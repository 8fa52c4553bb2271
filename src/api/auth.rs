//! Authentication handling for the JIRA API.
//!
//! JIRA Cloud accepts Basic Auth built from the account email and an API
//! token. When no token is supplied through the environment it is looked up
//! in the OS keyring.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use super::error::{ApiError, Result};

/// The keyring service name under which tokens are stored.
pub const KEYRING_SERVICE: &str = "jiratui";

/// Authentication credentials for JIRA.
#[derive(Debug, Clone)]
pub struct Auth {
    /// The user's email address.
    email: String,
    /// The complete "Basic ..." header value.
    auth_header: String,
}

impl Auth {
    /// Create credentials from an email and token.
    ///
    /// The token is encoded immediately and not kept in plain form.
    pub fn new(email: &str, token: &str) -> Self {
        Self {
            email: email.to_string(),
            auth_header: build_auth_header(email, token),
        }
    }

    /// Create credentials using the token stored in the OS keyring for `email`.
    pub fn from_keyring(email: &str) -> Result<Self> {
        let token = get_token(email)?;
        Ok(Self::new(email, &token))
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the email address.
    pub fn email(&self) -> &str {
        &self.email
    }
}

fn build_auth_header(email: &str, token: &str) -> String {
    let credentials = format!("{}:{}", email, token);
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
}

/// Retrieve an API token from the OS keyring.
///
/// # Errors
///
/// Returns `ApiError::Keyring` if no entry exists or the keyring is unavailable.
pub fn get_token(email: &str) -> Result<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, email)
        .map_err(|e| ApiError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ApiError::Keyring(format!("failed to retrieve token: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_header() {
        let header = build_auth_header("user@example.com", "api_token_here");
        assert!(header.starts_with("Basic "));

        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();
        assert_eq!(decoded_str, "user@example.com:api_token_here");
    }

    #[test]
    fn test_auth_new() {
        let auth = Auth::new("user@example.com", "secret_token");
        assert_eq!(auth.email(), "user@example.com");
        assert!(auth.header_value().starts_with("Basic "));
    }

    #[test]
    fn test_auth_does_not_expose_token() {
        let auth = Auth::new("user@example.com", "secret_token");
        let debug_output = format!("{:?}", auth);

        assert!(!debug_output.contains("secret_token"));
    }
}
