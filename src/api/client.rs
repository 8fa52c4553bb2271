//! JIRA API client implementation.
//!
//! This module provides the HTTP client for the JIRA REST API v3. It handles
//! authentication, error mapping and retry logic for transient failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};
use super::types::{AddCommentRequest, Issue, SearchResult};
use super::IssueTracker;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of attempts for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// JIRA caps a single search page at 100 issues.
const MAX_PAGE_SIZE: u32 = 100;

/// The JIRA API client.
///
/// Cheap to clone: the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: Client,
    base_url: String,
    auth: Auth,
    max_results: u32,
}

impl JiraClient {
    /// Create a client for `base_url` authenticating with `auth`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the URL does not parse, or
    /// `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(base_url: &str, auth: Auth, max_results: u32) -> Result<Self> {
        let base_url = normalize_base_url(base_url);
        reqwest::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(ApiError::Network)?;

        info!(base_url = %base_url, email = %auth.email(), "JIRA client created");

        Ok(Self {
            client,
            base_url,
            auth,
            max_results: max_results.clamp(1, MAX_PAGE_SIZE),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search for issues using JQL.
    #[instrument(skip(self), fields(jql = %jql))]
    pub async fn search_issues(&self, jql: &str) -> Result<SearchResult> {
        let url = self.search_url(jql);
        let result: SearchResult = self.request(true, || self.client.get(&url)).await?;
        debug!("Found {} issues (total: {})", result.issues.len(), result.total);
        Ok(result)
    }

    /// Add a plain-text comment to an issue.
    ///
    /// Only rate limiting is retried: a network failure after the request was
    /// sent could otherwise post the comment twice.
    #[instrument(skip(self, body), fields(issue_key = %issue_key))]
    pub async fn add_comment(&self, issue_key: &str, body: &str) -> Result<()> {
        let url = format!("{}/rest/api/3/issue/{}/comment", self.base_url, issue_key);
        let payload = AddCommentRequest::from_text(body);

        let _: serde_json::Value = self
            .request(false, || self.client.post(&url).json(&payload))
            .await
            .map_err(|e| match e {
                ApiError::NotFound(_) => ApiError::NotFound(format!("Issue '{}'", issue_key)),
                other => other,
            })?;

        debug!("Comment added");
        Ok(())
    }

    fn search_url(&self, jql: &str) -> String {
        format!(
            "{}/rest/api/3/search?jql={}&maxResults={}&fields=summary,status,assignee,reporter,description",
            self.base_url,
            urlencoding::encode(jql),
            self.max_results
        )
    }

    /// Send a request with authentication, retrying transient failures.
    ///
    /// `idempotent` requests retry on any retryable error; others only on
    /// rate limiting.
    async fn request<T, F>(&self, idempotent: bool, build: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Fn() -> RequestBuilder,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!("Request attempt {}/{}", attempts, MAX_RETRIES);

            let response = build()
                .header(header::AUTHORIZATION, self.auth.header_value())
                .header(header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(ApiError::Network);

            let result = match response {
                Ok(response) => Self::handle_response(response).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if attempts < MAX_RETRIES && Self::should_retry(&e, idempotent) => {
                    let delay = calculate_retry_delay(attempts);
                    warn!(
                        "Request failed (attempt {}), retrying in {}ms: {}",
                        attempts, delay, e
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn should_retry(error: &ApiError, idempotent: bool) -> bool {
        if idempotent {
            error.is_retryable()
        } else {
            matches!(error, ApiError::RateLimited)
        }
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", body);
            Err(error_from_response(status, &url, &body))
        }
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn search(&self, query: &str) -> Result<Vec<Issue>> {
        Ok(self.search_issues(query).await?.issues)
    }

    async fn add_comment(&self, issue_key: &str, text: &str) -> Result<()> {
        JiraClient::add_comment(self, issue_key, text).await
    }
}

/// Build an error from a failed response, preferring JIRA's own messages.
fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let messages: Vec<String> = json
            .get("errorMessages")
            .and_then(|m| m.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        if !messages.is_empty() {
            return ApiError::from_status(status, &messages.join(", "));
        }

        let field_errors: Vec<String> = json
            .get("errors")
            .and_then(|e| e.as_object())
            .map(|obj| obj.iter().map(|(k, v)| format!("{}: {}", k, v)).collect())
            .unwrap_or_default();
        if !field_errors.is_empty() {
            return ApiError::from_status(status, &field_errors.join(", "));
        }
    }

    ApiError::from_status(status, url)
}

/// Exponential backoff: 1s, 2s, 4s, ...
fn calculate_retry_delay(attempt: u32) -> u64 {
    RETRY_DELAY_MS * 2u64.pow(attempt.saturating_sub(1))
}

/// Remove trailing slashes and warn about plain HTTP.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net///"),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_base_url_preserves_path() {
        assert_eq!(
            normalize_base_url("https://company.atlassian.net/jira/"),
            "https://company.atlassian.net/jira"
        );
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = JiraClient::new("not a url", Auth::new("a@b.c", "t"), 50).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_search_url_encodes_jql() {
        let client =
            JiraClient::new("https://company.atlassian.net/", Auth::new("a@b.c", "t"), 50)
                .unwrap();
        let url = client.search_url("project = X");

        assert!(url.starts_with("https://company.atlassian.net/rest/api/3/search?jql="));
        assert!(url.contains("project%20%3D%20X"));
        assert!(url.contains("maxResults=50"));
    }

    #[test]
    fn test_max_results_clamped() {
        let client =
            JiraClient::new("https://x.atlassian.net", Auth::new("a@b.c", "t"), 500).unwrap();
        assert!(client.search_url("x").contains("maxResults=100"));
    }

    #[test]
    fn test_retry_policy() {
        let server = ApiError::ServerError("boom".to_string());
        assert!(JiraClient::should_retry(&server, true));
        assert!(!JiraClient::should_retry(&server, false));
        assert!(JiraClient::should_retry(&ApiError::RateLimited, false));
        assert!(!JiraClient::should_retry(&ApiError::Unauthorized, true));
    }

    #[test]
    fn test_retry_delay_exponential() {
        assert_eq!(calculate_retry_delay(1), 1000);
        assert_eq!(calculate_retry_delay(2), 2000);
        assert_eq!(calculate_retry_delay(3), 4000);
    }

    #[test]
    fn test_error_from_response_uses_error_messages() {
        let body = r#"{"errorMessages": ["Error in the JQL Query"], "errors": {}}"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, "url", body);
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Error in the JQL Query"),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_error_from_response_uses_field_errors() {
        let body = r#"{"errorMessages": [], "errors": {"comment": "too long"}}"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, "url", body);
        assert!(err.to_string().contains("comment"));
    }

    #[test]
    fn test_error_from_response_falls_back_to_url() {
        let err = error_from_response(StatusCode::NOT_FOUND, "https://x/issue/X-1", "");
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "https://x/issue/X-1"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}
