//! JIRA API client and types.
//!
//! The rest of the application talks to the issue tracker only through the
//! [`IssueTracker`] trait; [`JiraClient`] is the production implementation.

mod auth;
mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

pub use auth::Auth;
pub use client::JiraClient;
pub use error::ApiError;
pub use types::Issue;

/// The remote operations the application needs from an issue tracker.
///
/// Failures are always returned as values; implementations must not panic.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Run a query and return the matching issues in tracker order.
    async fn search(&self, query: &str) -> error::Result<Vec<Issue>>;

    /// Post `text` as a new comment on the issue identified by `issue_key`.
    async fn add_comment(&self, issue_key: &str, text: &str) -> error::Result<()>;
}
