//! JIRA API request and response types.
//!
//! These types model the parts of the JIRA REST API v3 the application uses:
//! search results, issues and the comment creation payload.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Displayed when an issue has no summary.
pub const NO_SUMMARY: &str = "No Summary";
/// Displayed when an issue has no description.
pub const NO_DESCRIPTION: &str = "No Description";
/// Displayed when an issue has no status or reporter.
pub const UNKNOWN: &str = "Unknown";
/// Displayed when an issue has no assignee.
pub const UNASSIGNED: &str = "Unassigned";

/// Search result from a JQL query.
///
/// Returned by `GET /rest/api/3/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The index of the first result.
    #[serde(default)]
    pub start_at: u32,
    /// Maximum results requested.
    #[serde(default)]
    pub max_results: u32,
    /// Total number of matching issues.
    #[serde(default)]
    pub total: u32,
    /// The list of issues. Absent or `null` both mean "no issues".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub issues: Vec<Issue>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Issue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Issue>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A JIRA issue.
///
/// Only the key is required; every other field falls back to a sentinel
/// display value when missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// The issue ID.
    #[serde(default)]
    pub id: String,
    /// The issue key (e.g., "PROJ-123").
    pub key: String,
    /// URL of the issue resource.
    #[serde(rename = "self", default)]
    pub self_url: String,
    /// The issue fields.
    #[serde(default)]
    pub fields: IssueFields,
}

impl Issue {
    /// Get the issue summary, or "No Summary".
    pub fn summary(&self) -> &str {
        non_empty(self.fields.summary.as_deref()).unwrap_or(NO_SUMMARY)
    }

    /// Get the status name, or "Unknown".
    pub fn status(&self) -> &str {
        non_empty(self.fields.status.as_ref().map(|s| s.name.as_str())).unwrap_or(UNKNOWN)
    }

    /// Get the assignee display name, or "Unassigned".
    pub fn assignee_name(&self) -> &str {
        non_empty(self.fields.assignee.as_ref().map(|u| u.display_name.as_str()))
            .unwrap_or(UNASSIGNED)
    }

    /// Get the reporter display name, or "Unknown".
    pub fn reporter_name(&self) -> &str {
        non_empty(self.fields.reporter.as_ref().map(|u| u.display_name.as_str()))
            .unwrap_or(UNKNOWN)
    }

    /// Get the description as plain text, or "No Description".
    ///
    /// Descriptions arrive either as Atlassian Document Format or, from older
    /// instances, as a plain string.
    pub fn description_text(&self) -> String {
        let text = self
            .fields
            .description
            .as_ref()
            .map(|d| {
                if let Ok(doc) = serde_json::from_value::<AtlassianDoc>(d.clone()) {
                    doc.to_plain_text()
                } else if let Some(s) = d.as_str() {
                    s.to_string()
                } else {
                    String::new()
                }
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            text
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.summary())
    }
}

/// Issue fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueFields {
    /// The issue summary/title.
    #[serde(default)]
    pub summary: Option<String>,
    /// The issue description (Atlassian Document Format or plain string).
    #[serde(default)]
    pub description: Option<serde_json::Value>,
    /// The issue status.
    #[serde(default)]
    pub status: Option<Status>,
    /// The issue assignee.
    #[serde(default)]
    pub assignee: Option<User>,
    /// The issue reporter.
    #[serde(default)]
    pub reporter: Option<User>,
}

/// Issue status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// The status name (e.g., "To Do", "In Progress", "Done").
    pub name: String,
}

/// A JIRA user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user's account ID.
    #[serde(default)]
    pub account_id: String,
    /// The user's display name.
    #[serde(default)]
    pub display_name: String,
}

/// Request body for `POST /rest/api/3/issue/{issueKey}/comment`.
#[derive(Debug, Clone, Serialize)]
pub struct AddCommentRequest {
    /// The comment body.
    pub body: AtlassianDoc,
}

impl AddCommentRequest {
    /// Build a request from plain text.
    pub fn from_text(text: &str) -> Self {
        Self {
            body: AtlassianDoc::from_plain_text(text),
        }
    }
}

/// Atlassian Document Format (ADF) content.
///
/// JIRA uses ADF for rich text fields like descriptions and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlassianDoc {
    /// The document type (always "doc" for root documents).
    #[serde(rename = "type")]
    pub doc_type: String,
    /// The document version (typically 1).
    #[serde(default)]
    pub version: Option<u32>,
    /// The content nodes within the document.
    #[serde(default)]
    pub content: Vec<serde_json::Value>,
}

impl AtlassianDoc {
    /// Build a document with one paragraph per line of `text`.
    pub fn from_plain_text(text: &str) -> Self {
        let content = text
            .lines()
            .map(|line| {
                if line.is_empty() {
                    json!({ "type": "paragraph", "content": [] })
                } else {
                    json!({
                        "type": "paragraph",
                        "content": [{ "type": "text", "text": line }]
                    })
                }
            })
            .collect();

        Self {
            content,
            ..Self::default()
        }
    }

    /// Convert ADF content to plain text for display.
    ///
    /// Paragraphs, headings and code blocks end with a newline, list items
    /// get a bullet, mentions become `@name`. Media nodes are skipped.
    pub fn to_plain_text(&self) -> String {
        let mut result = String::new();
        for node in &self.content {
            Self::extract_text(node, &mut result);
        }
        result.trim().to_string()
    }

    fn extract_children(obj: &serde_json::Map<String, serde_json::Value>, result: &mut String) {
        if let Some(serde_json::Value::Array(items)) = obj.get("content") {
            for item in items {
                Self::extract_text(item, result);
            }
        }
    }

    fn extract_text(node: &serde_json::Value, result: &mut String) {
        match node {
            serde_json::Value::Object(obj) => match obj.get("type").and_then(|t| t.as_str()) {
                Some("text") => {
                    if let Some(text) = obj.get("text").and_then(|t| t.as_str()) {
                        result.push_str(text);
                    }
                }
                Some("paragraph") | Some("heading") | Some("codeBlock") => {
                    Self::extract_children(obj, result);
                    if !result.ends_with('\n') && !result.is_empty() {
                        result.push('\n');
                    }
                }
                Some("hardBreak") => result.push('\n'),
                Some("listItem") => {
                    result.push_str("• ");
                    Self::extract_children(obj, result);
                }
                Some("blockquote") => {
                    result.push_str("> ");
                    Self::extract_children(obj, result);
                }
                Some("mention") => {
                    if let Some(text) = obj
                        .get("attrs")
                        .and_then(|a| a.get("text"))
                        .and_then(|t| t.as_str())
                    {
                        if !text.starts_with('@') {
                            result.push('@');
                        }
                        result.push_str(text);
                    }
                }
                Some("inlineCard") | Some("mediaGroup") | Some("mediaSingle") => {}
                _ => Self::extract_children(obj, result),
            },
            serde_json::Value::Array(items) => {
                for item in items {
                    Self::extract_text(item, result);
                }
            }
            _ => {}
        }
    }
}

impl Default for AtlassianDoc {
    fn default() -> Self {
        Self {
            doc_type: "doc".to_string(),
            version: Some(1),
            content: vec![],
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_sentinels_when_fields_missing() {
        let issue: Issue = serde_json::from_str(r#"{"key": "X-1"}"#).unwrap();

        assert_eq!(issue.key, "X-1");
        assert_eq!(issue.summary(), NO_SUMMARY);
        assert_eq!(issue.status(), UNKNOWN);
        assert_eq!(issue.assignee_name(), UNASSIGNED);
        assert_eq!(issue.reporter_name(), UNKNOWN);
        assert_eq!(issue.description_text(), NO_DESCRIPTION);
    }

    #[test]
    fn test_issue_null_fields() {
        let json = r#"{
            "id": "10001",
            "key": "X-2",
            "self": "https://example.atlassian.net/rest/api/3/issue/10001",
            "fields": {
                "summary": "Fix login",
                "status": {"name": "In Progress"},
                "assignee": null,
                "reporter": {"accountId": "abc", "displayName": "Ada"},
                "description": null
            }
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();

        assert_eq!(issue.summary(), "Fix login");
        assert_eq!(issue.status(), "In Progress");
        assert_eq!(issue.assignee_name(), UNASSIGNED);
        assert_eq!(issue.reporter_name(), "Ada");
        assert_eq!(issue.description_text(), NO_DESCRIPTION);
    }

    #[test]
    fn test_plain_string_description() {
        let json = r#"{"key": "X-3", "fields": {"description": "plain text body"}}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.description_text(), "plain text body");
    }

    #[test]
    fn test_adf_description() {
        let json = r#"{"key": "X-4", "fields": {"description": {
            "type": "doc",
            "version": 1,
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "First line"}]},
                {"type": "bulletList", "content": [
                    {"type": "listItem", "content": [
                        {"type": "paragraph", "content": [{"type": "text", "text": "item"}]}
                    ]}
                ]},
                {"type": "paragraph", "content": [
                    {"type": "mention", "attrs": {"text": "@Grace"}}
                ]}
            ]
        }}}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.description_text(), "First line\n• item\n@Grace");
    }

    #[test]
    fn test_search_result_null_issues() {
        let result: SearchResult =
            serde_json::from_str(r#"{"startAt": 0, "maxResults": 50, "total": 0, "issues": null}"#)
                .unwrap();
        assert!(result.issues.is_empty());

        let result: SearchResult = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_add_comment_request_body() {
        let request = AddCommentRequest::from_text("looks good\n\nship it");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["body"]["type"], "doc");
        assert_eq!(value["body"]["version"], 1);
        let content = value["body"]["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["content"][0]["text"], "looks good");
        assert_eq!(content[2]["content"][0]["text"], "ship it");
    }

    #[test]
    fn test_adf_from_plain_text_reads_back() {
        let doc = AtlassianDoc::from_plain_text("one\ntwo");
        assert_eq!(doc.to_plain_text(), "one\ntwo");
    }

    #[test]
    fn test_issue_display() {
        let issue = fixtures::issue("X-1", "Title");
        assert_eq!(issue.to_string(), "X-1: Title");
    }
}
