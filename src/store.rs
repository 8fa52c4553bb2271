//! The fetched issue collection and the selection derived from it.

use crate::api::Issue;

/// Holds the most recent search result, in the order the tracker returned it.
///
/// A fetch always replaces the whole collection; there is no merge.
#[derive(Debug, Default)]
pub struct IssueStore {
    issues: Vec<Issue>,
}

impl IssueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection. `None` is treated as an empty result.
    pub fn set_issues(&mut self, issues: Option<Vec<Issue>>) {
        self.issues = issues.unwrap_or_default();
    }

    /// All issues in fetch order.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Number of issues held.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether the last fetch returned nothing.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Resolve the issue under `cursor`.
///
/// Returns `Some` iff `cursor` is within `0..issues.len()`. Always computed
/// from the current collection and cursor, never cached.
pub fn selected_issue(issues: &[Issue], cursor: Option<usize>) -> Option<&Issue> {
    cursor.and_then(|index| issues.get(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures;

    #[test]
    fn test_set_issues_replaces_collection() {
        let mut store = IssueStore::new();
        store.set_issues(Some(fixtures::issues(3)));
        assert_eq!(store.len(), 3);

        store.set_issues(Some(vec![fixtures::issue("X-9", "Only")]));
        assert_eq!(store.len(), 1);
        assert_eq!(store.issues()[0].key, "X-9");
    }

    #[test]
    fn test_set_issues_none_is_empty() {
        let mut store = IssueStore::new();
        store.set_issues(Some(fixtures::issues(2)));
        store.set_issues(None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_issues_preserves_order() {
        let mut store = IssueStore::new();
        let issues = vec![
            fixtures::issue("B-2", "b"),
            fixtures::issue("A-1", "a"),
            fixtures::issue("C-3", "c"),
        ];
        store.set_issues(Some(issues));

        let keys: Vec<&str> = store.issues().iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["B-2", "A-1", "C-3"]);
    }

    #[test]
    fn test_selected_issue_in_bounds() {
        let issues = fixtures::issues(3);
        for i in 0..3 {
            assert_eq!(selected_issue(&issues, Some(i)), Some(&issues[i]));
        }
    }

    #[test]
    fn test_selected_issue_out_of_bounds() {
        let issues = fixtures::issues(3);
        assert_eq!(selected_issue(&issues, Some(3)), None);
        assert_eq!(selected_issue(&issues, Some(usize::MAX)), None);
        assert_eq!(selected_issue(&issues, None), None);
    }

    #[test]
    fn test_empty_collection_selects_nothing_for_any_cursor() {
        let mut store = IssueStore::new();
        store.set_issues(Some(fixtures::issues(5)));
        store.set_issues(Some(Vec::new()));

        for cursor in [Some(0), Some(4), Some(100), None] {
            assert_eq!(selected_issue(store.issues(), cursor), None);
        }
    }
}
