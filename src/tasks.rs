//! Async task management for non-blocking API operations.
//!
//! The state machine never performs I/O itself. It returns [`Task`] values
//! describing the remote work it wants done; the run loop hands them to a
//! [`TaskSpawner`], which runs each one on the tokio runtime and reports the
//! outcome back as exactly one [`TaskMessage`] over an unbounded channel.
//!
//! # Architecture
//!
//! 1. `App::update` returns `Vec<Task>` alongside its state change
//! 2. The run loop calls [`TaskSpawner::dispatch`] for each task
//! 3. The loop keeps rendering and handling input while the task runs
//! 4. The task sends a `TaskMessage` when the remote call finishes
//! 5. The loop drains the channel with `try_recv()` and feeds each message
//!    back into `App::update`
//!
//! There is no cancellation. Search tasks carry a generation number so the
//! state machine can recognise and drop results that were overtaken by a
//! newer search.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Issue, IssueTracker};

/// A unit of remote work requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Run a search. `generation` increases with every search dispatched.
    Search { generation: u64, query: String },
    /// Post a comment on an issue.
    AddComment { issue_key: String, text: String },
}

/// Completion messages sent from background tasks to the event loop.
#[derive(Debug)]
pub enum TaskMessage {
    /// A search returned issues (possibly none).
    SearchCompleted { generation: u64, issues: Vec<Issue> },
    /// A search failed.
    SearchFailed { generation: u64, error: ApiError },
    /// A comment was posted.
    CommentCompleted { issue_key: String },
    /// A comment could not be posted.
    CommentFailed { issue_key: String, error: ApiError },
}

/// Spawns background tasks against an [`IssueTracker`].
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<TaskMessage>,
    tracker: Arc<dyn IssueTracker>,
}

impl TaskSpawner {
    /// Create a spawner sending completions through `tx`.
    pub fn new(tx: mpsc::UnboundedSender<TaskMessage>, tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tx, tracker }
    }

    /// Start `task` in the background and return immediately.
    pub fn dispatch(&self, task: Task) {
        match task {
            Task::Search { generation, query } => self.spawn_search(generation, query),
            Task::AddComment { issue_key, text } => self.spawn_add_comment(issue_key, text),
        }
    }

    /// Spawn a search for `query`.
    pub fn spawn_search(&self, generation: u64, query: String) {
        info!(generation, query = %query, "Dispatching search");
        let tx = self.tx.clone();
        let tracker = Arc::clone(&self.tracker);
        tokio::spawn(async move {
            let message = match tracker.search(&query).await {
                Ok(issues) => {
                    debug!(generation, count = issues.len(), "Search completed");
                    TaskMessage::SearchCompleted { generation, issues }
                }
                Err(error) => {
                    warn!(generation, error = %error, "Search failed");
                    TaskMessage::SearchFailed { generation, error }
                }
            };
            // The receiver only disappears when the app is shutting down.
            let _ = tx.send(message);
        });
    }

    /// Spawn a task posting `text` as a comment on `issue_key`.
    pub fn spawn_add_comment(&self, issue_key: String, text: String) {
        info!(issue_key = %issue_key, "Dispatching comment");
        let tx = self.tx.clone();
        let tracker = Arc::clone(&self.tracker);
        tokio::spawn(async move {
            let message = match tracker.add_comment(&issue_key, &text).await {
                Ok(()) => TaskMessage::CommentCompleted { issue_key },
                Err(error) => {
                    warn!(issue_key = %issue_key, error = %error, "Adding comment failed");
                    TaskMessage::CommentFailed { issue_key, error }
                }
            };
            let _ = tx.send(message);
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns `(receiver, spawner)`. The receiver is polled by the event loop.
pub fn create_task_channel(
    tracker: Arc<dyn IssueTracker>,
) -> (mpsc::UnboundedReceiver<TaskMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx, tracker))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::api::error::Result;
    use crate::api::{ApiError, Issue, IssueTracker};

    /// An in-memory tracker recording every call it receives.
    #[derive(Default)]
    pub struct FakeTracker {
        pub issues: Vec<Issue>,
        pub fail_search: bool,
        pub fail_comment: bool,
        pub searches: Mutex<Vec<String>>,
        pub comments: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl IssueTracker for FakeTracker {
        async fn search(&self, query: &str) -> Result<Vec<Issue>> {
            self.searches.lock().unwrap().push(query.to_string());
            if self.fail_search {
                Err(ApiError::BadRequest("Error in the JQL Query".to_string()))
            } else {
                Ok(self.issues.clone())
            }
        }

        async fn add_comment(&self, issue_key: &str, text: &str) -> Result<()> {
            self.comments
                .lock()
                .unwrap()
                .push((issue_key.to_string(), text.to_string()));
            if self.fail_comment {
                Err(ApiError::Forbidden)
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTracker;
    use super::*;
    use crate::api::types::fixtures;

    #[tokio::test]
    async fn test_search_completes_with_issues() {
        let tracker = Arc::new(FakeTracker {
            issues: vec![fixtures::issue("X-1", "First")],
            ..Default::default()
        });
        let (mut rx, spawner) = create_task_channel(tracker.clone());

        spawner.dispatch(Task::Search {
            generation: 7,
            query: "project = X".to_string(),
        });

        match rx.recv().await.unwrap() {
            TaskMessage::SearchCompleted { generation, issues } => {
                assert_eq!(generation, 7);
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].key, "X-1");
            }
            other => panic!("unexpected message: {:?}", other),
        }
        assert_eq!(*tracker.searches.lock().unwrap(), vec!["project = X"]);
    }

    #[tokio::test]
    async fn test_search_failure_is_reported() {
        let tracker = Arc::new(FakeTracker {
            fail_search: true,
            ..Default::default()
        });
        let (mut rx, spawner) = create_task_channel(tracker);

        spawner.spawn_search(1, "bad jql".to_string());

        match rx.recv().await.unwrap() {
            TaskMessage::SearchFailed { generation, error } => {
                assert_eq!(generation, 1);
                assert!(matches!(error, ApiError::BadRequest(_)));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_comment_completes() {
        let tracker = Arc::new(FakeTracker::default());
        let (mut rx, spawner) = create_task_channel(tracker.clone());

        spawner.dispatch(Task::AddComment {
            issue_key: "X-1".to_string(),
            text: "looks good".to_string(),
        });

        let message = rx.recv().await.unwrap();
        assert!(matches!(
            message,
            TaskMessage::CommentCompleted { ref issue_key } if issue_key == "X-1"
        ));
        assert_eq!(
            *tracker.comments.lock().unwrap(),
            vec![("X-1".to_string(), "looks good".to_string())]
        );
    }

    #[tokio::test]
    async fn test_comment_failure_is_reported() {
        let tracker = Arc::new(FakeTracker {
            fail_comment: true,
            ..Default::default()
        });
        let (mut rx, spawner) = create_task_channel(tracker);

        spawner.spawn_add_comment("X-1".to_string(), "nope".to_string());

        let message = rx.recv().await.unwrap();
        assert!(matches!(
            message,
            TaskMessage::CommentFailed {
                error: ApiError::Forbidden,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_each_task_sends_exactly_one_message() {
        let tracker = Arc::new(FakeTracker::default());
        let (mut rx, spawner) = create_task_channel(tracker);

        spawner.spawn_search(1, "a".to_string());
        spawner.spawn_search(2, "b".to_string());
        spawner.spawn_add_comment("X-1".to_string(), "c".to_string());
        drop(spawner);

        let mut count = 0;
        while rx.recv().await.is_some() {
            count += 1;
        }
        assert_eq!(count, 3);
    }
}
