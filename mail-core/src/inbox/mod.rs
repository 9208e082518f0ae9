//! Inbox provider: read and organize messages in the remote mailbox

use crate::error::{MailError, Result};
use serde::Serialize;

pub mod gmail;

pub use gmail::GmailClient;

/// Default page size for unread listing
pub const DEFAULT_MAX_RESULTS: u32 = 10;
/// Upper bound accepted by the provider for a single page
pub const MAX_RESULTS_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub label_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageSummary {
    pub id: String,
    pub thread_id: String,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDetail {
    pub id: String,
    pub thread_id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: String,
    pub labels: Vec<String>,
    pub snippet: String,
    pub body: String,
    pub body_is_html: bool,
}

/// Remote mailbox operations
#[async_trait::async_trait]
pub trait InboxProvider: Send + Sync {
    async fn list_labels(&self) -> Result<Vec<Label>>;

    /// Most recent unread messages, at most `max_results`
    async fn list_unread(&self, max_results: u32) -> Result<Vec<MessageSummary>>;

    async fn get_message(&self, id: &str) -> Result<MessageDetail>;

    /// Remove the message from the inbox without deleting it
    async fn archive(&self, id: &str) -> Result<()>;

    /// Move the message to the trash
    async fn trash(&self, id: &str) -> Result<()>;
}

/// Message ids are opaque tokens; anything outside `[A-Za-z0-9_-]` is rejected
/// so an id can never alter the request path.
pub fn validate_message_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(MailError::InvalidMessageId(id.to_string()))
    }
}

/// Clamp a requested page size into `1..=MAX_RESULTS_LIMIT`
pub fn clamp_max_results(requested: u32) -> u32 {
    requested.clamp(1, MAX_RESULTS_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_message_id() {
        assert!(validate_message_id("18c2f1a9b7e4d3c2").is_ok());
        assert!(validate_message_id("abc_DEF-123").is_ok());
        assert!(validate_message_id("").is_err());
        assert!(validate_message_id("../labels").is_err());
        assert!(validate_message_id("id?format=raw").is_err());
    }

    #[test]
    fn test_clamp_max_results() {
        assert_eq!(clamp_max_results(0), 1);
        assert_eq!(clamp_max_results(10), 10);
        assert_eq!(clamp_max_results(500), MAX_RESULTS_LIMIT);
    }
}
