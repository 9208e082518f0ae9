//! Gmail API tools

use super::outcome::ToolOutcome;
use crate::state::AppState;
use mail_core::inbox::{DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT};
use serde::Deserialize;
use tracing::info;

pub const GMAIL_SERVICE: &str = "Gmail API";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUnreadArgs {
    /// Any JSON number; clamped into the provider's page range
    #[serde(default = "default_max_results")]
    pub max_results: f64,
}

fn default_max_results() -> f64 {
    f64::from(DEFAULT_MAX_RESULTS)
}

/// Clamp a client-supplied page size into `1..=MAX_RESULTS_LIMIT`
fn page_size(requested: f64) -> u32 {
    requested.clamp(1.0, f64::from(MAX_RESULTS_LIMIT)) as u32
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageIdArgs {
    pub message_id: String,
}

pub async fn list_labels(state: &AppState) -> ToolOutcome {
    let inbox = match state.inbox() {
        Ok(inbox) => inbox,
        Err(e) => return ToolOutcome::from_error(GMAIL_SERVICE, e),
    };

    match inbox.list_labels().await {
        Ok(labels) => ToolOutcome::json(&serde_json::json!({
            "count": labels.len(),
            "labels": labels,
        })),
        Err(e) => ToolOutcome::from_error(GMAIL_SERVICE, e),
    }
}

pub async fn list_unread_emails(state: &AppState, args: ListUnreadArgs) -> ToolOutcome {
    let inbox = match state.inbox() {
        Ok(inbox) => inbox,
        Err(e) => return ToolOutcome::from_error(GMAIL_SERVICE, e),
    };

    let max_results = page_size(args.max_results);
    match inbox.list_unread(max_results).await {
        Ok(emails) => {
            info!("📬 {} unread emails", emails.len());
            ToolOutcome::json(&serde_json::json!({
                "count": emails.len(),
                "emails": emails,
            }))
        }
        Err(e) => ToolOutcome::from_error(GMAIL_SERVICE, e),
    }
}

pub async fn get_email(state: &AppState, args: MessageIdArgs) -> ToolOutcome {
    let inbox = match state.inbox() {
        Ok(inbox) => inbox,
        Err(e) => return ToolOutcome::from_error(GMAIL_SERVICE, e),
    };

    match inbox.get_message(&args.message_id).await {
        Ok(detail) => ToolOutcome::json(&detail),
        Err(e) => ToolOutcome::from_error(GMAIL_SERVICE, e),
    }
}

pub async fn archive_email(state: &AppState, args: MessageIdArgs) -> ToolOutcome {
    let inbox = match state.inbox() {
        Ok(inbox) => inbox,
        Err(e) => return ToolOutcome::from_error(GMAIL_SERVICE, e),
    };

    match inbox.archive(&args.message_id).await {
        Ok(()) => {
            info!("📦 Archived email: {}", args.message_id);
            ToolOutcome::text(format!(
                "Email {} archived (removed from inbox)",
                args.message_id
            ))
        }
        Err(e) => ToolOutcome::from_error(GMAIL_SERVICE, e),
    }
}

pub async fn delete_email(state: &AppState, args: MessageIdArgs) -> ToolOutcome {
    let inbox = match state.inbox() {
        Ok(inbox) => inbox,
        Err(e) => return ToolOutcome::from_error(GMAIL_SERVICE, e),
    };

    match inbox.trash(&args.message_id).await {
        Ok(()) => {
            info!("🗑️  Moved email to trash: {}", args.message_id);
            ToolOutcome::text(format!("Email {} moved to trash", args.message_id))
        }
        Err(e) => ToolOutcome::from_error(GMAIL_SERVICE, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_results_accepts_any_number() {
        let args: ListUnreadArgs = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(page_size(args.max_results), 10);

        for (raw, expected) in [(-1.0, 1), (0.0, 1), (10.0, 10), (25.7, 25), (500.0, 100)] {
            let args: ListUnreadArgs =
                serde_json::from_value(serde_json::json!({ "maxResults": raw })).unwrap();
            assert_eq!(page_size(args.max_results), expected);
        }

        let args: ListUnreadArgs =
            serde_json::from_value(serde_json::json!({ "maxResults": -1 })).unwrap();
        assert_eq!(page_size(args.max_results), 1);
    }
}
