//! Email tools exposed over MCP

use crate::mcp::{McpError, Tool, ToolParameter};
use crate::state::AppState;
use mail_core::templates::summarize;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

pub mod inbox;
pub mod outcome;
pub mod send;

pub use outcome::ToolOutcome;

pub const SEND_EMAIL: &str = "send_email";
pub const SEND_INTRODUCTION_EMAIL: &str = "send_introduction_email";
pub const CHECK_GMAIL_CONFIG: &str = "check_gmail_config";
pub const LIST_LABELS: &str = "list_labels";
pub const LIST_UNREAD_EMAILS: &str = "list_unread_emails";
pub const GET_EMAIL: &str = "get_email";
pub const ARCHIVE_EMAIL: &str = "archive_email";
pub const DELETE_EMAIL: &str = "delete_email";
pub const LIST_EMAIL_TEMPLATES: &str = "list_email_templates";
pub const SEND_TEMPLATE_EMAIL: &str = "send_template_email";

/// Every tool advertised by `tools/list`
pub fn definitions() -> Vec<Tool> {
    let message_id = || ToolParameter::string("messageId", "Gmail message id", true);
    let is_html = || {
        ToolParameter::boolean("isHtml", "Send the body as HTML", false).with_default(json!(false))
    };

    vec![
        Tool::new(SEND_EMAIL, "Send an email through the configured SMTP account")
            .with_parameter(ToolParameter::string("to", "Recipient email address", true))
            .with_parameter(ToolParameter::string("subject", "Email subject", true))
            .with_parameter(ToolParameter::string("body", "Email body", true))
            .with_parameter(is_html()),
        Tool::new(
            SEND_INTRODUCTION_EMAIL,
            "Send a short introduction email signed with the configured account",
        )
        .with_parameter(ToolParameter::string("to", "Recipient email address", true))
        .with_parameter(ToolParameter::string(
            "recipientName",
            "Name used in the greeting",
            false,
        ))
        .with_parameter(ToolParameter::string(
            "senderName",
            "Signature name (defaults to the account address)",
            false,
        ))
        .with_parameter(is_html()),
        Tool::new(
            CHECK_GMAIL_CONFIG,
            "Report which SMTP and Gmail API credentials are configured",
        ),
        Tool::new(LIST_LABELS, "List the labels of the Gmail account"),
        Tool::new(LIST_UNREAD_EMAILS, "List unread emails in the Gmail account")
            .with_parameter(
                ToolParameter::number("maxResults", "Maximum number of emails (1-100)", false)
                    .with_default(json!(10)),
            ),
        Tool::new(GET_EMAIL, "Get the headers and body of an email").with_parameter(message_id()),
        Tool::new(ARCHIVE_EMAIL, "Archive an email (remove it from the inbox)")
            .with_parameter(message_id()),
        Tool::new(DELETE_EMAIL, "Move an email to the trash").with_parameter(message_id()),
        Tool::new(
            LIST_EMAIL_TEMPLATES,
            "List the email templates with their subjects and variables",
        ),
        Tool::new(SEND_TEMPLATE_EMAIL, "Render an email template and send it")
            .with_parameter(ToolParameter::string("to", "Recipient email address", true))
            .with_parameter(ToolParameter::string(
                "templateName",
                "Template file name without the .txt extension",
                true,
            ))
            .with_parameter(
                ToolParameter::object("variables", "Values for the template placeholders", false)
                    .with_default(json!({})),
            )
            .with_parameter(ToolParameter::string(
                "subject",
                "Subject used when the template has no Subject line",
                false,
            ))
            .with_parameter(is_html()),
    ]
}

/// Run a tool by name
///
/// Unknown tools and malformed arguments are protocol errors; everything
/// past argument parsing is reported as a [`ToolOutcome`].
pub async fn call(state: &AppState, name: &str, arguments: Value) -> Result<ToolOutcome, McpError> {
    debug!("🔧 Calling tool: {}", name);

    let outcome = match name {
        SEND_EMAIL => send::send_email(state, parse_args(name, arguments)?).await,
        SEND_INTRODUCTION_EMAIL => {
            send::send_introduction_email(state, parse_args(name, arguments)?).await
        }
        SEND_TEMPLATE_EMAIL => send::send_template_email(state, parse_args(name, arguments)?).await,
        LIST_EMAIL_TEMPLATES => send::list_email_templates(state).await,
        CHECK_GMAIL_CONFIG => check_gmail_config(state).await,
        LIST_LABELS => inbox::list_labels(state).await,
        LIST_UNREAD_EMAILS => inbox::list_unread_emails(state, parse_args(name, arguments)?).await,
        GET_EMAIL => inbox::get_email(state, parse_args(name, arguments)?).await,
        ARCHIVE_EMAIL => inbox::archive_email(state, parse_args(name, arguments)?).await,
        DELETE_EMAIL => inbox::delete_email(state, parse_args(name, arguments)?).await,
        _ => return Err(McpError::method_not_found(format!("Tool not found: {}", name))),
    };

    Ok(outcome)
}

/// Absent arguments are treated as an empty object
fn parse_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, McpError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };

    serde_json::from_value(arguments)
        .map_err(|e| McpError::invalid_params(format!("Invalid arguments for {}: {}", tool, e)))
}

/// Credential status; never reveals secret values
async fn check_gmail_config(state: &AppState) -> ToolOutcome {
    let credentials = &state.credentials;
    let smtp_missing = credentials.smtp_missing();
    let gmail_missing = credentials.gmail_missing();
    let template_count = summarize(&state.templates).await.map(|t| t.len()).ok();

    ToolOutcome::json(&json!({
        "smtp": {
            "configured": smtp_missing.is_empty(),
            "account": credentials.user(),
            "server": format!("{}:{}", state.config.smtp.host, state.config.smtp.port),
            "missing": smtp_missing,
        },
        "gmail_api": {
            "configured": gmail_missing.is_empty(),
            "redirect_uri": credentials.redirect_uri(),
            "missing": gmail_missing,
        },
        "templates": {
            "directory": state.templates.dir().display().to_string(),
            "count": template_count,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mail_core::{Config, Credentials};

    fn state_with(vars: &[(&str, &str)]) -> AppState {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let credentials = Credentials::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        });
        AppState::with_services(Config::default(), credentials, None, None)
    }

    #[test]
    fn test_definitions_are_unique() {
        let tools = definitions();
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 10);
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let state = state_with(&[]);
        let err = call(&state, "forward_email", json!({})).await.unwrap_err();
        assert_eq!(err.code, McpError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let state = state_with(&[]);
        let err = call(&state, SEND_EMAIL, json!({"to": "a@example.com"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, McpError::INVALID_PARAMS);
        assert!(err.message.contains("subject"));
    }

    #[tokio::test]
    async fn test_null_arguments_use_defaults() {
        let state = state_with(&[]);
        let outcome = call(&state, LIST_UNREAD_EMAILS, Value::Null).await.unwrap();
        assert!(matches!(
            outcome,
            ToolOutcome::NotConfigured { service: inbox::GMAIL_SERVICE, .. }
        ));
    }

    #[tokio::test]
    async fn test_check_config_hides_secrets() {
        let state = state_with(&[
            ("GMAIL_USER", "me@example.com"),
            ("GMAIL_APP_PASSWORD", "super-secret-password"),
            ("GMAIL_CLIENT_SECRET", "client-secret-value"),
        ]);

        let outcome = call(&state, CHECK_GMAIL_CONFIG, json!({})).await.unwrap();
        let text = outcome.to_text();
        assert!(!outcome.is_error());
        assert!(!text.contains("super-secret-password"));
        assert!(!text.contains("client-secret-value"));

        let payload: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(payload["smtp"]["configured"], true);
        assert_eq!(payload["smtp"]["account"], "me@example.com");
        assert_eq!(payload["gmail_api"]["configured"], false);
        assert_eq!(
            payload["gmail_api"]["missing"],
            json!(["GMAIL_CLIENT_ID", "GMAIL_REDIRECT_URI", "GMAIL_REFRESH_TOKEN"])
        );
    }
}
