//! Outbound tools: raw, introduction and template emails

use super::outcome::ToolOutcome;
use crate::state::AppState;
use mail_core::templates::{
    builtin, compose_from_store, summarize, ComposedMessage, VariableMap, DEFAULT_SUBJECT,
};
use mail_core::DeliveryReceipt;
use serde::Deserialize;
use tracing::{info, warn};

pub const SMTP_SERVICE: &str = "SMTP";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailArgs {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub is_html: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroductionArgs {
    pub to: String,
    pub recipient_name: Option<String>,
    pub sender_name: Option<String>,
    #[serde(default)]
    pub is_html: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEmailArgs {
    pub to: String,
    pub template_name: String,
    #[serde(default)]
    pub variables: VariableMap,
    /// Used when the template has no `Subject:` line
    pub subject: Option<String>,
    #[serde(default)]
    pub is_html: bool,
}

/// Send caller-supplied content as-is
pub async fn send_email(state: &AppState, args: SendEmailArgs) -> ToolOutcome {
    let subject = if args.subject.trim().is_empty() {
        DEFAULT_SUBJECT.to_string()
    } else {
        args.subject
    };

    let message = ComposedMessage {
        to: args.to,
        subject,
        body: args.body,
        is_html: args.is_html,
    };

    match deliver(state, &message).await {
        Ok(receipt) => ToolOutcome::text(format!(
            "Email sent successfully to {}\nSubject: {}\nMessage ID: {}",
            receipt.recipient, message.subject, receipt.message_id
        )),
        Err(outcome) => outcome,
    }
}

/// Send the built-in introduction, signed with the configured account
pub async fn send_introduction_email(state: &AppState, args: IntroductionArgs) -> ToolOutcome {
    let sender_email = match state.gateway() {
        Ok(_) => state.credentials.user().unwrap_or_default().to_string(),
        Err(e) => return ToolOutcome::from_error(SMTP_SERVICE, e),
    };

    let message = match builtin::introduction(
        &args.to,
        args.recipient_name.as_deref(),
        args.sender_name.as_deref(),
        &sender_email,
        args.is_html,
    ) {
        Ok(message) => message,
        Err(e) => return ToolOutcome::from_error(SMTP_SERVICE, e),
    };

    match deliver(state, &message).await {
        Ok(receipt) => ToolOutcome::text(format!(
            "Introduction email sent successfully to {}\nMessage ID: {}",
            receipt.recipient, receipt.message_id
        )),
        Err(outcome) => outcome,
    }
}

/// Render a stored template and send it
pub async fn send_template_email(state: &AppState, args: TemplateEmailArgs) -> ToolOutcome {
    if let Err(e) = state.gateway() {
        return ToolOutcome::from_error(SMTP_SERVICE, e);
    }

    info!(
        "📝 Composing template '{}' for {} ({} variables)",
        args.template_name,
        args.to,
        args.variables.len()
    );

    let message = match compose_from_store(
        &state.templates,
        &args.template_name,
        &args.to,
        &args.variables,
        args.subject.as_deref(),
        args.is_html,
    )
    .await
    {
        Ok(message) => message,
        Err(e) => {
            warn!("❌ Template '{}' failed: {}", args.template_name, e);
            return ToolOutcome::from_error(SMTP_SERVICE, e);
        }
    };

    match deliver(state, &message).await {
        Ok(receipt) => ToolOutcome::text(format!(
            "Template email sent successfully to {}\nTemplate: {}\nSubject: {}\nMessage ID: {}",
            receipt.recipient, args.template_name, message.subject, receipt.message_id
        )),
        Err(outcome) => outcome,
    }
}

pub async fn list_email_templates(state: &AppState) -> ToolOutcome {
    match summarize(&state.templates).await {
        Ok(templates) => {
            info!("📋 Found {} templates", templates.len());
            ToolOutcome::json(&serde_json::json!({
                "directory": state.templates.dir().display().to_string(),
                "count": templates.len(),
                "templates": templates,
            }))
        }
        Err(e) => ToolOutcome::from_error(SMTP_SERVICE, e),
    }
}

async fn deliver(
    state: &AppState,
    message: &ComposedMessage,
) -> Result<DeliveryReceipt, ToolOutcome> {
    let gateway = state
        .gateway()
        .map_err(|e| ToolOutcome::from_error(SMTP_SERVICE, e))?;

    gateway
        .deliver(message)
        .await
        .map_err(|e| ToolOutcome::from_error(SMTP_SERVICE, e))
}
