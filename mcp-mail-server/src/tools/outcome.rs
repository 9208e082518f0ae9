//! Tool outcomes and their MCP `tools/call` rendering

use mail_core::MailError;
use serde::Serialize;

/// Result of running a tool
///
/// Every variant becomes a text content block; only `Ok` has `isError: false`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Ok(String),
    NotConfigured {
        service: &'static str,
        missing: Vec<String>,
    },
    Failed(String),
}

impl ToolOutcome {
    pub fn text(text: impl Into<String>) -> Self {
        ToolOutcome::Ok(text.into())
    }

    /// Pretty-printed JSON payload
    pub fn json<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_string_pretty(payload) {
            Ok(text) => ToolOutcome::Ok(text),
            Err(e) => ToolOutcome::Failed(format!("Failed to serialize result: {}", e)),
        }
    }

    /// Map a mail-core error, keeping missing configuration distinct from failures
    pub fn from_error(service: &'static str, err: MailError) -> Self {
        match err {
            MailError::ConfigurationMissing { missing } => {
                ToolOutcome::NotConfigured { service, missing }
            }
            other => ToolOutcome::Failed(other.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, ToolOutcome::Ok(_))
    }

    pub fn to_text(&self) -> String {
        match self {
            ToolOutcome::Ok(text) => text.clone(),
            ToolOutcome::NotConfigured { service, missing } => {
                let payload = serde_json::json!({
                    "status": "not_configured",
                    "service": service,
                    "message": format!(
                        "{} is not configured. Set the following environment variables: {}",
                        service,
                        missing.join(", ")
                    ),
                    "missing": missing,
                });
                serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
            }
            ToolOutcome::Failed(reason) => format!("Error: {}", reason),
        }
    }

    /// `{"content": [{"type": "text", "text": ...}], "isError": ...}`
    pub fn into_call_result(self) -> serde_json::Value {
        serde_json::json!({
            "content": [{
                "type": "text",
                "text": self.to_text(),
            }],
            "isError": self.is_error(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_is_not_a_failure() {
        let outcome = ToolOutcome::from_error(
            "SMTP",
            MailError::missing(["GMAIL_USER", "GMAIL_APP_PASSWORD"]),
        );

        assert_eq!(
            outcome,
            ToolOutcome::NotConfigured {
                service: "SMTP",
                missing: vec!["GMAIL_USER".to_string(), "GMAIL_APP_PASSWORD".to_string()],
            }
        );

        let result = outcome.into_call_result();
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        let payload: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(payload["status"], "not_configured");
        assert_eq!(payload["missing"][1], "GMAIL_APP_PASSWORD");
    }

    #[test]
    fn test_failure_text() {
        let outcome = ToolOutcome::from_error(
            "SMTP",
            MailError::TemplateNotFound("welcome".to_string()),
        );
        assert_eq!(outcome.to_text(), "Error: Template not found: welcome");
        assert!(outcome.is_error());
    }

    #[test]
    fn test_ok_result_shape() {
        let result = ToolOutcome::text("done").into_call_result();
        assert_eq!(
            result,
            serde_json::json!({
                "content": [{"type": "text", "text": "done"}],
                "isError": false,
            })
        );
    }
}
