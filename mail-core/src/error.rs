use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Configuration missing: {}", missing.join(", "))]
    ConfigurationMissing { missing: Vec<String> },

    #[error("Invalid template name: {0}")]
    InvalidTemplateName(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template render error: {0}")]
    TemplateRender(String),

    #[error("Failed to send email: {0}")]
    DeliveryFailure(String),

    #[error("Gmail API error: {0}")]
    Inbox(String),

    #[error("Invalid message id: {0}")]
    InvalidMessageId(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MailError {
    /// Build a `ConfigurationMissing` from the names of unset variables
    pub fn missing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MailError::ConfigurationMissing {
            missing: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<minijinja::Error> for MailError {
    fn from(err: minijinja::Error) -> Self {
        MailError::TemplateRender(err.to_string())
    }
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Inbox(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MailError>;
