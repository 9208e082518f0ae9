//! Configuration for mail-core and mcp-mail-server
//!
//! Two separate snapshots are loaded once at startup:
//! - [`Config`]: non-secret settings (transport, template directory, endpoints, logging)
//!   layered from defaults, an optional TOML file and `MCP_MAIL_*` environment variables.
//! - [`Credentials`]: account identity and secrets read from the process environment.

use crate::error::{MailError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// SMTP account address
pub const ENV_GMAIL_USER: &str = "GMAIL_USER";
/// SMTP app password
pub const ENV_GMAIL_APP_PASSWORD: &str = "GMAIL_APP_PASSWORD";
/// OAuth client id for the Gmail API
pub const ENV_GMAIL_CLIENT_ID: &str = "GMAIL_CLIENT_ID";
/// OAuth client secret for the Gmail API
pub const ENV_GMAIL_CLIENT_SECRET: &str = "GMAIL_CLIENT_SECRET";
/// OAuth redirect URI registered for the client
pub const ENV_GMAIL_REDIRECT_URI: &str = "GMAIL_REDIRECT_URI";
/// Long-lived OAuth refresh token
pub const ENV_GMAIL_REFRESH_TOKEN: &str = "GMAIL_REFRESH_TOKEN";

const DEFAULT_TRANSPORT: &str = "stdio";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8090";
const DEFAULT_TEMPLATES_DIR: &str = "templates";
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 465;
const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
const DEFAULT_GMAIL_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FORMAT: &str = "pretty";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub templates: TemplatesConfig,
    pub smtp: SmtpConfig,
    pub gmail: GmailConfig,
    pub logging: LoggingConfig,
}

/// How the MCP server talks to its client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    Stdio,
    /// JSON-RPC over `POST /mcp`
    Http,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub transport: Transport,
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplatesConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GmailConfig {
    pub api_base: String,
    pub token_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load settings from defaults, `config.toml` (or the file named by
    /// `MCP_MAIL_CONFIG`) and `MCP_MAIL_*` environment variables.
    ///
    /// Nested keys use `__`, e.g. `MCP_MAIL_SERVER__TRANSPORT=http`.
    pub fn load() -> Result<Self> {
        let file = std::env::var("MCP_MAIL_CONFIG").unwrap_or_else(|_| "config".to_string());

        let builder = Self::defaults()?
            .add_source(::config::File::with_name(&file).required(false))
            .add_source(
                ::config::Environment::with_prefix("MCP_MAIL")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Parse settings from a TOML document layered over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(::config::File::from_str(
            content,
            ::config::FileFormat::Toml,
        ));

        Ok(builder.build()?.try_deserialize()?)
    }

    fn defaults() -> Result<::config::ConfigBuilder<::config::builder::DefaultState>> {
        Ok(::config::Config::builder()
            .set_default("server.transport", DEFAULT_TRANSPORT)?
            .set_default("server.listen_addr", DEFAULT_LISTEN_ADDR)?
            .set_default("templates.dir", DEFAULT_TEMPLATES_DIR)?
            .set_default("smtp.host", DEFAULT_SMTP_HOST)?
            .set_default("smtp.port", i64::from(DEFAULT_SMTP_PORT))?
            .set_default("gmail.api_base", DEFAULT_GMAIL_API_BASE)?
            .set_default("gmail.token_url", DEFAULT_GMAIL_TOKEN_URL)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("logging.format", DEFAULT_LOG_FORMAT)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                transport: Transport::Stdio,
                listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            },
            templates: TemplatesConfig {
                dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            },
            smtp: SmtpConfig {
                host: DEFAULT_SMTP_HOST.to_string(),
                port: DEFAULT_SMTP_PORT,
            },
            gmail: GmailConfig {
                api_base: DEFAULT_GMAIL_API_BASE.to_string(),
                token_url: DEFAULT_GMAIL_TOKEN_URL.to_string(),
            },
            logging: LoggingConfig {
                level: DEFAULT_LOG_LEVEL.to_string(),
                format: DEFAULT_LOG_FORMAT.to_string(),
            },
        }
    }
}

/// Login used by the SMTP delivery gateway
#[derive(Clone)]
pub struct SmtpCredentials {
    pub user: String,
    pub password: String,
}

/// OAuth client and refresh token used by the Gmail inbox provider
#[derive(Clone)]
pub struct GmailOAuth {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub refresh_token: String,
}

/// Credential snapshot taken from the environment at startup
#[derive(Clone, Default)]
pub struct Credentials {
    user: Option<String>,
    app_password: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    refresh_token: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            user: get(ENV_GMAIL_USER),
            app_password: get(ENV_GMAIL_APP_PASSWORD),
            client_id: get(ENV_GMAIL_CLIENT_ID),
            client_secret: get(ENV_GMAIL_CLIENT_SECRET),
            redirect_uri: get(ENV_GMAIL_REDIRECT_URI),
            refresh_token: get(ENV_GMAIL_REFRESH_TOKEN),
        }
    }

    /// Configured account address, if any
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Configured OAuth redirect URI, if any
    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    /// Names of unset SMTP variables
    pub fn smtp_missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.user.is_none() {
            missing.push(ENV_GMAIL_USER);
        }
        if self.app_password.is_none() {
            missing.push(ENV_GMAIL_APP_PASSWORD);
        }
        missing
    }

    /// Names of unset Gmail API variables
    pub fn gmail_missing(&self) -> Vec<&'static str> {
        [
            (ENV_GMAIL_CLIENT_ID, &self.client_id),
            (ENV_GMAIL_CLIENT_SECRET, &self.client_secret),
            (ENV_GMAIL_REDIRECT_URI, &self.redirect_uri),
            (ENV_GMAIL_REFRESH_TOKEN, &self.refresh_token),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn smtp(&self) -> Result<SmtpCredentials> {
        match (&self.user, &self.app_password) {
            (Some(user), Some(password)) => Ok(SmtpCredentials {
                user: user.clone(),
                password: password.clone(),
            }),
            _ => Err(MailError::missing(self.smtp_missing())),
        }
    }

    pub fn gmail(&self) -> Result<GmailOAuth> {
        match (
            &self.client_id,
            &self.client_secret,
            &self.redirect_uri,
            &self.refresh_token,
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri), Some(refresh_token)) => {
                Ok(GmailOAuth {
                    client_id: client_id.clone(),
                    client_secret: client_secret.clone(),
                    redirect_uri: redirect_uri.clone(),
                    refresh_token: refresh_token.clone(),
                })
            }
            _ => Err(MailError::missing(self.gmail_missing())),
        }
    }
}

// Secrets never reach the logs; only presence is shown.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("app_password", &self.app_password.as_ref().map(|_| "***"))
            .field("client_id", &self.client_id.as_ref().map(|_| "***"))
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("redirect_uri", &self.redirect_uri)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .finish()
    }
}
