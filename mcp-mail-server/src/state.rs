//! Shared application state
//!
//! Built once at startup and read concurrently by every request.

use mail_core::config::Config;
use mail_core::delivery::SmtpGateway;
use mail_core::inbox::GmailClient;
use mail_core::templates::TemplateStore;
use mail_core::{Credentials, DeliveryGateway, InboxProvider, MailError};
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState {
    pub config: Config,
    pub credentials: Credentials,
    pub templates: TemplateStore,
    gateway: Option<Arc<dyn DeliveryGateway>>,
    inbox: Option<Arc<dyn InboxProvider>>,
}

impl AppState {
    /// Build the SMTP gateway and Gmail client for whichever credential sets are complete
    pub fn new(config: Config, credentials: Credentials) -> Self {
        let gateway = match credentials.smtp() {
            Ok(smtp) => match SmtpGateway::new(&config.smtp, smtp) {
                Ok(gateway) => {
                    info!("📧 SMTP delivery via {}:{}", config.smtp.host, config.smtp.port);
                    Some(Arc::new(gateway) as Arc<dyn DeliveryGateway>)
                }
                Err(e) => {
                    warn!("❌ SMTP gateway unavailable: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("⚠️  {}; sending is disabled", e);
                None
            }
        };

        let inbox = match credentials.gmail() {
            Ok(oauth) => {
                info!("📬 Gmail API via {}", config.gmail.api_base);
                Some(Arc::new(GmailClient::new(&config.gmail, oauth)) as Arc<dyn InboxProvider>)
            }
            Err(e) => {
                warn!("⚠️  {}; inbox tools are disabled", e);
                None
            }
        };

        Self::with_services(config, credentials, gateway, inbox)
    }

    /// Assemble state around already-built services
    pub fn with_services(
        config: Config,
        credentials: Credentials,
        gateway: Option<Arc<dyn DeliveryGateway>>,
        inbox: Option<Arc<dyn InboxProvider>>,
    ) -> Self {
        let templates = TemplateStore::new(config.templates.dir.clone());
        Self {
            config,
            credentials,
            templates,
            gateway,
            inbox,
        }
    }

    pub fn gateway(&self) -> Result<Arc<dyn DeliveryGateway>, MailError> {
        match &self.gateway {
            Some(gateway) => Ok(gateway.clone()),
            None => {
                let missing = self.credentials.smtp_missing();
                if missing.is_empty() {
                    Err(MailError::DeliveryFailure(
                        "SMTP gateway failed to initialize".to_string(),
                    ))
                } else {
                    Err(MailError::missing(missing))
                }
            }
        }
    }

    pub fn inbox(&self) -> Result<Arc<dyn InboxProvider>, MailError> {
        match &self.inbox {
            Some(inbox) => Ok(inbox.clone()),
            None => Err(MailError::missing(self.credentials.gmail_missing())),
        }
    }
}
