//! SMTP delivery through `lettre`

use crate::config::{SmtpConfig, SmtpCredentials};
use crate::delivery::{DeliveryGateway, DeliveryReceipt};
use crate::error::{MailError, Result};
use crate::templates::ComposedMessage;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Port using implicit TLS; any other port negotiates STARTTLS
const SMTPS_PORT: u16 = 465;

/// Sends mail as the configured account through an authenticated SMTP relay
pub struct SmtpGateway {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpGateway {
    pub fn new(settings: &SmtpConfig, credentials: SmtpCredentials) -> Result<Self> {
        let from: Mailbox = credentials.user.parse().map_err(|e| {
            MailError::DeliveryFailure(format!(
                "invalid sender address '{}': {}",
                credentials.user, e
            ))
        })?;

        let builder = if settings.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
        }
        .map_err(|e| {
            MailError::DeliveryFailure(format!("invalid SMTP relay '{}': {}", settings.host, e))
        })?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(credentials.user, credentials.password))
            .build();

        debug!("SMTP gateway ready: {}:{}", settings.host, settings.port);

        Ok(Self { transport, from })
    }

    /// Build the wire message for a composed message
    pub fn build_message(from: &Mailbox, message: &ComposedMessage) -> Result<(Message, String)> {
        let to: Mailbox = message.to.parse().map_err(|e| {
            MailError::DeliveryFailure(format!("invalid recipient '{}': {}", message.to, e))
        })?;

        let domain = from.email.domain().to_string();
        let message_id = format!("<{}@{}>", Uuid::new_v4(), domain);

        let content_type = if message.is_html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };

        let email = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .message_id(Some(message_id.clone()))
            .header(content_type)
            .body(message.body.clone())
            .map_err(|e| MailError::DeliveryFailure(format!("failed to build email: {}", e)))?;

        Ok((email, message_id))
    }
}

#[async_trait::async_trait]
impl DeliveryGateway for SmtpGateway {
    async fn deliver(&self, message: &ComposedMessage) -> Result<DeliveryReceipt> {
        let (email, message_id) = Self::build_message(&self.from, message)?;

        info!("📧 Sending email to: {}, subject: {}", message.to, message.subject);

        match self.transport.send(email).await {
            Ok(response) => {
                debug!("SMTP response code: {}", response.code());
                Ok(DeliveryReceipt {
                    message_id,
                    recipient: message.to.clone(),
                })
            }
            Err(e) => {
                warn!("❌ SMTP delivery to {} failed: {}", message.to, e);
                Err(MailError::DeliveryFailure(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composed(to: &str, is_html: bool) -> ComposedMessage {
        ComposedMessage {
            to: to.to_string(),
            subject: "Hello Ana".to_string(),
            body: "Hi Ana, welcome!".to_string(),
            is_html,
        }
    }

    fn sender() -> Mailbox {
        "bob@example.com".parse().unwrap()
    }

    #[test]
    fn test_build_plain_message() {
        let (email, message_id) =
            SmtpGateway::build_message(&sender(), &composed("ana@example.com", false)).unwrap();

        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: Hello Ana"));
        assert!(raw.contains("To: ana@example.com"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains(&message_id));
        assert!(message_id.ends_with("@example.com>"));
    }

    #[test]
    fn test_build_html_message() {
        let (email, _) =
            SmtpGateway::build_message(&sender(), &composed("ana@example.com", true)).unwrap();

        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn test_invalid_recipient_is_delivery_failure() {
        let result = SmtpGateway::build_message(&sender(), &composed("not an address", false));
        assert!(matches!(result, Err(MailError::DeliveryFailure(_))));
    }

    #[tokio::test]
    async fn test_gateway_construction() {
        let settings = SmtpConfig {
            host: "smtp.gmail.com".to_string(),
            port: 465,
        };
        let creds = SmtpCredentials {
            user: "bob@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(SmtpGateway::new(&settings, creds).is_ok());
    }

    #[test]
    fn test_invalid_sender_rejected() {
        let settings = SmtpConfig {
            host: "smtp.gmail.com".to_string(),
            port: 587,
        };
        let creds = SmtpCredentials {
            user: "not-an-address".to_string(),
            password: "secret".to_string(),
        };
        assert!(matches!(
            SmtpGateway::new(&settings, creds),
            Err(MailError::DeliveryFailure(_))
        ));
    }
}
