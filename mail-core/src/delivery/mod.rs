//! Delivery gateway: hands composed messages to a mail transport

use crate::error::Result;
use crate::templates::ComposedMessage;
use serde::Serialize;

pub mod smtp;

pub use smtp::SmtpGateway;

/// Confirmation returned once the transport accepted a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    /// `Message-ID` header of the sent message
    pub message_id: String,
    pub recipient: String,
}

/// Transmits composed messages
///
/// Failures are reported once; callers decide whether to retry.
#[async_trait::async_trait]
pub trait DeliveryGateway: Send + Sync {
    async fn deliver(&self, message: &ComposedMessage) -> Result<DeliveryReceipt>;
}
