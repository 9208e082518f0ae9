//! mail-core: email building blocks for mcp-mail-server
//!
//! # Modules
//!
//! - [`config`]: Settings and the credential snapshot
//! - [`error`]: Error types and handling
//! - [`templates`]: File-based templates: lookup, subject extraction, rendering, composition
//! - [`delivery`]: Sending composed messages over SMTP
//! - [`inbox`]: Listing and organizing messages through the Gmail API
//!
//! # Example
//!
//! ```no_run
//! use mail_core::templates::{compose_from_store, TemplateStore, VariableMap};
//!
//! # async fn example() -> mail_core::Result<()> {
//! let store = TemplateStore::new("templates");
//! let mut vars = VariableMap::new();
//! vars.insert("name".to_string(), "Ana".into());
//!
//! let message = compose_from_store(&store, "welcome", "ana@example.com", &vars, None, false).await?;
//! println!("{}", message.subject);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod delivery;
pub mod error;
pub mod inbox;
pub mod templates;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use delivery::{DeliveryGateway, DeliveryReceipt};
pub use error::{MailError, Result};
pub use inbox::InboxProvider;
