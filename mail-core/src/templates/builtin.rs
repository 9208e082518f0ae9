//! Built-in messages shipped with the server
//!
//! These go through the same parse/render/compose pipeline as file templates.

use crate::error::Result;
use crate::templates::{ComposedMessage, MessageComposer, TemplateResolver, VariableMap};

const INTRODUCTION_TEXT: &str = "\
Subject: Introduction from {{ sender_name }}

Hi{% if recipient_name %} {{ recipient_name }}{% endif %},

My name is {{ sender_name }} and I wanted to reach out and introduce myself.

I'd love to connect and learn more about what you're working on. Feel free to
reply to this email at {{ sender_email }} whenever it suits you.

Best regards,
{{ sender_name }}
";

const INTRODUCTION_HTML: &str = "\
Subject: Introduction from {{ sender_name }}

<div style=\"font-family: Arial, sans-serif; color: #333;\">
  <p>Hi{% if recipient_name %} {{ recipient_name }}{% endif %},</p>
  <p>My name is <strong>{{ sender_name }}</strong> and I wanted to reach out and introduce myself.</p>
  <p>I'd love to connect and learn more about what you're working on. Feel free to
  reply to <a href=\"mailto:{{ sender_email }}\">{{ sender_email }}</a> whenever it suits you.</p>
  <p>Best regards,<br>{{ sender_name }}</p>
</div>
";

/// Compose the introduction email
///
/// `sender_name` defaults to `sender_email` when not supplied.
pub fn introduction(
    to: &str,
    recipient_name: Option<&str>,
    sender_name: Option<&str>,
    sender_email: &str,
    is_html: bool,
) -> Result<ComposedMessage> {
    let source = if is_html {
        INTRODUCTION_HTML
    } else {
        INTRODUCTION_TEXT
    };

    let mut vars = VariableMap::new();
    vars.insert("sender_email".to_string(), sender_email.into());
    vars.insert(
        "sender_name".to_string(),
        sender_name.unwrap_or(sender_email).into(),
    );
    if let Some(name) = recipient_name {
        vars.insert("recipient_name".to_string(), name.into());
    }

    let parsed = TemplateResolver::parse(source);
    MessageComposer::compose(to, &parsed, &vars, None, is_html)
}
