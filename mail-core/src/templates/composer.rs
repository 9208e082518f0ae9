//! Builds the final message from a parsed template

use crate::error::Result;
use crate::templates::{ComposedMessage, ParsedTemplate, TemplateRenderer, VariableMap};

/// Subject used when neither the template nor the caller supplies one
pub const DEFAULT_SUBJECT: &str = "No Subject";

pub struct MessageComposer;

impl MessageComposer {
    /// Render subject and body and package them with the recipient.
    ///
    /// Subject precedence: the template's subject line, then
    /// `fallback_subject`, then [`DEFAULT_SUBJECT`]. A candidate that renders
    /// to blank text is skipped. `to` is passed through as given.
    pub fn compose(
        to: &str,
        parsed: &ParsedTemplate,
        vars: &VariableMap,
        fallback_subject: Option<&str>,
        is_html: bool,
    ) -> Result<ComposedMessage> {
        // Subjects are header text, never HTML.
        let mut subject = None;
        for candidate in [parsed.subject_line.as_deref(), fallback_subject]
            .into_iter()
            .flatten()
        {
            let rendered = TemplateRenderer::render(candidate, vars, false)?;
            let rendered = rendered.trim();
            if !rendered.is_empty() {
                subject = Some(rendered.to_string());
                break;
            }
        }

        let body = TemplateRenderer::render(&parsed.body, vars, is_html)?;

        Ok(ComposedMessage {
            to: to.to_string(),
            subject: subject.unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            body: body.trim().to_string(),
            is_html,
        })
    }
}
