//! Email templates system
//!
//! File-based templates with an optional `Subject:` header line and
//! `{{ variable }}` substitution. The pipeline is
//! [`TemplateStore`] → [`TemplateResolver`] → [`TemplateRenderer`] → [`MessageComposer`].

pub mod builtin;
pub mod composer;
pub mod renderer;
pub mod resolver;
pub mod store;
pub mod types;

pub use composer::{MessageComposer, DEFAULT_SUBJECT};
pub use renderer::TemplateRenderer;
pub use resolver::TemplateResolver;
pub use store::TemplateStore;
pub use types::{ComposedMessage, ParsedTemplate, TemplateSummary, TemplateValue, VariableMap};

use crate::error::Result;
use tracing::warn;

/// Load, parse and compose a stored template in one step
pub async fn compose_from_store(
    store: &TemplateStore,
    name: &str,
    to: &str,
    vars: &VariableMap,
    fallback_subject: Option<&str>,
    is_html: bool,
) -> Result<ComposedMessage> {
    let raw = store.load(name).await?;
    let parsed = TemplateResolver::parse(&raw);
    MessageComposer::compose(to, &parsed, vars, fallback_subject, is_html)
}

/// Describe every readable stored template: name, raw subject line and
/// referenced variables
///
/// Files that cannot be read as UTF-8 text are skipped with a warning.
pub async fn summarize(store: &TemplateStore) -> Result<Vec<TemplateSummary>> {
    let mut summaries = Vec::new();
    for name in store.list().await? {
        let raw = match store.load(&name).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping unreadable template '{}': {}", name, e);
                continue;
            }
        };
        let parsed = TemplateResolver::parse(&raw);
        summaries.push(TemplateSummary {
            name,
            subject: parsed.subject_line,
            variables: TemplateRenderer::extract_variables(&raw),
        });
    }
    Ok(summaries)
}
