//! Template rendering with variable substitution

use crate::error::Result;
use crate::templates::VariableMap;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::collections::BTreeMap;

/// Renders `{{ name }}` placeholders against a [`VariableMap`]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Render a string with variable substitution
    ///
    /// Placeholders missing from `vars` render as an empty string, including
    /// attribute and item lookups through them (`{{ user.name }}`). With
    /// `is_html` set, substituted values are HTML-escaped; otherwise they are
    /// inserted verbatim. Malformed template syntax fails with
    /// [`MailError::TemplateRender`](crate::MailError::TemplateRender).
    pub fn render(text: &str, vars: &VariableMap, is_html: bool) -> Result<String> {
        let env = Self::environment(is_html);
        let context: BTreeMap<&str, String> = vars
            .iter()
            .map(|(name, value)| (name.as_str(), value.to_string()))
            .collect();

        Ok(env.render_str(text, context)?)
    }

    fn environment(is_html: bool) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(move |_name: &str| {
            if is_html {
                AutoEscape::Html
            } else {
                AutoEscape::None
            }
        });
        env
    }

    /// Extract all variable names from a template string
    ///
    /// Returns the leading identifier of each `{{ ... }}` expression, so
    /// `{{ name | upper }}` yields `name`. Sorted and de-duplicated.
    pub fn extract_variables(template_str: &str) -> Vec<String> {
        let mut variables = Vec::new();
        let mut chars = template_str.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '{' && chars.peek() == Some(&'{') {
                chars.next(); // consume second {

                let mut expr = String::new();
                while let Some(ch) = chars.next() {
                    if ch == '}' && chars.peek() == Some(&'}') {
                        chars.next(); // consume second }
                        break;
                    }
                    expr.push(ch);
                }

                let name: String = expr
                    .trim()
                    .chars()
                    .take_while(|ch| ch.is_alphanumeric() || *ch == '_')
                    .collect();
                if !name.is_empty() {
                    variables.push(name);
                }
            }
        }

        variables.sort();
        variables.dedup();
        variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MailError;
    use crate::templates::TemplateValue;

    fn vars(pairs: &[(&str, TemplateValue)]) -> VariableMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_basic_variables() {
        let vars = vars(&[("name", "John Doe".into()), ("company", "Acme Inc".into())]);

        let rendered =
            TemplateRenderer::render("Hello {{name}} from {{ company }}!", &vars, false).unwrap();

        assert_eq!(rendered, "Hello John Doe from Acme Inc!");
    }

    #[test]
    fn test_unmapped_placeholder_renders_empty() {
        let vars = vars(&[("name", "Ana".into())]);
        let rendered = TemplateRenderer::render("Hi {{name}}{{ missing }}!", &vars, false).unwrap();
        assert_eq!(rendered, "Hi Ana!");
    }

    #[test]
    fn test_lookup_through_unmapped_placeholder_renders_empty() {
        let rendered =
            TemplateRenderer::render("Hi {{ user.name }}!", &VariableMap::new(), false).unwrap();
        assert_eq!(rendered, "Hi !");

        let rendered =
            TemplateRenderer::render("[{{ order['id'] }}]", &VariableMap::new(), true).unwrap();
        assert_eq!(rendered, "[]");
    }

    #[test]
    fn test_numbers_and_booleans_are_stringified() {
        let vars = vars(&[("count", 3i64.into()), ("vip", true.into())]);
        let rendered =
            TemplateRenderer::render("{{count}} items, vip={{vip}}", &vars, false).unwrap();
        assert_eq!(rendered, "3 items, vip=true");
    }

    #[test]
    fn test_html_mode_escapes_values() {
        let vars = vars(&[("name", "<b>Ana & Co".into())]);

        let html = TemplateRenderer::render("<p>{{name}}</p>", &vars, true).unwrap();
        assert_eq!(html, "<p>&lt;b&gt;Ana &amp; Co</p>");

        let text = TemplateRenderer::render("{{name}}", &vars, false).unwrap();
        assert_eq!(text, "<b>Ana & Co");
    }

    #[test]
    fn test_malformed_syntax_is_an_error() {
        let result = TemplateRenderer::render("Hello {{ name", &VariableMap::new(), false);
        assert!(matches!(result, Err(MailError::TemplateRender(_))));
    }

    #[test]
    fn test_trailing_newline_preserved() {
        let rendered = TemplateRenderer::render("line\n", &VariableMap::new(), false).unwrap();
        assert_eq!(rendered, "line\n");
    }

    #[test]
    fn test_extract_variables() {
        let template = "Hello {{name}}, your order {{ order_id }} is ready. Again: {{name|upper}}";
        let vars = TemplateRenderer::extract_variables(template);

        assert_eq!(vars, vec!["name", "order_id"]);
    }

    #[test]
    fn test_extract_variables_without_placeholders() {
        assert!(TemplateRenderer::extract_variables("plain { text }").is_empty());
    }
}
