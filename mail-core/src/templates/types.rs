//! Template types and data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Template text split into an optional subject header and a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Text following `Subject:` on the header line, trimmed
    pub subject_line: Option<String>,
    /// Remaining text; never contains the extracted header line
    pub body: String,
}

/// A substitution value supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Bool(b) => write!(f, "{}", b),
            TemplateValue::Number(n) => write!(f, "{}", n),
            TemplateValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Text(value)
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        TemplateValue::Bool(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        TemplateValue::Number(value.into())
    }
}

/// Placeholder name to value
pub type VariableMap = BTreeMap<String, TemplateValue>;

/// A fully rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedMessage {
    pub to: String,
    /// Never empty
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

/// Entry returned when listing the template directory
#[derive(Debug, Clone, Serialize)]
pub struct TemplateSummary {
    pub name: String,
    pub subject: Option<String>,
    pub variables: Vec<String>,
}
