//! Splits raw template text into subject header and body

use crate::templates::ParsedTemplate;
use regex::Regex;
use std::sync::OnceLock;

const SUBJECT_PREFIX: &str = "Subject:";

fn subject_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^Subject:.*$").expect("subject pattern is valid"))
}

/// Parses template files of the form
///
/// ```text
/// Subject: Hello {{ name }}
/// Hi {{ name }}, welcome!
/// ```
pub struct TemplateResolver;

impl TemplateResolver {
    /// Extract the first `Subject:` line, wherever it appears.
    ///
    /// When found, that exact line is removed and the rest is trimmed. When
    /// absent, the text is returned untouched. Later `Subject:` lines are
    /// left in the body.
    pub fn parse(raw: &str) -> ParsedTemplate {
        let Some(line) = subject_pattern().find(raw) else {
            return ParsedTemplate {
                subject_line: None,
                body: raw.to_string(),
            };
        };

        let subject = line.as_str()[SUBJECT_PREFIX.len()..].trim().to_string();

        let mut body = String::with_capacity(raw.len());
        body.push_str(&raw[..line.start()]);
        body.push_str(&raw[line.end()..]);

        ParsedTemplate {
            subject_line: Some(subject),
            body: body.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_on_first_line() {
        let parsed = TemplateResolver::parse("Subject: Hello {{name}}\nHi {{name}}, welcome!");
        assert_eq!(parsed.subject_line.as_deref(), Some("Hello {{name}}"));
        assert_eq!(parsed.body, "Hi {{name}}, welcome!");
    }

    #[test]
    fn test_subject_not_on_first_line() {
        let parsed = TemplateResolver::parse("Preamble\nSubject:   Later  \nBody text\n");
        assert_eq!(parsed.subject_line.as_deref(), Some("Later"));
        assert_eq!(parsed.body, "Preamble\n\nBody text");
        assert!(!parsed.body.contains("Subject:"));
    }

    #[test]
    fn test_no_subject_keeps_text_unchanged() {
        let raw = "  Just body text, no subject\n";
        let parsed = TemplateResolver::parse(raw);
        assert_eq!(parsed.subject_line, None);
        assert_eq!(parsed.body, raw);
    }

    #[test]
    fn test_keyword_is_case_sensitive() {
        let parsed = TemplateResolver::parse("subject: lower\nbody");
        assert_eq!(parsed.subject_line, None);
    }

    #[test]
    fn test_keyword_must_start_the_line() {
        let parsed = TemplateResolver::parse("Re Subject: nope\nbody");
        assert_eq!(parsed.subject_line, None);
    }

    #[test]
    fn test_only_first_subject_line_is_extracted() {
        let parsed = TemplateResolver::parse("Subject: One\nBody\nSubject: Two");
        assert_eq!(parsed.subject_line.as_deref(), Some("One"));
        assert_eq!(parsed.body, "Body\nSubject: Two");
    }

    #[test]
    fn test_crlf_line_endings() {
        let parsed = TemplateResolver::parse("Subject: Windows\r\nBody\r\n");
        assert_eq!(parsed.subject_line.as_deref(), Some("Windows"));
        assert_eq!(parsed.body, "Body");
    }
}
