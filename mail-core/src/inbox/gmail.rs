//! Gmail REST API implementation of [`InboxProvider`]
//!
//! Every call first exchanges the refresh token for a short-lived access
//! token at the OAuth token endpoint, then talks to
//! `{api_base}/gmail/v1/users/me/...` with a bearer header.

use super::{
    clamp_max_results, validate_message_id, InboxProvider, Label, MessageDetail, MessageSummary,
};
use crate::config::{GmailConfig, GmailOAuth};
use crate::error::{MailError, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

/// Gmail client backed by `reqwest`
pub struct GmailClient {
    oauth: GmailOAuth,
    api_base: String,
    token_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct LabelsResponse {
    #[serde(default)]
    labels: Vec<GmailLabel>,
}

#[derive(Debug, Deserialize)]
struct GmailLabel {
    id: String,
    name: String,
    #[serde(rename = "type")]
    label_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GmailMessage {
    id: String,
    #[serde(default)]
    thread_id: String,
    #[serde(default)]
    label_ids: Vec<String>,
    #[serde(default)]
    snippet: String,
    payload: Option<MessagePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagePart {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    headers: Vec<Header>,
    body: Option<PartBody>,
    #[serde(default)]
    parts: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
struct PartBody {
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

impl MessagePart {
    fn header(&self, name: &str) -> String {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.clone())
            .unwrap_or_default()
    }

    /// Depth-first search for the first part of `mime_type` carrying data
    fn find_data(&self, mime_type: &str) -> Option<&str> {
        if self.mime_type.eq_ignore_ascii_case(mime_type) {
            if let Some(data) = self.body.as_ref().and_then(|b| b.data.as_deref()) {
                return Some(data);
            }
        }
        self.parts.iter().find_map(|p| p.find_data(mime_type))
    }

    /// Readable body: plain text preferred, HTML otherwise
    fn text_body(&self) -> Result<(String, bool)> {
        if let Some(data) = self.find_data("text/plain") {
            return Ok((decode_base64url(data)?, false));
        }
        if let Some(data) = self.find_data("text/html") {
            return Ok((decode_base64url(data)?, true));
        }
        Ok((String::new(), false))
    }
}

/// Gmail emits URL-safe base64 with or without padding
fn decode_base64url(data: &str) -> Result<String> {
    let engine = GeneralPurpose::new(
        &alphabet::URL_SAFE,
        GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
    );
    let bytes = engine
        .decode(data.trim())
        .map_err(|e| MailError::Inbox(format!("invalid body encoding: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl GmailClient {
    pub fn new(settings: &GmailConfig, oauth: GmailOAuth) -> Self {
        Self {
            oauth,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            token_url: settings.token_url.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/gmail/v1/users/me/{}", self.api_base, path)
    }

    /// Exchange the refresh token for an access token
    async fn access_token(&self) -> Result<String> {
        debug!("Refreshing Gmail access token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("refresh_token", self.oauth.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let token: TokenResponse = Self::check(response).await?.json().await?;
        Ok(token.access_token)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        warn!("Gmail request failed with status {}: {}", status, error_text);
        Err(MailError::Inbox(format!("{} - {}", status, error_text)))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn post(&self, token: &str, path: &str, body: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl InboxProvider for GmailClient {
    async fn list_labels(&self) -> Result<Vec<Label>> {
        let token = self.access_token().await?;
        let response: LabelsResponse = self.get(&token, "labels", &[]).await?;

        Ok(response
            .labels
            .into_iter()
            .map(|l| Label {
                id: l.id,
                name: l.name,
                label_type: l.label_type,
            })
            .collect())
    }

    async fn list_unread(&self, max_results: u32) -> Result<Vec<MessageSummary>> {
        let token = self.access_token().await?;
        let max_results = clamp_max_results(max_results).to_string();

        let list: ListResponse = self
            .get(
                &token,
                "messages",
                &[("q", "is:unread"), ("maxResults", max_results.as_str())],
            )
            .await?;

        debug!("Fetching metadata for {} unread messages", list.messages.len());

        let mut summaries = Vec::with_capacity(list.messages.len());
        for message_ref in list.messages {
            let message: GmailMessage = self
                .get(
                    &token,
                    &format!("messages/{}", message_ref.id),
                    &[
                        ("format", "metadata"),
                        ("metadataHeaders", "From"),
                        ("metadataHeaders", "Subject"),
                        ("metadataHeaders", "Date"),
                    ],
                )
                .await?;

            let payload = message.payload.unwrap_or_default();
            summaries.push(MessageSummary {
                id: message.id,
                thread_id: message.thread_id,
                from: payload.header("From"),
                subject: payload.header("Subject"),
                date: payload.header("Date"),
                snippet: message.snippet,
            });
        }

        Ok(summaries)
    }

    async fn get_message(&self, id: &str) -> Result<MessageDetail> {
        validate_message_id(id)?;
        let token = self.access_token().await?;

        let message: GmailMessage = self
            .get(&token, &format!("messages/{}", id), &[("format", "full")])
            .await?;

        let payload = message.payload.unwrap_or_default();
        let (body, body_is_html) = payload.text_body()?;

        Ok(MessageDetail {
            id: message.id,
            thread_id: message.thread_id,
            from: payload.header("From"),
            to: payload.header("To"),
            subject: payload.header("Subject"),
            date: payload.header("Date"),
            labels: message.label_ids,
            snippet: message.snippet,
            body,
            body_is_html,
        })
    }

    async fn archive(&self, id: &str) -> Result<()> {
        validate_message_id(id)?;
        let token = self.access_token().await?;
        self.post(
            &token,
            &format!("messages/{}/modify", id),
            serde_json::json!({ "removeLabelIds": ["INBOX"] }),
        )
        .await
    }

    async fn trash(&self, id: &str) -> Result<()> {
        validate_message_id(id)?;
        let token = self.access_token().await?;
        self.post(&token, &format!("messages/{}/trash", id), serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(json: serde_json::Value) -> MessagePart {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_decode_base64url_with_and_without_padding() {
        // "Hi?>" encodes to URL-safe characters
        assert_eq!(decode_base64url("SGk_Pg").unwrap(), "Hi?>");
        assert_eq!(decode_base64url("SGk_Pg==").unwrap(), "Hi?>");
        assert!(decode_base64url("@@@").is_err());
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let payload = part(serde_json::json!({
            "mimeType": "text/plain",
            "headers": [{"name": "subject", "value": "Hello"}],
        }));
        assert_eq!(payload.header("Subject"), "Hello");
        assert_eq!(payload.header("From"), "");
    }

    #[test]
    fn test_multipart_prefers_plain_text() {
        let payload = part(serde_json::json!({
            "mimeType": "multipart/mixed",
            "parts": [
                {
                    "mimeType": "multipart/alternative",
                    "parts": [
                        {"mimeType": "text/html", "body": {"data": "PGI-SGk8L2I-"}},
                        {"mimeType": "text/plain", "body": {"data": "SGk"}}
                    ]
                }
            ]
        }));

        let (body, is_html) = payload.text_body().unwrap();
        assert_eq!(body, "Hi");
        assert!(!is_html);
    }

    #[test]
    fn test_html_only_message() {
        let payload = part(serde_json::json!({
            "mimeType": "text/html",
            "body": {"data": "PGI-SGk8L2I-"}
        }));

        let (body, is_html) = payload.text_body().unwrap();
        assert_eq!(body, "<b>Hi</b>");
        assert!(is_html);
    }

    #[test]
    fn test_message_without_text_parts() {
        let payload = part(serde_json::json!({
            "mimeType": "multipart/mixed",
            "parts": [{"mimeType": "application/pdf", "body": {"attachmentId": "x"}}]
        }));
        assert_eq!(payload.text_body().unwrap(), (String::new(), false));
    }
}
