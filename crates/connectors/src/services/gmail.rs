use crate::models::gmail::{
    ListMessagesQuery, MessageList, MessageMetadata, MessageSummary, OutgoingMessage, SendAck,
    TokenResponse,
};
use crate::services::error::ServiceError;
use crate::services::response::{check_status, read_json};
use crate::services::settings::{GmailCredentials, GmailSettings};
use async_trait::async_trait;
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use futures::future::try_join_all;
use reqwest::Client;
use tracing::{debug, info, instrument};

pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const METADATA_HEADERS: [&str; 3] = ["From", "Subject", "Date"];

/// Mail operations the dispatcher needs.
#[async_trait]
pub trait MailService: Send + Sync {
    async fn list_messages(
        &self,
        query: &ListMessagesQuery,
    ) -> Result<Vec<MessageSummary>, ServiceError>;

    async fn send_message(&self, message: &OutgoingMessage) -> Result<SendAck, ServiceError>;
}

/// Gmail REST client authenticated with a long-lived refresh token.
#[derive(Clone)]
pub struct GmailClient {
    http: Client,
    settings: GmailSettings,
    api_base: String,
    token_url: String,
}

impl GmailClient {
    pub fn new(http: Client, settings: GmailSettings) -> Self {
        Self::with_endpoints(http, settings, GMAIL_API_BASE, GOOGLE_TOKEN_URL)
    }

    /// Points the client at alternate endpoints, e.g. a local fake.
    pub fn with_endpoints(
        http: Client,
        settings: GmailSettings,
        api_base: &str,
        token_url: &str,
    ) -> Self {
        Self {
            http,
            settings,
            api_base: api_base.trim_end_matches('/').to_string(),
            token_url: token_url.to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/gmail/v1/users/me/messages", self.api_base)
    }

    /// Exchanges the refresh token for a short-lived access token.
    async fn access_token(&self, creds: &GmailCredentials) -> Result<String, ServiceError> {
        let form = [
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", creds.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let resp = self.http.post(&self.token_url).form(&form).send().await?;
        let token: TokenResponse = read_json("Google OAuth", resp).await?;
        debug!("Obtained Gmail access token");
        Ok(token.access_token)
    }

    async fn fetch_metadata(
        &self,
        token: &str,
        id: &str,
    ) -> Result<MessageSummary, ServiceError> {
        let mut params = vec![("format", "metadata")];
        params.extend(METADATA_HEADERS.iter().map(|h| ("metadataHeaders", *h)));

        let resp = self
            .http
            .get(format!("{}/{}", self.messages_url(), id))
            .bearer_auth(token)
            .query(&params)
            .send()
            .await?;
        let meta: MessageMetadata = read_json("Gmail", resp).await?;
        Ok(meta.into())
    }
}

#[async_trait]
impl MailService for GmailClient {
    #[instrument(skip(self, query), fields(max_results = query.max_results))]
    async fn list_messages(
        &self,
        query: &ListMessagesQuery,
    ) -> Result<Vec<MessageSummary>, ServiceError> {
        let creds = self.settings.require()?;
        let token = self.access_token(&creds).await?;

        let mut params = vec![
            ("maxResults", query.max_results.to_string()),
            ("includeSpamTrash", query.include_spam_trash.to_string()),
        ];
        params.extend(
            query
                .label_ids
                .iter()
                .map(|label| ("labelIds", label.clone())),
        );

        let resp = self
            .http
            .get(self.messages_url())
            .bearer_auth(&token)
            .query(&params)
            .send()
            .await?;
        let list: MessageList = read_json("Gmail", resp).await?;

        let ids: Vec<String> = list
            .messages
            .into_iter()
            .filter_map(|m| m.id)
            .take(query.max_results as usize)
            .collect();

        // try_join_all keeps the listing order regardless of completion order.
        let summaries = try_join_all(ids.iter().map(|id| self.fetch_metadata(&token, id))).await?;

        info!("Listed {} Gmail messages", summaries.len());
        Ok(summaries)
    }

    #[instrument(skip(self, message))]
    async fn send_message(&self, message: &OutgoingMessage) -> Result<SendAck, ServiceError> {
        let creds = self.settings.require()?;
        let token = self.access_token(&creds).await?;

        let raw = encode_raw_message(message);
        let resp = self
            .http
            .post(format!("{}/send", self.messages_url()))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await?;
        check_status("Gmail", resp).await?;

        info!("Sent Gmail message");
        Ok(SendAck::sent())
    }
}

/// Builds a minimal RFC 5322 text/plain message and base64url-encodes it the
/// way the Gmail `messages.send` endpoint expects.
pub fn encode_raw_message(message: &OutgoingMessage) -> String {
    let mut email = String::new();
    email.push_str(&format!("To: {}\r\n", message.to));
    email.push_str(&format!("Subject: {}\r\n", encode_header_value(&message.subject)));
    email.push_str("MIME-Version: 1.0\r\n");
    email.push_str("Content-Type: text/plain; charset=\"UTF-8\"\r\n");
    email.push_str("\r\n");
    email.push_str(&message.body);

    URL_SAFE_NO_PAD.encode(email.as_bytes())
}

// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header_value(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> String {
        String::from_utf8(URL_SAFE_NO_PAD.decode(raw).unwrap()).unwrap()
    }

    #[test]
    fn raw_message_has_headers_then_body() {
        let raw = encode_raw_message(&OutgoingMessage {
            to: "bob@example.com".into(),
            subject: "Hi".into(),
            body: "See you soon.".into(),
        });
        let text = decode(&raw);
        assert!(text.starts_with("To: bob@example.com\r\nSubject: Hi\r\n"));
        assert!(text.contains("Content-Type: text/plain; charset=\"UTF-8\"\r\n"));
        assert!(text.ends_with("\r\n\r\nSee you soon."));
    }

    #[test]
    fn raw_message_is_url_safe() {
        let raw = encode_raw_message(&OutgoingMessage {
            to: "bob@example.com".into(),
            subject: "???>>>".into(),
            body: "~~~???>>>".repeat(10),
        });
        assert!(!raw.contains('+'));
        assert!(!raw.contains('/'));
        assert!(!raw.contains('='));
    }

    #[test]
    fn non_ascii_subject_is_encoded_word() {
        assert_eq!(encode_header_value("plain"), "plain");
        assert_eq!(encode_header_value("héllo"), "=?UTF-8?B?aMOpbGxv?=");
    }
}
