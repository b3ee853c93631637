use serde::{Deserialize, Serialize};

// --- Inputs ---

/// Validated parameters for listing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMessagesQuery {
    pub max_results: u32,
    pub label_ids: Vec<String>,
    pub include_spam_trash: bool,
}

/// Validated plain-text message to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

// --- Gmail wire types ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageList {
    #[serde(default)]
    pub messages: Vec<MessageRef>,
}

/// Listing entry. Gmail always sends an id, but entries without one are
/// tolerated and skipped.
#[derive(Debug, Deserialize)]
pub struct MessageRef {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    pub id: String,
    pub thread_id: Option<String>,
    pub snippet: Option<String>,
    pub payload: Option<MessagePayload>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagePayload {
    #[serde(default)]
    pub headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

// --- Outputs ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    pub id: String,
    pub thread_id: Option<String>,
    pub from: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
    pub snippet: Option<String>,
}

impl From<MessageMetadata> for MessageSummary {
    fn from(meta: MessageMetadata) -> Self {
        let payload = meta.payload.unwrap_or_default();
        Self {
            from: payload.header("From"),
            subject: payload.header("Subject"),
            date: payload.header("Date"),
            id: meta.id,
            thread_id: meta.thread_id,
            snippet: meta.snippet,
        }
    }
}

impl MessagePayload {
    /// Header names are case-insensitive.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.clone())
    }
}

/// Fixed acknowledgment for a sent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendAck {
    pub status: String,
}

impl SendAck {
    pub fn sent() -> Self {
        Self {
            status: "sent".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_picks_headers_case_insensitively() {
        let meta: MessageMetadata = serde_json::from_value(json!({
            "id": "m1",
            "threadId": "t1",
            "snippet": "hello there",
            "payload": {
                "headers": [
                    { "name": "from", "value": "Alice <alice@example.com>" },
                    { "name": "SUBJECT", "value": "Lunch" },
                    { "name": "Date", "value": "Tue, 1 Oct 2024 10:00:00 +0000" }
                ]
            }
        }))
        .unwrap();

        let summary = MessageSummary::from(meta);
        assert_eq!(summary.from.as_deref(), Some("Alice <alice@example.com>"));
        assert_eq!(summary.subject.as_deref(), Some("Lunch"));
        assert_eq!(summary.date.as_deref(), Some("Tue, 1 Oct 2024 10:00:00 +0000"));
        assert_eq!(summary.snippet.as_deref(), Some("hello there"));
    }

    #[test]
    fn summary_without_payload_has_null_headers() {
        let meta: MessageMetadata = serde_json::from_value(json!({ "id": "m2" })).unwrap();
        let value = serde_json::to_value(MessageSummary::from(meta)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "m2",
                "threadId": null,
                "from": null,
                "subject": null,
                "date": null,
                "snippet": null
            })
        );
    }

    #[test]
    fn listing_tolerates_missing_ids_and_messages() {
        let list: MessageList = serde_json::from_value(json!({ "resultSizeEstimate": 0 })).unwrap();
        assert!(list.messages.is_empty());

        let list: MessageList = serde_json::from_value(json!({
            "messages": [{ "id": "a", "threadId": "t" }, { "threadId": "u" }]
        }))
        .unwrap();
        assert_eq!(list.messages.len(), 2);
        assert!(list.messages[1].id.is_none());
    }
}
