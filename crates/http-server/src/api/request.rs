//! Validation of the `{action, payload}` body into a typed [`Action`].
//!
//! Nothing here touches the network; a request that fails validation never
//! reaches a connector.

use connectors::models::{
    gmail::{ListMessagesQuery, OutgoingMessage},
    notion::{NewPage, PageQuery, PropertyFilter},
};
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 20;

/// A validated request, one variant per supported action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ListMessages(ListMessagesQuery),
    SendMessage(OutgoingMessage),
    ListPages(PageQuery),
    CreatePage(NewPage),
}

impl Action {
    pub fn tag(&self) -> &'static str {
        match self {
            Action::ListMessages(_) => "listMessages",
            Action::SendMessage(_) => "sendMessage",
            Action::ListPages(_) => "listPages",
            Action::CreatePage(_) => "createPage",
        }
    }
}

/// The field that failed and the constraint it broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Parses an untyped request body into an [`Action`].
///
/// The action tag is checked before the payload is inspected, so an unknown
/// tag is rejected the same way whatever payload accompanies it.
pub fn parse_action(body: &Value) -> Result<Action, ValidationError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ValidationError::new("action", "Request body must be a JSON object"))?;

    let tag = match obj.get("action") {
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(ValidationError::new("action", "action must be a string")),
        None => return Err(ValidationError::new("action", "action is required")),
    };

    let parse: fn(&Payload) -> Result<Action, ValidationError> = match tag {
        "listMessages" => list_messages,
        "sendMessage" => send_message,
        "listPages" => list_pages,
        "createPage" => create_page,
        other => {
            return Err(ValidationError::new(
                "action",
                format!("Unsupported action: {other}"),
            ))
        }
    };

    let payload = match obj.get("payload") {
        None | Some(Value::Null) => Payload::empty(),
        Some(Value::Object(map)) => Payload(map.clone()),
        Some(_) => {
            return Err(ValidationError::new(
                "payload",
                "payload must be a JSON object",
            ))
        }
    };

    parse(&payload)
}

fn list_messages(p: &Payload) -> Result<Action, ValidationError> {
    Ok(Action::ListMessages(ListMessagesQuery {
        max_results: p.limit("maxResults")?,
        label_ids: p.string_set("labelIds")?,
        include_spam_trash: p.optional_bool("includeSpamTrash")?.unwrap_or(false),
    }))
}

fn send_message(p: &Payload) -> Result<Action, ValidationError> {
    let to = p.required_string("to")?;
    if !is_valid_email(&to) {
        return Err(ValidationError::new("to", "to must be a valid email address"));
    }
    let subject = p.required_string("subject")?;
    if subject.contains(['\r', '\n']) {
        return Err(ValidationError::new(
            "subject",
            "subject must not contain line breaks",
        ));
    }
    let body = p.required_string("body")?;

    Ok(Action::SendMessage(OutgoingMessage { to, subject, body }))
}

fn list_pages(p: &Payload) -> Result<Action, ValidationError> {
    let page_size = p.limit("pageSize")?;
    let property = p.optional_string("filterProperty")?;
    let value = p.optional_string("filterValue")?;

    let filter = match (property, value) {
        (Some(property), Some(contains)) => Some(PropertyFilter { property, contains }),
        (Some(_), None) => {
            return Err(ValidationError::new(
                "filterValue",
                "filterValue is required when filterProperty is set",
            ))
        }
        (None, Some(_)) => {
            return Err(ValidationError::new(
                "filterProperty",
                "filterProperty is required when filterValue is set",
            ))
        }
        (None, None) => None,
    };

    Ok(Action::ListPages(PageQuery { page_size, filter }))
}

fn create_page(p: &Payload) -> Result<Action, ValidationError> {
    Ok(Action::CreatePage(NewPage {
        title: p.required_string("title")?,
        content: p.required_string("content")?,
    }))
}

/// Syntax check only: one `@`, a non-empty local part, a dotted domain and no
/// whitespace or control characters (which would also allow header injection).
pub fn is_valid_email(address: &str) -> bool {
    if address.len() > 254 || address.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if local.contains(['<', '>', '(', ')', ',', ';', ':', '"', '[', ']', '\\']) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

// --- Payload field readers ---

struct Payload(Map<String, Value>);

impl Payload {
    fn empty() -> Self {
        Payload(Map::new())
    }

    /// Absent and `null` are the same thing.
    fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    fn required_string(&self, field: &str) -> Result<String, ValidationError> {
        match self.optional_string(field)? {
            Some(s) => Ok(s),
            None => Err(ValidationError::new(field, format!("{field} is required"))),
        }
    }

    fn optional_string(&self, field: &str) -> Result<Option<String>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::new(
                field,
                format!("{field} must not be empty"),
            )),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ValidationError::new(
                field,
                format!("{field} must be a string"),
            )),
        }
    }

    fn optional_bool(&self, field: &str) -> Result<Option<bool>, ValidationError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ValidationError::new(
                field,
                format!("{field} must be a boolean"),
            )),
        }
    }

    /// Integer in `1..=MAX_LIMIT`, defaulting to `DEFAULT_LIMIT`.
    fn limit(&self, field: &str) -> Result<u32, ValidationError> {
        let Some(value) = self.get(field) else {
            return Ok(DEFAULT_LIMIT);
        };
        value
            .as_u64()
            .filter(|n| (1..=MAX_LIMIT as u64).contains(n))
            .map(|n| n as u32)
            .ok_or_else(|| {
                ValidationError::new(
                    field,
                    format!("{field} must be an integer between 1 and {MAX_LIMIT}"),
                )
            })
    }

    /// Array of non-empty strings; duplicates are dropped, first occurrence wins.
    fn string_set(&self, field: &str) -> Result<Vec<String>, ValidationError> {
        let Some(value) = self.get(field) else {
            return Ok(Vec::new());
        };
        let invalid = || {
            ValidationError::new(
                field,
                format!("{field} must be an array of non-empty strings"),
            )
        };

        let items = value.as_array().ok_or_else(invalid)?;
        let mut out: Vec<String> = Vec::with_capacity(items.len());
        for item in items {
            let s = item
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .ok_or_else(invalid)?;
            if !out.iter().any(|existing| existing == s) {
                out.push(s.to_string());
            }
        }
        Ok(out)
    }
}
