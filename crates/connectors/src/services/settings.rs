use crate::services::error::ServiceError;
use uuid::Uuid;

pub const DEFAULT_TITLE_PROPERTY: &str = "Name";

/// Gmail OAuth client settings. Every field is optional so the server can start
/// without them; `require` is called by the client before each request.
#[derive(Clone, Debug, Default)]
pub struct GmailSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
    pub redirect_uri: Option<String>,
}

/// Gmail credentials with every required value present.
#[derive(Clone, Debug)]
pub struct GmailCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub redirect_uri: String,
}

impl GmailSettings {
    pub fn require(&self) -> Result<GmailCredentials, ServiceError> {
        Ok(GmailCredentials {
            client_id: required(&self.client_id, "GMAIL_CLIENT_ID")?,
            client_secret: required(&self.client_secret, "GMAIL_CLIENT_SECRET")?,
            refresh_token: required(&self.refresh_token, "GMAIL_REFRESH_TOKEN")?,
            redirect_uri: required(&self.redirect_uri, "GMAIL_REDIRECT_URI")?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct NotionSettings {
    pub api_key: Option<String>,
    pub database_id: Option<String>,
    pub data_source_id: Option<String>,
    pub title_property: String,
}

impl Default for NotionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            database_id: None,
            data_source_id: None,
            title_property: DEFAULT_TITLE_PROPERTY.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NotionCredentials {
    pub api_key: String,
    /// Hyphenated form.
    pub database_id: String,
    /// Hyphenated form.
    pub data_source_id: String,
    pub title_property: String,
}

impl NotionSettings {
    pub fn require(&self) -> Result<NotionCredentials, ServiceError> {
        let api_key = required(&self.api_key, "NOTION_API_KEY")?;
        let database_id = required(&self.database_id, "NOTION_DATABASE_ID")?;
        let data_source_id = required(&self.data_source_id, "NOTION_DATA_SOURCE_ID")?;

        Ok(NotionCredentials {
            api_key,
            database_id: normalize_id(&database_id, "NOTION_DATABASE_ID")?,
            data_source_id: normalize_id(&data_source_id, "NOTION_DATA_SOURCE_ID")?,
            title_property: self.title_property.clone(),
        })
    }
}

fn required(value: &Option<String>, name: &'static str) -> Result<String, ServiceError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ServiceError::MissingConfig(name)),
    }
}

// Notion accepts ids with or without hyphens; share links use the bare form.
fn normalize_id(raw: &str, name: &'static str) -> Result<String, ServiceError> {
    Uuid::parse_str(raw)
        .map(|id| id.hyphenated().to_string())
        .map_err(|e| ServiceError::InvalidConfig(format!("{name} is not a valid id: {e}")))
}
