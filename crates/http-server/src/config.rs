use connectors::services::settings::{GmailSettings, NotionSettings, DEFAULT_TITLE_PROPERTY};
use std::env;

const DEFAULT_PORT: u16 = 3001;

/// Process configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub gmail: GmailSettings,
    pub notion: NotionSettings,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            port: get("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            gmail: GmailSettings {
                client_id: get("GMAIL_CLIENT_ID"),
                client_secret: get("GMAIL_CLIENT_SECRET"),
                refresh_token: get("GMAIL_REFRESH_TOKEN"),
                redirect_uri: get("GMAIL_REDIRECT_URI"),
            },
            notion: NotionSettings {
                api_key: get("NOTION_API_KEY"),
                database_id: get("NOTION_DATABASE_ID"),
                data_source_id: get("NOTION_DATA_SOURCE_ID"),
                title_property: get("NOTION_TITLE_PROPERTY")
                    .unwrap_or_else(|| DEFAULT_TITLE_PROPERTY.to_string()),
            },
        }
    }

    /// Names of unset variables, for a startup warning.
    pub fn missing_vars(&self) -> Vec<&'static str> {
        let checks = [
            ("GMAIL_CLIENT_ID", self.gmail.client_id.is_none()),
            ("GMAIL_CLIENT_SECRET", self.gmail.client_secret.is_none()),
            ("GMAIL_REFRESH_TOKEN", self.gmail.refresh_token.is_none()),
            ("GMAIL_REDIRECT_URI", self.gmail.redirect_uri.is_none()),
            ("NOTION_API_KEY", self.notion.api_key.is_none()),
            ("NOTION_DATABASE_ID", self.notion.database_id.is_none()),
            ("NOTION_DATA_SOURCE_ID", self.notion.data_source_id.is_none()),
        ];
        checks
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| name)
            .collect()
    }
}
