use crate::models::notion::{
    CreatePageResponse, CreatedPage, NewPage, PageQuery, PageSummary, QueryResponse,
};
use crate::services::error::ServiceError;
use crate::services::response::read_json;
use crate::services::settings::{NotionCredentials, NotionSettings};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::{info, instrument};

pub const NOTION_API_BASE: &str = "https://api.notion.com";
pub const NOTION_VERSION: &str = "2025-09-03";

/// Document operations the dispatcher needs.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn list_pages(&self, query: &PageQuery) -> Result<Vec<PageSummary>, ServiceError>;

    async fn create_page(&self, page: &NewPage) -> Result<CreatedPage, ServiceError>;
}

#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    settings: NotionSettings,
    api_base: String,
}

impl NotionClient {
    pub fn new(http: Client, settings: NotionSettings) -> Self {
        Self::with_base_url(http, settings, NOTION_API_BASE)
    }

    pub fn with_base_url(http: Client, settings: NotionSettings, api_base: &str) -> Self {
        Self {
            http,
            settings,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn post(&self, creds: &NotionCredentials, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{}", self.api_base, path))
            .bearer_auth(&creds.api_key)
            .header("Notion-Version", NOTION_VERSION)
    }
}

#[async_trait]
impl DocumentService for NotionClient {
    #[instrument(skip(self, query), fields(page_size = query.page_size))]
    async fn list_pages(&self, query: &PageQuery) -> Result<Vec<PageSummary>, ServiceError> {
        let creds = self.settings.require()?;

        let path = format!("/v1/data_sources/{}/query", creds.data_source_id);
        let resp = self
            .post(&creds, &path)
            .json(&query.to_body())
            .send()
            .await?;
        let result: QueryResponse = read_json("Notion", resp).await?;

        let pages: Vec<PageSummary> = result
            .results
            .into_iter()
            .filter_map(PageSummary::from_result)
            .collect();

        info!("Listed {} Notion pages", pages.len());
        Ok(pages)
    }

    #[instrument(skip(self, page))]
    async fn create_page(&self, page: &NewPage) -> Result<CreatedPage, ServiceError> {
        let creds = self.settings.require()?;

        let body = page.to_body(&creds.database_id, &creds.title_property);
        let resp = self.post(&creds, "/v1/pages").json(&body).send().await?;
        let created: CreatePageResponse = read_json("Notion", resp).await?;

        info!(page_id = %created.id, "Created Notion page");
        Ok(created.into())
    }
}
