use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Notion caps a single rich-text run at this many characters.
pub const MAX_RICH_TEXT_CHARS: usize = 2000;

// --- Inputs ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    pub property: String,
    pub contains: String,
}

impl PropertyFilter {
    /// Text "contains" filter over one named property.
    pub fn to_json(&self) -> Value {
        json!({
            "property": self.property,
            "rich_text": { "contains": self.contains }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page_size: u32,
    pub filter: Option<PropertyFilter>,
}

impl PageQuery {
    pub fn to_body(&self) -> Value {
        let mut body = json!({ "page_size": self.page_size });
        if let Some(filter) = &self.filter {
            body["filter"] = filter.to_json();
        }
        body
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPage {
    pub title: String,
    pub content: String,
}

impl NewPage {
    /// Request body for `POST /v1/pages` under the given database.
    pub fn to_body(&self, database_id: &str, title_property: &str) -> Value {
        let mut properties = Map::new();
        properties.insert(
            title_property.to_string(),
            json!({ "title": [{ "type": "text", "text": { "content": self.title } }] }),
        );

        let runs: Vec<Value> = chunk_chars(&self.content, MAX_RICH_TEXT_CHARS)
            .into_iter()
            .map(|chunk| json!({ "type": "text", "text": { "content": chunk } }))
            .collect();

        json!({
            "parent": { "database_id": database_id },
            "properties": properties,
            "children": [{
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": runs }
            }]
        })
    }
}

fn chunk_chars(text: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(max).map(|c| c.iter().collect()).collect()
}

// --- Notion wire types ---

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Value>,
}

/// A full page object. Partial results (only `object` and `id`) fail to
/// deserialize into this and are skipped.
#[derive(Debug, Deserialize)]
pub struct PageObject {
    pub object: String,
    pub id: String,
    pub url: String,
    pub created_time: String,
    pub last_edited_time: String,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePageResponse {
    pub id: String,
    pub url: Option<String>,
}

// --- Outputs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: String,
    pub url: String,
    pub created_time: String,
    pub last_edited_time: String,
    pub properties: Map<String, Value>,
}

impl PageSummary {
    /// Keeps only full page objects.
    pub fn from_result(value: Value) -> Option<Self> {
        let page: PageObject = serde_json::from_value(value).ok()?;
        if page.object != "page" {
            return None;
        }
        Some(Self {
            id: page.id,
            url: page.url,
            created_time: page.created_time,
            last_edited_time: page.last_edited_time,
            properties: page.properties,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPage {
    pub page_id: String,
    pub url: Option<String>,
}

impl From<CreatePageResponse> for CreatedPage {
    fn from(resp: CreatePageResponse) -> Self {
        Self {
            page_id: resp.id,
            url: resp.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_body_without_filter() {
        let query = PageQuery {
            page_size: 10,
            filter: None,
        };
        assert_eq!(query.to_body(), json!({ "page_size": 10 }));
    }

    #[test]
    fn query_body_with_contains_filter() {
        let query = PageQuery {
            page_size: 5,
            filter: Some(PropertyFilter {
                property: "Status".into(),
                contains: "Done".into(),
            }),
        };
        assert_eq!(
            query.to_body(),
            json!({
                "page_size": 5,
                "filter": { "property": "Status", "rich_text": { "contains": "Done" } }
            })
        );
    }

    #[test]
    fn new_page_body_has_title_and_paragraph() {
        let page = NewPage {
            title: "Weekly notes".into(),
            content: "Shipped the thing.".into(),
        };
        let body = page.to_body("db-1", "Name");
        assert_eq!(body["parent"], json!({ "database_id": "db-1" }));
        assert_eq!(
            body["properties"]["Name"]["title"][0]["text"]["content"],
            "Weekly notes"
        );
        assert_eq!(body["children"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["children"][0]["type"], "paragraph");
        assert_eq!(
            body["children"][0]["paragraph"]["rich_text"][0]["text"]["content"],
            "Shipped the thing."
        );
    }

    #[test]
    fn long_content_is_split_into_runs() {
        let content = "é".repeat(MAX_RICH_TEXT_CHARS * 2 + 1);
        let page = NewPage {
            title: "t".into(),
            content: content.clone(),
        };
        let body = page.to_body("db", "Title");
        let runs = body["children"][0]["paragraph"]["rich_text"]
            .as_array()
            .cloned()
            .unwrap();
        assert_eq!(runs.len(), 3);
        let rejoined: String = runs
            .iter()
            .map(|r| r["text"]["content"].as_str().unwrap())
            .collect();
        assert_eq!(rejoined, content);
    }

    #[test]
    fn only_full_pages_are_summarized() {
        let full = json!({
            "object": "page",
            "id": "p1",
            "url": "https://www.notion.so/p1",
            "created_time": "2024-05-01T12:00:00.000Z",
            "last_edited_time": "2024-05-02T08:30:00.000Z",
            "properties": { "Name": { "type": "title", "title": [] } },
            "archived": false
        });
        let partial = json!({ "object": "page", "id": "p2" });
        let database = json!({
            "object": "database",
            "id": "d1",
            "url": "https://www.notion.so/d1",
            "created_time": "2024-05-01T12:00:00.000Z",
            "last_edited_time": "2024-05-02T08:30:00.000Z",
            "properties": {}
        });

        let summary = PageSummary::from_result(full).expect("full page");
        assert_eq!(summary.id, "p1");
        assert_eq!(summary.created_time, "2024-05-01T12:00:00.000Z");
        assert!(summary.properties.contains_key("Name"));
        assert!(PageSummary::from_result(partial).is_none());
        assert!(PageSummary::from_result(database).is_none());
    }

    #[test]
    fn timestamps_are_passed_through_verbatim() {
        let page = json!({
            "object": "page",
            "id": "p3",
            "url": "https://www.notion.so/p3",
            "created_time": "2024-05-01T12:00:00.000Z",
            "last_edited_time": "2024-05-02 08:30",
            "properties": {}
        });

        let summary = PageSummary::from_result(page).expect("page is kept");
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(value["createdTime"], "2024-05-01T12:00:00.000Z");
        assert_eq!(value["lastEditedTime"], "2024-05-02 08:30");
    }

    #[test]
    fn created_page_serializes_null_url() {
        let created = CreatedPage::from(CreatePageResponse {
            id: "p9".into(),
            url: None,
        });
        assert_eq!(
            serde_json::to_value(created).unwrap(),
            json!({ "pageId": "p9", "url": null })
        );
    }
}
