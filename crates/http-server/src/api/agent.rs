// POST endpoint api/agent

use crate::api::request::{parse_action, Action, ValidationError};
use crate::core::{ApiError, AppState};
use axum::{
    Json,
    extract::{rejection::JsonRejection, State},
};
use connectors::services::error::ServiceError;
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// Handles `{action, payload}` requests from the control panel.
#[axum::debug_handler]
pub async fn agent_handler(
    State(app_state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    // 1. Malformed JSON is a client error like any other validation failure.
    let Json(body) = body.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::Validation(ValidationError {
            field: "body".to_string(),
            message: format!("Invalid JSON body: {}", rejection.body_text()),
        })
    })?;

    // 2. Validate before anything leaves the process.
    let action = parse_action(&body).map_err(|e| {
        warn!(field = %e.field, "Validation failed: {}", e.message);
        e
    })?;

    // 3. Dispatch.
    let tag = action.tag();
    info!(action = tag, "Dispatching action");
    dispatch(&app_state, action).await.map(Json).map_err(|e| {
        if e.is_config() {
            error!(action = tag, "Configuration error: {}", e);
        } else {
            error!(action = tag, "Upstream call failed: {}", e);
        }
        ApiError::Service(e)
    })
}

/// Runs exactly one connector call for the action and shapes its result.
pub async fn dispatch(state: &AppState, action: Action) -> Result<Value, ServiceError> {
    let value = match action {
        Action::ListMessages(query) => {
            let messages = state.mail.list_messages(&query).await?;
            json!({ "messages": messages })
        }
        Action::SendMessage(message) => {
            let ack = state.mail.send_message(&message).await?;
            json!(ack)
        }
        Action::ListPages(query) => {
            let pages = state.documents.list_pages(&query).await?;
            json!({ "pages": pages })
        }
        Action::CreatePage(page) => {
            let created = state.documents.create_page(&page).await?;
            json!(created)
        }
    };
    Ok(value)
}
