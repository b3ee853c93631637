use crate::api::request::ValidationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use connectors::services::{
    error::ServiceError, gmail::MailService, notion::DocumentService,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

// Shared state handed to every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub mail: Arc<dyn MailService>,
    pub documents: Arc<dyn DocumentService>,
}

// Define a custom error type for our API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Service(#[from] ServiceError),
}

// Every failure becomes `{ "error": message }`.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
