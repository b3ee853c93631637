use crate::services::error::ServiceError;
use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Turns a non-2xx response into `ServiceError::ApiError`. An unreadable
/// body is reported with the status reason phrase instead.
pub(crate) async fn check_status(
    service: &'static str,
    resp: Response,
) -> Result<Response, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Could not read {} error body: {}", service, e);
            String::new()
        }
    };
    Err(ServiceError::from_upstream(service, status.as_u16(), &body))
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    resp: Response,
) -> Result<T, ServiceError> {
    let resp = check_status(service, resp).await?;
    Ok(resp.json::<T>().await?)
}
