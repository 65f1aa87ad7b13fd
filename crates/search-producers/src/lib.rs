//! Result producers backed by external search APIs.

mod images;
mod steam;

pub use images::ImageSearchProducer;
pub use steam::SteamProducer;

use pagination::ProducerError;
use reqwest::Response;

/// Map rate limits and non-2xx statuses from a search API to producer errors.
async fn check(service: &str, response: Response) -> Result<Response, ProducerError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.as_u16() == 429 {
        return Err(ProducerError::RateLimit);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProducerError::ExternalService(format!(
        "{} API error: {} - {}",
        service, status, body
    )))
}

/// Trimmed, non-empty query or `InvalidQuery`.
fn normalize_query(query: &str) -> Result<&str, ProducerError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ProducerError::InvalidQuery("Empty query".into()));
    }
    Ok(query)
}
