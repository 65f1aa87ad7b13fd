//! Steam store lookup.

use crate::{check, normalize_query};
use async_trait::async_trait;
use pagination::{ProducerError, RenderableResult, ResultDescriptor, ResultProducer};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://store.steampowered.com";

/// Producer over the public Steam storefront API (no key required).
pub struct SteamProducer {
    client: Client,
    base_url: String,
    country: String,
    max_results: usize,
}

#[derive(Deserialize)]
struct StoreSearchResponse {
    #[serde(default)]
    items: Vec<StoreItem>,
}

#[derive(Deserialize)]
struct StoreItem {
    id: u64,
    name: String,
}

#[derive(Deserialize)]
struct AppDetailsEntry {
    success: bool,
    data: Option<AppData>,
}

#[derive(Deserialize)]
struct AppData {
    name: String,
    #[serde(default)]
    short_description: String,
    header_image: Option<String>,
    #[serde(default)]
    is_free: bool,
    price_overview: Option<PriceOverview>,
    release_date: Option<ReleaseDate>,
}

#[derive(Deserialize)]
struct PriceOverview {
    final_formatted: String,
}

#[derive(Deserialize)]
struct ReleaseDate {
    #[serde(default)]
    coming_soon: bool,
    #[serde(default)]
    date: String,
}

impl SteamProducer {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            country: "us".into(),
            max_results: 10,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Storefront country used for prices.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    fn store_page(&self, app_id: &str) -> String {
        format!("https://store.steampowered.com/app/{}", app_id)
    }
}

impl Default for SteamProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl AppData {
    fn price(&self) -> Option<String> {
        if self.is_free {
            return Some("Free".into());
        }
        self.price_overview
            .as_ref()
            .map(|p| p.final_formatted.clone())
    }

    fn release(&self) -> Option<String> {
        let release = self.release_date.as_ref()?;
        if release.coming_soon {
            return Some("Coming soon".into());
        }
        (!release.date.is_empty()).then(|| release.date.clone())
    }
}

#[async_trait]
impl ResultProducer for SteamProducer {
    fn name(&self) -> &str {
        "steam"
    }

    async fn search(&self, query: &str) -> Result<Vec<ResultDescriptor>, ProducerError> {
        let query = normalize_query(query)?;
        debug!(query = %query, "Searching Steam store");

        let response = self
            .client
            .get(format!("{}/api/storesearch/", self.base_url))
            .query(&[("term", query), ("l", "english"), ("cc", &self.country)])
            .send()
            .await?;

        let response = check("Steam", response).await?;
        let body: StoreSearchResponse = response.json().await?;

        Ok(body
            .items
            .into_iter()
            .take(self.max_results)
            .map(|item| {
                let id = item.id.to_string();
                ResultDescriptor::new(id.clone(), self.store_page(&id)).with_title(item.name)
            })
            .collect())
    }

    async fn validate(
        &self,
        descriptor: &ResultDescriptor,
    ) -> Result<Option<RenderableResult>, ProducerError> {
        let response = self
            .client
            .get(format!("{}/api/appdetails", self.base_url))
            .query(&[("appids", descriptor.id.as_str()), ("cc", &self.country)])
            .send()
            .await?;

        let response = check("Steam", response).await?;
        let mut body: HashMap<String, AppDetailsEntry> = response.json().await?;

        let data = match body.remove(&descriptor.id) {
            Some(AppDetailsEntry {
                success: true,
                data: Some(data),
            }) => data,
            _ => {
                debug!(app = %descriptor.id, "App details unavailable");
                return Ok(None);
            }
        };

        let mut result = RenderableResult::new(data.name.clone()).with_url(descriptor.url.clone());
        if !data.short_description.is_empty() {
            result = result.with_description(data.short_description.clone());
        }
        if let Some(image) = &data.header_image {
            result = result.with_image(image.clone());
        }
        if let Some(price) = data.price() {
            result = result.with_field("Price", price);
        }
        if let Some(release) = data.release() {
            result = result.with_field("Release date", release);
        }

        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn producer(server: &MockServer) -> SteamProducer {
        SteamProducer::new().with_base_url(server.uri())
    }

    fn portal() -> ResultDescriptor {
        ResultDescriptor::new("400", "https://store.steampowered.com/app/400").with_title("Portal")
    }

    #[tokio::test]
    async fn test_search_maps_items() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/storesearch/"))
            .and(query_param("term", "portal"))
            .and(query_param("l", "english"))
            .and(query_param("cc", "us"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 2,
                "items": [
                    { "type": "app", "name": "Portal", "id": 400 },
                    { "type": "app", "name": "Portal 2", "id": 620 }
                ]
            })))
            .mount(&server)
            .await;

        let results = assert_ok!(producer(&server).search("portal").await);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0], portal());
        assert_eq!(results[1].id, "620");
    }

    #[tokio::test]
    async fn test_search_country_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("cc", "gb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    { "name": "A", "id": 1 },
                    { "name": "B", "id": 2 },
                    { "name": "C", "id": 3 }
                ]
            })))
            .mount(&server)
            .await;

        let results = assert_ok!(
            producer(&server)
                .with_country("gb")
                .with_max_results(2)
                .search("x")
                .await
        );
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = assert_err!(producer(&server).search("portal").await);
        assert!(matches!(err, ProducerError::ExternalService(_)));
    }

    #[tokio::test]
    async fn test_validate_renders_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/appdetails"))
            .and(query_param("appids", "400"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "400": {
                    "success": true,
                    "data": {
                        "name": "Portal",
                        "short_description": "A puzzle game.",
                        "header_image": "https://cdn.steam.example/400/header.jpg",
                        "is_free": false,
                        "price_overview": { "final_formatted": "$9.99" },
                        "release_date": { "coming_soon": false, "date": "10 Oct, 2007" }
                    }
                }
            })))
            .mount(&server)
            .await;

        let producer = producer(&server);
        let rendered = assert_ok!(producer.validate(&portal()).await).unwrap();

        assert_eq!(rendered.title, "Portal");
        assert_eq!(rendered.description.as_deref(), Some("A puzzle game."));
        assert_eq!(
            rendered.image_url.as_deref(),
            Some("https://cdn.steam.example/400/header.jpg")
        );
        assert_eq!(rendered.fields.len(), 2);
        assert_eq!(rendered.fields[0].value, "$9.99");
        assert_eq!(rendered.fields[1].value, "10 Oct, 2007");

        let again = assert_ok!(producer.validate(&portal()).await).unwrap();
        assert_eq!(again, rendered);
    }

    #[tokio::test]
    async fn test_validate_free_and_unreleased() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "400": {
                    "success": true,
                    "data": {
                        "name": "Portal",
                        "is_free": true,
                        "release_date": { "coming_soon": true, "date": "" }
                    }
                }
            })))
            .mount(&server)
            .await;

        let rendered = assert_ok!(producer(&server).validate(&portal()).await).unwrap();

        assert_eq!(rendered.description, None);
        assert_eq!(rendered.fields[0].value, "Free");
        assert_eq!(rendered.fields[1].value, "Coming soon");
    }

    #[tokio::test]
    async fn test_validate_rejects_unsuccessful_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "400": { "success": false }
            })))
            .mount(&server)
            .await;

        let result = assert_ok!(producer(&server).validate(&portal()).await);
        assert!(result.is_none());
    }
}
