//! Image search using the Brave Search API.

use crate::{check, normalize_query};
use async_trait::async_trait;
use pagination::{ProducerError, RenderableResult, ResultDescriptor, ResultProducer};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com";

/// Image search producer.
///
/// Candidates are validated by probing the full-size image URL, so hotlinks
/// that have gone stale or serve an HTML page are skipped.
pub struct ImageSearchProducer {
    client: Client,
    base_url: String,
    api_key: SecretString,
    max_results: usize,
}

#[derive(Deserialize)]
struct ImageSearchResponse {
    #[serde(default)]
    results: Vec<ImageResult>,
}

#[derive(Deserialize)]
struct ImageResult {
    title: Option<String>,
    /// Page the image was found on.
    url: String,
    properties: Option<ImageProperties>,
}

#[derive(Deserialize)]
struct ImageProperties {
    url: Option<String>,
}

impl ImageSearchProducer {
    /// Create a new producer with a Brave API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: SecretString::new(api_key.into()),
            max_results: 20,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set maximum number of candidates per search.
    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }
}

impl ImageResult {
    /// Results without a full-size image URL are dropped.
    fn into_descriptor(self) -> Option<ResultDescriptor> {
        let image_url = self.properties?.url?;
        let descriptor = ResultDescriptor::new(self.url, image_url);
        Some(match self.title {
            Some(title) if !title.is_empty() => descriptor.with_title(title),
            _ => descriptor,
        })
    }
}

#[async_trait]
impl ResultProducer for ImageSearchProducer {
    fn name(&self) -> &str {
        "images"
    }

    async fn search(&self, query: &str) -> Result<Vec<ResultDescriptor>, ProducerError> {
        let query = normalize_query(query)?;
        debug!(query = %query, "Performing image search");

        let response = self
            .client
            .get(format!("{}/res/v1/images/search", self.base_url))
            .header("X-Subscription-Token", self.api_key.expose_secret())
            .header("Accept", "application/json")
            .query(&[
                ("q", query),
                ("count", &self.max_results.to_string()),
                ("safesearch", "strict"),
            ])
            .send()
            .await?;

        let response = check("Brave Search", response).await?;
        let body: ImageSearchResponse = response.json().await?;

        Ok(body
            .results
            .into_iter()
            .filter_map(ImageResult::into_descriptor)
            .take(self.max_results)
            .collect())
    }

    async fn validate(
        &self,
        descriptor: &ResultDescriptor,
    ) -> Result<Option<RenderableResult>, ProducerError> {
        let response = match self.client.head(&descriptor.url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %descriptor.url, "Image probe failed: {}", e);
                return Ok(None);
            }
        };

        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("image/"));

        if !response.status().is_success() || !is_image {
            debug!(
                url = %descriptor.url,
                status = %response.status(),
                "Image candidate rejected"
            );
            return Ok(None);
        }

        let title = descriptor.title.clone().unwrap_or_else(|| "Image".into());
        Ok(Some(
            RenderableResult::new(title)
                .with_url(descriptor.id.clone())
                .with_image(descriptor.url.clone()),
        ))
    }
}
