//! Result producer capability.

use crate::error::ProducerError;
use async_trait::async_trait;
use chat_client::{Content, Embed, EmbedField};
use session_store::ResultDescriptor;

/// Embed description limit imposed by the platform.
pub const MAX_DESCRIPTION_CHARS: usize = 4096;

/// A validated, display-ready result.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableResult {
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub fields: Vec<EmbedField>,
}

impl RenderableResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            url: None,
            image_url: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
        self
    }

    /// Build the message body for this result with a page indicator footer.
    pub fn to_content(&self, page_label: &str) -> Content {
        Content::embed(Embed {
            title: Some(self.title.clone()),
            description: self.description.as_deref().map(truncate_description),
            url: self.url.clone(),
            image_url: self.image_url.clone(),
            fields: self.fields.clone(),
            footer: Some(page_label.to_string()),
        })
    }
}

pub fn truncate_description(text: &str) -> String {
    if text.chars().count() <= MAX_DESCRIPTION_CHARS {
        return text.to_string();
    }

    // Leave room for the ellipsis.
    let cut = text
        .char_indices()
        .nth(MAX_DESCRIPTION_CHARS - 1)
        .map_or(text.len(), |(i, _)| i);
    format!("{}…", &text[..cut])
}

/// Source of paginated results for one command family.
///
/// `search` normalizes whatever the upstream service returns into an
/// ordered list once; `validate` is called lazily right before a candidate
/// is shown and must be idempotent.
#[async_trait]
pub trait ResultProducer: Send + Sync {
    /// Registry name (e.g., "images").
    fn name(&self) -> &str;

    /// Run a query. An empty list means no results.
    async fn search(&self, query: &str) -> Result<Vec<ResultDescriptor>, ProducerError>;

    /// Turn a descriptor into a displayable result, or `None` if it is no
    /// longer usable.
    async fn validate(
        &self,
        descriptor: &ResultDescriptor,
    ) -> Result<Option<RenderableResult>, ProducerError>;
}
